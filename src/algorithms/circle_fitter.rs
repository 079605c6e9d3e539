//! Best-fit circle through a set of boundary points
//!
//! The center is refined with Levenberg-Marquardt, minimizing the spread of
//! the point distances around their mean. The radius is always the mean
//! distance, so only the two center coordinates are free parameters. The
//! points don't have to cover the whole circle, a short arc will do.
//!
//! Work is done relative to the centroid of the points. Inputs are degrees
//! around 60 or 120 while the interesting differences are in the fifth
//! decimal.

use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

use crate::core::{Circle, Point};

/// Sine of the smallest angle at which three points are not aligned
const ALIGNED_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleFitter {
    /// Last successful fit
    fitted: Option<Circle>,
    cost: Option<f64>,
    /// Outer Levenberg-Marquardt iterations per fit
    max_iterations: usize,
    /// Lambda adjustments tried per iteration before giving up
    inner_iterations: usize,
    /// Relative cost improvement below which iteration stops
    tolerance: f64,
    initial_lambda: f64,
}

impl Default for CircleFitter {
    fn default() -> Self {
        Self {
            fitted: None,
            cost: None,
            max_iterations: 25,
            inner_iterations: 5,
            tolerance: 1e-8,
            initial_lambda: 1.0,
        }
    }
}

impl CircleFitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create fitter with custom iteration limits
    pub fn with_iterations(max_iterations: usize, inner_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations: max_iterations.max(1),
            inner_iterations: inner_iterations.max(1),
            tolerance,
            ..Self::default()
        }
    }

    /// Center of the last successful fit, origin before the first one
    pub fn center(&self) -> Point {
        self.fitted.map_or(Point::ZERO, |c| c.center)
    }

    /// Radius of the last successful fit, NaN before the first one
    pub fn radius(&self) -> f64 {
        self.fitted.map_or(f64::NAN, |c| c.radius)
    }

    /// Sum of squared residuals of the last fit, NaN before the first one
    pub fn cost(&self) -> f64 {
        self.cost.unwrap_or(f64::NAN)
    }

    pub fn circle(&self) -> Option<Circle> {
        self.fitted
    }

    /// Initial center estimate: the mean of the circumcenters of every
    /// non-aligned point triple. Radius is the mean distance from that
    /// center. `None` with fewer than three points or when all are aligned.
    pub fn initial_center(points: &[Point]) -> Option<Circle> {
        let n = points.len();
        if n < 3 {
            return None;
        }
        let mut sum = Vector2::zeros();
        let mut count = 0usize;
        for i in 0..n - 2 {
            for j in i + 1..n - 1 {
                for k in j + 1..n {
                    if let Some(center) = circumcenter(&points[i], &points[j], &points[k]) {
                        sum += Vector2::new(center.x, center.y);
                        count += 1;
                    }
                }
            }
        }
        if count == 0 {
            return None;
        }
        let mean = sum / count as f64;
        let center = Point::new(mean.x, mean.y);
        let radius = mean_distance(&center, points);
        if radius.is_finite() && radius > 0.0 {
            Some(Circle::new(center, radius))
        } else {
            None
        }
    }

    /// Centroid of the points with the mean distance as radius. Used as the
    /// starting point when every triple is too close to aligned for
    /// `initial_center`.
    pub fn mean_center(points: &[Point]) -> Option<Circle> {
        if points.is_empty() {
            return None;
        }
        let center = centroid(points);
        let radius = mean_distance(&center, points);
        Some(Circle::new(center, radius))
    }

    /// Refines the circle starting from `init`. Needs at least two points.
    /// Returns `None` without touching the previous result when no fit is
    /// possible.
    pub fn fit(&mut self, init: &Point, points: &[Point]) -> Option<Circle> {
        if points.len() < 2 || !init.is_finite() || points.iter().any(|p| !p.is_finite()) {
            return None;
        }
        let origin = centroid(points);
        let local: Vec<Vector2<f64>> = points
            .iter()
            .map(|p| Vector2::new(p.x - origin.x, p.y - origin.y))
            .collect();

        let mut center = Vector2::new(init.x - origin.x, init.y - origin.y);
        let mut cost = cost_at(&center, &local);
        let mut lambda = self.initial_lambda;

        for _ in 0..self.max_iterations {
            if cost == 0.0 {
                break;
            }
            let (hessian, gradient) = normal_equations(&center, &local);
            let mut improvement = None;
            for _ in 0..self.inner_iterations {
                let damped = hessian + Matrix2::identity() * lambda;
                let Some(step) = damped.lu().solve(&(-gradient)) else {
                    lambda *= 10.0;
                    continue;
                };
                let candidate = center + step;
                let candidate_cost = cost_at(&candidate, &local);
                if candidate_cost < cost {
                    improvement = Some(cost - candidate_cost);
                    center = candidate;
                    lambda /= 10.0;
                    break;
                }
                lambda *= 10.0;
            }
            match improvement {
                Some(delta) => {
                    let previous = cost;
                    cost -= delta;
                    if delta <= self.tolerance * previous {
                        break;
                    }
                }
                None => break,
            }
        }

        let fitted = Point::new(center.x + origin.x, center.y + origin.y);
        let radius = mean_distance(&fitted, points);
        if !fitted.is_finite() || !radius.is_finite() {
            log::debug!("circle fit diverged from ({}, {})", init.x, init.y);
            return None;
        }
        let circle = Circle::new(fitted, radius);
        self.fitted = Some(circle);
        self.cost = Some(cost);
        Some(circle)
    }
}

fn centroid(points: &[Point]) -> Point {
    let n = points.len() as f64;
    let (sx, sy) = points.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

fn mean_distance(center: &Point, points: &[Point]) -> f64 {
    points.iter().map(|p| center.distance_to(p)).sum::<f64>() / points.len() as f64
}

/// Center of the circle through three points, `None` if they are aligned
fn circumcenter(a: &Point, b: &Point, c: &Point) -> Option<Point> {
    let ab = b.relative_to(a);
    let ac = c.relative_to(a);
    let cross = ab.cross(&ac);
    if cross.abs() <= ALIGNED_EPSILON * ab.length() * ac.length() {
        return None;
    }
    let d = 2.0 * cross;
    let ab2 = ab.x * ab.x + ab.y * ab.y;
    let ac2 = ac.x * ac.x + ac.y * ac.y;
    let ux = (ac.y * ab2 - ab.y * ac2) / d;
    let uy = (ab.x * ac2 - ac.x * ab2) / d;
    Some(Point::new(a.x + ux, a.y + uy))
}

/// Sum of squared deviations of the point distances from their mean
fn cost_at(center: &Vector2<f64>, points: &[Vector2<f64>]) -> f64 {
    let distances: Vec<f64> = points.iter().map(|p| (center - p).norm()).collect();
    let mean = distances.iter().sum::<f64>() / distances.len() as f64;
    distances.iter().map(|d| (d - mean).powi(2)).sum()
}

/// Gauss-Newton approximation J^T J and gradient J^T r
fn normal_equations(center: &Vector2<f64>, points: &[Vector2<f64>]) -> (Matrix2<f64>, Vector2<f64>) {
    let n = points.len() as f64;
    let mut units = Vec::with_capacity(points.len());
    let mut distances = Vec::with_capacity(points.len());
    for p in points {
        let offset = center - p;
        let distance = offset.norm();
        // a point on the center pulls in no direction
        units.push(if distance > 0.0 { offset / distance } else { Vector2::zeros() });
        distances.push(distance);
    }
    let mean_unit = units.iter().fold(Vector2::zeros(), |acc, u| acc + u) / n;
    let mean_distance = distances.iter().sum::<f64>() / n;

    let mut hessian = Matrix2::zeros();
    let mut gradient = Vector2::zeros();
    for (unit, distance) in units.iter().zip(distances.iter()) {
        let row = unit - mean_unit;
        let residual = distance - mean_distance;
        hessian += row * row.transpose();
        gradient += row * residual;
    }
    (hessian, gradient)
}
