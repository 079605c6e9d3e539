//! Incrementally grown convex hull
//!
//! Vertices are kept in counter-clockwise order so the interior is on the
//! left of every edge. With one or two vertices the hull is a point or a
//! segment.

use serde::{Deserialize, Serialize};

use crate::core::{turn, Point};

/// Relative tolerance for treating three points as aligned
const ALIGNED_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvexPolygon {
    points: Vec<Point>,
}

impl ConvexPolygon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Smallest convex polygon containing every point as a vertex or inside
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Self {
        let mut polygon = Self::new();
        for point in points {
            polygon.add_point(point.x, point.y);
        }
        polygon
    }

    pub fn vertices(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn is_vertex(&self, x: f64, y: f64) -> bool {
        self.points.iter().any(|p| p.x == x && p.y == y)
    }

    /// Adds a point to the hull. Returns true if the hull changed, false if
    /// the point was already inside or on the boundary.
    pub fn add_point(&mut self, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() || self.is_vertex(x, y) {
            return false;
        }
        let point = Point::new(x, y);
        match self.points.len() {
            0 | 1 => {
                self.points.push(point);
                true
            }
            2 => {
                let (a, b) = (self.points[0], self.points[1]);
                if aligned(&a, &b, &point) {
                    self.add_aligned(point)
                } else {
                    if turn(&a, &b, &point) > 0.0 {
                        self.points.push(point);
                    } else {
                        self.points.insert(1, point);
                    }
                    true
                }
            }
            _ => self.add_outside(point),
        }
    }

    /// Extends a two point segment with a point on the same line
    fn add_aligned(&mut self, point: Point) -> bool {
        let (a, b) = (self.points[0], self.points[1]);
        let direction = b.relative_to(&a);
        let length2 = direction.x * direction.x + direction.y * direction.y;
        let offset = point.relative_to(&a);
        // position along a -> b, 0 at a and 1 at b
        let t = (offset.x * direction.x + offset.y * direction.y) / length2;
        if t < 0.0 {
            self.points[0] = point;
            true
        } else if t > 1.0 {
            self.points[1] = point;
            true
        } else {
            false
        }
    }

    fn add_outside(&mut self, point: Point) -> bool {
        let n = self.points.len();
        let visible: Vec<bool> = (0..n)
            .map(|i| {
                let a = &self.points[i];
                let b = &self.points[(i + 1) % n];
                turn(a, b, &point) < 0.0 && !aligned(a, b, &point)
            })
            .collect();

        let Some(start) = (0..n).find(|&i| visible[i] && !visible[(i + n - 1) % n]) else {
            return false;
        };
        let mut end = start;
        while visible[(end + 1) % n] && (end + 1) % n != start {
            end = (end + 1) % n;
        }

        // keep the chain from the vertex after the last visible edge around
        // to the first vertex of the first visible edge, then close with point
        let mut kept = Vec::with_capacity(n + 1);
        let mut i = (end + 1) % n;
        loop {
            kept.push(self.points[i]);
            if i == start {
                break;
            }
            i = (i + 1) % n;
        }
        kept.push(point);
        self.points = kept;
        self.remove_aligned_vertices();
        true
    }

    /// Drops vertices lying on the line between their neighbours
    fn remove_aligned_vertices(&mut self) {
        let mut i = 0;
        while self.points.len() > 3 && i < self.points.len() {
            let n = self.points.len();
            let prev = self.points[(i + n - 1) % n];
            let next = self.points[(i + 1) % n];
            if aligned(&prev, &self.points[i], &next) {
                self.points.remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Point-in-polygon test, the boundary counts as inside. A hull with
    /// fewer than three vertices has no inside.
    pub fn is_inside(&self, x: f64, y: f64) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let point = Point::new(x, y);
        (0..n).all(|i| {
            let a = &self.points[i];
            let b = &self.points[(i + 1) % n];
            turn(a, b, &point) >= 0.0 || aligned(a, b, &point)
        })
    }

    pub fn contains_point(&self, point: &Point) -> bool {
        self.is_inside(point.x, point.y)
    }

    /// Shortest distance from the point to the hull boundary. `None` for an
    /// empty hull.
    pub fn minimum_distance(&self, x: f64, y: f64) -> Option<f64> {
        let point = Point::new(x, y);
        match self.points.len() {
            0 => None,
            1 => Some(self.points[0].distance_to(&point)),
            n => {
                let mut min = f64::MAX;
                for i in 0..n {
                    let a = &self.points[i];
                    let b = &self.points[(i + 1) % n];
                    min = min.min(distance_from_segment(&point, a, b));
                }
                Some(min)
            }
        }
    }

    /// Part of the hull facing away from `point`: a copy with `point` added
    /// and removed again. Vertices hidden behind the near side of the hull
    /// as seen from `point` are dropped. If `point` is inside, the copy is
    /// the whole hull.
    pub fn outer_boundary(&self, point: &Point) -> ConvexPolygon {
        let mut outer = self.clone();
        if outer.add_point(point.x, point.y) {
            outer.points.retain(|p| p != point);
        }
        outer
    }
}

/// Distance from `p` to the segment `a`-`b`
pub fn distance_from_segment(p: &Point, a: &Point, b: &Point) -> f64 {
    let ab = b.relative_to(a);
    let length2 = ab.x * ab.x + ab.y * ab.y;
    if length2 == 0.0 {
        return p.distance_to(a);
    }
    let ap = p.relative_to(a);
    let t = ((ap.x * ab.x + ap.y * ab.y) / length2).clamp(0.0, 1.0);
    p.distance_to(&Point::new(a.x + t * ab.x, a.y + t * ab.y))
}

fn aligned(a: &Point, b: &Point, c: &Point) -> bool {
    let ab = b.relative_to(a);
    let ac = c.relative_to(a);
    ab.cross(&ac).abs() <= ALIGNED_EPSILON * ab.length() * ac.length()
}
