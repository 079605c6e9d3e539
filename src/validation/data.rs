//! Position update validation

use crate::core::Fix;
use crate::validation::error::FixError;

/// Checks fixes before they reach the geometry
pub struct FixValidator;

impl FixValidator {
    /// Rejects non-finite or out of range coordinates. Missing accuracy and
    /// speed are fine, present ones must be non-negative and finite.
    pub fn validate(fix: &Fix) -> Result<(), FixError> {
        if !fix.longitude.is_finite() || fix.longitude.abs() > 180.0 {
            return Err(FixError::InvalidLongitude(fix.longitude));
        }
        if !fix.latitude.is_finite() || fix.latitude.abs() > 90.0 {
            return Err(FixError::InvalidLatitude(fix.latitude));
        }
        if let Some(accuracy) = fix.accuracy {
            if !accuracy.is_finite() || accuracy < 0.0 {
                return Err(FixError::InvalidAccuracy(accuracy));
            }
        }
        if let Some(speed) = fix.speed {
            if !speed.is_finite() || speed < 0.0 {
                return Err(FixError::InvalidSpeed(speed));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_fix() {
        let fix = Fix::new(24.9, 60.1, 0).with_accuracy(4.0).with_speed(0.3);
        assert!(FixValidator::validate(&fix).is_ok());
        assert!(FixValidator::validate(&Fix::new(-180.0, -90.0, 0)).is_ok());
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!(matches!(
            FixValidator::validate(&Fix::new(f64::NAN, 60.0, 0)),
            Err(FixError::InvalidLongitude(_))
        ));
        assert!(matches!(
            FixValidator::validate(&Fix::new(181.0, 60.0, 0)),
            Err(FixError::InvalidLongitude(_))
        ));
        assert_eq!(
            FixValidator::validate(&Fix::new(24.0, 90.5, 0)),
            Err(FixError::InvalidLatitude(90.5))
        );
    }

    #[test]
    fn test_invalid_accuracy_and_speed() {
        assert_eq!(
            FixValidator::validate(&Fix::new(24.0, 60.0, 0).with_accuracy(-1.0)),
            Err(FixError::InvalidAccuracy(-1.0))
        );
        assert_eq!(
            FixValidator::validate(&Fix::new(24.0, 60.0, 0).with_speed(f64::INFINITY)),
            Err(FixError::InvalidSpeed(f64::INFINITY))
        );
    }
}
