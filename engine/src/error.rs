//! Error Types
//!
//! Only configuration problems are errors. Per-tick geometric outcomes
//! (misses, expired cache entries, empty terrain) are plain values.

use thiserror::Error;

/// Errors raised while building or loading locomotion configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be at most {max}, got {value}")]
    TooLarge {
        field: &'static str,
        value: f32,
        max: f32,
    },

    #[error("footprint sample count must be between 1 and {max}, got {count}")]
    InvalidSampleCount { count: usize, max: usize },

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Check that a tunable is strictly positive and finite.
pub(crate) fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

/// Check that a tunable does not exceed `max`.
pub(crate) fn ensure_at_most(field: &'static str, value: f32, max: f32) -> Result<(), ConfigError> {
    if value <= max {
        Ok(())
    } else {
        Err(ConfigError::TooLarge { field, value, max })
    }
}

/// Check that a tunable is zero or positive and finite.
pub(crate) fn ensure_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive("radius", 0.5).is_ok());
        assert!(matches!(
            ensure_positive("radius", 0.0),
            Err(ConfigError::NonPositive { field: "radius", .. })
        ));
        assert!(ensure_positive("radius", -1.0).is_err());
        assert!(ensure_positive("radius", f32::NAN).is_err());
    }

    #[test]
    fn test_ensure_non_negative() {
        assert!(ensure_non_negative("tolerance", 0.0).is_ok());
        assert!(ensure_non_negative("tolerance", -0.01).is_err());
        assert!(ensure_non_negative("tolerance", f32::INFINITY).is_err());
    }

    #[test]
    fn test_ensure_at_most() {
        assert!(ensure_at_most("dt", 1.0, 1.0).is_ok());
        assert!(matches!(
            ensure_at_most("dt", 1e30, 1.0),
            Err(ConfigError::TooLarge { field: "dt", .. })
        ));
    }

    #[test]
    fn test_error_message_names_field() {
        let err = ConfigError::NonPositive {
            field: "capsule.height",
            value: -2.0,
        };
        assert_eq!(err.to_string(), "capsule.height must be positive, got -2");
    }
}
