use thiserror::Error;

/// Errors raised while validating configuration at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("'{field}' must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    #[error("'{field}' must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("'{field}' must be within [{min}, {max}] (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("'{0}' must be a finite number")]
    NotFinite(&'static str),

    #[error("missing required setting: {0}")]
    Missing(&'static str),
}

impl ConfigError {
    /// Fail unless `value` is finite and strictly positive
    pub fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
        if !value.is_finite() {
            return Err(ConfigError::NotFinite(field));
        }
        if value <= 0.0 {
            return Err(ConfigError::NotPositive { field, value });
        }
        Ok(())
    }

    /// Fail unless `value` is finite and zero or greater
    pub fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
        if !value.is_finite() {
            return Err(ConfigError::NotFinite(field));
        }
        if value < 0.0 {
            return Err(ConfigError::Negative { field, value });
        }
        Ok(())
    }

    /// Fail unless `value` lies in the closed range `[min, max]`
    pub fn require_range(
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    ) -> Result<(), ConfigError> {
        if !value.is_finite() {
            return Err(ConfigError::NotFinite(field));
        }
        if value < min || value > max {
            return Err(ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_positive() {
        assert!(ConfigError::require_positive("mass", 1.0).is_ok());
        assert_eq!(
            ConfigError::require_positive("mass", 0.0),
            Err(ConfigError::NotPositive {
                field: "mass",
                value: 0.0
            })
        );
        assert_eq!(
            ConfigError::require_positive("mass", f32::NAN),
            Err(ConfigError::NotFinite("mass"))
        );
    }

    #[test]
    fn test_require_range() {
        assert!(ConfigError::require_range("cut", 0.5, 0.0, 1.0).is_ok());
        assert!(ConfigError::require_range("cut", 1.5, 0.0, 1.0).is_err());
    }
}
