//! Centralized validation and helper functions.

/// Maximum number of records accepted from a single input file
pub const MAX_RECORDS: usize = 50_000_000;

/// Tolerance used when checking that scoring weights sum to 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Configuration error raised when an engine component is constructed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid threshold {name}={value}: {reason}")]
    InvalidThreshold {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("Scoring weights must sum to 1.0 (got {sum})")]
    InvalidWeights { sum: f64 },
}

/// Validate a non-negative, finite threshold.
///
/// # Errors
///
/// Returns `ConfigError::InvalidThreshold` if `value` is negative, NaN or infinite.
pub fn validate_non_negative(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::InvalidThreshold {
            name,
            value,
            reason: "must be finite",
        });
    }
    if value < 0.0 {
        return Err(ConfigError::InvalidThreshold {
            name,
            value,
            reason: "must not be negative",
        });
    }
    Ok(value)
}

/// Validate a percentage threshold in [0, 100].
///
/// # Errors
///
/// Returns `ConfigError::InvalidThreshold` if `value` is outside [0, 100].
pub fn validate_percent(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    let value = validate_non_negative(name, value)?;
    if value > 100.0 {
        return Err(ConfigError::InvalidThreshold {
            name,
            value,
            reason: "must be at most 100",
        });
    }
    Ok(value)
}

/// Validate a fraction in [0, 1].
///
/// # Errors
///
/// Returns `ConfigError::InvalidThreshold` if `value` is outside [0, 1].
pub fn validate_fraction(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    let value = validate_non_negative(name, value)?;
    if value > 1.0 {
        return Err(ConfigError::InvalidThreshold {
            name,
            value,
            reason: "must be at most 1",
        });
    }
    Ok(value)
}

/// Validate that a set of weights are each in [0, 1] and sum to 1.0.
///
/// # Errors
///
/// Returns `ConfigError::InvalidThreshold` for a bad individual weight or
/// `ConfigError::InvalidWeights` if the sum is off.
pub fn validate_weights(weights: &[(&'static str, f64)]) -> Result<(), ConfigError> {
    let mut sum = 0.0;
    for &(name, value) in weights {
        sum += validate_fraction(name, value)?;
    }
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(ConfigError::InvalidWeights { sum });
    }
    Ok(())
}

/// Check if adding another record would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new record.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_record_limit(count: usize) -> Option<String> {
    if count >= MAX_RECORDS {
        Some(format!(
            "Too many records: adding another would exceed maximum of {MAX_RECORDS}"
        ))
    } else {
        None
    }
}
