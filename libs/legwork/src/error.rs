//! Configuration errors.
//!
//! Runtime geometry never fails: unreachable targets, folded legs and missing
//! ground are all handled in place. Only building a creature from bad
//! parameters is an error.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("a creature needs at least one leg")]
    NoLegs,

    /// A length, duration or ratio that has to be strictly positive.
    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    /// A value that may be zero but not negative.
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be finite")]
    NonFinite { field: &'static str },

    #[error("upper leg ratio must be inside (0, 1), got {0}")]
    UpperRatio(f32),

    #[error("leg {index}: {source}")]
    Leg {
        index: usize,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    /// Attach the offending leg index.
    #[must_use]
    pub fn for_leg(self, index: usize) -> Self {
        Self::Leg {
            index,
            source: Box::new(self),
        }
    }
}

/// `value > 0` and finite.
pub(crate) fn positive(field: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

/// `value >= 0` and finite.
pub(crate) fn non_negative(field: &'static str, value: f32) -> Result<f32> {
    if !value.is_finite() {
        Err(ConfigError::NonFinite { field })
    } else if value < 0.0 {
        Err(ConfigError::Negative { field, value })
    } else {
        Ok(value)
    }
}

pub(crate) fn finite3(field: &'static str, v: [f32; 3]) -> Result<[f32; 3]> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(v)
    } else {
        Err(ConfigError::NonFinite { field })
    }
}
