//! Numeric tolerances for clipping and frame classification.

use thiserror::Error;

/// Distance below which a vertex is considered to lie on a plane, and the
/// slack used when testing whether a hull vertex sits on its bounds edge.
pub const ABOUT_EQUAL_POSITION: f32 = 1e-4;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("clip tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f32),
    #[error("simple frame epsilon must be finite and non-negative, got {0}")]
    InvalidSimpleEpsilon(f32),
}

/// Tolerances used by a [`ClipStack`](crate::ClipStack).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipConfig {
    /// On-plane band for signed-distance classification.
    pub tolerance: f32,
    /// How far a vertex may sit from a bounds edge and still count toward
    /// the axis-aligned rectangle fast path.
    pub simple_epsilon: f32,
}

impl ClipConfig {
    pub fn new(tolerance: f32, simple_epsilon: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            tolerance: validate(tolerance).ok_or(ConfigError::InvalidTolerance(tolerance))?,
            simple_epsilon: validate(simple_epsilon)
                .ok_or(ConfigError::InvalidSimpleEpsilon(simple_epsilon))?,
        })
    }

    pub fn with_tolerance(self, tolerance: f32) -> Result<Self, ConfigError> {
        Self::new(tolerance, self.simple_epsilon)
    }

    pub fn with_simple_epsilon(self, simple_epsilon: f32) -> Result<Self, ConfigError> {
        Self::new(self.tolerance, simple_epsilon)
    }
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            tolerance: ABOUT_EQUAL_POSITION,
            simple_epsilon: ABOUT_EQUAL_POSITION,
        }
    }
}

fn validate(value: f32) -> Option<f32> {
    (value.is_finite() && value >= 0.0).then_some(value)
}
