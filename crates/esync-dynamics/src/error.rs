//! Error types for esync-dynamics.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DynamicsError {
    #[error("expected {expected} natural frequencies, got {got}")]
    FrequencyLength { expected: usize, got: usize },

    #[error("invalid frequency range [{low}, {high}]")]
    FrequencyRange { low: f64, high: f64 },

    #[error("invalid model parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, DynamicsError>;
