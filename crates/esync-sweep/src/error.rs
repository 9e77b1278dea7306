//! Error types for esync-sweep.

use esync_dynamics::DynamicsError;
use esync_network::NetworkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("malformed network: {0}")]
    Network(#[from] NetworkError),

    #[error("model error: {0}")]
    Dynamics(#[from] DynamicsError),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The state left the finite domain, usually because `dt` is too large
    /// for the vector field. Every later statistic would be NaN.
    #[error("non-finite state at node {node} (coupling {value}, step {step})")]
    NonFinite { value: f64, step: usize, node: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SweepError>;
