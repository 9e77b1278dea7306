//! Error types for esync-network.

use thiserror::Error;

/// Malformed topology. Always fatal: a network is validated once, before any sweep runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    #[error("network must have at least one node")]
    NoNodes,

    #[error("edge list length mismatch: {sources} sources, {targets} targets")]
    EdgeLength { sources: usize, targets: usize },

    #[error("edge {edge} ({from} -> {to}) out of range for {n} nodes")]
    IndexOutOfRange {
        edge: usize,
        from: usize,
        to: usize,
        n: usize,
    },

    #[error("edge {edge} is a self loop on node {node}")]
    SelfLoop { edge: usize, node: usize },

    #[error("degree sequence has length {got}, expected {expected}")]
    DegreeLength { expected: usize, got: usize },

    #[error("node {node} has degree {given} but {counted} incoming edges")]
    DegreeMismatch {
        node: usize,
        given: f64,
        counted: f64,
    },

    #[error("adjacency matrix is {rows}x{cols}, expected square")]
    NotSquare { rows: usize, cols: usize },

    #[error("adjacency entry ({row}, {col}) is not finite")]
    NonFiniteEntry { row: usize, col: usize },

    #[error("invalid generator parameters: {0}")]
    Generator(String),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
