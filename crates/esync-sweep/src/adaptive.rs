//! Adaptive coupling weights driven by local order parameters.

use crate::error::{Result, SweepError};

/// Per-step weight rule `w_j = value * r_local_j` on a fixed node subset.
///
/// Nodes outside the subset keep the sweep's nominal value.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveRule {
    nodes: Vec<usize>,
}

impl AdaptiveRule {
    /// Every node adaptive.
    pub fn all(n: usize) -> Self {
        Self {
            nodes: (0..n).collect(),
        }
    }

    /// Adaptive subset; indices must be below `n`. Duplicates are removed.
    pub fn subset(n: usize, mut nodes: Vec<usize>) -> Result<Self> {
        if let Some(&bad) = nodes.iter().find(|&&j| j >= n) {
            return Err(SweepError::InvalidConfig(format!(
                "adaptive node {bad} out of range for {n} nodes"
            )));
        }
        nodes.sort_unstable();
        nodes.dedup();
        Ok(Self { nodes })
    }

    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Overwrite the adaptive nodes' weights from `r_local`.
    pub fn apply(&self, value: f64, r_local: &[f64], weights: &mut [f64]) {
        for &j in &self.nodes {
            weights[j] = value * r_local[j];
        }
    }
}
