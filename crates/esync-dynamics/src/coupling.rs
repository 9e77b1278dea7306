//! Pairwise coupling over a directed edge list.

use esync_network::Network;
use serde::{Deserialize, Serialize};

/// Pairwise interaction summed over the incoming edges of each node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Coupling {
    /// `w[t] * (x[s][c] - x[t][c])` on one state component.
    Diffusive {
        /// State component the coupling acts on.
        component: usize,
    },
    /// `sin(φ[s] - φ[t])` on the first component. Weight applied by the vector field.
    Phase,
}

impl Coupling {
    /// Evaluate the coupling input of every node.
    ///
    /// # Arguments
    /// * `state` - Flat node-major state, `dim` components per node
    /// * `dim` - Components per node
    /// * `weights` - Per-node coupling weight (read by `Diffusive` only)
    /// * `network` - Edge list (`source → target`)
    /// * `out` - One slot per node; overwritten. Nodes without incoming edges get 0.
    pub fn evaluate(
        &self,
        state: &[f64],
        dim: usize,
        weights: &[f64],
        network: &Network,
        out: &mut [f64],
    ) {
        debug_assert_eq!(state.len(), network.len() * dim);
        debug_assert_eq!(out.len(), network.len());

        out.fill(0.0);
        let (source, target) = (network.source(), network.target());

        match *self {
            Coupling::Diffusive { component } => {
                debug_assert!(component < dim);
                debug_assert_eq!(weights.len(), network.len());
                for (&s, &t) in source.iter().zip(target) {
                    let diff = state[s * dim + component] - state[t * dim + component];
                    out[t] += weights[t] * diff;
                }
            }
            Coupling::Phase => {
                for (&s, &t) in source.iter().zip(target) {
                    out[t] += (state[s * dim] - state[t * dim]).sin();
                }
            }
        }
    }
}
