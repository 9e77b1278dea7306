//! Kuramoto order parameters.
//!
//! Global: `r e^{iψ} = (1/N) Σ_j e^{iφ_j}`.
//! Local: `r_j = |Σ_{k→j} e^{iφ_k}| / degree_j`, restricted to the
//! in-neighbors of node `j`.

use esync_math::{Complex, phasor, phasor_sum};
use esync_network::Network;

/// Magnitude and mean phase of a phasor average.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderParameter {
    /// Coherence in [0, 1].
    pub r: f64,
    /// Mean phase ψ.
    pub psi: f64,
}

/// Global order parameter of `phases`. Returns `r = 0` for an empty slice.
pub fn global_order(phases: &[f64]) -> OrderParameter {
    if phases.is_empty() {
        return OrderParameter { r: 0.0, psi: 0.0 };
    }
    let z = phasor_sum(phases) / phases.len() as f64;
    OrderParameter {
        // rounding can push |z| a hair above 1 for identical phases
        r: z.norm().min(1.0),
        psi: z.arg(),
    }
}

/// Local order parameter with a reusable phasor buffer.
#[derive(Debug, Clone)]
pub struct LocalOrder {
    sums: Vec<Complex<f64>>,
    r: Vec<f64>,
}

impl LocalOrder {
    pub fn new(n: usize) -> Self {
        Self {
            sums: vec![Complex::new(0.0, 0.0); n],
            r: vec![0.0; n],
        }
    }

    /// Compute `r_local` for every node.
    ///
    /// Degree-zero nodes have no neighborhood and get `r_local = 0`.
    pub fn compute(&mut self, phases: &[f64], network: &Network) -> &[f64] {
        debug_assert_eq!(phases.len(), network.len());

        self.sums.fill(Complex::new(0.0, 0.0));
        for (s, t) in network.edges() {
            self.sums[t] += phasor(phases[s]);
        }

        for ((r, z), &k) in self.r.iter_mut().zip(&self.sums).zip(network.degree()) {
            *r = if k > 0.0 { (z.norm() / k).min(1.0) } else { 0.0 };
        }
        &self.r
    }

    /// Last computed values.
    pub fn values(&self) -> &[f64] {
        &self.r
    }
}
