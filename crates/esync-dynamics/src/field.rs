//! Oscillator vector fields.
//!
//! Both models read the network read-only and own their per-node constants,
//! coupling weights and coupling buffer. The buffer is scratch: `eval` is a
//! pure function of `(t, x)` for fixed weights.

use std::f64::consts::PI;
use std::sync::Arc;

use esync_math::{DVec, wrap_phase};
use esync_network::Network;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::coupling::Coupling;
use crate::error::{DynamicsError, Result};

/// Right-hand side of `dx/dt = f(t, x)` over the whole network state.
pub trait VectorField {
    /// State components per node.
    fn dim(&self) -> usize;

    /// Write `f(t, x)` into `dxdt`. Both slices are `N * dim` long.
    fn eval(&mut self, t: f64, x: &[f64], dxdt: &mut [f64]);

    /// Project the state back onto its domain after a completed step.
    fn post_step(&self, _x: &mut [f64]) {}
}

/// Piecewise-Rössler parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosslerParams {
    pub alpha: f64,
    pub beta: f64,
    /// Slope of the piecewise term above the threshold.
    pub mu: f64,
    pub c0: f64,
    pub c1: f64,
    /// Resistance in the `y` damping term `c0 - c1 / r`.
    pub r: f64,
    /// Base frequency scale.
    pub gamma_base: f64,
    /// Degree-dependent frequency spread.
    pub delta_gamma: f64,
}

impl Default for RosslerParams {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            beta: 0.5,
            mu: 15.0,
            c0: 0.02,
            c1: 10.0,
            r: 100.0,
            gamma_base: 100.0,
            delta_gamma: 0.5,
        }
    }
}

impl RosslerParams {
    /// Activation threshold of the piecewise term.
    pub const THRESHOLD: f64 = 3.0;

    /// `g(x) = 0` for `x <= 3`, `mu * (x - 3)` otherwise.
    #[inline]
    pub fn g(&self, x: f64) -> f64 {
        if x <= Self::THRESHOLD {
            0.0
        } else {
            self.mu * (x - Self::THRESHOLD)
        }
    }

    fn validate(&self) -> Result<()> {
        let all = [
            self.alpha,
            self.beta,
            self.mu,
            self.c0,
            self.c1,
            self.r,
            self.gamma_base,
            self.delta_gamma,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(DynamicsError::InvalidParameter(
                "Rössler parameters must be finite".into(),
            ));
        }
        if self.r == 0.0 {
            return Err(DynamicsError::InvalidParameter("r must be nonzero".into()));
        }
        Ok(())
    }
}

/// Piecewise-Rössler oscillators with diffusive coupling on `x`.
///
/// ```text
/// dx/dt = γ (−α (x − I) − z − β y)
/// dy/dt = γ (x − (c0 − c1/R) y)
/// dz/dt = γ (g(x) − z)
/// ```
///
/// with `I_j = w_j Σ_{k→j} (x_k − x_j)` and
/// `γ_j = γ_base (1 + Δγ (degree_j − 1) / N)`.
#[derive(Debug, Clone)]
pub struct RosslerField {
    network: Arc<Network>,
    params: RosslerParams,
    gamma: Vec<f64>,
    weights: Vec<f64>,
    current: Vec<f64>,
}

impl RosslerField {
    const COUPLING: Coupling = Coupling::Diffusive { component: 0 };

    pub fn new(network: Arc<Network>, params: RosslerParams) -> Result<Self> {
        params.validate()?;
        let n = network.len();
        let gamma = network
            .degree()
            .iter()
            .map(|&k| params.gamma_base * (1.0 + params.delta_gamma * (k - 1.0) / n as f64))
            .collect();
        Ok(Self {
            network,
            params,
            gamma,
            weights: vec![0.0; n],
            current: vec![0.0; n],
        })
    }

    pub fn params(&self) -> &RosslerParams {
        &self.params
    }

    /// Per-node frequency scale.
    pub fn gamma(&self) -> &[f64] {
        &self.gamma
    }
}

impl VectorField for RosslerField {
    fn dim(&self) -> usize {
        3
    }

    fn eval(&mut self, _t: f64, x: &[f64], dxdt: &mut [f64]) {
        Self::COUPLING.evaluate(x, 3, &self.weights, &self.network, &mut self.current);

        let p = &self.params;
        let damping = p.c0 - p.c1 / p.r;
        for (j, (state, deriv)) in x.chunks_exact(3).zip(dxdt.chunks_exact_mut(3)).enumerate() {
            let (xj, yj, zj) = (state[0], state[1], state[2]);
            let gamma = self.gamma[j];
            deriv[0] = gamma * (-p.alpha * (xj - self.current[j]) - zj - p.beta * yj);
            deriv[1] = gamma * (xj - damping * yj);
            deriv[2] = gamma * (p.g(xj) - zj);
        }
    }
}

/// How Kuramoto natural frequencies are assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrequencyProfile {
    /// Drawn once from `U[low, high]`. `low == high` assigns the constant.
    Uniform { low: f64, high: f64 },
    /// `ω_j = scale * degree_j`.
    Degree { scale: f64 },
    /// One value per node.
    Explicit { values: Vec<f64> },
}

impl Default for FrequencyProfile {
    fn default() -> Self {
        FrequencyProfile::Uniform {
            low: -1.0,
            high: 1.0,
        }
    }
}

impl FrequencyProfile {
    fn sample<R: Rng>(&self, network: &Network, rng: &mut R) -> Result<Vec<f64>> {
        let n = network.len();
        match self {
            FrequencyProfile::Uniform { low, high } => {
                if !low.is_finite() || !high.is_finite() || low > high {
                    return Err(DynamicsError::FrequencyRange {
                        low: *low,
                        high: *high,
                    });
                }
                if low == high {
                    return Ok(vec![*low; n]);
                }
                Ok((0..n).map(|_| rng.gen_range(*low..=*high)).collect())
            }
            FrequencyProfile::Degree { scale } => {
                Ok(network.degree().iter().map(|k| scale * k).collect())
            }
            FrequencyProfile::Explicit { values } => {
                if values.len() != n {
                    return Err(DynamicsError::FrequencyLength {
                        expected: n,
                        got: values.len(),
                    });
                }
                Ok(values.clone())
            }
        }
    }
}

/// Kuramoto parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KuramotoParams {
    pub frequencies: FrequencyProfile,
}

/// Kuramoto phase oscillators: `dφ_j/dt = ω_j + c_j Σ_{k→j} sin(φ_k − φ_j)`.
#[derive(Debug, Clone)]
pub struct KuramotoField {
    network: Arc<Network>,
    omega: Vec<f64>,
    weights: Vec<f64>,
    current: Vec<f64>,
}

impl KuramotoField {
    /// Build the field, drawing natural frequencies from `rng` if the profile is random.
    pub fn new<R: Rng>(
        network: Arc<Network>,
        params: &KuramotoParams,
        rng: &mut R,
    ) -> Result<Self> {
        let omega = params.frequencies.sample(&network, rng)?;
        Ok(Self::with_frequencies(network, omega))
    }

    fn with_frequencies(network: Arc<Network>, omega: Vec<f64>) -> Self {
        let n = network.len();
        Self {
            network,
            omega,
            weights: vec![0.0; n],
            current: vec![0.0; n],
        }
    }

    /// Natural frequencies.
    pub fn omega(&self) -> &[f64] {
        &self.omega
    }
}

impl VectorField for KuramotoField {
    fn dim(&self) -> usize {
        1
    }

    fn eval(&mut self, _t: f64, x: &[f64], dxdt: &mut [f64]) {
        Coupling::Phase.evaluate(x, 1, &self.weights, &self.network, &mut self.current);

        for (j, d) in dxdt.iter_mut().enumerate() {
            *d = self.omega[j] + self.weights[j] * self.current[j];
        }
    }

    fn post_step(&self, x: &mut [f64]) {
        for phi in x.iter_mut() {
            *phi = wrap_phase(*phi);
        }
    }
}

/// Closed set of oscillator models, statically dispatched.
#[derive(Debug, Clone)]
pub enum Model {
    Rossler(RosslerField),
    Kuramoto(KuramotoField),
}

impl Model {
    pub fn network(&self) -> &Network {
        match self {
            Model::Rossler(f) => &f.network,
            Model::Kuramoto(f) => &f.network,
        }
    }

    pub fn len(&self) -> usize {
        self.network().len()
    }

    pub fn is_empty(&self) -> bool {
        self.network().is_empty()
    }

    /// Flat state length, `N * dim`.
    pub fn state_len(&self) -> usize {
        self.len() * self.dim()
    }

    /// Per-node coupling weights.
    pub fn weights(&self) -> &[f64] {
        match self {
            Model::Rossler(f) => &f.weights,
            Model::Kuramoto(f) => &f.weights,
        }
    }

    pub fn weights_mut(&mut self) -> &mut [f64] {
        match self {
            Model::Rossler(f) => &mut f.weights,
            Model::Kuramoto(f) => &mut f.weights,
        }
    }

    /// Set every node's weight to `value`.
    pub fn set_uniform_weight(&mut self, value: f64) {
        self.weights_mut().fill(value);
    }

    /// Random initial state.
    ///
    /// Kuramoto phases are uniform on (−π, π]; Rössler `(x, y, z)` are
    /// uniform on `[-1, 1]` each.
    pub fn initial_state<R: Rng>(&self, rng: &mut R) -> DVec {
        match self {
            Model::Kuramoto(_) => {
                DVec::from_fn(self.state_len(), |_, _| wrap_phase(rng.gen_range(-PI..=PI)))
            }
            Model::Rossler(_) => DVec::from_fn(self.state_len(), |_, _| rng.gen_range(-1.0..=1.0)),
        }
    }

    /// Phase of every node: the state itself for Kuramoto, `atan2(y, x)` for Rössler.
    pub fn phases(&self, x: &[f64], out: &mut [f64]) {
        match self {
            Model::Kuramoto(_) => out.copy_from_slice(x),
            Model::Rossler(_) => {
                for (phi, s) in out.iter_mut().zip(x.chunks_exact(3)) {
                    *phi = s[1].atan2(s[0]);
                }
            }
        }
    }
}

impl VectorField for Model {
    fn dim(&self) -> usize {
        match self {
            Model::Rossler(f) => f.dim(),
            Model::Kuramoto(f) => f.dim(),
        }
    }

    fn eval(&mut self, t: f64, x: &[f64], dxdt: &mut [f64]) {
        match self {
            Model::Rossler(f) => f.eval(t, x, dxdt),
            Model::Kuramoto(f) => f.eval(t, x, dxdt),
        }
    }

    fn post_step(&self, x: &mut [f64]) {
        match self {
            Model::Rossler(f) => f.post_step(x),
            Model::Kuramoto(f) => f.post_step(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ring3() -> Arc<Network> {
        Arc::new(Network::undirected(3, &[(0, 1), (1, 2), (2, 0)]).unwrap())
    }

    #[test]
    fn test_piecewise_threshold_is_exact() {
        let p = RosslerParams::default();
        assert_eq!(p.g(3.0), 0.0);
        assert_eq!(p.g(-10.0), 0.0);
        assert_relative_eq!(p.g(3.5), 0.5 * p.mu);
        assert!(p.g(3.0 + 1e-12) > 0.0);
    }

    #[test]
    fn test_rossler_uncoupled_derivative() {
        let net = Arc::new(Network::empty(1).unwrap());
        let params = RosslerParams {
            gamma_base: 2.0,
            ..Default::default()
        };
        let mut field = RosslerField::new(net, params).unwrap();
        let x = [4.0, 1.0, 0.5];
        let mut dx = [0.0; 3];
        field.eval(0.0, &x, &mut dx);

        // degree 0, N = 1: γ = 2 (1 + 0.5 * (-1) / 1) = 1
        let gamma = 1.0;
        let damping = params.c0 - params.c1 / params.r;
        assert_relative_eq!(dx[0], gamma * (-params.alpha * 4.0 - 0.5 - params.beta * 1.0));
        assert_relative_eq!(dx[1], gamma * (4.0 - damping * 1.0));
        assert_relative_eq!(dx[2], gamma * (params.mu * 1.0 - 0.5));
    }

    #[test]
    fn test_rossler_gamma_from_degree() {
        let net = Arc::new(Network::undirected(3, &[(0, 1), (0, 2)]).unwrap());
        let field = RosslerField::new(net, RosslerParams::default()).unwrap();
        // degrees [2, 1, 1], N = 3
        assert_relative_eq!(field.gamma()[0], 100.0 * (1.0 + 0.5 / 3.0));
        assert_relative_eq!(field.gamma()[1], 100.0);
    }

    #[test]
    fn test_rossler_coupling_pulls_x_together() {
        let net = Arc::new(Network::undirected(2, &[(0, 1)]).unwrap());
        let mut model = Model::Rossler(RosslerField::new(net, RosslerParams::default()).unwrap());
        let x = [1.0, 0.0, 0.0, -1.0, 0.0, 0.0];
        let mut free = [0.0; 6];
        let mut coupled = [0.0; 6];

        model.eval(0.0, &x, &mut free);
        model.set_uniform_weight(1.0);
        model.eval(0.0, &x, &mut coupled);

        assert!(coupled[0] < free[0]);
        assert!(coupled[3] > free[3]);
        assert_eq!(coupled[1], free[1]);
    }

    #[test]
    fn test_kuramoto_derivative() {
        let mut rng = StdRng::seed_from_u64(1);
        let params = KuramotoParams {
            frequencies: FrequencyProfile::Explicit {
                values: vec![0.1, 0.2, 0.3],
            },
        };
        let mut model = Model::Kuramoto(KuramotoField::new(ring3(), &params, &mut rng).unwrap());
        model.set_uniform_weight(2.0);

        let x = [0.0, 0.5, 1.0];
        let mut dx = [0.0; 3];
        model.eval(0.0, &x, &mut dx);

        assert_relative_eq!(dx[0], 0.1 + 2.0 * (0.5_f64.sin() + 1.0_f64.sin()));
        assert_relative_eq!(dx[1], 0.2 + 2.0 * ((-0.5_f64).sin() + 0.5_f64.sin()));
    }

    #[test]
    fn test_frequency_profiles() {
        let mut rng = StdRng::seed_from_u64(7);
        let net = ring3();

        let constant = FrequencyProfile::Uniform { low: 0.0, high: 0.0 };
        assert_eq!(constant.sample(&net, &mut rng).unwrap(), vec![0.0; 3]);

        let uniform = FrequencyProfile::Uniform { low: -0.5, high: 0.5 };
        let omega = uniform.sample(&net, &mut rng).unwrap();
        assert!(omega.iter().all(|w| (-0.5..=0.5).contains(w)));

        let degree = FrequencyProfile::Degree { scale: 0.5 };
        assert_eq!(degree.sample(&net, &mut rng).unwrap(), vec![1.0; 3]);

        let bad = FrequencyProfile::Explicit { values: vec![1.0] };
        assert!(matches!(
            bad.sample(&net, &mut rng),
            Err(DynamicsError::FrequencyLength { expected: 3, got: 1 })
        ));

        let inverted = FrequencyProfile::Uniform { low: 1.0, high: 0.0 };
        assert!(inverted.sample(&net, &mut rng).is_err());
    }

    #[test]
    fn test_rossler_pseudo_phase() {
        let net = Arc::new(Network::empty(2).unwrap());
        let model = Model::Rossler(RosslerField::new(net, RosslerParams::default()).unwrap());
        let x = [0.0, 1.0, 5.0, -1.0, 0.0, 5.0];
        let mut phases = [0.0; 2];
        model.phases(&x, &mut phases);
        assert_relative_eq!(phases[0], PI / 2.0);
        assert_relative_eq!(phases[1], PI);
    }

    #[test]
    fn test_kuramoto_post_step_wraps() {
        let mut rng = StdRng::seed_from_u64(0);
        let model =
            Model::Kuramoto(KuramotoField::new(ring3(), &KuramotoParams::default(), &mut rng).unwrap());
        let mut x = [4.0, -4.0, 0.5];
        model.post_step(&mut x);
        assert_relative_eq!(x[0], 4.0 - 2.0 * PI);
        assert_relative_eq!(x[1], -4.0 + 2.0 * PI);
        assert_relative_eq!(x[2], 0.5);
    }

    #[test]
    fn test_initial_state_shape() {
        let mut rng = StdRng::seed_from_u64(3);
        let net = ring3();
        let rossler = Model::Rossler(RosslerField::new(net.clone(), RosslerParams::default()).unwrap());
        let x = rossler.initial_state(&mut rng);
        assert_eq!(x.len(), 9);
        assert!(x.iter().all(|v| v.abs() <= 1.0));

        let kuramoto =
            Model::Kuramoto(KuramotoField::new(net, &KuramotoParams::default(), &mut rng).unwrap());
        let phi = kuramoto.initial_state(&mut rng);
        assert_eq!(phi.len(), 3);
        assert!(phi.iter().all(|p| *p > -PI && *p <= PI));
    }
}
