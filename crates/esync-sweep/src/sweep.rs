//! Quasi-static sweep driver.
//!
//! ```text
//! Init → Relaxing(0) → Accumulating(0) → Relaxing(1) → … → Accumulating(n−1) → Done
//! ```
//!
//! The node state is initialized once in [`Sweep::new`] and carried across
//! every coupling value: each relaxation starts from the end state of the
//! previous value. This carry-over is what lets forward and backward sweeps
//! disagree inside a hysteresis loop.

use std::fmt;
use std::sync::Arc;

use esync_dynamics::{
    Integrator, KuramotoField, LocalOrder, Model, RosslerField, VectorField, global_order,
};
use esync_math::{DVec, first_non_finite};
use esync_network::Network;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::adaptive::AdaptiveRule;
use crate::config::{ModelConfig, SweepConfig};
use crate::error::{Result, SweepError};
use crate::trajectory::TrajectoryRecorder;

/// Sweep direction, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => f.write_str("forward"),
            Direction::Backward => f.write_str("backward"),
        }
    }
}

/// Where the sweep is in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepPhase {
    Init,
    Relaxing { index: usize },
    Accumulating { index: usize },
    Done,
}

/// One self-contained sweep: model, state, buffers and statistics.
///
/// Nothing here is shared with another sweep except the read-only network.
pub struct Sweep {
    direction: Direction,
    model: Model,
    integrator: Integrator,
    state: DVec,
    phases: Vec<f64>,
    local: LocalOrder,
    adaptive: Option<AdaptiveRule>,
    recorder: Option<TrajectoryRecorder>,
    dt: f64,
    relax_steps: usize,
    accumulate_steps: usize,
    time: f64,
    steps_taken: usize,
    phase: SweepPhase,
}

impl Sweep {
    /// Build the model and draw its random state from `seed`.
    pub fn new(
        config: &SweepConfig,
        network: Arc<Network>,
        seed: u64,
        direction: Direction,
    ) -> Result<Self> {
        let n = network.len();
        config.validate(n)?;

        let mut rng = StdRng::seed_from_u64(seed);
        let model = match &config.model {
            ModelConfig::Rossler(params) => {
                Model::Rossler(RosslerField::new(network.clone(), *params)?)
            }
            ModelConfig::Kuramoto(params) => {
                Model::Kuramoto(KuramotoField::new(network.clone(), params, &mut rng)?)
            }
        };
        let state = model.initial_state(&mut rng);

        let adaptive = match &config.adaptive {
            None => None,
            Some(adaptive) => Some(match &adaptive.nodes {
                None => AdaptiveRule::all(n),
                Some(nodes) => AdaptiveRule::subset(n, nodes.clone())?,
            }),
        };
        let recorder = config
            .record
            .as_ref()
            .map(|r| TrajectoryRecorder::new(r.every, r.states));

        Ok(Self {
            direction,
            integrator: Integrator::new(config.scheme, model.state_len()),
            state,
            phases: vec![0.0; n],
            local: LocalOrder::new(n),
            model,
            adaptive,
            recorder,
            dt: config.dt,
            relax_steps: config.relax_steps,
            accumulate_steps: config.accumulate_steps,
            time: 0.0,
            steps_taken: 0,
            phase: SweepPhase::Init,
        })
    }

    /// Replace the random initial state.
    pub fn with_state(mut self, state: DVec) -> Result<Self> {
        if state.len() != self.model.state_len() {
            return Err(SweepError::InvalidConfig(format!(
                "initial state has length {}, expected {}",
                state.len(),
                self.model.state_len()
            )));
        }
        self.state = state;
        Ok(self)
    }

    /// Run every value in order and return one synchronization measure per value.
    pub fn run(&mut self, values: &[f64]) -> Result<Vec<f64>> {
        info!(
            direction = %self.direction,
            points = values.len(),
            nodes = self.model.len(),
            edges = self.model.network().edge_count(),
            scheme = ?self.integrator.scheme(),
            "sweep started"
        );

        let mut measures = Vec::with_capacity(values.len());
        for (index, &value) in values.iter().enumerate() {
            let measure = self.point(index, value)?;
            info!(direction = %self.direction, index, value, measure, "sweep point");
            measures.push(measure);
        }

        self.phase = SweepPhase::Done;
        info!(direction = %self.direction, steps = self.steps_taken, "sweep finished");
        Ok(measures)
    }

    /// Relax then accumulate at one coupling value. Returns the time-averaged `r`.
    pub fn point(&mut self, index: usize, value: f64) -> Result<f64> {
        self.model.set_uniform_weight(value);

        self.phase = SweepPhase::Relaxing { index };
        debug!(direction = %self.direction, index, value, steps = self.relax_steps, "relaxing");
        for _ in 0..self.relax_steps {
            self.advance(value)?;
        }

        self.phase = SweepPhase::Accumulating { index };
        debug!(direction = %self.direction, index, value, steps = self.accumulate_steps, "accumulating");
        let mut sum = 0.0;
        for step in 0..self.accumulate_steps {
            self.advance(value)?;
            let r = self.order();
            sum += r;

            if let Some(recorder) = &mut self.recorder {
                if recorder.due(step) {
                    recorder.record(index, value, self.time, r, self.state.as_slice());
                }
            }
        }

        Ok((sum / self.accumulate_steps as f64).clamp(0.0, 1.0))
    }

    /// One integration step at coupling `value`.
    fn advance(&mut self, value: f64) -> Result<()> {
        if let Some(rule) = &self.adaptive {
            self.model.phases(self.state.as_slice(), &mut self.phases);
            let r_local = self.local.compute(&self.phases, self.model.network());
            rule.apply(value, r_local, self.model.weights_mut());
        }

        self.integrator
            .step(&mut self.model, &mut self.state, self.time, self.dt);
        self.time += self.dt;
        self.steps_taken += 1;

        if let Some(i) = first_non_finite(self.state.as_slice()) {
            let node = i / self.model.dim();
            warn!(direction = %self.direction, value, step = self.steps_taken, node, "non-finite state");
            return Err(SweepError::NonFinite {
                value,
                step: self.steps_taken,
                node,
            });
        }
        Ok(())
    }

    /// Instantaneous global order parameter of the current state.
    pub fn order(&mut self) -> f64 {
        self.model.phases(self.state.as_slice(), &mut self.phases);
        global_order(&self.phases).r
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn phase(&self) -> SweepPhase {
        self.phase
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn state(&self) -> &DVec {
        &self.state
    }

    /// Current per-node coupling weights.
    pub fn weights(&self) -> &[f64] {
        self.model.weights()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Integration steps taken since construction.
    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub fn recorder(&self) -> Option<&TrajectoryRecorder> {
        self.recorder.as_ref()
    }

    pub fn take_recorder(&mut self) -> Option<TrajectoryRecorder> {
        self.recorder.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdaptiveConfig, RecordConfig};
    use approx::assert_relative_eq;
    use esync_dynamics::{FrequencyProfile, KuramotoParams, RosslerParams, Scheme};

    fn ring(n: usize) -> Arc<Network> {
        let pairs: Vec<_> = (0..n).map(|j| (j, (j + 1) % n)).collect();
        Arc::new(Network::undirected(n, &pairs).unwrap())
    }

    fn still_kuramoto() -> SweepConfig {
        SweepConfig::kuramoto(KuramotoParams {
            frequencies: FrequencyProfile::Uniform { low: 0.0, high: 0.0 },
        })
        .with_steps(50, 50)
    }

    #[test]
    fn test_phase_transitions() {
        let mut sweep = Sweep::new(&still_kuramoto(), ring(4), 1, Direction::Forward).unwrap();
        assert_eq!(sweep.phase(), SweepPhase::Init);

        sweep.point(0, 0.5).unwrap();
        assert_eq!(sweep.phase(), SweepPhase::Accumulating { index: 0 });

        let measures = sweep.run(&[0.5, 1.0]).unwrap();
        assert_eq!(measures.len(), 2);
        assert_eq!(sweep.phase(), SweepPhase::Done);
        assert_eq!(sweep.steps_taken(), 300);
        assert_relative_eq!(sweep.time(), 300.0 * 0.05, epsilon = 1e-9);
    }

    #[test]
    fn test_state_carries_over_between_values() {
        let cfg = still_kuramoto();
        let mut a = Sweep::new(&cfg, ring(5), 11, Direction::Forward).unwrap();
        let mut b = Sweep::new(&cfg, ring(5), 11, Direction::Forward).unwrap();

        // a: two values in one sweep. b: the same two values point by point.
        a.run(&[0.3, 0.6]).unwrap();
        b.point(0, 0.3).unwrap();
        b.point(1, 0.6).unwrap();

        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let cfg = SweepConfig::kuramoto(KuramotoParams::default()).with_steps(20, 40);
        let run = || {
            Sweep::new(&cfg, ring(6), 5, Direction::Forward)
                .unwrap()
                .run(&[0.0, 1.0])
                .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_measure_in_unit_interval() {
        let cfg = SweepConfig::kuramoto(KuramotoParams::default()).with_steps(10, 100);
        let mut sweep = Sweep::new(&cfg, ring(8), 2, Direction::Forward).unwrap();
        for m in sweep.run(&[0.0, 0.5, 2.0]).unwrap() {
            assert!((0.0..=1.0).contains(&m));
        }
    }

    #[test]
    fn test_adaptive_weights_follow_local_order() {
        let cfg = still_kuramoto()
            .with_steps(1, 1)
            .with_adaptive(AdaptiveConfig { nodes: Some(vec![0]) });
        let net = ring(3);
        let sync = DVec::from_element(3, 0.25);
        let mut sweep = Sweep::new(&cfg, net, 0, Direction::Forward)
            .unwrap()
            .with_state(sync)
            .unwrap();

        sweep.point(0, 2.0).unwrap();

        // identical phases: r_local = 1 so the adaptive node keeps the full value
        assert_relative_eq!(sweep.weights()[0], 2.0, epsilon = 1e-12);
        assert_eq!(sweep.weights()[1], 2.0);
    }

    #[test]
    fn test_adaptive_weight_drops_for_incoherent_neighbors() {
        // star: hub 0 sees leaves at opposite phases
        let net = Arc::new(Network::undirected(3, &[(0, 1), (0, 2)]).unwrap());
        let cfg = still_kuramoto()
            .with_steps(1, 1)
            .with_adaptive(AdaptiveConfig::default());
        let state = DVec::from_column_slice(&[0.0, std::f64::consts::FRAC_PI_2, -std::f64::consts::FRAC_PI_2]);
        let mut sweep = Sweep::new(&cfg, net, 0, Direction::Forward)
            .unwrap()
            .with_state(state)
            .unwrap();

        sweep.advance(1.0).unwrap();
        assert!(sweep.weights()[0] < 1e-12);
        assert_relative_eq!(sweep.weights()[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_non_finite_state_is_fatal() {
        // Euler with a huge step on a strongly coupled hub diverges
        let net = Arc::new(Network::undirected(3, &[(0, 1), (0, 2)]).unwrap());
        let cfg = SweepConfig::rossler(RosslerParams::default())
            .with_scheme(Scheme::Euler)
            .with_dt(10.0)
            .with_steps(10_000, 1);
        let mut sweep = Sweep::new(&cfg, net, 4, Direction::Backward).unwrap();

        let err = sweep.run(&[100.0]).unwrap_err();
        assert!(matches!(err, SweepError::NonFinite { value, .. } if value == 100.0));
    }

    #[test]
    fn test_with_state_rejects_wrong_length() {
        let sweep = Sweep::new(&still_kuramoto(), ring(3), 0, Direction::Forward).unwrap();
        assert!(sweep.with_state(DVec::zeros(4)).is_err());
    }

    #[test]
    fn test_recorder_samples_accumulation() {
        let cfg = still_kuramoto()
            .with_steps(5, 10)
            .with_record(RecordConfig { every: 5, states: true });
        let mut sweep = Sweep::new(&cfg, ring(3), 0, Direction::Forward).unwrap();
        sweep.run(&[0.1, 0.2]).unwrap();

        let recorder = sweep.take_recorder().unwrap();
        assert_eq!(recorder.len(), 4);
        assert_eq!(recorder.point(1).count(), 2);
        assert_eq!(recorder.samples()[0].state.as_ref().map(Vec::len), Some(3));
        assert!(sweep.recorder().is_none());
    }

    #[test]
    fn test_rossler_sweep_runs() {
        let cfg = SweepConfig::rossler(RosslerParams::default()).with_steps(200, 200);
        let mut sweep = Sweep::new(&cfg, ring(4), 3, Direction::Forward).unwrap();
        let measures = sweep.run(&[0.0, 0.5]).unwrap();
        assert!(measures.iter().all(|m| (0.0..=1.0).contains(m)));
        assert_eq!(sweep.model().dim(), 3);
    }
}
