//! esync: explosive synchronization on coupled oscillator networks.
//!
//! This is the umbrella crate: it re-exports the network, dynamics and sweep
//! crates and provides [`run_hysteresis`] for the common forward/backward
//! experiment.

pub use esync_dynamics::{
    self, Coupling, FrequencyProfile, Integrator, KuramotoField, KuramotoParams, LocalOrder,
    Model, OrderParameter, RosslerField, RosslerParams, Scheme, VectorField, global_order,
};
pub use esync_math::{self, Complex, DMat, DVec, phase_difference, wrap_phase};
pub use esync_network::{self, Network, NetworkError, NetworkSpec, generate};
pub use esync_sweep::{
    self, AdaptiveConfig, AdaptiveRule, Direction, Experiment, ExperimentConfig,
    HysteresisCurves, ModelConfig, RecordConfig, Sweep, SweepConfig, SweepCurve, SweepError,
    SweepPhase, TrajectoryRecorder, TrajectorySample, linspace, mirrored,
};

use std::path::Path;
use std::sync::Arc;

/// Validate `config` against `network` and run both sweeps.
pub fn run_hysteresis(
    config: ExperimentConfig,
    network: Network,
) -> esync_sweep::Result<HysteresisCurves> {
    Experiment::new(config, Arc::new(network))?.run()
}

/// Load a JSON experiment config and a JSON network, then run both sweeps.
pub fn run_hysteresis_files(
    config_path: impl AsRef<Path>,
    network_path: impl AsRef<Path>,
) -> esync_sweep::Result<HysteresisCurves> {
    let config = ExperimentConfig::from_json_file(config_path)?;
    let json = std::fs::read_to_string(network_path)?;
    let network: Network = serde_json::from_str(&json)?;
    run_hysteresis(config, network)
}
