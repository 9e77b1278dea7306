//! Forward/backward coupling sweeps over oscillator networks.
//!
//! A [`Sweep`] owns one network state and walks an ordered sequence of
//! coupling strengths, relaxing then accumulating the global order parameter
//! at each value without ever resetting the state. An [`Experiment`] runs
//! the increasing and decreasing sweeps as two independent tasks.

pub mod adaptive;
pub mod config;
pub mod error;
pub mod experiment;
pub mod sweep;
pub mod trajectory;

pub use adaptive::AdaptiveRule;
pub use config::{AdaptiveConfig, ExperimentConfig, ModelConfig, RecordConfig, SweepConfig};
pub use error::{Result, SweepError};
pub use experiment::{Experiment, HysteresisCurves, SweepCurve, linspace, mirrored};
pub use sweep::{Direction, Sweep, SweepPhase};
pub use trajectory::{TrajectoryRecorder, TrajectorySample};
