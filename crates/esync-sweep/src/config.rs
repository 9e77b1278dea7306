//! Sweep and experiment configuration.
//!
//! Configs deserialize from JSON with defaults for every optional field:
//!
//! ```json
//! {
//!   "model": { "type": "kuramoto", "frequencies": { "kind": "uniform", "low": -1.0, "high": 1.0 } },
//!   "scheme": "rk4",
//!   "dt": 0.05,
//!   "relax_steps": 10000,
//!   "accumulate_steps": 100000,
//!   "forward": [0.0, 0.5, 1.0, 1.5],
//!   "adaptive": { "nodes": null },
//!   "seed": 42
//! }
//! ```

use std::path::Path;

use esync_dynamics::{KuramotoParams, RosslerParams, Scheme};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SweepError};

/// Oscillator model and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelConfig {
    Rossler(RosslerParams),
    Kuramoto(KuramotoParams),
}

/// Adaptive weight rule settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveConfig {
    /// Adaptive subset. `None` makes every node adaptive.
    #[serde(default)]
    pub nodes: Option<Vec<usize>>,
}

/// Opt-in trajectory sampling during accumulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordConfig {
    /// Sample every `every` accumulation steps.
    pub every: usize,
    /// Also store the full node state with each sample.
    #[serde(default)]
    pub states: bool,
}

/// Per-sweep integration settings, shared by both sweep directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub model: ModelConfig,
    #[serde(default)]
    pub scheme: Scheme,
    pub dt: f64,
    /// Steps per value before statistics are collected.
    pub relax_steps: usize,
    /// Steps per value over which the order parameter is averaged.
    pub accumulate_steps: usize,
    /// Enables the adaptive weight rule.
    #[serde(default)]
    pub adaptive: Option<AdaptiveConfig>,
    #[serde(default)]
    pub record: Option<RecordConfig>,
}

impl SweepConfig {
    /// Kuramoto reference settings: RK4 at `dt = 0.05`.
    pub fn kuramoto(params: KuramotoParams) -> Self {
        Self {
            model: ModelConfig::Kuramoto(params),
            scheme: Scheme::Rk4,
            dt: 0.05,
            relax_steps: 10_000,
            accumulate_steps: 100_000,
            adaptive: None,
            record: None,
        }
    }

    /// Piecewise-Rössler reference settings: RK4 at `dt = 1e-4`.
    pub fn rossler(params: RosslerParams) -> Self {
        Self {
            model: ModelConfig::Rossler(params),
            scheme: Scheme::Rk4,
            dt: 1e-4,
            relax_steps: 20_000,
            accumulate_steps: 300_000,
            adaptive: None,
            record: None,
        }
    }

    pub fn with_steps(mut self, relax_steps: usize, accumulate_steps: usize) -> Self {
        self.relax_steps = relax_steps;
        self.accumulate_steps = accumulate_steps;
        self
    }

    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_adaptive(mut self, adaptive: AdaptiveConfig) -> Self {
        self.adaptive = Some(adaptive);
        self
    }

    pub fn with_record(mut self, record: RecordConfig) -> Self {
        self.record = Some(record);
        self
    }

    /// Check settings against a network of `n` nodes.
    pub fn validate(&self, n: usize) -> Result<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(invalid(format!("dt must be positive and finite, got {}", self.dt)));
        }
        if self.accumulate_steps == 0 {
            return Err(invalid("accumulate_steps must be at least 1".into()));
        }
        let adaptive_nodes = self.adaptive.as_ref().and_then(|a| a.nodes.as_deref());
        if let Some(bad) = adaptive_nodes.and_then(|nodes| nodes.iter().find(|&&j| j >= n)) {
            return Err(invalid(format!("adaptive node {bad} out of range for {n} nodes")));
        }
        if matches!(&self.record, Some(record) if record.every == 0) {
            return Err(invalid("record.every must be at least 1".into()));
        }
        Ok(())
    }
}

/// Full forward/backward experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    #[serde(flatten)]
    pub sweep: SweepConfig,
    /// Coupling strengths of the forward sweep, in order.
    pub forward: Vec<f64>,
    /// Backward sweep. Defaults to `forward` reversed.
    #[serde(default)]
    pub backward: Option<Vec<f64>>,
    /// Seed shared by both sweeps, so they integrate the same oscillator population.
    #[serde(default)]
    pub seed: u64,
}

impl ExperimentConfig {
    pub fn new(sweep: SweepConfig, forward: Vec<f64>) -> Self {
        Self {
            sweep,
            forward,
            backward: None,
            seed: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_backward(mut self, backward: Vec<f64>) -> Self {
        self.backward = Some(backward);
        self
    }

    /// The backward sequence, mirrored from `forward` when not given.
    pub fn backward_values(&self) -> Vec<f64> {
        match &self.backward {
            Some(values) => values.clone(),
            None => self.forward.iter().rev().copied().collect(),
        }
    }

    pub fn validate(&self, n: usize) -> Result<()> {
        self.sweep.validate(n)?;
        if self.forward.is_empty() {
            return Err(invalid("forward sequence is empty".into()));
        }
        if matches!(&self.backward, Some(b) if b.is_empty()) {
            return Err(invalid("backward sequence is empty".into()));
        }
        let backward = self.backward_values();
        if let Some(bad) = self.forward.iter().chain(&backward).find(|v| !v.is_finite()) {
            return Err(invalid(format!("non-finite coupling value {bad}")));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn invalid(msg: String) -> SweepError {
    SweepError::InvalidConfig(msg)
}
