//! Forward/backward hysteresis experiment.

use std::sync::Arc;

use esync_network::Network;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ExperimentConfig;
use crate::error::Result;
use crate::sweep::{Direction, Sweep};
use crate::trajectory::TrajectoryRecorder;

/// Coupling values and the synchronization measure at each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepCurve {
    pub values: Vec<f64>,
    pub measures: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trajectory: Option<TrajectoryRecorder>,
}

impl SweepCurve {
    /// Measure at coupling `value`, matched to within `1e-9`.
    pub fn measure_at(&self, value: f64) -> Option<f64> {
        self.values
            .iter()
            .position(|v| (v - value).abs() <= 1e-9)
            .map(|i| self.measures[i])
    }
}

/// Output of one experiment: one curve per sweep direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HysteresisCurves {
    pub forward: SweepCurve,
    pub backward: SweepCurve,
}

impl HysteresisCurves {
    /// Pointwise `(value, forward, backward)` at values both sweeps visited,
    /// in forward order.
    pub fn paired(&self) -> Vec<(f64, f64, f64)> {
        self.forward
            .values
            .iter()
            .zip(&self.forward.measures)
            .filter_map(|(&v, &f)| self.backward.measure_at(v).map(|b| (v, f, b)))
            .collect()
    }

    /// Largest `|forward − backward|` over shared values outside the closed
    /// band `[low, high]`. `None` if no shared value lies outside it.
    pub fn max_gap_outside(&self, band: (f64, f64)) -> Option<f64> {
        let (low, high) = band;
        self.paired()
            .into_iter()
            .filter(|(v, _, _)| *v < low || *v > high)
            .map(|(_, f, b)| (f - b).abs())
            .reduce(f64::max)
    }

    /// True if the curves agree to `tol` everywhere outside the band.
    ///
    /// Values inside the band are never compared.
    pub fn coincides_outside(&self, band: (f64, f64), tol: f64) -> bool {
        self.max_gap_outside(band).is_none_or(|gap| gap <= tol)
    }

    /// Trapezoidal area between the two curves over shared values.
    pub fn loop_area(&self) -> f64 {
        let mut pts = self.paired();
        pts.sort_by(|a, b| a.0.total_cmp(&b.0));
        pts.windows(2)
            .map(|w| {
                let dv = w[1].0 - w[0].0;
                let g0 = (w[0].1 - w[0].2).abs();
                let g1 = (w[1].1 - w[1].2).abs();
                0.5 * dv * (g0 + g1)
            })
            .sum()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Validated experiment over a shared read-only network.
pub struct Experiment {
    config: ExperimentConfig,
    network: Arc<Network>,
}

impl Experiment {
    pub fn new(config: ExperimentConfig, network: Arc<Network>) -> Result<Self> {
        config.validate(network.len())?;
        Ok(Self { config, network })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Run the forward and backward sweeps concurrently.
    ///
    /// Each sweep seeds its own generator from the shared seed, so both
    /// start from identical but independently owned states.
    pub fn run(&self) -> Result<HysteresisCurves> {
        let forward_values = self.config.forward.clone();
        let backward_values = self.config.backward_values();
        info!(
            nodes = self.network.len(),
            edges = self.network.edge_count(),
            forward = forward_values.len(),
            backward = backward_values.len(),
            "experiment started"
        );

        let (forward, backward) = rayon::join(
            || self.sweep(Direction::Forward, forward_values),
            || self.sweep(Direction::Backward, backward_values),
        );

        let curves = HysteresisCurves {
            forward: forward?,
            backward: backward?,
        };
        info!(loop_area = curves.loop_area(), "experiment finished");
        Ok(curves)
    }

    fn sweep(&self, direction: Direction, values: Vec<f64>) -> Result<SweepCurve> {
        let mut sweep = Sweep::new(
            &self.config.sweep,
            self.network.clone(),
            self.config.seed,
            direction,
        )?;
        let measures = sweep.run(&values)?;
        Ok(SweepCurve {
            values,
            measures,
            trajectory: sweep.take_recorder(),
        })
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// `values` reversed.
pub fn mirrored(values: &[f64]) -> Vec<f64> {
    values.iter().rev().copied().collect()
}
