//! Optional trajectory sampling during the accumulation phase.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One sample of the accumulation phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    /// Position of the coupling value in the sweep sequence.
    pub index: usize,
    /// Coupling strength.
    pub value: f64,
    /// Simulation time.
    pub time: f64,
    /// Instantaneous global order parameter.
    pub r: f64,
    /// Flat node state, when state recording is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Vec<f64>>,
}

/// Records `(value, time, r)` every `every` accumulation steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecorder {
    every: usize,
    states: bool,
    samples: Vec<TrajectorySample>,
}

impl TrajectoryRecorder {
    /// `every` is clamped to at least 1.
    pub fn new(every: usize, states: bool) -> Self {
        Self {
            every: every.max(1),
            states,
            samples: Vec::new(),
        }
    }

    /// True if accumulation step `step` (0-based) should be sampled.
    pub fn due(&self, step: usize) -> bool {
        step % self.every == 0
    }

    pub fn records_states(&self) -> bool {
        self.states
    }

    pub fn record(&mut self, index: usize, value: f64, time: f64, r: f64, state: &[f64]) {
        self.samples.push(TrajectorySample {
            index,
            value,
            time,
            r,
            state: self.states.then(|| state.to_vec()),
        });
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    /// Number of samples recorded.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Samples belonging to sweep point `index`.
    pub fn point(&self, index: usize) -> impl Iterator<Item = &TrajectorySample> {
        self.samples.iter().filter(move |s| s.index == index)
    }

    /// Order-parameter series as `(time, r)` pairs.
    pub fn order_series(&self) -> Vec<(f64, f64)> {
        self.samples.iter().map(|s| (s.time, s.r)).collect()
    }

    /// Samples as a pretty-printed JSON array.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.samples)?)
    }

    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(states: bool) -> TrajectoryRecorder {
        let mut recorder = TrajectoryRecorder::new(2, states);
        for step in 0..6 {
            if recorder.due(step) {
                recorder.record(step / 3, 0.5, step as f64 * 0.1, 0.9, &[1.0, 2.0]);
            }
        }
        recorder
    }

    #[test]
    fn test_sampling_cadence() {
        let recorder = filled(false);
        // steps 0, 2, 4
        assert_eq!(recorder.len(), 3);
        assert_eq!(recorder.point(0).count(), 2);
        assert_eq!(recorder.point(1).count(), 1);
        assert!(recorder.samples().iter().all(|s| s.state.is_none()));
    }

    #[test]
    fn test_state_snapshots() {
        let recorder = filled(true);
        assert!(recorder.records_states());
        assert_eq!(recorder.samples()[0].state.as_deref(), Some(&[1.0, 2.0][..]));
    }

    #[test]
    fn test_to_json() {
        let json = filled(false).to_json().unwrap();
        assert!(json.contains("\"r\""));
        assert!(!json.contains("\"state\""));
    }

    #[test]
    fn test_clear() {
        let mut recorder = filled(false);
        assert_eq!(recorder.order_series().len(), 3);
        recorder.clear();
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_every_clamped() {
        let recorder = TrajectoryRecorder::new(0, false);
        assert!(recorder.due(0));
        assert!(recorder.due(1));
    }
}
