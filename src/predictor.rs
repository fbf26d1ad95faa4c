//! Learned resolution models.
//!
//! A predictor may replace the heuristic strategies when one is loaded. The
//! scheduler treats every predictor failure as a reason to fall back, never as
//! an error of its own.

use crate::error::{Result, SchedulerError};
use crate::models::{Conflict, ScheduleAdjustment};
use crate::network::{NetworkSnapshot, NetworkView};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub trait Predictor: Send + Sync {
    /// True once a model has been loaded successfully
    fn is_ready(&self) -> bool;

    fn predict(
        &self,
        snapshot: &NetworkSnapshot,
        conflicts: &[Conflict],
    ) -> Result<Vec<ScheduleAdjustment>>;
}

fn default_confidence() -> f64 {
    0.90
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelWeights {
    pub bias: f64,
    pub severity_weight: f64,
    pub time_weight: f64,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

impl ModelWeights {
    fn validate(&self) -> Result<()> {
        let values = [self.bias, self.severity_weight, self.time_weight, self.confidence];
        if values.iter().any(|value| !value.is_finite()) {
            return Err(SchedulerError::ModelUnavailable("weights must be finite".to_string()));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(SchedulerError::ModelUnavailable(format!(
                "confidence {} outside 0.0-1.0",
                self.confidence
            )));
        }
        Ok(())
    }
}

/// Linear delay model read from a JSON weights file.
///
/// Each pairwise conflict yields one delay for its first train:
/// `bias + severity_weight * severity + time_weight * time`, with severity on
/// the 0.0-1.0 scale and time in hours capped at one.
#[derive(Debug, Clone)]
pub struct LinearDelayModel {
    weights: ModelWeights,
    source: Option<PathBuf>,
}

impl LinearDelayModel {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|err| SchedulerError::ModelUnavailable(format!("{}: {err}", path.display())))?;
        let weights: ModelWeights = serde_json::from_str(&contents)
            .map_err(|err| SchedulerError::ModelUnavailable(format!("{}: {err}", path.display())))?;
        weights.validate()?;
        log::info!("Loaded linear delay model from {}", path.display());
        Ok(Self {
            weights,
            source: Some(path.to_path_buf()),
        })
    }

    pub fn from_weights(weights: ModelWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self { weights, source: None })
    }

    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn predict_delay(&self, conflict: &Conflict) -> f64 {
        let time_hours = (conflict.estimated_time_minutes / 60.0).min(1.0);
        let raw = self.weights.bias
            + self.weights.severity_weight * conflict.severity.as_unit()
            + self.weights.time_weight * time_hours;
        raw.max(0.0)
    }
}

impl Predictor for LinearDelayModel {
    fn is_ready(&self) -> bool {
        true
    }

    fn predict(
        &self,
        snapshot: &NetworkSnapshot,
        conflicts: &[Conflict],
    ) -> Result<Vec<ScheduleAdjustment>> {
        let mut adjustments = Vec::new();
        for conflict in conflicts.iter().filter(|c| c.train2_id.is_some()) {
            snapshot.require_train(conflict.train1_id)?;
            let delay = self.predict_delay(conflict);
            if !delay.is_finite() {
                return Err(SchedulerError::ModelUnavailable(format!(
                    "non-finite prediction for {}",
                    conflict.train1_id
                )));
            }
            adjustments.push(ScheduleAdjustment::delay(
                conflict.train1_id,
                delay,
                "Model-predicted resolution",
                self.weights.confidence,
            ));
        }
        Ok(adjustments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConflictType, Track, TrackId, Train, TrainId};
    use crate::network::NetworkStore;

    fn weights() -> ModelWeights {
        ModelWeights {
            bias: 1.0,
            severity_weight: 10.0,
            time_weight: -2.0,
            confidence: 0.8,
        }
    }

    fn snapshot() -> NetworkSnapshot {
        let mut store = NetworkStore::new();
        store.initialize_network(vec![Track::new_single_track(TrackId(1), 40.0, 5)], Vec::new());
        store.add_train(Train::new(TrainId(1), TrackId(1), 15.0, 150.0));
        store.add_train(Train::new(TrainId(2), TrackId(1), 35.0, 150.0));
        store.snapshot()
    }

    #[test]
    fn test_linear_prediction() {
        let model = LinearDelayModel::from_weights(weights()).expect("valid weights");
        let conflicts = [
            Conflict::between(ConflictType::HeadOn, TrainId(1), TrainId(2), TrackId(1), 30.0),
            Conflict::capacity_exceeded(TrainId(2), TrackId(1)),
        ];
        let adjustments = model.predict(&snapshot(), &conflicts).expect("prediction");
        assert_eq!(adjustments.len(), 1);
        // 1.0 + 10.0 * 1.0 - 2.0 * 0.5
        assert!((adjustments[0].time_adjustment_minutes - 10.0).abs() < 1e-9);
        assert_eq!(adjustments[0].confidence, 0.8);
        assert_eq!(adjustments[0].train_id, TrainId(1));
    }

    #[test]
    fn test_infinite_time_is_capped() {
        let model = LinearDelayModel::from_weights(weights()).expect("valid weights");
        let conflict = Conflict::between(ConflictType::Overtaking, TrainId(1), TrainId(2), TrackId(1), f64::INFINITY);
        let adjustments = model.predict(&snapshot(), &[conflict]).expect("prediction");
        // 1.0 + 10.0 * 0.5 - 2.0 * 1.0
        assert!((adjustments[0].time_adjustment_minutes - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_train_fails_prediction() {
        let model = LinearDelayModel::from_weights(weights()).expect("valid weights");
        let conflict = Conflict::between(ConflictType::HeadOn, TrainId(8), TrainId(2), TrackId(1), 1.0);
        assert!(model.predict(&snapshot(), &[conflict]).is_err());
    }

    #[test]
    fn test_invalid_weights_are_rejected() {
        let mut bad = weights();
        bad.bias = f64::NAN;
        assert!(LinearDelayModel::from_weights(bad).is_err());
        let mut bad = weights();
        bad.confidence = 1.5;
        assert!(LinearDelayModel::from_weights(bad).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = LinearDelayModel::load("/nonexistent/model.json").expect_err("missing file");
        assert!(matches!(err, SchedulerError::ModelUnavailable(_)));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("rail_scheduler_model_{}.json", std::process::id()));
        std::fs::write(&path, r#"{"bias": 2.0, "severity_weight": 4.0, "time_weight": 0.0}"#)
            .expect("write weights");
        let model = LinearDelayModel::load(&path).expect("valid model");
        assert!(model.is_ready());
        assert_eq!(model.source(), Some(path.as_path()));
        std::fs::remove_file(&path).expect("cleanup");
    }
}
