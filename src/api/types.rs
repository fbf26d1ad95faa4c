use crate::models::{
    Conflict, ScheduleAdjustment, Station, StationId, Track, TrackId, Train, TrainId, DEFAULT_PRIORITY,
};
use serde::{Deserialize, Serialize};

fn default_priority() -> u8 {
    DEFAULT_PRIORITY
}

/// Train as it arrives in a request. Everything but the ids is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainInput {
    pub id: TrainId,
    pub current_track: TrackId,
    #[serde(default)]
    pub position_km: f64,
    #[serde(default)]
    pub velocity_kmh: f64,
    #[serde(default)]
    pub scheduled_arrival_minutes: f64,
    #[serde(default)]
    pub destination_station: StationId,
    #[serde(default)]
    pub delay_minutes: f64,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub is_delayed: bool,
}

impl From<TrainInput> for Train {
    fn from(input: TrainInput) -> Self {
        let mut train = Train::new(input.id, input.current_track, input.position_km, input.velocity_kmh)
            .with_priority(input.priority)
            .with_destination(input.destination_station);
        train.scheduled_arrival_minutes = input.scheduled_arrival_minutes;
        train.delay_minutes = input.delay_minutes.max(0.0);
        train.is_delayed = input.is_delayed;
        train
    }
}

impl From<&Train> for TrainInput {
    fn from(train: &Train) -> Self {
        Self {
            id: train.id,
            current_track: train.current_track,
            position_km: train.position_km,
            velocity_kmh: train.velocity_kmh,
            scheduled_arrival_minutes: train.scheduled_arrival_minutes,
            destination_station: train.destination_station,
            delay_minutes: train.delay_minutes,
            priority: train.priority,
            is_delayed: train.is_delayed,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConflictRequest {
    #[serde(default)]
    pub trains: Vec<TrainInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizationRequest {
    #[serde(default)]
    pub trains: Vec<TrainInput>,
    /// Replaces the registered topology when present
    #[serde(default)]
    pub tracks: Option<Vec<Track>>,
    #[serde(default)]
    pub stations: Option<Vec<Station>>,
    /// Pass limit for this request only
    #[serde(default)]
    pub max_iterations: Option<usize>,
}

/// Conflict on the wire. Severity uses the 0.0-1.0 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictOutput {
    pub train1_id: TrainId,
    pub train2_id: Option<TrainId>,
    pub track_id: TrackId,
    /// None when the trains never meet
    pub estimated_time_min: Option<f64>,
    pub severity: f64,
    pub conflict_type: String,
}

impl From<&Conflict> for ConflictOutput {
    fn from(conflict: &Conflict) -> Self {
        Self {
            train1_id: conflict.train1_id,
            train2_id: conflict.train2_id,
            track_id: conflict.track_id,
            estimated_time_min: Some(conflict.estimated_time_minutes).filter(|t| t.is_finite()),
            severity: conflict.severity.as_unit(),
            conflict_type: conflict.conflict_type.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionOutput {
    pub train_id: TrainId,
    pub time_adjustment_min: f64,
    pub new_track: Option<TrackId>,
    pub confidence: f64,
    pub reason: String,
}

impl From<&ScheduleAdjustment> for ResolutionOutput {
    fn from(adj: &ScheduleAdjustment) -> Self {
        Self {
            train_id: adj.train_id,
            time_adjustment_min: adj.time_adjustment_minutes,
            new_track: adj.new_track,
            confidence: adj.confidence,
            reason: adj.reason.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictResponse {
    pub conflicts: Vec<ConflictOutput>,
    pub total_conflicts: usize,
    pub processing_time_ms: f64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ConflictResponse {
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            conflicts: Vec::new(),
            total_conflicts: 0,
            processing_time_ms: 0.0,
            success: false,
            error_message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub resolutions: Vec<ResolutionOutput>,
    pub remaining_conflicts: Vec<ConflictOutput>,
    pub total_delay_minutes: f64,
    pub optimization_time_ms: f64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl OptimizationResult {
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            resolutions: Vec::new(),
            remaining_conflicts: Vec::new(),
            total_delay_minutes: 0.0,
            optimization_time_ms: 0.0,
            success: false,
            error_message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub version: String,
    pub ml_ready: bool,
    pub avg_optimization_time_ms: f64,
    pub total_optimizations: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConflictType;

    #[test]
    fn test_train_input_defaults() {
        let input: TrainInput =
            serde_json::from_str(r#"{"id": 3, "current_track": 1}"#).expect("valid train");
        assert_eq!(input.priority, 5);
        assert_eq!(input.scheduled_arrival_minutes, 0.0);
        let train = Train::from(input);
        assert_eq!(train.id, TrainId(3));
        assert!(!train.is_delayed);
    }

    #[test]
    fn test_train_input_clamps_priority() {
        let input: TrainInput = serde_json::from_str(r#"{"id": 1, "current_track": 1, "priority": 0}"#)
            .expect("valid train");
        assert_eq!(Train::from(input).priority, 1);
    }

    #[test]
    fn test_conflict_output_uses_unit_severity() {
        let conflict = Conflict::between(ConflictType::HeadOn, TrainId(1), TrainId(2), TrackId(1), 4.0);
        let output = ConflictOutput::from(&conflict);
        assert_eq!(output.severity, 1.0);
        assert_eq!(output.estimated_time_min, Some(4.0));
        assert_eq!(output.conflict_type, "head_on");

        let never = Conflict::between(ConflictType::Overtaking, TrainId(1), TrainId(2), TrackId(1), f64::INFINITY);
        let output = ConflictOutput::from(&never);
        assert_eq!(output.estimated_time_min, None);
        assert_eq!(output.severity, 0.5);
    }

    #[test]
    fn test_capacity_conflict_has_no_second_train() {
        let conflict = Conflict::capacity_exceeded(TrainId(4), TrackId(2));
        let json = serde_json::to_value(ConflictOutput::from(&conflict)).expect("serializable");
        assert!(json["train2_id"].is_null());
        assert_eq!(json["severity"], 0.7);
    }
}
