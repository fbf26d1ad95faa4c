use super::{StationId, TrackId, TrainId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 10;
pub const DEFAULT_PRIORITY: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Train {
    pub id: TrainId,
    pub current_track: TrackId,
    /// Kilometers from the start of `current_track`
    pub position_km: f64,
    pub velocity_kmh: f64,
    /// Scheduled arrival offset; grows as delay adjustments are applied
    #[serde(default)]
    pub scheduled_arrival_minutes: f64,
    pub destination_station: StationId,
    /// 1-10, higher is more important
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub is_delayed: bool,
    #[serde(default)]
    pub delay_minutes: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_platform: Option<u32>,
    #[serde(default = "Utc::now")]
    pub last_update: DateTime<Utc>,
}

fn default_priority() -> u8 {
    DEFAULT_PRIORITY
}

impl Train {
    #[must_use]
    pub fn new(id: TrainId, current_track: TrackId, position_km: f64, velocity_kmh: f64) -> Self {
        Self {
            id,
            current_track,
            position_km,
            velocity_kmh,
            scheduled_arrival_minutes: 0.0,
            destination_station: StationId(0),
            priority: DEFAULT_PRIORITY,
            is_delayed: false,
            delay_minutes: 0.0,
            assigned_platform: None,
            last_update: Utc::now(),
        }
    }

    /// Set the priority, clamped to the 1-10 range
    #[must_use]
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority.clamp(MIN_PRIORITY, MAX_PRIORITY);
        self
    }

    #[must_use]
    pub fn with_destination(mut self, destination: StationId) -> Self {
        self.destination_station = destination;
        self
    }

    /// Add delay to the schedule. Non-positive values leave the delay flag untouched.
    pub fn add_delay(&mut self, minutes: f64) {
        self.scheduled_arrival_minutes += minutes;
        if minutes > 0.0 {
            self.is_delayed = true;
            self.delay_minutes += minutes;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_is_clamped() {
        let train = Train::new(TrainId(1), TrackId(1), 0.0, 100.0).with_priority(42);
        assert_eq!(train.priority, MAX_PRIORITY);
        let train = Train::new(TrainId(1), TrackId(1), 0.0, 100.0).with_priority(0);
        assert_eq!(train.priority, MIN_PRIORITY);
    }

    #[test]
    fn test_add_delay_marks_train_delayed() {
        let mut train = Train::new(TrainId(1), TrackId(1), 0.0, 100.0);
        train.add_delay(4.5);
        assert!(train.is_delayed);
        assert_eq!(train.delay_minutes, 4.5);
        assert_eq!(train.scheduled_arrival_minutes, 4.5);
    }

    #[test]
    fn test_zero_delay_keeps_train_on_time() {
        let mut train = Train::new(TrainId(1), TrackId(1), 0.0, 100.0);
        train.add_delay(0.0);
        assert!(!train.is_delayed);
        assert_eq!(train.delay_minutes, 0.0);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"id": 3, "current_track": 1, "position_km": 2.5, "velocity_kmh": 80.0, "destination_station": 9}"#;
        let train: Train = serde_json::from_str(json).expect("valid train");
        assert_eq!(train.id, TrainId(3));
        assert_eq!(train.priority, DEFAULT_PRIORITY);
        assert!(!train.is_delayed);
        assert_eq!(train.assigned_platform, None);
    }
}
