use super::{TrackId, TrainId};
use serde::{Deserialize, Serialize};

/// A proposed change to one train's schedule.
///
/// `time_adjustment_minutes` is always minutes of delay to add; it is never
/// negative. Constructors clamp negative input to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleAdjustment {
    pub train_id: TrainId,
    pub time_adjustment_minutes: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_track: Option<TrackId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_platform: Option<u32>,
    pub reason: String,
    /// 0.0-1.0
    pub confidence: f64,
}

impl ScheduleAdjustment {
    /// Hold a train in place for `minutes`
    #[must_use]
    pub fn delay(train_id: TrainId, minutes: f64, reason: impl Into<String>, confidence: f64) -> Self {
        let minutes = if minutes < 0.0 {
            log::warn!("Negative delay {minutes} for {train_id} clamped to zero");
            0.0
        } else {
            minutes
        };
        Self {
            train_id,
            time_adjustment_minutes: minutes,
            new_track: None,
            new_platform: None,
            reason: reason.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Move a train to `track`, charging `minutes` for the maneuver
    #[must_use]
    pub fn switch_track(
        train_id: TrainId,
        track: TrackId,
        minutes: f64,
        reason: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            new_track: Some(track),
            ..Self::delay(train_id, minutes, reason, confidence)
        }
    }

    #[must_use]
    pub fn with_platform(mut self, platform: u32) -> Self {
        self.new_platform = Some(platform);
        self
    }

    #[must_use]
    pub fn changes_track(&self) -> bool {
        self.new_track.is_some()
    }
}
