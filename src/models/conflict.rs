use super::{TrackId, TrainId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    HeadOn,           // Opposing trains converging on a single track
    Overtaking,       // Trains too close together on a multi-track segment
    CapacityExceeded, // More trains assigned than the track allows
}

impl ConflictType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HeadOn => "head_on",
            Self::Overtaking => "overtaking",
            Self::CapacityExceeded => "capacity_exceeded",
        }
    }

    /// Default severity for conflicts of this kind
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Self::HeadOn => Severity::MAX,
            Self::CapacityExceeded => Severity::CAPACITY,
            Self::Overtaking => Severity::MODERATE,
        }
    }
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conflict severity on the canonical 1-10 scale.
///
/// External interfaces report severity as a 0.0-1.0 score; convert with
/// [`Severity::as_unit`] and [`Severity::from_unit`] at that boundary only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Severity(u8);

impl Severity {
    pub const MIN: Self = Self(1);
    pub const MODERATE: Self = Self(5);
    pub const CAPACITY: Self = Self(7);
    pub const MAX: Self = Self(10);

    /// Build a severity, clamping into 1-10
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.clamp(Self::MIN.0, Self::MAX.0))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Severity as a 0.0-1.0 score
    #[must_use]
    pub fn as_unit(self) -> f64 {
        f64::from(self.0) / f64::from(Self::MAX.0)
    }

    /// Inverse of [`Severity::as_unit`], rounding to the nearest step
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_unit(score: f64) -> Self {
        let scaled = (score.clamp(0.0, 1.0) * f64::from(Self::MAX.0)).round();
        Self::new(scaled as u8)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/10", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub train1_id: TrainId,
    /// None for capacity conflicts, which concern a single train
    pub train2_id: Option<TrainId>,
    pub track_id: TrackId,
    /// Minutes until the conflict materializes; infinite when trains never meet
    pub estimated_time_minutes: f64,
    pub conflict_type: ConflictType,
    pub severity: Severity,
}

impl Conflict {
    #[must_use]
    pub fn between(
        conflict_type: ConflictType,
        train1_id: TrainId,
        train2_id: TrainId,
        track_id: TrackId,
        estimated_time_minutes: f64,
    ) -> Self {
        Self {
            train1_id,
            train2_id: Some(train2_id),
            track_id,
            estimated_time_minutes,
            conflict_type,
            severity: conflict_type.severity(),
        }
    }

    #[must_use]
    pub fn capacity_exceeded(train_id: TrainId, track_id: TrackId) -> Self {
        Self {
            train1_id: train_id,
            train2_id: None,
            track_id,
            estimated_time_minutes: 0.0,
            conflict_type: ConflictType::CapacityExceeded,
            severity: ConflictType::CapacityExceeded.severity(),
        }
    }

    /// True when this conflict involves both trains, in either order
    #[must_use]
    pub fn involves_pair(&self, a: TrainId, b: TrainId) -> bool {
        match self.train2_id {
            Some(second) => {
                (self.train1_id == a && second == b) || (self.train1_id == b && second == a)
            }
            None => false,
        }
    }

    /// Ids of all trains named by this conflict
    pub fn train_ids(&self) -> impl Iterator<Item = TrainId> {
        std::iter::once(self.train1_id).chain(self.train2_id)
    }

    /// Format a human-readable message describing the conflict
    #[must_use]
    pub fn format_message(&self) -> String {
        match (self.conflict_type, self.train2_id) {
            (ConflictType::CapacityExceeded, _) | (_, None) => {
                format!("{} exceeds capacity of {}", self.train1_id, self.track_id)
            }
            (ConflictType::HeadOn, Some(other)) => format!(
                "{} meets {} head-on on {} in {:.1} min",
                self.train1_id, other, self.track_id, self.estimated_time_minutes
            ),
            (ConflictType::Overtaking, Some(other)) => format!(
                "{} too close to {} on {}",
                self.train1_id, other, self.track_id
            ),
        }
    }
}
