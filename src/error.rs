//! Error types for the scheduling engine.

use crate::models::{StationId, TrackId, TrainId};
use std::fmt;
use thiserror::Error;

/// Capabilities that exist in the API surface but are not implemented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Shortest-path route search between stations
    RoutePlanning,
    /// Multi-step simulation of future conflicts
    TimeHorizonPrediction,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoutePlanning => write!(f, "alternate route planning"),
            Self::TimeHorizonPrediction => write!(f, "time-horizon conflict prediction"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("unknown train: {0}")]
    UnknownTrain(TrainId),
    #[error("unknown track: {0}")]
    UnknownTrack(TrackId),
    #[error("unknown station: {0}")]
    UnknownStation(StationId),
    #[error("not yet supported: {0}")]
    Unsupported(Capability),
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchedulerError {
    /// True for errors caused by a dangling train/track/station id
    #[must_use]
    pub fn is_unknown_reference(&self) -> bool {
        matches!(
            self,
            Self::UnknownTrain(_) | Self::UnknownTrack(_) | Self::UnknownStation(_)
        )
    }
}

pub type Result<T, E = SchedulerError> = std::result::Result<T, E>;
