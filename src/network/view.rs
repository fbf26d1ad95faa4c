use crate::error::{Result, SchedulerError};
use crate::models::{Station, StationId, Track, TrackId, Train, TrainId};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

/// Read-only access to network state.
///
/// Detection and resolution only ever see the network through this trait, so
/// they cannot mutate what they were handed.
pub trait NetworkView {
    fn train(&self, id: TrainId) -> Option<&Train>;

    fn track(&self, id: TrackId) -> Option<&Track>;

    fn station(&self, id: StationId) -> Option<&Station>;

    /// All trains, in insertion order
    fn trains(&self) -> indexmap::map::Values<'_, TrainId, Train>;

    /// All tracks, in insertion order
    fn tracks(&self) -> indexmap::map::Values<'_, TrackId, Track>;

    /// Trains currently assigned to `track`. Empty for unknown tracks.
    fn trains_on_track(&self, track: TrackId) -> &[TrainId] {
        match self.track(track) {
            Some(track) => &track.active_train_ids,
            None => &[],
        }
    }

    fn require_train(&self, id: TrainId) -> Result<&Train> {
        self.train(id).ok_or(SchedulerError::UnknownTrain(id))
    }

    fn require_track(&self, id: TrackId) -> Result<&Track> {
        self.track(id).ok_or(SchedulerError::UnknownTrack(id))
    }
}

/// Immutable copy of the network taken at one instant
#[derive(Debug, Clone, Serialize)]
pub struct NetworkSnapshot {
    pub trains: IndexMap<TrainId, Train>,
    pub tracks: IndexMap<TrackId, Track>,
    pub stations: IndexMap<StationId, Station>,
    pub timestamp: DateTime<Utc>,
}

impl NetworkView for NetworkSnapshot {
    fn train(&self, id: TrainId) -> Option<&Train> {
        self.trains.get(&id)
    }

    fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(&id)
    }

    fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(&id)
    }

    fn trains(&self) -> indexmap::map::Values<'_, TrainId, Train> {
        self.trains.values()
    }

    fn tracks(&self) -> indexmap::map::Values<'_, TrackId, Track> {
        self.tracks.values()
    }
}
