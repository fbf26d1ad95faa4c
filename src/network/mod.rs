//! Authoritative network state: trains, tracks and stations.

mod view;

pub use view::{NetworkSnapshot, NetworkView};

use crate::error::{Result, SchedulerError};
use crate::models::{ScheduleAdjustment, Station, StationId, Track, TrackId, Train, TrainId};
use chrono::Utc;
use indexmap::IndexMap;

/// Outcome of applying a batch of adjustments
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub applied: Vec<ScheduleAdjustment>,
    pub skipped: Vec<SchedulerError>,
}

impl ApplyReport {
    #[must_use]
    pub fn total_delay_minutes(&self) -> f64 {
        self.applied.iter().map(|adj| adj.time_adjustment_minutes).sum()
    }

    #[must_use]
    pub fn track_changes(&self) -> usize {
        self.applied.iter().filter(|adj| adj.changes_track()).count()
    }
}

/// Owner of all network state.
///
/// Every track's `active_train_ids` equals the set of trains whose
/// `current_track` is that track. Trains may reference tracks that were never
/// registered; such trains are simply not listed on any track.
#[derive(Debug, Clone, Default)]
pub struct NetworkStore {
    trains: IndexMap<TrainId, Train>,
    tracks: IndexMap<TrackId, Track>,
    stations: IndexMap<StationId, Station>,
}

impl NetworkStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the track and station sets. Trains are kept and every track's
    /// active list is rebuilt from them.
    pub fn initialize_network(&mut self, tracks: Vec<Track>, stations: Vec<Station>) {
        self.tracks = tracks
            .into_iter()
            .map(|mut track| {
                track.active_train_ids.clear();
                (track.id, track)
            })
            .collect();
        self.stations = stations
            .into_iter()
            .map(|station| (station.id, station))
            .collect();

        for train in self.trains.values() {
            if let Some(track) = self.tracks.get_mut(&train.current_track) {
                track.active_train_ids.push(train.id);
            }
        }
    }

    /// Insert a train, replacing any train with the same id.
    ///
    /// A replaced train is detached from its old track first, so re-adding an
    /// id never duplicates it in an active list. Returns the replaced train.
    pub fn add_train(&mut self, train: Train) -> Option<Train> {
        let previous = self.trains.shift_remove(&train.id);
        if let Some(old) = &previous {
            self.detach(old.id, old.current_track);
        }
        if let Some(track) = self.tracks.get_mut(&train.current_track) {
            track.active_train_ids.push(train.id);
        }
        self.trains.insert(train.id, train);
        previous
    }

    /// Remove a train and detach it from its track
    pub fn remove_train(&mut self, id: TrainId) -> Result<Train> {
        let train = self
            .trains
            .shift_remove(&id)
            .ok_or(SchedulerError::UnknownTrain(id))?;
        self.detach(id, train.current_track);
        Ok(train)
    }

    pub fn update_train_state(
        &mut self,
        id: TrainId,
        position_km: f64,
        velocity_kmh: f64,
        is_delayed: bool,
    ) -> Result<()> {
        let train = self
            .trains
            .get_mut(&id)
            .ok_or(SchedulerError::UnknownTrain(id))?;
        train.position_km = position_km;
        train.velocity_kmh = velocity_kmh;
        train.is_delayed = is_delayed;
        train.last_update = Utc::now();
        Ok(())
    }

    /// Apply adjustments in order. Adjustments naming an unknown train, or
    /// moving a train onto an unknown track, are skipped and reported.
    pub fn apply_adjustments(&mut self, adjustments: Vec<ScheduleAdjustment>) -> ApplyReport {
        let mut report = ApplyReport::default();

        for adj in adjustments {
            if let Err(err) = self.apply_one(&adj) {
                log::warn!("Skipping adjustment for {}: {err}", adj.train_id);
                report.skipped.push(err);
                continue;
            }
            report.applied.push(adj);
        }

        report
    }

    fn apply_one(&mut self, adj: &ScheduleAdjustment) -> Result<()> {
        let current_track = self.require_train(adj.train_id)?.current_track;
        let target_track = adj.new_track.filter(|&track| track != current_track);
        if let Some(track) = target_track {
            self.require_track(track)?;
        }

        let Some(train) = self.trains.get_mut(&adj.train_id) else {
            return Err(SchedulerError::UnknownTrain(adj.train_id));
        };
        train.add_delay(adj.time_adjustment_minutes);
        if let Some(platform) = adj.new_platform {
            train.assigned_platform = Some(platform);
        }

        if let Some(track) = target_track {
            train.current_track = track;
            self.detach(adj.train_id, current_track);
            if let Some(new_track) = self.tracks.get_mut(&track) {
                new_track.active_train_ids.push(adj.train_id);
            }
        }
        Ok(())
    }

    fn detach(&mut self, train: TrainId, track: TrackId) {
        if let Some(track) = self.tracks.get_mut(&track) {
            track.active_train_ids.retain(|&id| id != train);
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            trains: self.trains.clone(),
            tracks: self.tracks.clone(),
            stations: self.stations.clone(),
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn train_count(&self) -> usize {
        self.trains.len()
    }

    #[must_use]
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }
}

impl NetworkView for NetworkStore {
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
