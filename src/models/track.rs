use super::{StationId, TrackId, TrainId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub length_km: f64,
    /// Bidirectional single line; opposing trains can meet head-on
    pub is_single_track: bool,
    pub capacity: usize,
    #[serde(default)]
    pub station_ids: Vec<StationId>,
    /// Trains whose `current_track` is this track. Maintained by the network store.
    #[serde(default, skip_deserializing)]
    pub active_train_ids: Vec<TrainId>,
}

impl Track {
    #[must_use]
    pub fn new_single_track(id: TrackId, length_km: f64, capacity: usize) -> Self {
        Self {
            id,
            length_km,
            is_single_track: true,
            capacity,
            station_ids: Vec::new(),
            active_train_ids: Vec::new(),
        }
    }

    #[must_use]
    pub fn new_multi_track(id: TrackId, length_km: f64, capacity: usize) -> Self {
        Self {
            is_single_track: false,
            ..Self::new_single_track(id, length_km, capacity)
        }
    }

    #[must_use]
    pub fn with_stations(mut self, station_ids: Vec<StationId>) -> Self {
        self.station_ids = station_ids;
        self
    }

    #[must_use]
    pub fn connects(&self, station: StationId) -> bool {
        self.station_ids.contains(&station)
    }

    #[must_use]
    pub fn has_spare_capacity(&self) -> bool {
        self.active_train_ids.len() < self.capacity
    }
}
