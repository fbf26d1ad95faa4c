use super::{StationId, TrackId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    #[serde(default = "default_platforms")]
    pub num_platforms: u32,
    #[serde(default)]
    pub connected_track_ids: Vec<TrackId>,
}

fn default_platforms() -> u32 {
    1
}

impl Station {
    #[must_use]
    pub fn new(id: StationId, name: impl Into<String>, num_platforms: u32) -> Self {
        Self {
            id,
            name: name.into(),
            num_platforms,
            connected_track_ids: Vec::new(),
        }
    }
}
