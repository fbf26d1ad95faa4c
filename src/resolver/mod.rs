//! Conflict resolution strategies.
//!
//! Every strategy maps a conflict list plus a read-only network view to a list
//! of schedule adjustments. Strategies never mutate the network; applying the
//! adjustments is the scheduler's job.

mod alternatives;
mod priority;
mod proximity;
mod single_track;

pub use alternatives::{find_alternative_track, find_station_track};
pub use priority::{MinimizeDelayResolver, PriorityResolver};
pub use proximity::{distance_to_nearest_station, is_near_station};
pub use single_track::SingleTrackResolver;

use crate::error::{Capability, Result, SchedulerError};
use crate::models::{Conflict, ScheduleAdjustment, StationId, TrackId, TrainId};
use crate::network::NetworkView;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Adjustments produced by a strategy, plus the conflicts it had to skip
#[derive(Debug, Default)]
pub struct Resolution {
    pub adjustments: Vec<ScheduleAdjustment>,
    pub diagnostics: Vec<SchedulerError>,
}

impl Resolution {
    fn skip(&mut self, conflict: &Conflict, err: SchedulerError) {
        log::warn!("Skipping {} conflict on {}: {err}", conflict.conflict_type, conflict.track_id);
        self.diagnostics.push(err);
    }
}

pub trait ConflictResolver {
    fn name(&self) -> &'static str;

    fn resolve(&self, conflicts: &[Conflict], network: &dyn NetworkView) -> Resolution;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    Priority,
    MinimizeTotalDelay,
    SingleTrack,
}

impl Strategy {
    /// Build the resolver for this strategy with the given station radii
    #[must_use]
    pub fn resolver(
        self,
        priority_station_radius_km: f64,
        single_track_station_radius_km: f64,
    ) -> Box<dyn ConflictResolver + Send + Sync> {
        let priority = PriorityResolver {
            station_radius_km: priority_station_radius_km,
        };
        match self {
            Self::Priority => Box::new(priority),
            Self::MinimizeTotalDelay => Box::new(MinimizeDelayResolver { inner: priority }),
            Self::SingleTrack => Box::new(SingleTrackResolver {
                station_radius_km: single_track_station_radius_km,
                fallback: priority,
            }),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Priority => write!(f, "priority"),
            Self::MinimizeTotalDelay => write!(f, "minimize_total_delay"),
            Self::SingleTrack => write!(f, "single_track"),
        }
    }
}

/// Ordered list of tracks leading a train to `destination`.
///
/// Route planning is not available; callers get an explicit `Unsupported`
/// error rather than an empty route.
pub fn find_alternative_route(
    network: &dyn NetworkView,
    train_id: TrainId,
    destination: StationId,
) -> Result<Vec<TrackId>> {
    network.require_train(train_id)?;
    network
        .station(destination)
        .ok_or(SchedulerError::UnknownStation(destination))?;
    log::debug!("Route planning requested for {train_id} to {destination}");
    Err(SchedulerError::Unsupported(Capability::RoutePlanning))
}
