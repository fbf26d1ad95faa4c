//! Conflict detection over a network view.
//!
//! Detection is a pure function of the network: it never mutates state and
//! returns the same conflict set for the same input.

mod kinematics;

pub use kinematics::{distance_km, gap_time_minutes, infer_heading, meeting_time_minutes, Heading};

use crate::constants::{HEAD_ON_WINDOW_MINUTES, OVERTAKING_DISTANCE_KM};
use crate::error::{Capability, Result, SchedulerError};
use crate::models::{Conflict, ConflictType, TrackId, Train, TrainId};
use crate::network::NetworkView;
use indexmap::IndexMap;

/// Track properties relevant to detection.
///
/// Trains may sit on tracks that were never registered. Those are treated as
/// multi-track with unknown length and no capacity limit, so only the
/// overtaking rule applies to them.
#[derive(Debug, Clone, Copy)]
struct TrackProfile {
    single_track_length_km: Option<f64>,
    capacity: Option<usize>,
}

impl TrackProfile {
    fn of<V: NetworkView + ?Sized>(network: &V, id: TrackId) -> Self {
        match network.track(id) {
            Some(track) => Self {
                single_track_length_km: track.is_single_track.then_some(track.length_km),
                capacity: Some(track.capacity),
            },
            None => Self {
                single_track_length_km: None,
                capacity: None,
            },
        }
    }
}

/// Enumerate every head-on, overtaking and capacity conflict in the network
#[must_use]
pub fn detect_conflicts<V: NetworkView + ?Sized>(network: &V) -> Vec<Conflict> {
    #[cfg(feature = "perf_timing")]
    let start = std::time::Instant::now();

    let mut by_track: IndexMap<TrackId, Vec<&Train>> = IndexMap::new();
    for train in network.trains() {
        by_track.entry(train.current_track).or_default().push(train);
    }

    let mut conflicts = Vec::new();
    for (&track_id, trains) in &by_track {
        let profile = TrackProfile::of(network, track_id);
        check_pairs(track_id, trains, profile, &mut conflicts);

        if let Some(capacity) = profile.capacity {
            conflicts.extend(
                trains
                    .iter()
                    .skip(capacity)
                    .map(|train| Conflict::capacity_exceeded(train.id, track_id)),
            );
        }
    }

    #[cfg(feature = "perf_timing")]
    log::debug!(
        "Detected {} conflicts across {} tracks in {:?}",
        conflicts.len(),
        by_track.len(),
        start.elapsed()
    );

    conflicts
}

fn check_pairs(track_id: TrackId, trains: &[&Train], profile: TrackProfile, conflicts: &mut Vec<Conflict>) {
    for (i, first) in trains.iter().enumerate() {
        for second in &trains[i + 1..] {
            let conflict = match profile.single_track_length_km {
                Some(length_km) => check_head_on(first, second, track_id, length_km),
                None => check_overtaking(first, second, track_id),
            };
            conflicts.extend(conflict);
        }
    }
}

fn check_head_on(first: &Train, second: &Train, track_id: TrackId, length_km: f64) -> Option<Conflict> {
    if infer_heading(first, length_km) == infer_heading(second, length_km) {
        return None;
    }
    let meeting_time = meeting_time_minutes(first, second);
    (meeting_time > 0.0 && meeting_time < HEAD_ON_WINDOW_MINUTES).then(|| {
        Conflict::between(ConflictType::HeadOn, first.id, second.id, track_id, meeting_time)
    })
}

fn check_overtaking(first: &Train, second: &Train, track_id: TrackId) -> Option<Conflict> {
    (distance_km(first, second) < OVERTAKING_DISTANCE_KM).then(|| {
        Conflict::between(
            ConflictType::Overtaking,
            first.id,
            second.id,
            track_id,
            gap_time_minutes(first, second),
        )
    })
}

/// True when a full detection pass reports a conflict between `a` and `b`
#[must_use]
pub fn are_trains_in_conflict<V: NetworkView + ?Sized>(network: &V, a: TrainId, b: TrainId) -> bool {
    detect_conflicts(network)
        .iter()
        .any(|conflict| conflict.involves_pair(a, b))
}

/// Conflicts expected within `horizon_minutes`.
///
/// Multi-step simulation is not available; callers get an explicit
/// `Unsupported` error rather than an empty list.
pub fn predict_future_conflicts<V: NetworkView + ?Sized>(
    _network: &V,
    horizon_minutes: f64,
) -> Result<Vec<Conflict>> {
    log::debug!("Future conflict prediction requested for {horizon_minutes} min horizon");
    Err(SchedulerError::Unsupported(Capability::TimeHorizonPrediction))
}

/// Copy of `conflicts` ordered by severity, most severe first
#[must_use]
pub fn prioritize_conflicts(conflicts: &[Conflict]) -> Vec<Conflict> {
    let mut prioritized = conflicts.to_vec();
    prioritized.sort_by(|a, b| b.severity.cmp(&a.severity));
    prioritized
}
