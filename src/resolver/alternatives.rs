//! Search for tracks a train can be moved onto.

use crate::models::{Track, TrackId, Train};
use crate::network::NetworkView;

fn accepts(candidate: &Track, train: &Train, network: &dyn NetworkView) -> bool {
    candidate.connects(train.destination_station)
        && network.trains_on_track(candidate.id).len() < candidate.capacity
}

/// First track, in network order, that reaches the train's destination and
/// has spare capacity. A multi-track train is never moved onto a single track.
#[must_use]
pub fn find_alternative_track(
    network: &dyn NetworkView,
    train: &Train,
    current_track_id: TrackId,
) -> Option<TrackId> {
    let current = network.track(current_track_id)?;

    network
        .tracks()
        .filter(|candidate| candidate.id != current_track_id)
        .filter(|candidate| !(candidate.is_single_track && !current.is_single_track))
        .find(|candidate| accepts(candidate, train, network))
        .map(|candidate| candidate.id)
}

/// Least congested multi-track segment reaching the train's destination.
/// Ties go to the track that comes first in network order.
#[must_use]
pub fn find_station_track(
    network: &dyn NetworkView,
    train: &Train,
    current_track_id: TrackId,
) -> Option<TrackId> {
    let mut best: Option<(usize, TrackId)> = None;

    for candidate in network.tracks() {
        if candidate.id == current_track_id || candidate.is_single_track {
            continue;
        }
        if !accepts(candidate, train, network) {
            continue;
        }
        let load = network.trains_on_track(candidate.id).len();
        if best.map_or(true, |(best_load, _)| load < best_load) {
            best = Some((load, candidate.id));
        }
    }

    best.map(|(_, id)| id)
}
