use super::alternatives::find_station_track;
use super::proximity::is_near_station;
use super::{ConflictResolver, PriorityResolver, Resolution};
use crate::constants::{
    DIVERSION_CONFIDENCE, DIVERSION_DELAY_MINUTES, SINGLE_TRACK_STATION_RADIUS_KM,
    WAIT_CONFIDENCE, WAIT_PER_TRAIN_MINUTES,
};
use crate::models::{Conflict, ScheduleAdjustment, Track, TrackId, Train, TrainId};
use crate::network::NetworkView;
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Deadlock avoidance for single-track segments.
///
/// All trains in conflict on one single track form a group. Each train near a
/// station is diverted onto the least congested multi-track segment reaching
/// its destination; the rest wait for the group's highest-priority train,
/// which proceeds unadjusted. When nothing applies (no single-track conflicts)
/// the whole conflict list goes to the priority strategy.
#[derive(Debug, Clone, Copy)]
pub struct SingleTrackResolver {
    pub station_radius_km: f64,
    pub fallback: PriorityResolver,
}

impl Default for SingleTrackResolver {
    fn default() -> Self {
        Self {
            station_radius_km: SINGLE_TRACK_STATION_RADIUS_KM,
            fallback: PriorityResolver::default(),
        }
    }
}

/// First train with the highest priority; `group` is iterated in id order
fn group_leader(group: &[&Train]) -> Option<TrainId> {
    group
        .iter()
        .copied()
        .fold(None::<&Train>, |best, train| match best {
            Some(best) if best.priority >= train.priority => Some(best),
            _ => Some(train),
        })
        .map(|train| train.id)
}

impl SingleTrackResolver {
    fn resolve_group(
        &self,
        track: &Track,
        group: &[&Train],
        network: &dyn NetworkView,
        adjustments: &mut Vec<ScheduleAdjustment>,
    ) {
        let leader = group_leader(group);
        #[allow(clippy::cast_precision_loss)]
        let wait_minutes = WAIT_PER_TRAIN_MINUTES * (group.len().saturating_sub(1)) as f64;

        for train in group {
            if is_near_station(train, track, self.station_radius_km) {
                if let Some(station_track) = find_station_track(network, train, track.id) {
                    log::debug!("{} diverted from {} to {station_track}", train.id, track.id);
                    adjustments.push(ScheduleAdjustment::switch_track(
                        train.id,
                        station_track,
                        DIVERSION_DELAY_MINUTES,
                        format!("Single-track conflict: diverted to station track {}", station_track.0),
                        DIVERSION_CONFIDENCE,
                    ));
                    continue;
                }
            }

            let Some(leader) = leader.filter(|&leader| leader != train.id) else {
                continue;
            };
            adjustments.push(ScheduleAdjustment::delay(
                train.id,
                wait_minutes,
                format!("Single-track conflict: waiting for priority train {}", leader.0),
                WAIT_CONFIDENCE,
            ));
        }
    }
}

impl ConflictResolver for SingleTrackResolver {
    fn name(&self) -> &'static str {
        "single_track"
    }

    fn resolve(&self, conflicts: &[Conflict], network: &dyn NetworkView) -> Resolution {
        let mut resolution = Resolution::default();

        let mut by_track: IndexMap<TrackId, Vec<&Conflict>> = IndexMap::new();
        for conflict in conflicts {
            by_track.entry(conflict.track_id).or_default().push(conflict);
        }

        for (track_id, track_conflicts) in by_track {
            let Some(track) = network.track(track_id) else {
                continue;
            };
            if !track.is_single_track {
                continue;
            }

            let ids: BTreeSet<TrainId> = track_conflicts
                .iter()
                .flat_map(|conflict| conflict.train_ids())
                .collect();
            let mut group = Vec::with_capacity(ids.len());
            for id in ids {
                match network.require_train(id) {
                    Ok(train) => group.push(train),
                    Err(err) => {
                        log::warn!("Single-track group on {track_id} references {id}: {err}");
                        resolution.diagnostics.push(err);
                    }
                }
            }

            self.resolve_group(track, &group, network, &mut resolution.adjustments);
        }

        if resolution.adjustments.is_empty() {
            log::debug!("No single-track resolution found, falling back to priority strategy");
            let mut fallback = self.fallback.resolve(conflicts, network);
            fallback.diagnostics.extend(resolution.diagnostics);
            return fallback;
        }

        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::detect_conflicts;
    use crate::models::{ConflictType, StationId};
    use crate::network::NetworkStore;

    const DESTINATION: StationId = StationId(7);

    fn deadlocked(station_tracks: Vec<Track>) -> NetworkStore {
        let mut tracks = vec![Track::new_single_track(TrackId(1), 40.0, 5)];
        tracks.extend(station_tracks);
        let mut store = NetworkStore::new();
        store.initialize_network(tracks, Vec::new());
        for (id, position, priority) in [(1, 15.0, 4), (2, 25.0, 9), (3, 28.0, 6)] {
            store.add_train(
                Train::new(TrainId(id), TrackId(1), position, 150.0)
                    .with_priority(priority)
                    .with_destination(DESTINATION),
            );
        }
        store
    }

    fn adjustment_for(resolution: &Resolution, id: u32) -> Option<&ScheduleAdjustment> {
        resolution.adjustments.iter().find(|adj| adj.train_id == TrainId(id))
    }

    #[test]
    fn test_highest_priority_train_proceeds_others_wait() {
        let store = deadlocked(Vec::new());
        let conflicts = detect_conflicts(&store);
        assert_eq!(conflicts.len(), 2);
        assert!(conflicts.iter().all(|c| c.conflict_type == ConflictType::HeadOn));

        let resolution = SingleTrackResolver::default().resolve(&conflicts, &store);
        assert_eq!(resolution.adjustments.len(), 2);
        assert!(adjustment_for(&resolution, 2).is_none());
        for id in [1, 3] {
            let adj = adjustment_for(&resolution, id).expect("waiting train");
            assert_eq!(adj.time_adjustment_minutes, 16.0);
            assert_eq!(adj.confidence, 0.70);
            assert_eq!(adj.new_track, None);
        }
    }

    #[test]
    fn test_train_near_station_is_diverted() {
        let mut store = deadlocked(vec![
            Track::new_multi_track(TrackId(2), 5.0, 3).with_stations(vec![DESTINATION]),
        ]);
        store
            .update_train_state(TrainId(1), 8.0, 150.0, false)
            .expect("train exists");
        let conflicts = vec![
            Conflict::between(ConflictType::HeadOn, TrainId(1), TrainId(2), TrackId(1), 3.0),
            Conflict::between(ConflictType::HeadOn, TrainId(1), TrainId(3), TrackId(1), 3.0),
        ];

        let resolution = SingleTrackResolver::default().resolve(&conflicts, &store);
        let diverted = adjustment_for(&resolution, 1).expect("diverted train");
        assert_eq!(diverted.new_track, Some(TrackId(2)));
        assert_eq!(diverted.time_adjustment_minutes, 1.0);
        assert_eq!(diverted.confidence, 0.85);

        let waiting = adjustment_for(&resolution, 3).expect("waiting train");
        assert_eq!(waiting.time_adjustment_minutes, 16.0);
        assert!(adjustment_for(&resolution, 2).is_none());
    }

    #[test]
    fn test_priority_tie_goes_to_lowest_id() {
        let mut store = NetworkStore::new();
        store.initialize_network(vec![Track::new_single_track(TrackId(1), 40.0, 5)], Vec::new());
        store.add_train(Train::new(TrainId(5), TrackId(1), 15.0, 150.0).with_priority(7));
        store.add_train(Train::new(TrainId(3), TrackId(1), 25.0, 150.0).with_priority(7));
        let conflicts = vec![Conflict::between(ConflictType::HeadOn, TrainId(5), TrainId(3), TrackId(1), 2.0)];

        let resolution = SingleTrackResolver::default().resolve(&conflicts, &store);
        assert_eq!(resolution.adjustments.len(), 1);
        assert_eq!(resolution.adjustments[0].train_id, TrainId(5));
        assert_eq!(resolution.adjustments[0].time_adjustment_minutes, 8.0);
    }

    #[test]
    fn test_falls_back_to_priority_on_multi_track() {
        let mut store = NetworkStore::new();
        store.initialize_network(vec![Track::new_multi_track(TrackId(1), 100.0, 5)], Vec::new());
        store.add_train(Train::new(TrainId(1), TrackId(1), 30.0, 100.0).with_priority(8));
        store.add_train(Train::new(TrainId(2), TrackId(1), 31.0, 100.0).with_priority(2));
        let conflicts = detect_conflicts(&store);

        let resolution = SingleTrackResolver::default().resolve(&conflicts, &store);
        assert_eq!(resolution.adjustments.len(), 1);
        assert_eq!(resolution.adjustments[0].train_id, TrainId(2));
        assert_eq!(resolution.adjustments[0].confidence, 0.75);
    }

    #[test]
    fn test_no_conflicts_no_adjustments() {
        let store = deadlocked(Vec::new());
        let resolution = SingleTrackResolver::default().resolve(&[], &store);
        assert!(resolution.adjustments.is_empty());
    }
}
