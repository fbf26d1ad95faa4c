use super::alternatives::find_alternative_track;
use super::proximity::is_near_station;
use super::{ConflictResolver, Resolution};
use crate::constants::{
    DELAY_PER_SEVERITY_MINUTES, PRIORITY_STATION_RADIUS_KM, TIME_DELAY_CONFIDENCE,
    TRACK_SWITCH_CONFIDENCE, TRACK_SWITCH_DELAY_MINUTES,
};
use crate::models::{Conflict, ScheduleAdjustment, Train};
use crate::network::NetworkView;

/// Resolve each pairwise conflict by adjusting its lower-priority train.
///
/// The train is switched to another track when it is near a station and a
/// suitable track exists, otherwise it is delayed in proportion to the
/// conflict's severity. Capacity conflicts are left alone.
#[derive(Debug, Clone, Copy)]
pub struct PriorityResolver {
    pub station_radius_km: f64,
}

impl Default for PriorityResolver {
    fn default() -> Self {
        Self {
            station_radius_km: PRIORITY_STATION_RADIUS_KM,
        }
    }
}

/// Order a conflicting pair as (lower, higher) priority.
/// On equal priority the second train yields.
fn rank_pair<'a>(first: &'a Train, second: &'a Train) -> (&'a Train, &'a Train) {
    if first.priority < second.priority {
        (first, second)
    } else {
        (second, first)
    }
}

impl PriorityResolver {
    fn resolve_one(&self, conflict: &Conflict, lower: &Train, higher: &Train, network: &dyn NetworkView) -> ScheduleAdjustment {
        let track = network.track(conflict.track_id);
        let near_station = track.is_some_and(|track| is_near_station(lower, track, self.station_radius_km));
        let both_on_track =
            lower.current_track == conflict.track_id && higher.current_track == conflict.track_id;

        if both_on_track && near_station {
            if let Some(alternative) = find_alternative_track(network, lower, conflict.track_id) {
                log::debug!("{} switches from {} to {alternative}", lower.id, conflict.track_id);
                return ScheduleAdjustment::switch_track(
                    lower.id,
                    alternative,
                    TRACK_SWITCH_DELAY_MINUTES,
                    format!("Track switch to {alternative} at station to avoid conflict with {}", higher.id),
                    TRACK_SWITCH_CONFIDENCE,
                );
            }
        }

        let reason = if near_station {
            "Time delay to avoid conflict (no alternative track available at station)"
        } else {
            "Time delay to avoid conflict (not near station for track switch)"
        };
        ScheduleAdjustment::delay(
            lower.id,
            DELAY_PER_SEVERITY_MINUTES * f64::from(conflict.severity.value()),
            reason,
            TIME_DELAY_CONFIDENCE,
        )
    }
}

impl ConflictResolver for PriorityResolver {
    fn name(&self) -> &'static str {
        "priority"
    }

    fn resolve(&self, conflicts: &[Conflict], network: &dyn NetworkView) -> Resolution {
        let mut resolution = Resolution::default();

        for conflict in conflicts {
            let Some(second_id) = conflict.train2_id else {
                continue;
            };
            let pair = network
                .require_train(conflict.train1_id)
                .and_then(|first| network.require_train(second_id).map(|second| (first, second)));
            let (first, second) = match pair {
                Ok(pair) => pair,
                Err(err) => {
                    resolution.skip(conflict, err);
                    continue;
                }
            };

            let (lower, higher) = rank_pair(first, second);
            resolution.adjustments.push(self.resolve_one(conflict, lower, higher, network));
        }

        resolution
    }
}

/// Named strategy for minimizing total network delay.
///
/// No global optimization exists yet; this resolves exactly like
/// [`PriorityResolver`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimizeDelayResolver {
    pub inner: PriorityResolver,
}

impl ConflictResolver for MinimizeDelayResolver {
    fn name(&self) -> &'static str {
        "minimize_total_delay"
    }

    fn resolve(&self, conflicts: &[Conflict], network: &dyn NetworkView) -> Resolution {
        self.inner.resolve(conflicts, network)
    }
}
