//! Position and speed calculations for conflict detection.

use crate::constants::MIN_CLOSING_SPEED_KMH;
use crate::models::Train;

/// Inferred direction of travel along a track.
///
/// Trains do not carry a heading, so a train in the first half of the track is
/// assumed to be heading away from the start and one in the second half back
/// towards it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Outbound,
    Inbound,
}

#[must_use]
pub fn infer_heading(train: &Train, track_length_km: f64) -> Heading {
    if train.position_km < track_length_km / 2.0 {
        Heading::Outbound
    } else {
        Heading::Inbound
    }
}

#[must_use]
pub fn distance_km(a: &Train, b: &Train) -> f64 {
    (a.position_km - b.position_km).abs()
}

/// Minutes until two opposing trains meet; infinite when they are not closing
#[must_use]
pub fn meeting_time_minutes(a: &Train, b: &Train) -> f64 {
    let closing_speed = a.velocity_kmh + b.velocity_kmh;
    if closing_speed < MIN_CLOSING_SPEED_KMH {
        return f64::INFINITY;
    }
    distance_km(a, b) / closing_speed * 60.0
}

/// Minutes to cover the gap between two trains at their mean speed
#[must_use]
pub fn gap_time_minutes(a: &Train, b: &Train) -> f64 {
    let mean_speed = (a.velocity_kmh + b.velocity_kmh) / 2.0;
    if mean_speed < MIN_CLOSING_SPEED_KMH {
        return f64::INFINITY;
    }
    distance_km(a, b) / mean_speed * 60.0
}
