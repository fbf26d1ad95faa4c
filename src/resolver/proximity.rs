//! Station-proximity heuristic.
//!
//! Tracks carry no station positions, so stations are assumed at both track
//! endpoints and every `STATION_SPACING_KM` in between.

use crate::constants::STATION_SPACING_KM;
use crate::models::{Track, Train};

/// Distance from the train to the closest assumed station on `track`
#[must_use]
pub fn distance_to_nearest_station(train: &Train, track: &Track) -> f64 {
    let position = train.position_km;
    let endpoints = position.abs().min((position - track.length_km).abs());

    std::iter::successors(Some(STATION_SPACING_KM), |km| Some(km + STATION_SPACING_KM))
        .take_while(|&km| km < track.length_km)
        .map(|km| (position - km).abs())
        .fold(endpoints, f64::min)
}

/// True when the train is within `max_distance_km` of an assumed station
#[must_use]
pub fn is_near_station(train: &Train, track: &Track, max_distance_km: f64) -> bool {
    distance_to_nearest_station(train, track) <= max_distance_km
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TrackId, TrainId};

    fn train_at(position_km: f64) -> Train {
        Train::new(TrainId(1), TrackId(1), position_km, 100.0)
    }

    #[test]
    fn test_near_track_endpoints() {
        let track = Track::new_single_track(TrackId(1), 40.0, 5);
        assert!(is_near_station(&train_at(4.0), &track, 5.0));
        assert!(is_near_station(&train_at(36.0), &track, 5.0));
        assert!(!is_near_station(&train_at(20.0), &track, 5.0));
    }

    #[test]
    fn test_intermediate_stations_every_50km() {
        let track = Track::new_multi_track(TrackId(1), 170.0, 5);
        assert!(is_near_station(&train_at(103.0), &track, 5.0));
        assert!(is_near_station(&train_at(148.0), &track, 5.0));
        assert!(!is_near_station(&train_at(75.0), &track, 5.0));
        assert!((distance_to_nearest_station(&train_at(75.0), &track) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_intermediate_station_at_track_end() {
        let track = Track::new_multi_track(TrackId(1), 100.0, 5);
        // 50 km is the only intermediate station; 100 km is the endpoint
        assert!((distance_to_nearest_station(&train_at(70.0), &track) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_radius_is_inclusive() {
        let track = Track::new_single_track(TrackId(1), 40.0, 5);
        assert!(is_near_station(&train_at(10.0), &track, 10.0));
    }
}
