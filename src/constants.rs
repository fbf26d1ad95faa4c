//! Thresholds and tuning values shared by detection and resolution.

/// Head-on conflicts are reported when trains meet within this many minutes
pub const HEAD_ON_WINDOW_MINUTES: f64 = 5.0;

/// Trains on a multi-track segment closer than this are in overtaking conflict
pub const OVERTAKING_DISTANCE_KM: f64 = 2.0;

/// Closing speeds below this are treated as stationary (meeting time is infinite)
pub const MIN_CLOSING_SPEED_KMH: f64 = 0.1;

/// Assumed spacing of intermediate stations along a track
pub const STATION_SPACING_KM: f64 = 50.0;

/// Default station radius for the priority strategy's track switch
pub const PRIORITY_STATION_RADIUS_KM: f64 = 5.0;

/// Default station radius for single-track diversions
pub const SINGLE_TRACK_STATION_RADIUS_KM: f64 = 10.0;

/// Delay charged for a track switch maneuver under the priority strategy
pub const TRACK_SWITCH_DELAY_MINUTES: f64 = 0.5;
pub const TRACK_SWITCH_CONFIDENCE: f64 = 0.90;

/// Fallback delay is this many minutes per severity point
pub const DELAY_PER_SEVERITY_MINUTES: f64 = 5.0;
pub const TIME_DELAY_CONFIDENCE: f64 = 0.75;

/// Delay charged for diverting a train onto a station (multi-track) segment
pub const DIVERSION_DELAY_MINUTES: f64 = 1.0;
pub const DIVERSION_CONFIDENCE: f64 = 0.85;

/// Each waiting train is held this long per other train in the group
pub const WAIT_PER_TRAIN_MINUTES: f64 = 8.0;
pub const WAIT_CONFIDENCE: f64 = 0.70;

/// Maximum number of entries kept in the event log
pub const EVENT_LOG_CAPACITY: usize = 1000;

/// Timestamp format used for event log entries
pub const EVENT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Reported by the API layer
pub const API_VERSION: &str = "2.0.0";
