use crate::constants::{EVENT_LOG_CAPACITY, PRIORITY_STATION_RADIUS_KM, SINGLE_TRACK_STATION_RADIUS_KM};
use crate::error::{Result, SchedulerError};
use crate::resolver::{ConflictResolver, Strategy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Resolve with the loaded model instead of the heuristic strategy
    pub use_ml_model: bool,
    pub model_path: Option<PathBuf>,
    pub strategy: Strategy,
    /// Upper bound on detect/resolve/apply passes per optimization
    pub max_iterations: usize,
    /// Stop iterating when the relative drop in conflicts is below this
    pub convergence_threshold: f64,
    pub verbose: bool,
    pub event_log_capacity: usize,
    pub priority_station_radius_km: f64,
    pub single_track_station_radius_km: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            use_ml_model: false,
            model_path: None,
            strategy: Strategy::default(),
            max_iterations: 100,
            convergence_threshold: 0.01,
            verbose: false,
            event_log_capacity: EVENT_LOG_CAPACITY,
            priority_station_radius_km: PRIORITY_STATION_RADIUS_KM,
            single_track_station_radius_km: SINGLE_TRACK_STATION_RADIUS_KM,
        }
    }
}

impl SchedulerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(SchedulerError::Config("max_iterations must be at least 1".to_string()));
        }
        if !(0.0..1.0).contains(&self.convergence_threshold) {
            return Err(SchedulerError::Config(format!(
                "convergence_threshold {} outside [0, 1)",
                self.convergence_threshold
            )));
        }
        if self.event_log_capacity == 0 {
            return Err(SchedulerError::Config("event_log_capacity must be at least 1".to_string()));
        }
        for (name, radius) in [
            ("priority_station_radius_km", self.priority_station_radius_km),
            ("single_track_station_radius_km", self.single_track_station_radius_km),
        ] {
            if !radius.is_finite() || radius < 0.0 {
                return Err(SchedulerError::Config(format!("{name} must be a non-negative distance")));
            }
        }
        if self.use_ml_model && self.model_path.is_none() {
            log::warn!("use_ml_model is set without a model_path; heuristics will be used");
        }
        Ok(())
    }

    /// Heuristic resolver selected by this configuration
    #[must_use]
    pub fn resolver(&self) -> Box<dyn ConflictResolver + Send + Sync> {
        self.strategy
            .resolver(self.priority_station_radius_km, self.single_track_station_radius_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.convergence_threshold, 0.01);
        assert_eq!(config.event_log_capacity, 1000);
        assert_eq!(config.strategy, Strategy::Priority);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SchedulerConfig::from_json(r#"{"strategy": "single_track", "max_iterations": 3}"#)
            .expect("valid config");
        assert_eq!(config.strategy, Strategy::SingleTrack);
        assert_eq!(config.max_iterations, 3);
        assert_eq!(config.priority_station_radius_km, 5.0);
        assert_eq!(config.resolver().name(), "single_track");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(SchedulerConfig::from_json(r#"{"max_iterations": 0}"#).is_err());
        assert!(SchedulerConfig::from_json(r#"{"convergence_threshold": 1.0}"#).is_err());
        assert!(SchedulerConfig::from_json(r#"{"event_log_capacity": 0}"#).is_err());
        assert!(SchedulerConfig::from_json(r#"{"priority_station_radius_km": -1.0}"#).is_err());
        assert!(SchedulerConfig::from_json("{not json").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = SchedulerConfig::from_file("/nonexistent/scheduler.json").expect_err("missing file");
        assert!(matches!(err, SchedulerError::Io(_)));
    }
}
