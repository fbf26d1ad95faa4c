//! The scheduler drives detect → resolve → apply cycles over the network store
//! and keeps a bounded event history. It is the only writer of network state.

mod event_log;

pub use event_log::EventLog;

use crate::config::SchedulerConfig;
use crate::conflict;
use crate::error::{Result, SchedulerError};
use crate::models::{
    Conflict, ConflictType, ScheduleAdjustment, Station, StationId, Track, TrackId, Train, TrainId,
};
use crate::network::{ApplyReport, NetworkSnapshot, NetworkStore, NetworkView};
use crate::predictor::{LinearDelayModel, Predictor};
use crate::resolver::{self, ConflictResolver, Resolution};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkStatistics {
    pub total_trains: usize,
    pub delayed_trains: usize,
    pub active_conflicts: usize,
    /// Mean delay over delayed trains only
    pub average_delay_minutes: f64,
    /// 1.0 when no train is delayed, 0.0 when all are
    pub network_efficiency: f64,
}

/// Result of one `optimize_network` call
#[derive(Debug, Default)]
pub struct OptimizationOutcome {
    pub iterations: usize,
    pub initial_conflicts: usize,
    pub applied: Vec<ScheduleAdjustment>,
    pub remaining_conflicts: Vec<Conflict>,
    pub diagnostics: Vec<SchedulerError>,
}

impl OptimizationOutcome {
    #[must_use]
    pub fn total_delay_minutes(&self) -> f64 {
        self.applied.iter().map(|adj| adj.time_adjustment_minutes).sum()
    }
}

pub struct Scheduler {
    network: NetworkStore,
    events: EventLog,
    config: SchedulerConfig,
    resolver: Box<dyn ConflictResolver + Send + Sync>,
    predictor: Option<Box<dyn Predictor>>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl Scheduler {
    #[must_use]
    pub fn new(config: SchedulerConfig) -> Self {
        let mut events = EventLog::with_capacity(config.event_log_capacity);
        let resolver = config.resolver();
        events.record(format!(
            "Scheduler initialized with {} strategy, max {} iterations",
            resolver.name(),
            config.max_iterations
        ));
        Self {
            network: NetworkStore::new(),
            events,
            config,
            resolver,
            predictor: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Read-only access to the current network state
    #[must_use]
    pub fn network(&self) -> &NetworkStore {
        &self.network
    }

    pub fn initialize_network(&mut self, tracks: Vec<Track>, stations: Vec<Station>) {
        let (track_count, station_count) = (tracks.len(), stations.len());
        self.network.initialize_network(tracks, stations);
        self.events.record(format!(
            "Network initialized: {track_count} tracks, {station_count} stations"
        ));
    }

    /// Add a train, returning the train it replaced if the id was taken
    pub fn add_train(&mut self, train: Train) -> Option<Train> {
        let (id, track) = (train.id, train.current_track);
        let replaced = self.network.add_train(train);
        if replaced.is_some() {
            self.events.record(format!("Train {} replaced on track {}", id.0, track.0));
        } else {
            self.events.record(format!("Train {} added to track {}", id.0, track.0));
        }
        if self.network.track(track).is_none() {
            log::debug!("{id} references unregistered {track}");
        }
        replaced
    }

    pub fn remove_train(&mut self, id: TrainId) -> Result<Train> {
        let train = self.network.remove_train(id)?;
        self.events.record(format!("Train {} removed", id.0));
        Ok(train)
    }

    pub fn update_train_state(
        &mut self,
        id: TrainId,
        position_km: f64,
        velocity_kmh: f64,
        is_delayed: bool,
    ) -> Result<()> {
        self.network
            .update_train_state(id, position_km, velocity_kmh, is_delayed)
    }

    #[must_use]
    pub fn detect_conflicts(&self) -> Vec<Conflict> {
        conflict::detect_conflicts(&self.network)
    }

    #[must_use]
    pub fn are_trains_in_conflict(&self, a: TrainId, b: TrainId) -> bool {
        conflict::are_trains_in_conflict(&self.network, a, b)
    }

    pub fn predict_future_conflicts(&self, horizon_minutes: f64) -> Result<Vec<Conflict>> {
        conflict::predict_future_conflicts(&self.network, horizon_minutes)
    }

    pub fn find_alternative_route(&self, train: TrainId, destination: StationId) -> Result<Vec<TrackId>> {
        resolver::find_alternative_route(&self.network, train, destination)
    }

    /// Resolve with the loaded model when it is ready, otherwise (or when the
    /// model fails or proposes nothing) with the configured heuristic strategy.
    #[must_use]
    pub fn resolve_conflicts(&self, conflicts: &[Conflict]) -> Resolution {
        self.policy().resolve(&self.network, conflicts)
    }

    pub fn apply_adjustments(&mut self, adjustments: Vec<ScheduleAdjustment>) -> ApplyReport {
        let report = self.network.apply_adjustments(adjustments);
        for adj in &report.applied {
            record_applied(&mut self.events, adj);
        }
        report
    }

    /// Run detect → resolve → apply passes until no unhandled conflicts
    /// remain, a pass proposes nothing, the conflict count stops dropping by
    /// at least the convergence threshold, or `max_iterations` passes have run.
    pub fn optimize_network(&mut self) -> OptimizationOutcome {
        self.optimize_network_bounded(self.config.max_iterations)
    }

    pub fn optimize_network_bounded(&mut self, max_iterations: usize) -> OptimizationOutcome {
        let policy = ResolutionPolicy {
            resolver: self.resolver.as_ref(),
            predictor: self.predictor.as_deref(),
        };
        run_passes(
            &policy,
            &mut self.network,
            Some(&mut self.events),
            max_iterations,
            self.config.convergence_threshold,
        )
    }

    /// Same passes as `optimize_network_bounded`, run against a scratch copy
    /// of the network. Nothing is applied and no events are recorded.
    #[must_use]
    pub fn plan_optimization(&self, max_iterations: usize) -> OptimizationOutcome {
        let mut scratch = self.network.clone();
        run_passes(
            &self.policy(),
            &mut scratch,
            None,
            max_iterations,
            self.config.convergence_threshold,
        )
    }

    fn policy(&self) -> ResolutionPolicy<'_> {
        ResolutionPolicy {
            resolver: self.resolver.as_ref(),
            predictor: self.predictor.as_deref(),
        }
    }

    /// Load a model from `path`. Returns whether a model is now ready.
    pub fn load_model(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        self.events
            .record(format!("ML model loading from: {}", path.display()));
        match LinearDelayModel::load(path) {
            Ok(model) => {
                self.predictor = Some(Box::new(model));
                true
            }
            Err(err) => {
                log::warn!("{err}; continuing with heuristic resolution");
                self.predictor = None;
                false
            }
        }
    }

    pub fn set_predictor(&mut self, predictor: Box<dyn Predictor>) {
        self.predictor = Some(predictor);
    }

    #[must_use]
    pub fn is_model_ready(&self) -> bool {
        self.predictor.as_ref().is_some_and(|p| p.is_ready())
    }

    #[must_use]
    pub fn get_network_state(&self) -> NetworkSnapshot {
        self.network.snapshot()
    }

    pub fn get_train_info(&self, id: TrainId) -> Result<Train> {
        self.network.require_train(id).cloned()
    }

    #[must_use]
    pub fn get_statistics(&self) -> NetworkStatistics {
        let total_trains = self.network.train_count();
        let delayed: Vec<&Train> = self.network.trains().filter(|t| t.is_delayed).collect();
        let delayed_trains = delayed.len();

        #[allow(clippy::cast_precision_loss)]
        let average_delay_minutes = if delayed.is_empty() {
            0.0
        } else {
            delayed.iter().map(|t| t.delay_minutes).sum::<f64>() / delayed_trains as f64
        };

        #[allow(clippy::cast_precision_loss)]
        let network_efficiency = if total_trains == 0 {
            1.0
        } else {
            1.0 - delayed_trains as f64 / total_trains as f64
        };

        NetworkStatistics {
            total_trains,
            delayed_trains,
            active_conflicts: self.detect_conflicts().len(),
            average_delay_minutes,
            network_efficiency,
        }
    }

    #[must_use]
    pub fn get_event_log(&self, max_events: usize) -> Vec<String> {
        self.events.recent(max_events)
    }
}

struct ResolutionPolicy<'a> {
    resolver: &'a (dyn ConflictResolver + Send + Sync),
    predictor: Option<&'a dyn Predictor>,
}

impl ResolutionPolicy<'_> {
    fn resolve(&self, network: &NetworkStore, conflicts: &[Conflict]) -> Resolution {
        if conflicts.is_empty() {
            return Resolution::default();
        }

        if let Some(predictor) = self.predictor.filter(|p| p.is_ready()) {
            match predictor.predict(&network.snapshot(), conflicts) {
                Ok(adjustments) if !adjustments.is_empty() => {
                    log::debug!("Model proposed {} adjustments", adjustments.len());
                    return Resolution {
                        adjustments,
                        diagnostics: Vec::new(),
                    };
                }
                Ok(_) => log::warn!("Model proposed no adjustments, using {} heuristics", self.resolver.name()),
                Err(err) => log::warn!("Model prediction failed ({err}), using {} heuristics", self.resolver.name()),
            }
        }

        #[cfg(feature = "perf_timing")]
        let start = std::time::Instant::now();

        let resolution = self.resolver.resolve(conflicts, network);

        #[cfg(feature = "perf_timing")]
        log::debug!(
            "{} strategy produced {} adjustments in {:?}",
            self.resolver.name(),
            resolution.adjustments.len(),
            start.elapsed()
        );

        resolution
    }
}

fn record_applied(events: &mut EventLog, adj: &ScheduleAdjustment) {
    events.record(format!("Applied adjustment to train {}: {}", adj.train_id.0, adj.reason));
}

/// Identity of a conflict across passes
type ConflictKey = (TrainId, Option<TrainId>, TrackId, ConflictType);

fn conflict_key(conflict: &Conflict) -> ConflictKey {
    (conflict.train1_id, conflict.train2_id, conflict.track_id, conflict.conflict_type)
}

/// Each conflict is resolved at most once per run. A delay leaves positions
/// unchanged, so a delayed conflict is still detected on the next pass; only
/// conflicts that appear after earlier adjustments are resolved again.
fn run_passes(
    policy: &ResolutionPolicy<'_>,
    network: &mut NetworkStore,
    mut events: Option<&mut EventLog>,
    max_iterations: usize,
    convergence_threshold: f64,
) -> OptimizationOutcome {
    let mut conflicts = conflict::detect_conflicts(&*network);
    let mut outcome = OptimizationOutcome {
        initial_conflicts: conflicts.len(),
        ..OptimizationOutcome::default()
    };

    let mut handled: HashSet<ConflictKey> = HashSet::new();

    for pass in 1..=max_iterations.max(1) {
        let fresh: Vec<Conflict> = conflicts
            .iter()
            .filter(|conflict| !handled.contains(&conflict_key(conflict)))
            .cloned()
            .collect();
        if fresh.is_empty() {
            break;
        }
        if let Some(events) = events.as_deref_mut() {
            for conflict in &fresh {
                events.record(format!("Conflict detected: {}", conflict.format_message()));
            }
        }
        handled.extend(fresh.iter().map(conflict_key));

        let resolution = policy.resolve(network, &fresh);
        outcome.diagnostics.extend(resolution.diagnostics);
        if resolution.adjustments.is_empty() {
            if let Some(events) = events.as_deref_mut() {
                events.record(format!(
                    "Network optimization: no adjustments for {} conflicts",
                    fresh.len()
                ));
            }
            break;
        }

        let report = network.apply_adjustments(resolution.adjustments);
        if let Some(events) = events.as_deref_mut() {
            for adj in &report.applied {
                record_applied(events, adj);
            }
            events.record(format!("Network optimization: resolved {} conflicts", fresh.len()));
        }
        outcome.iterations = pass;
        outcome.applied.extend(report.applied);
        outcome.diagnostics.extend(report.skipped);

        let remaining = conflict::detect_conflicts(&*network);
        #[allow(clippy::cast_precision_loss)]
        let improvement = (conflicts.len() as f64 - remaining.len() as f64) / conflicts.len() as f64;
        conflicts = remaining;
        if improvement < convergence_threshold {
            log::debug!("Optimization converged after {pass} passes (improvement {improvement:.3})");
            break;
        }
    }

    outcome.remaining_conflicts = conflicts;
    outcome
}
