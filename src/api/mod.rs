//! Request/response facade over the scheduler.
//!
//! Requests carry the trains to evaluate. They are added to the scheduler for
//! the duration of the call and removed afterwards; any registered train they
//! displaced is put back. Malformed payloads never fail the call, they produce
//! a response with `success: false`.

mod types;

pub use types::{
    ConflictOutput, ConflictRequest, ConflictResponse, OptimizationRequest, OptimizationResult,
    ResolutionOutput, StatisticsResponse, TrainInput,
};

use crate::config::SchedulerConfig;
use crate::constants::API_VERSION;
use crate::error::SchedulerError;
use crate::models::{Conflict, Station, Track, Train};
use crate::scheduler::Scheduler;
use serde::Serialize;
use std::time::Instant;

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        serde_json::json!({ "success": false, "error_message": err.to_string() }).to_string()
    })
}

fn malformed(err: &serde_json::Error) -> String {
    SchedulerError::MalformedInput(err.to_string()).to_string()
}

#[derive(Default)]
pub struct SchedulerApi {
    scheduler: Scheduler,
    optimization_time_total_ms: f64,
    total_optimizations: usize,
}

impl SchedulerApi {
    #[must_use]
    pub fn new(config: SchedulerConfig) -> Self {
        let mut api = Self::default();
        api.initialize(config);
        api
    }

    /// Apply `config`, keeping the registered network. Returns false when the
    /// configuration is invalid or a requested model could not be loaded; the
    /// scheduler stays usable with heuristics in the latter case.
    pub fn initialize(&mut self, config: SchedulerConfig) -> bool {
        if let Err(err) = config.validate() {
            log::error!("Rejected scheduler configuration: {err}");
            return false;
        }

        let state = self.scheduler.get_network_state();
        let model_path = config.use_ml_model.then(|| config.model_path.clone()).flatten();
        let mut scheduler = Scheduler::new(config);
        scheduler.initialize_network(
            state.tracks.into_values().collect(),
            state.stations.into_values().collect(),
        );
        for train in state.trains.into_values() {
            scheduler.add_train(train);
        }
        self.scheduler = scheduler;

        match model_path {
            Some(path) => self.scheduler.load_model(path),
            None => true,
        }
    }

    pub fn set_network(&mut self, tracks: Vec<Track>, stations: Vec<Station>) -> bool {
        self.scheduler.initialize_network(tracks, stations);
        true
    }

    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    #[must_use]
    pub fn version() -> &'static str {
        API_VERSION
    }

    #[must_use]
    pub fn is_ml_ready(&self) -> bool {
        self.scheduler.is_model_ready()
    }

    pub fn detect_conflicts(&mut self, trains: Vec<Train>) -> Vec<Conflict> {
        self.with_trains(trains, |scheduler| scheduler.detect_conflicts())
    }

    /// Propose adjustments for `trains` without applying them
    pub fn optimize(&mut self, trains: Vec<Train>, max_iterations: Option<usize>) -> OptimizationResult {
        let start = Instant::now();
        let limit = max_iterations.unwrap_or(self.scheduler.config().max_iterations);

        let outcome = self.with_trains(trains, |scheduler| scheduler.plan_optimization(limit));
        for diagnostic in &outcome.diagnostics {
            log::debug!("Optimization diagnostic: {diagnostic}");
        }

        let optimization_time_ms = elapsed_ms(start);
        self.optimization_time_total_ms += optimization_time_ms;
        self.total_optimizations += 1;

        OptimizationResult {
            resolutions: outcome.applied.iter().map(ResolutionOutput::from).collect(),
            remaining_conflicts: outcome
                .remaining_conflicts
                .iter()
                .map(ConflictOutput::from)
                .collect(),
            total_delay_minutes: outcome.total_delay_minutes(),
            optimization_time_ms,
            success: true,
            error_message: None,
        }
    }

    #[must_use]
    pub fn get_statistics(&self) -> StatisticsResponse {
        #[allow(clippy::cast_precision_loss)]
        let avg_optimization_time_ms = if self.total_optimizations == 0 {
            0.0
        } else {
            self.optimization_time_total_ms / self.total_optimizations as f64
        };
        StatisticsResponse {
            version: API_VERSION.to_string(),
            ml_ready: self.is_ml_ready(),
            avg_optimization_time_ms,
            total_optimizations: self.total_optimizations,
        }
    }

    pub fn detect_conflicts_request(&mut self, request: ConflictRequest) -> ConflictResponse {
        let start = Instant::now();
        let trains = request.trains.into_iter().map(Train::from).collect();
        let conflicts: Vec<ConflictOutput> = self
            .detect_conflicts(trains)
            .iter()
            .map(ConflictOutput::from)
            .collect();
        ConflictResponse {
            total_conflicts: conflicts.len(),
            conflicts,
            processing_time_ms: elapsed_ms(start),
            success: true,
            error_message: None,
        }
    }

    pub fn optimize_request(&mut self, request: OptimizationRequest) -> OptimizationResult {
        if request.tracks.is_some() || request.stations.is_some() {
            self.set_network(
                request.tracks.unwrap_or_default(),
                request.stations.unwrap_or_default(),
            );
        }
        let trains = request.trains.into_iter().map(Train::from).collect();
        self.optimize(trains, request.max_iterations)
    }

    pub fn detect_conflicts_json(&mut self, input: &str) -> String {
        let response = match serde_json::from_str::<ConflictRequest>(input) {
            Ok(request) => self.detect_conflicts_request(request),
            Err(err) => ConflictResponse::failure(malformed(&err)),
        };
        to_json(&response)
    }

    pub fn optimize_json(&mut self, input: &str) -> String {
        let response = match serde_json::from_str::<OptimizationRequest>(input) {
            Ok(request) => self.optimize_request(request),
            Err(err) => OptimizationResult::failure(malformed(&err)),
        };
        to_json(&response)
    }

    #[must_use]
    pub fn get_statistics_json(&self) -> String {
        to_json(&self.get_statistics())
    }

    fn with_trains<T>(&mut self, trains: Vec<Train>, f: impl FnOnce(&Scheduler) -> T) -> T {
        let mut ids = Vec::with_capacity(trains.len());
        let mut displaced = Vec::new();
        for train in trains {
            let id = train.id;
            let replaced = self.scheduler.add_train(train);
            if ids.contains(&id) {
                continue;
            }
            ids.push(id);
            displaced.extend(replaced);
        }

        let result = f(&self.scheduler);

        for id in ids {
            if let Err(err) = self.scheduler.remove_train(id) {
                log::warn!("Failed to remove request train: {err}");
            }
        }
        for train in displaced {
            self.scheduler.add_train(train);
        }
        result
    }
}
