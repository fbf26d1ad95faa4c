//! Conflict detection and resolution for an in-memory railway network.
//!
//! The [`scheduler::Scheduler`] owns the network and drives
//! detect → resolve → apply cycles; [`api::SchedulerApi`] wraps it for
//! JSON request/response callers.

pub mod api;
pub mod config;
pub mod conflict;
pub mod constants;
pub mod error;
pub mod models;
pub mod network;
pub mod predictor;
pub mod resolver;
pub mod scheduler;

pub use api::SchedulerApi;
pub use config::SchedulerConfig;
pub use error::{Result, SchedulerError};
pub use scheduler::Scheduler;
