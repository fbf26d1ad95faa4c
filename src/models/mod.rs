mod adjustment;
mod conflict;
mod id;
mod station;
mod track;
mod train;

pub use adjustment::ScheduleAdjustment;
pub use conflict::{Conflict, ConflictType, Severity};
pub use id::{StationId, TrackId, TrainId};
pub use station::Station;
pub use track::Track;
pub use train::{Train, DEFAULT_PRIORITY, MAX_PRIORITY, MIN_PRIORITY};
