use crate::constants::{EVENT_LOG_CAPACITY, EVENT_TIMESTAMP_FORMAT};
use chrono::Local;
use std::collections::VecDeque;

/// Bounded, timestamped history of scheduler events. Oldest entries are
/// evicted first once the capacity is reached.
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<String>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(EVENT_LOG_CAPACITY)
    }
}

impl EventLog {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        log::info!("{message}");
        let timestamp = Local::now().format(EVENT_TIMESTAMP_FORMAT);
        self.entries.push_back(format!("[{timestamp}] {message}"));
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// The most recent `max` entries, oldest first
    #[must_use]
    pub fn recent(&self, max: usize) -> Vec<String> {
        let start = self.entries.len().saturating_sub(max);
        self.entries.iter().skip(start).cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_timestamped() {
        let mut log = EventLog::default();
        log.record("Train 1 added to track 2");
        let entry = &log.recent(1)[0];
        assert!(entry.starts_with('['));
        assert!(entry.ends_with("] Train 1 added to track 2"));
    }

    #[test]
    fn test_log_is_bounded() {
        let mut log = EventLog::default();
        for i in 0..1500 {
            log.record(format!("event {i}"));
        }
        assert_eq!(log.len(), 1000);

        let all = log.recent(usize::MAX);
        assert_eq!(all.len(), 1000);
        assert!(all[0].ends_with("event 500"));
        assert!(all[999].ends_with("event 1499"));
        for (offset, entry) in all.iter().enumerate() {
            assert!(entry.ends_with(&format!("event {}", 500 + offset)));
        }
    }

    #[test]
    fn test_recent_returns_tail_in_order() {
        let mut log = EventLog::with_capacity(10);
        for i in 0..5 {
            log.record(format!("event {i}"));
        }
        let tail = log.recent(2);
        assert_eq!(tail.len(), 2);
        assert!(tail[0].ends_with("event 3"));
        assert!(tail[1].ends_with("event 4"));
        assert_eq!(log.recent(50).len(), 5);
        assert!(log.recent(0).is_empty());
    }

    #[test]
    fn test_zero_capacity_keeps_one_entry() {
        let mut log = EventLog::with_capacity(0);
        log.record("first");
        log.record("second");
        assert_eq!(log.len(), 1);
        assert_eq!(log.capacity(), 1);
    }
}
