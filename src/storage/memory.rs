//! In-process visit log
//!
//! Records live for the lifetime of the process. Without a capacity the log
//! grows without bound; with one it behaves as a ring buffer and evicts the
//! oldest visit on overflow.

use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::trace;

use crate::storage::VisitStore;
use crate::visitor::VisitRecord;

/// Mutex-guarded visit log
pub struct MemoryVisitLog {
    state: Mutex<LogState>,
    capacity: Option<NonZeroUsize>,
}

#[derive(Default)]
struct LogState {
    /// Oldest first
    records: VecDeque<VisitRecord>,
    /// Stamp of the most recent append
    last_stamp: Option<DateTime<Utc>>,
}

impl LogState {
    /// Never earlier than the previous stamp, even if the wall clock steps back
    fn next_stamp(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let stamp = match self.last_stamp {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }
}

impl MemoryVisitLog {
    /// Create an unbounded log
    pub fn new() -> Self {
        Self::with_capacity(None)
    }

    /// Create a log that keeps at most `capacity` visits when set
    pub fn with_capacity(capacity: Option<NonZeroUsize>) -> Self {
        Self {
            state: Mutex::new(LogState::default()),
            capacity,
        }
    }

    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.capacity
    }

    /// The clock is read only once the lock is held
    fn record_with_clock<F>(&self, ip: String, country: String, clock: F) -> VisitRecord
    where
        F: FnOnce() -> DateTime<Utc>,
    {
        let mut state = self.lock();
        let stamp = state.next_stamp(clock());

        let record = VisitRecord {
            ip,
            country,
            time: stamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        if let Some(capacity) = self.capacity {
            while state.records.len() >= capacity.get() {
                if let Some(evicted) = state.records.pop_front() {
                    trace!(ip = %evicted.ip, time = %evicted.time, "evicted oldest visit");
                }
            }
        }

        state.records.push_back(record.clone());
        record
    }

    // Every critical section leaves the state consistent, so a panic while
    // holding the lock cannot corrupt it.
    fn lock(&self) -> MutexGuard<'_, LogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryVisitLog {
    fn default() -> Self {
        Self::new()
    }
}

impl VisitStore for MemoryVisitLog {
    fn record(&self, ip: String, country: String) -> VisitRecord {
        self.record_with_clock(ip, country, Utc::now)
    }

    fn list_newest_first(&self) -> Vec<VisitRecord> {
        self.lock().records.iter().rev().cloned().collect()
    }

    fn len(&self) -> usize {
        self.lock().records.len()
    }
}
