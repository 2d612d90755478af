//! Per-session, append-only record of every event the session received.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::domain::events::{EventKind, GameEvent};
use crate::domain::state::PhaseKind;
use crate::domain::transitions::Disposition;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Position in the log, starting at 0
    pub seq: u64,
    /// Phase the event was applied to
    pub phase: PhaseKind,
    pub kind: EventKind,
    pub event: GameEvent,
    pub disposition: Disposition,
}

/// Shared handle to a session's log. Clones observe the same entries.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its sequence number.
    pub fn record(&self, phase: PhaseKind, event: GameEvent, disposition: Disposition) -> u64 {
        let mut entries = self.entries.lock();
        let seq = entries.len() as u64;
        entries.push(LogEntry {
            seq,
            phase,
            kind: event.kind(),
            event,
            disposition,
        });
        seq
    }

    /// Copy of all entries in arrival order.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn last(&self) -> Option<LogEntry> {
        self.entries.lock().last().cloned()
    }

    /// True when both handles point at the same underlying log.
    pub fn same_log(&self, other: &EventLog) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}
