//! One replica's view of one game: the live phase plus its event log.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::event_log::EventLog;
use crate::domain::events::GameEvent;
use crate::domain::ids::PlayerId;
use crate::domain::snapshot::GameSnapshot;
use crate::domain::snapshot_adapter::from_snapshot;
use crate::domain::state::{Phase, SessionContext};
use crate::domain::transitions::{step, Disposition, IgnoreReason};
use crate::errors::domain::{DomainError, ProtocolKind};

/// Owns the current phase. Readers receive `Arc<Phase>` clones, which stay
/// valid and unchanged after the session moves on.
#[derive(Debug, Clone)]
pub struct GameSession {
    phase: Arc<Phase>,
    log: EventLog,
}

impl GameSession {
    /// New room as seen by `ctx.viewer`: a lobby holding the owner.
    pub fn bootstrap(ctx: SessionContext) -> Self {
        Self {
            phase: Arc::new(Phase::lobby(ctx)),
            log: EventLog::new(),
        }
    }

    pub fn from_snapshot(viewer: &PlayerId, snapshot: &GameSnapshot) -> Result<Self, DomainError> {
        Ok(Self {
            phase: Arc::new(from_snapshot(viewer, snapshot)?),
            log: EventLog::new(),
        })
    }

    pub fn phase(&self) -> Arc<Phase> {
        Arc::clone(&self.phase)
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Apply `event`, record it, and return the resulting phase.
    pub fn apply(&mut self, event: GameEvent) -> Arc<Phase> {
        let before = self.phase.kind();
        let outcome = step(&self.phase, &event);
        let ctx = self.phase.context();

        match &outcome.disposition {
            Disposition::Ignored {
                because: reason @ (IgnoreReason::UnknownPlayer(_) | IgnoreReason::UnknownCard(_)),
            } => warn!(
                room_id = %ctx.room_id,
                viewer = %ctx.viewer,
                phase = before.as_str(),
                kind = ?event.kind(),
                ?reason,
                "event references unknown id"
            ),
            Disposition::Ignored { because } => debug!(
                room_id = %ctx.room_id,
                phase = before.as_str(),
                kind = ?event.kind(),
                reason = ?because,
                "event ignored"
            ),
            Disposition::Applied | Disposition::Unchanged => debug!(
                room_id = %ctx.room_id,
                phase = before.as_str(),
                kind = ?event.kind(),
                "event applied"
            ),
        }

        self.log.record(before, event, outcome.disposition);
        if let Some(next) = outcome.next {
            self.phase = Arc::new(next);
        }
        self.phase()
    }

    /// Record an event that was received but deliberately not applied.
    pub fn skip(&mut self, event: GameEvent, reason: IgnoreReason) {
        debug!(
            room_id = %self.phase.context().room_id,
            kind = ?event.kind(),
            ?reason,
            "event skipped"
        );
        self.log
            .record(self.phase.kind(), event, Disposition::ignored(reason));
    }

    /// Replace the phase from a fresh snapshot of the same room; the log is
    /// kept.
    pub fn restore(&mut self, snapshot: &GameSnapshot) -> Result<Arc<Phase>, DomainError> {
        let ctx = self.phase.context();
        if snapshot.room_id != ctx.room_id {
            return Err(DomainError::protocol(
                ProtocolKind::MalformedSnapshot,
                format!(
                    "Snapshot for room {} delivered to room {}",
                    snapshot.room_id, ctx.room_id
                ),
            ));
        }
        let viewer = ctx.viewer.clone();
        let phase = from_snapshot(&viewer, snapshot)?;
        debug!(
            room_id = %snapshot.room_id,
            from = self.phase.kind().as_str(),
            to = phase.kind().as_str(),
            "session restored from snapshot"
        );
        self.phase = Arc::new(phase);
        Ok(self.phase())
    }
}
