use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::event_log::EventLog;
use crate::domain::events::GameEvent;
use crate::domain::ids::RoomId;
use crate::domain::session::GameSession;
use crate::domain::snapshot::GameSnapshot;
use crate::domain::state::Phase;
use crate::domain::transitions::IgnoreReason;
use crate::error::AppError;
use crate::protocol::commands::{translate, CommandSink, Intent};
use crate::protocol::frames::ServerFrame;

/// Work for a room task, tagged with the sender's sequence number.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone)]
pub enum Inbound {
    Event { seq: u64, event: GameEvent },
    Snapshot { seq: u64, snapshot: GameSnapshot },
}

impl Inbound {
    /// Frames that carry room state; hello and error frames yield `None`.
    pub fn from_frame(frame: ServerFrame) -> Option<Self> {
        match frame {
            ServerFrame::Event { seq, event } => Some(Inbound::Event { seq, event }),
            ServerFrame::Snapshot { seq, snapshot } => Some(Inbound::Snapshot { seq, snapshot }),
            ServerFrame::Hello { .. } | ServerFrame::Error { .. } => None,
        }
    }

    pub fn seq(&self) -> u64 {
        match self {
            Inbound::Event { seq, .. } | Inbound::Snapshot { seq, .. } => *seq,
        }
    }
}

pub struct RoomHandle {
    room_id: RoomId,
    tx: mpsc::Sender<Inbound>,
    phase_rx: watch::Receiver<Arc<Phase>>,
    log: EventLog,
    sink: Arc<dyn CommandSink>,
    task: JoinHandle<()>,
}

impl std::fmt::Debug for RoomHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomHandle")
            .field("room_id", &self.room_id)
            .field("log_len", &self.log.len())
            .finish()
    }
}

/// Start the task that owns `session`. Inbound work is applied strictly in
/// arrival order; each resulting phase is published to watchers. `last_seq`
/// is the sequence number already reflected in `session`, if any.
pub fn spawn_room(
    session: GameSession,
    last_seq: Option<u64>,
    buffer: usize,
    sink: Arc<dyn CommandSink>,
) -> RoomHandle {
    let room_id = session.phase().context().room_id.clone();
    let (tx, rx) = mpsc::channel(buffer.max(1));
    let (phase_tx, phase_rx) = watch::channel(session.phase());
    let log = session.log().clone();

    info!(room_id = %room_id, phase = session.phase().kind().as_str(), "room opened");
    let task = tokio::spawn(run_room(session, last_seq, rx, phase_tx));

    RoomHandle {
        room_id,
        tx,
        phase_rx,
        log,
        sink,
        task,
    }
}

async fn run_room(
    mut session: GameSession,
    mut last_seq: Option<u64>,
    mut rx: mpsc::Receiver<Inbound>,
    phase_tx: watch::Sender<Arc<Phase>>,
) {
    let room_id = session.phase().context().room_id.clone();

    while let Some(inbound) = rx.recv().await {
        let seq = inbound.seq();
        let stale = last_seq.is_some_and(|last| seq <= last);

        match inbound {
            Inbound::Event { event, .. } if stale => {
                session.skip(event, IgnoreReason::Duplicate);
                continue;
            }
            Inbound::Snapshot { .. } if stale => {
                debug!(room_id = %room_id, seq, "stale snapshot dropped");
                continue;
            }
            Inbound::Event { event, .. } => {
                session.apply(event);
            }
            Inbound::Snapshot { snapshot, .. } => {
                if let Err(err) = session.restore(&snapshot) {
                    error!(room_id = %room_id, seq, error = %err, "snapshot rejected; keeping current phase");
                }
            }
        }
        last_seq = Some(seq);
        phase_tx.send_replace(session.phase());
    }

    info!(room_id = %room_id, log_len = session.log().len(), "room closed");
}

impl RoomHandle {
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Queue work for the room task.
    pub async fn deliver(&self, inbound: Inbound) -> Result<(), AppError> {
        deliver_to(&self.room_id, &self.tx, inbound).await
    }

    pub(crate) fn sender(&self) -> mpsc::Sender<Inbound> {
        self.tx.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Phase>> {
        self.phase_rx.clone()
    }

    /// Latest published phase.
    pub fn current(&self) -> Arc<Phase> {
        Arc::clone(&self.phase_rx.borrow())
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Send a player's intention outbound. The room's phase only changes
    /// once the resulting event is delivered back.
    pub async fn issue(&self, intent: Intent) -> Result<(), AppError> {
        self.sink.send(translate(&self.room_id, intent)).await
    }

    /// Stop accepting work, let the task drain what is queued, and wait
    /// for it to exit.
    pub async fn close(self) -> Result<(), AppError> {
        let RoomHandle {
            room_id, tx, task, ..
        } = self;
        drop(tx);
        task.await.map_err(|err| {
            warn!(room_id = %room_id, error = %err, "room task did not exit cleanly");
            AppError::transport(format!("Room task for {room_id} failed: {err}"))
        })
    }
}

pub(crate) async fn deliver_to(
    room_id: &RoomId,
    tx: &mpsc::Sender<Inbound>,
    inbound: Inbound,
) -> Result<(), AppError> {
    tx.send(inbound).await.map_err(|_| AppError::RoomClosed {
        room_id: room_id.clone(),
    })
}
