use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::ReplicaConfig;
use crate::domain::event_log::EventLog;
use crate::domain::ids::{PlayerId, RoomId};
use crate::domain::session::GameSession;
use crate::domain::snapshot::GameSnapshot;
use crate::domain::state::{Phase, SessionContext};
use crate::error::AppError;
use crate::protocol::commands::{translate, CommandSink, Intent};
use crate::protocol::frames::ServerFrame;
use crate::rooms::room::{deliver_to, spawn_room, Inbound, RoomHandle};

/// Every room this process is replicating, keyed by room id. Rooms share
/// nothing but the outbound sink.
pub struct RoomRegistry {
    rooms: DashMap<RoomId, RoomHandle>,
    config: ReplicaConfig,
    sink: Arc<dyn CommandSink>,
}

impl RoomRegistry {
    pub fn new(config: ReplicaConfig, sink: Arc<dyn CommandSink>) -> Self {
        Self {
            rooms: DashMap::new(),
            config,
            sink,
        }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Open a fresh lobby for `ctx.room_id`.
    pub fn open(&self, ctx: SessionContext) -> Result<watch::Receiver<Arc<Phase>>, AppError> {
        self.host(GameSession::bootstrap(ctx), None)
    }

    /// Join a room already in progress from the snapshot cut at `seq`. Frames
    /// at or below `seq` are already folded into it.
    pub fn open_from_snapshot(
        &self,
        viewer: &PlayerId,
        seq: u64,
        snapshot: &GameSnapshot,
    ) -> Result<watch::Receiver<Arc<Phase>>, AppError> {
        self.host(GameSession::from_snapshot(viewer, snapshot)?, Some(seq))
    }

    fn host(
        &self,
        session: GameSession,
        last_seq: Option<u64>,
    ) -> Result<watch::Receiver<Arc<Phase>>, AppError> {
        let room_id = session.phase().context().room_id.clone();
        // len() takes every shard lock, so check capacity before entry().
        if self.rooms.len() >= self.config.max_rooms {
            warn!(room_id = %room_id, limit = self.config.max_rooms, "room capacity reached");
            return Err(AppError::RoomCapacity {
                limit: self.config.max_rooms,
            });
        }
        match self.rooms.entry(room_id.clone()) {
            Entry::Occupied(_) => Err(AppError::RoomAlreadyOpen { room_id }),
            Entry::Vacant(slot) => {
                let handle = spawn_room(
                    session,
                    last_seq,
                    self.config.room_buffer,
                    Arc::clone(&self.sink),
                );
                let rx = handle.subscribe();
                slot.insert(handle);
                Ok(rx)
            }
        }
    }

    pub async fn deliver(&self, room_id: &RoomId, inbound: Inbound) -> Result<(), AppError> {
        // Clone the sender so no map guard is held across the await.
        let tx = self
            .rooms
            .get(room_id)
            .map(|handle| handle.sender())
            .ok_or_else(|| AppError::RoomNotFound {
                room_id: room_id.clone(),
            })?;
        deliver_to(room_id, &tx, inbound).await
    }

    /// Route a decoded frame. Hello frames are dropped; error frames are
    /// logged.
    pub async fn deliver_frame(&self, room_id: &RoomId, frame: ServerFrame) -> Result<(), AppError> {
        if let ServerFrame::Error { code, message } = &frame {
            warn!(room_id = %room_id, code = %code, message = %message, "authoritative side reported an error");
        }
        match Inbound::from_frame(frame) {
            Some(inbound) => self.deliver(room_id, inbound).await,
            None => Ok(()),
        }
    }

    pub fn subscribe(&self, room_id: &RoomId) -> Result<watch::Receiver<Arc<Phase>>, AppError> {
        self.rooms
            .get(room_id)
            .map(|handle| handle.subscribe())
            .ok_or_else(|| AppError::RoomNotFound {
                room_id: room_id.clone(),
            })
    }

    /// Shared handle to the room's log; stays readable after the room closes.
    pub fn log(&self, room_id: &RoomId) -> Option<EventLog> {
        self.rooms.get(room_id).map(|handle| handle.log().clone())
    }

    pub fn current(&self, room_id: &RoomId) -> Option<Arc<Phase>> {
        self.rooms.get(room_id).map(|handle| handle.current())
    }

    pub async fn issue(&self, room_id: &RoomId, intent: Intent) -> Result<(), AppError> {
        if !self.contains(room_id) {
            return Err(AppError::RoomNotFound {
                room_id: room_id.clone(),
            });
        }
        let command = translate(room_id, intent);
        self.sink.send(command).await
    }

    /// Remove the room and wait for its task to finish; its phase is
    /// discarded.
    pub async fn close(&self, room_id: &RoomId) -> Result<(), AppError> {
        let (_, handle) = self
            .rooms
            .remove(room_id)
            .ok_or_else(|| AppError::RoomNotFound {
                room_id: room_id.clone(),
            })?;
        handle.close().await?;
        info!(room_id = %room_id, remaining = self.rooms.len(), "room removed");
        Ok(())
    }

    /// Close every room.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        let ids: Vec<RoomId> = self.rooms.iter().map(|entry| entry.key().clone()).collect();
        for room_id in ids {
            self.close(&room_id).await?;
        }
        Ok(())
    }
}
