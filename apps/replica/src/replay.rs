//! Offline replay of a recorded frame stream through the room runtime.

use std::io::BufRead;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::config::ReplicaConfig;
use crate::domain::event_log::LogEntry;
use crate::domain::ids::{PlayerId, RoomId};
use crate::domain::rules::{DeckVariant, GameRule};
use crate::domain::snapshot::{to_snapshot, GameSnapshot};
use crate::domain::state::SessionContext;
use crate::error::AppError;
use crate::protocol::commands::ChannelSink;
use crate::protocol::frames::{decode_frame, require_protocol, ServerFrame};
use crate::rooms::hub::RoomRegistry;

/// Who is watching, and the room to bootstrap when the stream does not open
/// with a snapshot.
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub viewer: PlayerId,
    pub room_id: RoomId,
    pub owner: PlayerId,
    pub room_size: u32,
    pub rounds: u32,
    pub deck: DeckVariant,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub frames: usize,
    pub skipped_lines: usize,
    pub snapshot: GameSnapshot,
    pub log: Vec<LogEntry>,
}

fn read_frames(input: impl BufRead) -> Result<(Vec<ServerFrame>, usize), AppError> {
    let mut frames = Vec::new();
    let mut skipped = 0;
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match decode_frame(&line) {
            Ok(frame) => {
                require_protocol(&frame)?;
                frames.push(frame);
            }
            Err(err) if err.is_version_mismatch() => {
                error!(line = index + 1, error = %err, "protocol mismatch in frame stream");
                return Err(err.into());
            }
            Err(err) => {
                warn!(line = index + 1, error = %err, "skipping undecodable frame");
                skipped += 1;
            }
        }
    }
    Ok((frames, skipped))
}

/// Replay `input` (one JSON frame per line) and report the final phase and
/// the room's event log.
pub async fn replay(
    input: impl BufRead,
    options: &ReplayOptions,
    config: ReplicaConfig,
) -> Result<ReplayReport, AppError> {
    let (frames, skipped_lines) = read_frames(input)?;
    let (sink, _outbound) = ChannelSink::channel(1);
    let registry = RoomRegistry::new(config, Arc::new(sink));

    let mut frames = frames.into_iter().peekable();
    let opening = match frames.peek() {
        Some(ServerFrame::Snapshot { seq, snapshot }) => {
            debug!(room_id = %snapshot.room_id, seq, "bootstrapping from opening snapshot");
            Some((*seq, snapshot.clone()))
        }
        _ => None,
    };
    let room_id = match &opening {
        Some((_, snapshot)) => snapshot.room_id.clone(),
        None => options.room_id.clone(),
    };
    let watcher = match opening {
        Some((seq, snapshot)) => {
            frames.next();
            registry.open_from_snapshot(&options.viewer, seq, &snapshot)?
        }
        None => {
            let rule = GameRule::new(options.room_size, options.rounds, options.deck)?;
            registry.open(SessionContext::new(
                room_id.clone(),
                options.viewer.clone(),
                options.owner.clone(),
                rule,
            ))?
        }
    };

    let mut count = 0;
    for frame in frames {
        registry.deliver_frame(&room_id, frame).await?;
        count += 1;
    }

    let log = registry
        .log(&room_id)
        .ok_or_else(|| AppError::RoomNotFound {
            room_id: room_id.clone(),
        })?;
    registry.close(&room_id).await?;

    let phase = Arc::clone(&watcher.borrow());
    Ok(ReplayReport {
        frames: count,
        skipped_lines,
        snapshot: to_snapshot(&phase),
        log: log.entries(),
    })
}
