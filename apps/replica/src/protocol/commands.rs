//! User intention → outbound command.
//!
//! Translation is stateless and performs no validation; the authoritative
//! side rejects anything illegal and the replica only changes when the
//! matching event comes back through `GameSession::apply`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::ids::{PlayerId, RoomId};
use crate::domain::play_choice::{CardPlay, PlayChoice};
use crate::domain::CardId;
use crate::error::AppError;

/// Something a player asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Join,
    /// Re-attach to a room this player already sits in
    Reconnect,
    Leave,
    Start,
    DeclareBid(u32),
    PlayCard(CardPlay),
    ChangeLead(PlayerId),
    ChangeHand(Vec<CardId>),
    ResolvePredicate,
    ChangeBid(u32),
    Replay,
    End,
    RequestSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandPayload {
    Join,
    NewConnection,
    Leave,
    GameStart,
    BidDeclare {
        bid: u32,
    },
    PlayCard {
        card_id: CardId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        choice: Option<PlayChoice>,
    },
    NextTrickLeadPlayerChange {
        new_lead_player_id: PlayerId,
    },
    PlayerHandChange {
        card_ids: Vec<CardId>,
    },
    FuturePredicateFinish,
    BidDeclareChange {
        bid: u32,
    },
    ReplayGame,
    EndGame,
    SnapshotRequest,
}

/// One outbound message, addressed to a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameCommand {
    pub room_id: RoomId,
    pub command: CommandPayload,
}

pub fn translate(room_id: &RoomId, intent: Intent) -> GameCommand {
    let command = match intent {
        Intent::Join => CommandPayload::Join,
        Intent::Reconnect => CommandPayload::NewConnection,
        Intent::Leave => CommandPayload::Leave,
        Intent::Start => CommandPayload::GameStart,
        Intent::DeclareBid(bid) => CommandPayload::BidDeclare { bid },
        Intent::PlayCard(CardPlay { card_id, choice }) => {
            CommandPayload::PlayCard { card_id, choice }
        }
        Intent::ChangeLead(new_lead_player_id) => {
            CommandPayload::NextTrickLeadPlayerChange { new_lead_player_id }
        }
        Intent::ChangeHand(card_ids) => CommandPayload::PlayerHandChange { card_ids },
        Intent::ResolvePredicate => CommandPayload::FuturePredicateFinish,
        Intent::ChangeBid(bid) => CommandPayload::BidDeclareChange { bid },
        Intent::Replay => CommandPayload::ReplayGame,
        Intent::End => CommandPayload::EndGame,
        Intent::RequestSnapshot => CommandPayload::SnapshotRequest,
    };
    GameCommand {
        room_id: room_id.clone(),
        command,
    }
}

/// Outbound seam to whatever transport carries commands.
#[async_trait]
pub trait CommandSink: Send + Sync {
    async fn send(&self, command: GameCommand) -> Result<(), AppError>;
}

/// Sink backed by a tokio channel; the receiving half belongs to the
/// transport.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<GameCommand>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<GameCommand>) -> Self {
        Self { tx }
    }

    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<GameCommand>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl CommandSink for ChannelSink {
    async fn send(&self, command: GameCommand) -> Result<(), AppError> {
        debug!(room_id = %command.room_id, command = ?command.command, "sending command");
        self.tx
            .send(command)
            .await
            .map_err(|_| AppError::transport("Command channel closed"))
    }
}
