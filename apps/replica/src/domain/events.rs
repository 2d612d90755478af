//! Domain events produced by the authoritative replica.
//!
//! Every replica applies the same ordered stream; payloads that only one
//! viewer may see (drawn cards, deck preview, own hand) arrive populated for
//! that viewer and empty for everyone else.

use serde::{Deserialize, Serialize};

use super::cards_types::CardId;
use super::ids::PlayerId;
use super::play_choice::PlayChoice;
use super::scoring::{RoundScores, ScoreBoard};

pub const DEFAULT_HAND_CHANGE_DRAWS: u32 = 2;

/// Cards a hand change draws: the announced count, else the number of cards
/// listed, else the default.
pub fn hand_change_draws(draw_cards: &[CardId], draw_count: Option<u32>) -> u32 {
    match draw_count {
        Some(count) => count,
        None if draw_cards.is_empty() => DEFAULT_HAND_CHANGE_DRAWS,
        None => draw_cards.len() as u32,
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DealtHand {
    pub player_id: PlayerId,
    pub cards: u32,
}

/// Cards handed out at the start of a round.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    /// Cards left undealt
    pub deck: u32,
    pub hands: Vec<DealtHand>,
    /// The receiving viewer's own cards
    #[serde(default)]
    pub my_cards: Vec<CardId>,
}

impl Deal {
    pub fn count_for(&self, player_id: &PlayerId) -> Option<u32> {
        self.hands
            .iter()
            .find(|h| &h.player_id == player_id)
            .map(|h| h.cards)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BidPlayer {
    pub player_id: PlayerId,
    pub bid: u32,
    pub cards: u32,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    KeepAlive,
    ConnectionEstablished {
        player_id: PlayerId,
    },
    ConnectionClosed {
        player_id: PlayerId,
    },
    PlayerJoined {
        player_id: PlayerId,
    },
    PlayerLeft {
        player_id: PlayerId,
    },
    GameStarted {
        deal: Deal,
    },
    BidDeclared {
        player_id: PlayerId,
        bid: u32,
    },
    TrickStarted {
        deck: u32,
        trick: u32,
        players: Vec<BidPlayer>,
    },
    CardPlayed {
        player_id: PlayerId,
        card_id: CardId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        choice: Option<PlayChoice>,
    },
    TrickWon {
        winner_id: PlayerId,
        card_id: CardId,
        bonus: i32,
    },
    AllRanAway {
        winner_id: PlayerId,
        card_id: CardId,
    },
    KrakenAppeared {
        must_have_won: PlayerId,
    },
    NextTrickLeadChangeAvailable {
        player_id: PlayerId,
    },
    HandChangeAvailable {
        player_id: PlayerId,
        #[serde(default)]
        draw_cards: Vec<CardId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        draw_count: Option<u32>,
    },
    FuturePredicateAvailable {
        player_id: PlayerId,
        #[serde(default)]
        deck_cards: Vec<CardId>,
    },
    BidChangeAvailable {
        player_id: PlayerId,
        min: u32,
        max: u32,
    },
    NextTrickLeadChanged {
        player_id: PlayerId,
        new_lead_id: PlayerId,
    },
    HandChanged {
        player_id: PlayerId,
        returned_cards: Vec<CardId>,
    },
    FuturePredicated {
        player_id: PlayerId,
    },
    BidChanged {
        player_id: PlayerId,
        bid: u32,
    },
    RoundFinished {
        scores: RoundScores,
    },
    RoundStarted {
        round: u32,
        dealer_id: PlayerId,
        deal: Deal,
    },
    GameFinished {
        winner_id: PlayerId,
        score_board: ScoreBoard,
    },
    GameEnded,
    CommandRejected {
        player_id: PlayerId,
        reason: String,
    },
}

/// Fieldless discriminant used as the key of log entries.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    KeepAlive,
    ConnectionEstablished,
    ConnectionClosed,
    PlayerJoined,
    PlayerLeft,
    GameStarted,
    BidDeclared,
    TrickStarted,
    CardPlayed,
    TrickWon,
    AllRanAway,
    KrakenAppeared,
    NextTrickLeadChangeAvailable,
    HandChangeAvailable,
    FuturePredicateAvailable,
    BidChangeAvailable,
    NextTrickLeadChanged,
    HandChanged,
    FuturePredicated,
    BidChanged,
    RoundFinished,
    RoundStarted,
    GameFinished,
    GameEnded,
    CommandRejected,
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::KeepAlive => EventKind::KeepAlive,
            GameEvent::ConnectionEstablished { .. } => EventKind::ConnectionEstablished,
            GameEvent::ConnectionClosed { .. } => EventKind::ConnectionClosed,
            GameEvent::PlayerJoined { .. } => EventKind::PlayerJoined,
            GameEvent::PlayerLeft { .. } => EventKind::PlayerLeft,
            GameEvent::GameStarted { .. } => EventKind::GameStarted,
            GameEvent::BidDeclared { .. } => EventKind::BidDeclared,
            GameEvent::TrickStarted { .. } => EventKind::TrickStarted,
            GameEvent::CardPlayed { .. } => EventKind::CardPlayed,
            GameEvent::TrickWon { .. } => EventKind::TrickWon,
            GameEvent::AllRanAway { .. } => EventKind::AllRanAway,
            GameEvent::KrakenAppeared { .. } => EventKind::KrakenAppeared,
            GameEvent::NextTrickLeadChangeAvailable { .. } => {
                EventKind::NextTrickLeadChangeAvailable
            }
            GameEvent::HandChangeAvailable { .. } => EventKind::HandChangeAvailable,
            GameEvent::FuturePredicateAvailable { .. } => EventKind::FuturePredicateAvailable,
            GameEvent::BidChangeAvailable { .. } => EventKind::BidChangeAvailable,
            GameEvent::NextTrickLeadChanged { .. } => EventKind::NextTrickLeadChanged,
            GameEvent::HandChanged { .. } => EventKind::HandChanged,
            GameEvent::FuturePredicated { .. } => EventKind::FuturePredicated,
            GameEvent::BidChanged { .. } => EventKind::BidChanged,
            GameEvent::RoundFinished { .. } => EventKind::RoundFinished,
            GameEvent::RoundStarted { .. } => EventKind::RoundStarted,
            GameEvent::GameFinished { .. } => EventKind::GameFinished,
            GameEvent::GameEnded => EventKind::GameEnded,
            GameEvent::CommandRejected { .. } => EventKind::CommandRejected,
        }
    }

    /// Events that carry no game-state change for any phase.
    pub fn is_ambient(&self) -> bool {
        matches!(
            self.kind(),
            EventKind::KeepAlive
                | EventKind::ConnectionEstablished
                | EventKind::ConnectionClosed
                | EventKind::CommandRejected
        )
    }
}
