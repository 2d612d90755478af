//! Snapshot wire model and the phase → snapshot direction.
//!
//! A snapshot is cut for one viewer: only that viewer's hand, drawn cards
//! and deck preview are listed by id. Everyone else appears as counts.

use serde::{Deserialize, Serialize};

use crate::domain::ids::{PlayerId, RoomId};
use crate::domain::play_choice::PlayChoice;
use crate::domain::rules::GameRule;
use crate::domain::scoring::ScoreBoard;
use crate::domain::state::{
    BiddingPlayer, FieldEntry, Phase, PhaseKind, TrickPhase, TrickingPlayer,
};
use crate::domain::{Card, CardColor, CardId};

/// Top-level snapshot: room header plus phase-specific data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub room_id: RoomId,
    pub room_owner_id: PlayerId,
    pub rule: GameRule,
    /// Full catalog for the room's deck variant
    pub deck: Vec<Card>,
    pub state: PhaseSnapshot,
}

/// Adjacently tagged union; tags match `PhaseKind::as_str`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "data", rename_all = "snake_case")]
pub enum PhaseSnapshot {
    Lobby(LobbySnapshot),
    Bidding(BiddingSnapshot),
    Trick(TrickSnapshot),
    NextTrickLeadChanging(LeadChangeSnapshot),
    HandChangeWaiting(HandChangeSnapshot),
    FuturePredicateWaiting(FuturePredicateSnapshot),
    BidDeclareChangeWaiting(BidChangeSnapshot),
    Finished(FinishedSnapshot),
    Ended,
}

impl PhaseSnapshot {
    pub fn kind(&self) -> PhaseKind {
        match self {
            PhaseSnapshot::Lobby(_) => PhaseKind::Lobby,
            PhaseSnapshot::Bidding(_) => PhaseKind::Bidding,
            PhaseSnapshot::Trick(_) => PhaseKind::Trick,
            PhaseSnapshot::NextTrickLeadChanging(_) => PhaseKind::NextTrickLeadChanging,
            PhaseSnapshot::HandChangeWaiting(_) => PhaseKind::HandChangeWaiting,
            PhaseSnapshot::FuturePredicateWaiting(_) => PhaseKind::FuturePredicateWaiting,
            PhaseSnapshot::BidDeclareChangeWaiting(_) => PhaseKind::BidDeclareChangeWaiting,
            PhaseSnapshot::Finished(_) => PhaseKind::Finished,
            PhaseSnapshot::Ended => PhaseKind::Ended,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbySnapshot {
    pub player_ids: Vec<PlayerId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiddingPlayerSnapshot {
    pub player_id: PlayerId,
    pub bid: Option<u32>,
    pub cards: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiddingSnapshot {
    pub round: u32,
    pub dealer_id: PlayerId,
    pub deck: u32,
    pub players: Vec<BiddingPlayerSnapshot>,
    pub my_cards: Vec<CardId>,
    pub score_board: ScoreBoard,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickingPlayerSnapshot {
    pub player_id: PlayerId,
    pub declared_bid: u32,
    pub tricks_won: u32,
    pub cards: u32,
    pub bonus: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCardSnapshot {
    pub player_id: PlayerId,
    pub card_id: CardId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice: Option<PlayChoice>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickSnapshot {
    pub round: u32,
    pub trick: u32,
    pub lead_id: PlayerId,
    pub players: Vec<TrickingPlayerSnapshot>,
    pub my_cards: Vec<CardId>,
    pub deck: u32,
    pub stack: u32,
    pub must_follow: Option<CardColor>,
    pub field: Vec<FieldCardSnapshot>,
    pub score_board: ScoreBoard,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadChangeSnapshot {
    pub trick: TrickSnapshot,
    pub changing_player_id: PlayerId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandChangeSnapshot {
    pub trick: TrickSnapshot,
    pub changing_player_id: PlayerId,
    pub draw_cards: Option<Vec<CardId>>,
    pub draw_count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuturePredicateSnapshot {
    pub trick: TrickSnapshot,
    pub predicating_player_id: PlayerId,
    pub deck_cards: Option<Vec<CardId>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidChangeSnapshot {
    pub trick: TrickSnapshot,
    pub changing_player_id: PlayerId,
    pub min: u32,
    pub max: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishedSnapshot {
    pub player_ids: Vec<PlayerId>,
    pub winner_id: PlayerId,
    pub last_lead_id: PlayerId,
    pub score_board: ScoreBoard,
}

impl From<&BiddingPlayer> for BiddingPlayerSnapshot {
    fn from(p: &BiddingPlayer) -> Self {
        Self {
            player_id: p.player_id.clone(),
            bid: p.bid,
            cards: p.cards,
        }
    }
}

impl From<&TrickingPlayer> for TrickingPlayerSnapshot {
    fn from(p: &TrickingPlayer) -> Self {
        Self {
            player_id: p.player_id.clone(),
            declared_bid: p.declared_bid,
            tricks_won: p.tricks_won,
            cards: p.cards,
            bonus: p.bonus,
        }
    }
}

impl From<&FieldEntry> for FieldCardSnapshot {
    fn from(e: &FieldEntry) -> Self {
        Self {
            player_id: e.player_id.clone(),
            card_id: e.card_id.clone(),
            choice: e.choice,
        }
    }
}

impl From<&TrickPhase> for TrickSnapshot {
    fn from(t: &TrickPhase) -> Self {
        Self {
            round: t.round,
            trick: t.trick,
            lead_id: t.lead_id.clone(),
            players: t.players.iter().map(Into::into).collect(),
            my_cards: t.my_cards.clone(),
            deck: t.deck,
            stack: t.stack,
            must_follow: t.must_follow,
            field: t.field.iter().map(Into::into).collect(),
            score_board: t.score_board.clone(),
        }
    }
}

/// Snapshot of `phase` as its viewer sees it. Never panics.
pub fn to_snapshot(phase: &Phase) -> GameSnapshot {
    let ctx = phase.context();
    let state = match phase {
        Phase::Lobby(p) => PhaseSnapshot::Lobby(LobbySnapshot {
            player_ids: p.players.clone(),
        }),
        Phase::Bidding(p) => PhaseSnapshot::Bidding(BiddingSnapshot {
            round: p.round,
            dealer_id: p.dealer_id.clone(),
            deck: p.deck,
            players: p.players.iter().map(Into::into).collect(),
            my_cards: p.my_cards.clone(),
            score_board: p.score_board.clone(),
        }),
        Phase::Trick(t) => PhaseSnapshot::Trick(t.as_ref().into()),
        Phase::NextTrickLeadChanging(w) => PhaseSnapshot::NextTrickLeadChanging(LeadChangeSnapshot {
            trick: w.trick.as_ref().into(),
            changing_player_id: w.changing_player_id.clone(),
        }),
        Phase::HandChangeWaiting(w) => PhaseSnapshot::HandChangeWaiting(HandChangeSnapshot {
            trick: w.trick.as_ref().into(),
            changing_player_id: w.changing_player_id.clone(),
            draw_cards: w.draw_cards.clone(),
            draw_count: w.draw_count,
        }),
        Phase::FuturePredicateWaiting(w) => {
            PhaseSnapshot::FuturePredicateWaiting(FuturePredicateSnapshot {
                trick: w.trick.as_ref().into(),
                predicating_player_id: w.predicating_player_id.clone(),
                deck_cards: w.deck_cards.clone(),
            })
        }
        Phase::BidDeclareChangeWaiting(w) => {
            PhaseSnapshot::BidDeclareChangeWaiting(BidChangeSnapshot {
                trick: w.trick.as_ref().into(),
                changing_player_id: w.changing_player_id.clone(),
                min: w.min,
                max: w.max,
            })
        }
        Phase::Finished(p) => PhaseSnapshot::Finished(FinishedSnapshot {
            player_ids: p.players.clone(),
            winner_id: p.winner_id.clone(),
            last_lead_id: p.last_lead_id.clone(),
            score_board: p.score_board.clone(),
        }),
        Phase::Ended(_) => PhaseSnapshot::Ended,
    };
    GameSnapshot {
        room_id: ctx.room_id.clone(),
        room_owner_id: ctx.room_owner.clone(),
        rule: ctx.rule,
        deck: ctx.catalog.cards().to_vec(),
        state,
    }
}
