use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::cards_logic::{legal_cards, resolve_trick, PlayedCard, TrickOutcome};
use crate::domain::catalog::CardCatalog;
use crate::domain::events::{BidPlayer, Deal};
use crate::domain::ids::{PlayerId, RoomId};
use crate::domain::play_choice::PlayChoice;
use crate::domain::rules::{hand_size_for_round, GameRule};
use crate::domain::scoring::ScoreBoard;
use crate::domain::{Card, CardColor, CardId};

/// Facts fixed for the lifetime of a session, shared by every phase value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub room_id: RoomId,
    /// Player this replica renders for
    pub viewer: PlayerId,
    pub room_owner: PlayerId,
    pub rule: GameRule,
    pub catalog: Arc<CardCatalog>,
}

impl SessionContext {
    pub fn new(room_id: RoomId, viewer: PlayerId, room_owner: PlayerId, rule: GameRule) -> Self {
        let catalog = Arc::new(CardCatalog::for_variant(rule.deck_variant));
        Self {
            room_id,
            viewer,
            room_owner,
            rule,
            catalog,
        }
    }

    pub fn is_viewer(&self, player_id: &PlayerId) -> bool {
        &self.viewer == player_id
    }
}

/// Discriminant of [`Phase`]; the string form is the snapshot tag.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Lobby,
    Bidding,
    Trick,
    NextTrickLeadChanging,
    HandChangeWaiting,
    FuturePredicateWaiting,
    BidDeclareChangeWaiting,
    Finished,
    Ended,
}

impl PhaseKind {
    pub const ALL: [PhaseKind; 9] = [
        PhaseKind::Lobby,
        PhaseKind::Bidding,
        PhaseKind::Trick,
        PhaseKind::NextTrickLeadChanging,
        PhaseKind::HandChangeWaiting,
        PhaseKind::FuturePredicateWaiting,
        PhaseKind::BidDeclareChangeWaiting,
        PhaseKind::Finished,
        PhaseKind::Ended,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            PhaseKind::Lobby => "lobby",
            PhaseKind::Bidding => "bidding",
            PhaseKind::Trick => "trick",
            PhaseKind::NextTrickLeadChanging => "next_trick_lead_changing",
            PhaseKind::HandChangeWaiting => "hand_change_waiting",
            PhaseKind::FuturePredicateWaiting => "future_predicate_waiting",
            PhaseKind::BidDeclareChangeWaiting => "bid_declare_change_waiting",
            PhaseKind::Finished => "finished",
            PhaseKind::Ended => "ended",
        }
    }

    pub fn from_tag(tag: &str) -> Option<PhaseKind> {
        PhaseKind::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyPhase {
    pub ctx: SessionContext,
    /// Join order
    pub players: Vec<PlayerId>,
}

impl LobbyPhase {
    /// Fresh room: the owner is the only member.
    pub fn open(ctx: SessionContext) -> Self {
        let players = vec![ctx.room_owner.clone()];
        Self { ctx, players }
    }

    pub fn contains(&self, player_id: &PlayerId) -> bool {
        self.players.contains(player_id)
    }

    /// Owner deals the first round; if the owner left, the earliest joiner does.
    pub fn first_dealer(&self) -> Option<&PlayerId> {
        if self.contains(&self.ctx.room_owner) {
            Some(&self.ctx.room_owner)
        } else {
            self.players.first()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiddingPlayer {
    pub player_id: PlayerId,
    /// `None` until a bid is declared
    pub bid: Option<u32>,
    /// Cards in hand
    pub cards: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiddingPhase {
    pub ctx: SessionContext,
    pub round: u32,
    pub dealer_id: PlayerId,
    pub deck: u32,
    pub players: Vec<BiddingPlayer>,
    pub my_cards: Vec<CardId>,
    pub score_board: ScoreBoard,
}

impl BiddingPhase {
    /// Bidding after a deal; players keep `roster` order.
    pub fn dealt(
        ctx: SessionContext,
        round: u32,
        dealer_id: PlayerId,
        roster: &[PlayerId],
        deal: &Deal,
        score_board: ScoreBoard,
    ) -> Self {
        let players = roster
            .iter()
            .map(|id| BiddingPlayer {
                player_id: id.clone(),
                bid: None,
                cards: deal
                    .count_for(id)
                    .unwrap_or_else(|| hand_size_for_round(round)),
            })
            .collect();
        Self {
            ctx,
            round,
            dealer_id,
            deck: deal.deck,
            players,
            my_cards: deal.my_cards.clone(),
            score_board,
        }
    }

    pub fn player(&self, player_id: &PlayerId) -> Option<&BiddingPlayer> {
        self.players.iter().find(|p| &p.player_id == player_id)
    }

    pub fn with_bid(&self, player_id: &PlayerId, bid: u32) -> Self {
        let mut next = self.clone();
        for p in next.players.iter_mut().filter(|p| &p.player_id == player_id) {
            p.bid = Some(bid);
        }
        next
    }

    pub fn all_bid(&self) -> bool {
        self.players.iter().all(|p| p.bid.is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrickingPlayer {
    pub player_id: PlayerId,
    pub declared_bid: u32,
    pub tricks_won: u32,
    pub cards: u32,
    pub bonus: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    pub player_id: PlayerId,
    pub card_id: CardId,
    pub choice: Option<PlayChoice>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrickPhase {
    pub ctx: SessionContext,
    pub round: u32,
    /// Leads the current trick; after resolution, the trick's taker
    pub lead_id: PlayerId,
    pub players: Vec<TrickingPlayer>,
    pub my_cards: Vec<CardId>,
    pub deck: u32,
    /// Cards from resolved tricks this round
    pub stack: u32,
    pub must_follow: Option<CardColor>,
    pub field: Vec<FieldEntry>,
    /// 1-based
    pub trick: u32,
    pub score_board: ScoreBoard,
}

impl TrickPhase {
    pub fn from_bidding(bidding: &BiddingPhase, deck: u32, trick: u32, bids: &[BidPlayer]) -> Self {
        let players = bidding
            .players
            .iter()
            .map(|p| {
                let announced = bids.iter().find(|b| b.player_id == p.player_id);
                TrickingPlayer {
                    player_id: p.player_id.clone(),
                    declared_bid: announced.map(|b| b.bid).or(p.bid).unwrap_or(0),
                    tricks_won: 0,
                    cards: announced.map(|b| b.cards).unwrap_or(p.cards),
                    bonus: 0,
                }
            })
            .collect();
        Self {
            ctx: bidding.ctx.clone(),
            round: bidding.round,
            lead_id: bidding.dealer_id.clone(),
            players,
            my_cards: bidding.my_cards.clone(),
            deck,
            stack: 0,
            must_follow: None,
            field: Vec::new(),
            trick: trick.max(1),
            score_board: bidding.score_board.clone(),
        }
    }

    pub fn player(&self, player_id: &PlayerId) -> Option<&TrickingPlayer> {
        self.players.iter().find(|p| &p.player_id == player_id)
    }

    pub fn has_player(&self, player_id: &PlayerId) -> bool {
        self.player(player_id).is_some()
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.player_id.clone()).collect()
    }

    fn update_player(&mut self, player_id: &PlayerId, f: impl FnOnce(&mut TrickingPlayer)) {
        if let Some(p) = self.players.iter_mut().find(|p| &p.player_id == player_id) {
            f(p);
        }
    }

    /// Player expected to play next, or `None` once every seat has played.
    pub fn to_act(&self) -> Option<&PlayerId> {
        let n = self.players.len();
        if n == 0 || self.field.len() >= n {
            return None;
        }
        let lead = self
            .players
            .iter()
            .position(|p| p.player_id == self.lead_id)?;
        Some(&self.players[(lead + self.field.len()) % n].player_id)
    }

    pub fn my_hand(&self) -> Vec<Card> {
        self.my_cards
            .iter()
            .filter_map(|id| self.ctx.catalog.get(id).cloned())
            .collect()
    }

    /// Ids from the viewer's hand that may legally be played now.
    pub fn playable_cards(&self) -> Vec<CardId> {
        legal_cards(&self.my_hand(), self.must_follow)
    }

    pub fn played_cards(&self) -> Vec<PlayedCard> {
        self.field
            .iter()
            .filter_map(|entry| {
                self.ctx.catalog.kind_of(&entry.card_id).map(|kind| PlayedCard {
                    player_id: entry.player_id.clone(),
                    card_id: entry.card_id.clone(),
                    kind,
                    choice: entry.choice,
                })
            })
            .collect()
    }

    /// Local prediction of how the full field will resolve. The authoritative
    /// replica still announces the actual outcome.
    pub fn predicted_outcome(&self) -> Option<TrickOutcome> {
        if self.to_act().is_some() {
            return None;
        }
        resolve_trick(&self.played_cards())
    }

    pub fn with_card_played(
        &self,
        player_id: &PlayerId,
        card_id: &CardId,
        choice: Option<PlayChoice>,
    ) -> Self {
        let mut next = self.clone();
        if next.must_follow.is_none() {
            next.must_follow = self.ctx.catalog.kind_of(card_id).and_then(|k| k.color());
        }
        next.field.push(FieldEntry {
            player_id: player_id.clone(),
            card_id: card_id.clone(),
            choice,
        });
        next.update_player(player_id, |p| p.cards = p.cards.saturating_sub(1));
        if self.ctx.is_viewer(player_id) {
            next.my_cards.retain(|id| id != card_id);
        }
        next
    }

    /// Field goes to the stack and `taker` leads the next trick.
    pub fn resolved(&self, taker: &PlayerId, bonus: i32) -> Self {
        let mut next = self.clone();
        next.stack = next.stack.saturating_add(next.field.len() as u32);
        next.field.clear();
        next.must_follow = None;
        next.trick = next.trick.saturating_add(1);
        next.lead_id = taker.clone();
        next.update_player(taker, |p| {
            p.tricks_won = p.tricks_won.saturating_add(1);
            p.bonus = p.bonus.saturating_add(bonus);
        });
        next
    }

    /// Authoritative re-announcement of the trick number and per-player counts.
    pub fn resynced(&self, deck: u32, trick: u32, bids: &[BidPlayer]) -> Self {
        let mut next = self.clone();
        next.deck = deck;
        next.trick = trick.max(1);
        for b in bids {
            next.update_player(&b.player_id, |p| {
                p.declared_bid = b.bid;
                p.cards = b.cards;
            });
        }
        next
    }

    pub fn with_lead(&self, lead_id: &PlayerId) -> Self {
        let mut next = self.clone();
        next.lead_id = lead_id.clone();
        next
    }

    pub fn with_declared_bid(&self, player_id: &PlayerId, bid: u32) -> Self {
        let mut next = self.clone();
        next.update_player(player_id, |p| p.declared_bid = bid);
        next
    }

    /// Apply a completed hand exchange for `player_id`. `draws` are the cards
    /// the viewer received, empty for everyone else.
    pub fn with_hand_changed(
        &self,
        player_id: &PlayerId,
        draws: &[CardId],
        draw_count: u32,
        returned: &[CardId],
    ) -> Self {
        let mut next = self.clone();
        let returned_count = returned.len() as u32;
        next.update_player(player_id, |p| {
            p.cards = p.cards.saturating_add(draw_count).saturating_sub(returned_count);
        });
        next.deck = next.deck.saturating_add(returned_count).saturating_sub(draw_count);
        if self.ctx.is_viewer(player_id) {
            next.my_cards.extend(draws.iter().cloned());
            next.my_cards.retain(|id| !returned.contains(id));
        }
        next
    }

    pub fn with_round_scores(&self, score_board: ScoreBoard) -> Self {
        let mut next = self.clone();
        next.score_board = score_board;
        next
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextTrickLeadWaitingPhase {
    pub trick: Arc<TrickPhase>,
    pub changing_player_id: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandChangeWaitingPhase {
    pub trick: Arc<TrickPhase>,
    pub changing_player_id: PlayerId,
    /// Drawn cards, known only when the viewer is the one changing
    pub draw_cards: Option<Vec<CardId>>,
    pub draw_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuturePredicateWaitingPhase {
    pub trick: Arc<TrickPhase>,
    pub predicating_player_id: PlayerId,
    /// Undealt deck, known only when the viewer is the one predicting
    pub deck_cards: Option<Vec<CardId>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidDeclareChangeWaitingPhase {
    pub trick: Arc<TrickPhase>,
    pub changing_player_id: PlayerId,
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedPhase {
    pub ctx: SessionContext,
    pub players: Vec<PlayerId>,
    pub winner_id: PlayerId,
    /// Taker of the final trick
    pub last_lead_id: PlayerId,
    pub score_board: ScoreBoard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndedPhase {
    pub ctx: SessionContext,
}

/// The single live state of a session. Values are immutable once published;
/// wait variants share the trick they interrupted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Lobby(LobbyPhase),
    Bidding(BiddingPhase),
    Trick(Arc<TrickPhase>),
    NextTrickLeadChanging(NextTrickLeadWaitingPhase),
    HandChangeWaiting(HandChangeWaitingPhase),
    FuturePredicateWaiting(FuturePredicateWaitingPhase),
    BidDeclareChangeWaiting(BidDeclareChangeWaitingPhase),
    Finished(FinishedPhase),
    Ended(EndedPhase),
}

impl Phase {
    pub fn lobby(ctx: SessionContext) -> Self {
        Phase::Lobby(LobbyPhase::open(ctx))
    }

    pub fn trick(trick: TrickPhase) -> Self {
        Phase::Trick(Arc::new(trick))
    }

    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Lobby(_) => PhaseKind::Lobby,
            Phase::Bidding(_) => PhaseKind::Bidding,
            Phase::Trick(_) => PhaseKind::Trick,
            Phase::NextTrickLeadChanging(_) => PhaseKind::NextTrickLeadChanging,
            Phase::HandChangeWaiting(_) => PhaseKind::HandChangeWaiting,
            Phase::FuturePredicateWaiting(_) => PhaseKind::FuturePredicateWaiting,
            Phase::BidDeclareChangeWaiting(_) => PhaseKind::BidDeclareChangeWaiting,
            Phase::Finished(_) => PhaseKind::Finished,
            Phase::Ended(_) => PhaseKind::Ended,
        }
    }

    pub fn context(&self) -> &SessionContext {
        match self {
            Phase::Lobby(p) => &p.ctx,
            Phase::Bidding(p) => &p.ctx,
            Phase::Finished(p) => &p.ctx,
            Phase::Ended(p) => &p.ctx,
            Phase::Trick(t) => &t.ctx,
            Phase::NextTrickLeadChanging(w) => &w.trick.ctx,
            Phase::HandChangeWaiting(w) => &w.trick.ctx,
            Phase::FuturePredicateWaiting(w) => &w.trick.ctx,
            Phase::BidDeclareChangeWaiting(w) => &w.trick.ctx,
        }
    }

    /// The trick in play, including the one a wait phase interrupted.
    pub fn current_trick(&self) -> Option<&Arc<TrickPhase>> {
        match self {
            Phase::Trick(t) => Some(t),
            Phase::NextTrickLeadChanging(w) => Some(&w.trick),
            Phase::HandChangeWaiting(w) => Some(&w.trick),
            Phase::FuturePredicateWaiting(w) => Some(&w.trick),
            Phase::BidDeclareChangeWaiting(w) => Some(&w.trick),
            _ => None,
        }
    }

    pub fn score_board(&self) -> Option<&ScoreBoard> {
        match self {
            Phase::Bidding(p) => Some(&p.score_board),
            Phase::Finished(p) => Some(&p.score_board),
            other => other.current_trick().map(|t| &t.score_board),
        }
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        match self {
            Phase::Lobby(p) => p.players.clone(),
            Phase::Bidding(p) => p.players.iter().map(|b| b.player_id.clone()).collect(),
            Phase::Finished(p) => p.players.clone(),
            Phase::Ended(_) => Vec::new(),
            other => other
                .current_trick()
                .map(|t| t.player_ids())
                .unwrap_or_default(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Ended(_))
    }
}
