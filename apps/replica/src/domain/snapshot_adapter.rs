//! Snapshot → phase: bootstrap or resynchronise a replica mid-game.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::catalog::CardCatalog;
use crate::domain::ids::PlayerId;
use crate::domain::snapshot::{GameSnapshot, PhaseSnapshot, TrickSnapshot};
use crate::domain::state::{
    BidDeclareChangeWaitingPhase, BiddingPhase, BiddingPlayer, EndedPhase, FieldEntry,
    FinishedPhase, FuturePredicateWaitingPhase, HandChangeWaitingPhase, LobbyPhase,
    NextTrickLeadWaitingPhase, Phase, PhaseKind, SessionContext, TrickPhase, TrickingPlayer,
};
use crate::domain::CardId;
use crate::errors::domain::{DomainError, ProtocolKind};

/// Decode a snapshot document, reporting an unknown phase tag as a protocol
/// version mismatch rather than a generic decode failure.
pub fn decode_snapshot(json: &str) -> Result<GameSnapshot, DomainError> {
    let value: Value = serde_json::from_str(json).map_err(|e| {
        DomainError::protocol(ProtocolKind::MalformedSnapshot, format!("Snapshot is not JSON: {e}"))
    })?;
    decode_snapshot_value(value)
}

pub fn decode_snapshot_value(value: Value) -> Result<GameSnapshot, DomainError> {
    let tag = value
        .pointer("/state/phase")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            DomainError::protocol(ProtocolKind::MalformedSnapshot, "Snapshot has no phase tag")
        })?;
    if PhaseKind::from_tag(tag).is_none() {
        return Err(DomainError::protocol(
            ProtocolKind::UnknownPhase,
            format!("Unknown snapshot phase `{tag}`"),
        ));
    }
    serde_json::from_value(value).map_err(|e| {
        DomainError::protocol(ProtocolKind::MalformedSnapshot, format!("Snapshot decode: {e}"))
    })
}

fn malformed(detail: impl Into<String>) -> DomainError {
    DomainError::protocol(ProtocolKind::MalformedSnapshot, detail)
}

fn require_known_cards<'a>(
    catalog: &CardCatalog,
    what: &str,
    ids: impl IntoIterator<Item = &'a CardId>,
) -> Result<(), DomainError> {
    match ids.into_iter().find(|id| !catalog.contains(id)) {
        Some(id) => Err(malformed(format!("{what} references unknown card {id}"))),
        None => Ok(()),
    }
}

/// Build the phase `viewer` would hold after replaying the same history.
pub fn from_snapshot(viewer: &PlayerId, snapshot: &GameSnapshot) -> Result<Phase, DomainError> {
    let catalog = CardCatalog::from_cards(snapshot.deck.clone())
        .map_err(|e| malformed(format!("Snapshot deck: {e}")))?;
    let ctx = SessionContext {
        room_id: snapshot.room_id.clone(),
        viewer: viewer.clone(),
        room_owner: snapshot.room_owner_id.clone(),
        rule: snapshot.rule,
        catalog: Arc::new(catalog),
    };

    let phase = match &snapshot.state {
        PhaseSnapshot::Lobby(s) => Phase::Lobby(LobbyPhase {
            ctx,
            players: s.player_ids.clone(),
        }),
        PhaseSnapshot::Bidding(s) => {
            require_known_cards(&ctx.catalog, "hand", &s.my_cards)?;
            Phase::Bidding(BiddingPhase {
                round: s.round,
                dealer_id: s.dealer_id.clone(),
                deck: s.deck,
                players: s
                    .players
                    .iter()
                    .map(|p| BiddingPlayer {
                        player_id: p.player_id.clone(),
                        bid: p.bid,
                        cards: p.cards,
                    })
                    .collect(),
                my_cards: s.my_cards.clone(),
                score_board: s.score_board.clone(),
                ctx,
            })
        }
        PhaseSnapshot::Trick(s) => Phase::trick(trick_from(ctx, s)?),
        PhaseSnapshot::NextTrickLeadChanging(s) => {
            Phase::NextTrickLeadChanging(NextTrickLeadWaitingPhase {
                trick: Arc::new(trick_from(ctx, &s.trick)?),
                changing_player_id: s.changing_player_id.clone(),
            })
        }
        PhaseSnapshot::HandChangeWaiting(s) => {
            require_known_cards(&ctx.catalog, "hand change", s.draw_cards.iter().flatten())?;
            Phase::HandChangeWaiting(HandChangeWaitingPhase {
                trick: Arc::new(trick_from(ctx, &s.trick)?),
                changing_player_id: s.changing_player_id.clone(),
                draw_cards: s.draw_cards.clone(),
                draw_count: s.draw_count,
            })
        }
        PhaseSnapshot::FuturePredicateWaiting(s) => {
            require_known_cards(&ctx.catalog, "deck preview", s.deck_cards.iter().flatten())?;
            Phase::FuturePredicateWaiting(FuturePredicateWaitingPhase {
                trick: Arc::new(trick_from(ctx, &s.trick)?),
                predicating_player_id: s.predicating_player_id.clone(),
                deck_cards: s.deck_cards.clone(),
            })
        }
        PhaseSnapshot::BidDeclareChangeWaiting(s) => {
            Phase::BidDeclareChangeWaiting(BidDeclareChangeWaitingPhase {
                trick: Arc::new(trick_from(ctx, &s.trick)?),
                changing_player_id: s.changing_player_id.clone(),
                min: s.min,
                max: s.max,
            })
        }
        PhaseSnapshot::Finished(s) => Phase::Finished(FinishedPhase {
            ctx,
            players: s.player_ids.clone(),
            winner_id: s.winner_id.clone(),
            last_lead_id: s.last_lead_id.clone(),
            score_board: s.score_board.clone(),
        }),
        PhaseSnapshot::Ended => Phase::Ended(EndedPhase { ctx }),
    };
    Ok(phase)
}

fn trick_from(ctx: SessionContext, s: &TrickSnapshot) -> Result<TrickPhase, DomainError> {
    require_known_cards(&ctx.catalog, "hand", &s.my_cards)?;
    require_known_cards(&ctx.catalog, "field", s.field.iter().map(|f| &f.card_id))?;
    Ok(TrickPhase {
        round: s.round,
        lead_id: s.lead_id.clone(),
        players: s
            .players
            .iter()
            .map(|p| TrickingPlayer {
                player_id: p.player_id.clone(),
                declared_bid: p.declared_bid,
                tricks_won: p.tricks_won,
                cards: p.cards,
                bonus: p.bonus,
            })
            .collect(),
        my_cards: s.my_cards.clone(),
        deck: s.deck,
        stack: s.stack,
        must_follow: s.must_follow,
        field: s
            .field
            .iter()
            .map(|f| FieldEntry {
                player_id: f.player_id.clone(),
                card_id: f.card_id.clone(),
                choice: f.choice,
            })
            .collect(),
        trick: s.trick,
        score_board: s.score_board.clone(),
        ctx,
    })
}
