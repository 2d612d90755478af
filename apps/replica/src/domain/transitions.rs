//! Phase transitions: one event applied to one phase value.
//!
//! `step` is pure. It never mutates its input and never fails; events that do
//! not fit the current phase come back as [`Disposition::Ignored`] with the
//! phase left as it was.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::events::{hand_change_draws, GameEvent};
use crate::domain::ids::PlayerId;
use crate::domain::scoring::ScoreBoard;
use crate::domain::state::{
    BidDeclareChangeWaitingPhase, BiddingPhase, EndedPhase, FinishedPhase,
    FuturePredicateWaitingPhase, HandChangeWaitingPhase, LobbyPhase, NextTrickLeadWaitingPhase,
    Phase, TrickPhase,
};
use crate::domain::CardId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "id", rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Event kind has no meaning in the current phase
    NotApplicable,
    UnknownPlayer(PlayerId),
    UnknownCard(CardId),
    AlreadyJoined(PlayerId),
    /// Sequence number already seen
    Duplicate,
    /// Session has ended
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Disposition {
    /// A new phase value was produced
    Applied,
    /// Valid event with nothing to change
    Unchanged,
    Ignored { because: IgnoreReason },
}

impl Disposition {
    pub fn ignored(because: IgnoreReason) -> Self {
        Disposition::Ignored { because }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Disposition::Applied)
    }
}

/// Result of applying one event. `next` is `None` when the phase stays as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub next: Option<Phase>,
    pub disposition: Disposition,
}

impl Step {
    fn to(phase: Phase) -> Self {
        Self {
            next: Some(phase),
            disposition: Disposition::Applied,
        }
    }

    fn unchanged() -> Self {
        Self {
            next: None,
            disposition: Disposition::Unchanged,
        }
    }

    fn ignore(because: IgnoreReason) -> Self {
        Self {
            next: None,
            disposition: Disposition::ignored(because),
        }
    }
}

impl Phase {
    /// Phase after `event`; the same value when the event changes nothing.
    pub fn apply(&self, event: &GameEvent) -> Phase {
        step(self, event).next.unwrap_or_else(|| self.clone())
    }
}

pub fn step(phase: &Phase, event: &GameEvent) -> Step {
    if phase.is_terminal() {
        return Step::ignore(IgnoreReason::Terminal);
    }
    if event.is_ambient() {
        return Step::unchanged();
    }
    match phase {
        Phase::Lobby(lobby) => lobby_step(lobby, event),
        Phase::Bidding(bidding) => bidding_step(bidding, event),
        Phase::Trick(trick) => trick_step(trick, event),
        Phase::NextTrickLeadChanging(wait) => lead_change_step(wait, event),
        Phase::HandChangeWaiting(wait) => hand_change_step(wait, event),
        Phase::FuturePredicateWaiting(wait) => predicate_step(wait, event),
        Phase::BidDeclareChangeWaiting(wait) => bid_change_step(wait, event),
        Phase::Finished(finished) => finished_step(finished, event),
        Phase::Ended(_) => Step::ignore(IgnoreReason::Terminal),
    }
}

fn lobby_step(lobby: &LobbyPhase, event: &GameEvent) -> Step {
    match event {
        GameEvent::PlayerJoined { player_id } => {
            if lobby.contains(player_id) {
                return Step::ignore(IgnoreReason::AlreadyJoined(player_id.clone()));
            }
            let mut next = lobby.clone();
            next.players.push(player_id.clone());
            Step::to(Phase::Lobby(next))
        }
        GameEvent::PlayerLeft { player_id } => {
            if !lobby.contains(player_id) {
                return Step::ignore(IgnoreReason::UnknownPlayer(player_id.clone()));
            }
            let mut next = lobby.clone();
            next.players.retain(|id| id != player_id);
            Step::to(Phase::Lobby(next))
        }
        GameEvent::GameStarted { deal } => match lobby.first_dealer() {
            Some(dealer) => Step::to(Phase::Bidding(BiddingPhase::dealt(
                lobby.ctx.clone(),
                1,
                dealer.clone(),
                &lobby.players,
                deal,
                ScoreBoard::new(),
            ))),
            None => Step::ignore(IgnoreReason::NotApplicable),
        },
        _ => Step::ignore(IgnoreReason::NotApplicable),
    }
}

fn bidding_step(bidding: &BiddingPhase, event: &GameEvent) -> Step {
    match event {
        GameEvent::BidDeclared { player_id, bid } => {
            if bidding.player(player_id).is_none() {
                return Step::ignore(IgnoreReason::UnknownPlayer(player_id.clone()));
            }
            Step::to(Phase::Bidding(bidding.with_bid(player_id, *bid)))
        }
        GameEvent::TrickStarted {
            deck,
            trick,
            players,
        } => Step::to(Phase::trick(TrickPhase::from_bidding(
            bidding, *deck, *trick, players,
        ))),
        _ => Step::ignore(IgnoreReason::NotApplicable),
    }
}

fn unknown_player(trick: &TrickPhase, player_id: &PlayerId) -> Option<Step> {
    (!trick.has_player(player_id)).then(|| Step::ignore(IgnoreReason::UnknownPlayer(player_id.clone())))
}

fn unknown_card<'a>(trick: &TrickPhase, ids: impl IntoIterator<Item = &'a CardId>) -> Option<Step> {
    ids.into_iter()
        .find(|id| !trick.ctx.catalog.contains(id))
        .map(|id| Step::ignore(IgnoreReason::UnknownCard(id.clone())))
}

fn trick_step(trick: &Arc<TrickPhase>, event: &GameEvent) -> Step {
    match event {
        GameEvent::CardPlayed {
            player_id,
            card_id,
            choice,
        } => unknown_player(trick, player_id)
            .or_else(|| unknown_card(trick, [card_id]))
            .unwrap_or_else(|| {
                Step::to(Phase::trick(trick.with_card_played(player_id, card_id, *choice)))
            }),
        GameEvent::TrickWon {
            winner_id, bonus, ..
        } => unknown_player(trick, winner_id)
            .unwrap_or_else(|| Step::to(Phase::trick(trick.resolved(winner_id, *bonus)))),
        GameEvent::AllRanAway { winner_id, .. } => unknown_player(trick, winner_id)
            .unwrap_or_else(|| Step::to(Phase::trick(trick.resolved(winner_id, 0)))),
        GameEvent::KrakenAppeared { must_have_won } => unknown_player(trick, must_have_won)
            .unwrap_or_else(|| Step::to(Phase::trick(trick.resolved(must_have_won, 0)))),
        GameEvent::TrickStarted {
            deck,
            trick: number,
            players,
        } => Step::to(Phase::trick(trick.resynced(*deck, *number, players))),
        GameEvent::NextTrickLeadChangeAvailable { player_id } => unknown_player(trick, player_id)
            .unwrap_or_else(|| {
                Step::to(Phase::NextTrickLeadChanging(NextTrickLeadWaitingPhase {
                    trick: Arc::clone(trick),
                    changing_player_id: player_id.clone(),
                }))
            }),
        GameEvent::HandChangeAvailable {
            player_id,
            draw_cards,
            draw_count,
        } => {
            let for_viewer = trick.ctx.is_viewer(player_id);
            let visible: &[CardId] = if for_viewer { draw_cards } else { &[] };
            unknown_player(trick, player_id)
                .or_else(|| unknown_card(trick, visible))
                .unwrap_or_else(|| {
                    Step::to(Phase::HandChangeWaiting(HandChangeWaitingPhase {
                        trick: Arc::clone(trick),
                        changing_player_id: player_id.clone(),
                        draw_cards: for_viewer.then(|| draw_cards.clone()),
                        draw_count: hand_change_draws(draw_cards, *draw_count),
                    }))
                })
        }
        GameEvent::FuturePredicateAvailable {
            player_id,
            deck_cards,
        } => unknown_player(trick, player_id).unwrap_or_else(|| {
            let for_viewer = trick.ctx.is_viewer(player_id);
            Step::to(Phase::FuturePredicateWaiting(FuturePredicateWaitingPhase {
                trick: Arc::clone(trick),
                predicating_player_id: player_id.clone(),
                deck_cards: for_viewer.then(|| deck_cards.clone()),
            }))
        }),
        GameEvent::BidChangeAvailable {
            player_id,
            min,
            max,
        } => unknown_player(trick, player_id).unwrap_or_else(|| {
            Step::to(Phase::BidDeclareChangeWaiting(BidDeclareChangeWaitingPhase {
                trick: Arc::clone(trick),
                changing_player_id: player_id.clone(),
                min: *min,
                max: *max,
            }))
        }),
        GameEvent::RoundFinished { scores } => Step::to(Phase::trick(
            trick.with_round_scores(trick.score_board.appended(scores.clone())),
        )),
        GameEvent::RoundStarted {
            round,
            dealer_id,
            deal,
        } => unknown_player(trick, dealer_id).unwrap_or_else(|| {
            Step::to(Phase::Bidding(BiddingPhase::dealt(
                trick.ctx.clone(),
                *round,
                dealer_id.clone(),
                &trick.player_ids(),
                deal,
                trick.score_board.clone(),
            )))
        }),
        GameEvent::GameFinished {
            winner_id,
            score_board,
        } => unknown_player(trick, winner_id).unwrap_or_else(|| {
            Step::to(Phase::Finished(FinishedPhase {
                ctx: trick.ctx.clone(),
                players: trick.player_ids(),
                winner_id: winner_id.clone(),
                last_lead_id: trick.lead_id.clone(),
                score_board: reconcile_final_board(&trick.score_board, score_board),
            }))
        }),
        _ => Step::ignore(IgnoreReason::NotApplicable),
    }
}

/// Accept the announced final board only if it extends the local one.
fn reconcile_final_board(local: &ScoreBoard, announced: &ScoreBoard) -> ScoreBoard {
    if local.is_prefix_of(announced) {
        announced.clone()
    } else {
        tracing::warn!(
            local_rounds = local.len(),
            announced_rounds = announced.len(),
            "final scoreboard rewrites recorded rounds; keeping local rounds"
        );
        local.clone()
    }
}

fn lead_change_step(wait: &NextTrickLeadWaitingPhase, event: &GameEvent) -> Step {
    match event {
        GameEvent::NextTrickLeadChanged { new_lead_id, .. } => unknown_player(&wait.trick, new_lead_id)
            .unwrap_or_else(|| Step::to(Phase::trick(wait.trick.with_lead(new_lead_id)))),
        _ => Step::ignore(IgnoreReason::NotApplicable),
    }
}

fn hand_change_step(wait: &HandChangeWaitingPhase, event: &GameEvent) -> Step {
    match event {
        GameEvent::HandChanged {
            player_id,
            returned_cards,
        } => unknown_player(&wait.trick, player_id)
            .or_else(|| unknown_card(&wait.trick, returned_cards))
            .unwrap_or_else(|| {
                if player_id != &wait.changing_player_id {
                    return Step::ignore(IgnoreReason::NotApplicable);
                }
                let draws: &[CardId] = wait.draw_cards.as_deref().unwrap_or(&[]);
                Step::to(Phase::trick(wait.trick.with_hand_changed(
                    player_id,
                    draws,
                    wait.draw_count,
                    returned_cards,
                )))
            }),
        _ => Step::ignore(IgnoreReason::NotApplicable),
    }
}

fn predicate_step(wait: &FuturePredicateWaitingPhase, event: &GameEvent) -> Step {
    match event {
        GameEvent::FuturePredicated { .. } => Step::to(Phase::Trick(Arc::clone(&wait.trick))),
        _ => Step::ignore(IgnoreReason::NotApplicable),
    }
}

fn bid_change_step(wait: &BidDeclareChangeWaitingPhase, event: &GameEvent) -> Step {
    match event {
        GameEvent::BidChanged { player_id, bid } => unknown_player(&wait.trick, player_id)
            .unwrap_or_else(|| {
                Step::to(Phase::trick(wait.trick.with_declared_bid(player_id, *bid)))
            }),
        _ => Step::ignore(IgnoreReason::NotApplicable),
    }
}

fn finished_step(finished: &FinishedPhase, event: &GameEvent) -> Step {
    match event {
        GameEvent::GameEnded => Step::to(Phase::Ended(EndedPhase {
            ctx: finished.ctx.clone(),
        })),
        GameEvent::RoundStarted {
            round,
            dealer_id,
            deal,
        } => {
            if !finished.players.contains(dealer_id) {
                return Step::ignore(IgnoreReason::UnknownPlayer(dealer_id.clone()));
            }
            Step::to(Phase::Bidding(BiddingPhase::dealt(
                finished.ctx.clone(),
                *round,
                dealer_id.clone(),
                &finished.players,
                deal,
                ScoreBoard::new(),
            )))
        }
        _ => Step::ignore(IgnoreReason::NotApplicable),
    }
}
