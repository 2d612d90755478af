//! Play-time choices for cards tagged with a [`ChoiceKind`].
//!
//! Selecting such a card does not produce a command right away: it opens a
//! [`PendingPlay`] that the presentation resolves with one of its options.

use serde::{Deserialize, Serialize};

use super::cards_types::{Card, CardId, ChoiceKind};
use crate::errors::domain::{DomainError, ValidationKind};

pub const RASCAL_BETS: [u32; 3] = [0, 10, 20];

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayChoice {
    TigressAsPirate,
    TigressAsEscape,
    RascalBet(u32),
}

impl PlayChoice {
    pub fn kind(self) -> ChoiceKind {
        match self {
            PlayChoice::TigressAsPirate | PlayChoice::TigressAsEscape => ChoiceKind::TigressMode,
            PlayChoice::RascalBet(_) => ChoiceKind::RascalBet,
        }
    }
}

/// A card ready to be sent, with its choice when one was required.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CardPlay {
    pub card_id: CardId,
    pub choice: Option<PlayChoice>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PendingPlay {
    pub card_id: CardId,
    pub needs: ChoiceKind,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PlayStep {
    Ready(CardPlay),
    Pending(PendingPlay),
}

pub fn begin_play(card: &Card) -> PlayStep {
    match card.kind.play_choice() {
        None => PlayStep::Ready(CardPlay {
            card_id: card.id.clone(),
            choice: None,
        }),
        Some(needs) => PlayStep::Pending(PendingPlay {
            card_id: card.id.clone(),
            needs,
        }),
    }
}

impl PendingPlay {
    pub fn options(&self) -> Vec<PlayChoice> {
        match self.needs {
            ChoiceKind::TigressMode => vec![PlayChoice::TigressAsPirate, PlayChoice::TigressAsEscape],
            ChoiceKind::RascalBet => RASCAL_BETS.iter().map(|&b| PlayChoice::RascalBet(b)).collect(),
        }
    }

    pub fn choose(self, choice: PlayChoice) -> Result<CardPlay, DomainError> {
        if !self.options().contains(&choice) {
            return Err(DomainError::validation(
                ValidationKind::Other("play_choice".into()),
                format!("{choice:?} is not a valid choice for {}", self.card_id),
            ));
        }
        Ok(CardPlay {
            card_id: self.card_id,
            choice: Some(choice),
        })
    }
}
