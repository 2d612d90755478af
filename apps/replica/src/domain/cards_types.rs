//! Core card types: CardId, CardColor, CardKind, Card

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable catalog identifier, e.g. `number:GREEN:14`, `pirates:2`, `tigress`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numbered suits. Black is the trump colour.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum CardColor {
    Green,
    Yellow,
    Purple,
    Black,
}

impl CardColor {
    pub const ALL: [CardColor; 4] = [
        CardColor::Green,
        CardColor::Yellow,
        CardColor::Purple,
        CardColor::Black,
    ];

    pub fn is_trump(self) -> bool {
        self == CardColor::Black
    }
}

pub const MIN_NUMBER: u8 = 1;
pub const MAX_NUMBER: u8 = 14;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PirateKind {
    /// Plain pirate without an ability
    Standard,
    RoiseDLaney,
    BahijTheBandit,
    RascalOfRoatan,
    JuanitaJade,
    HarryTheGiant,
}

/// What winning a trick with a named pirate unlocks.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PirateAbility {
    /// Winner picks who leads the next trick
    ChooseNextLead,
    /// Winner draws two cards and returns two
    ExchangeHand,
    /// Winner privately looks at the undealt deck
    PreviewDeck,
    /// Winner moves their bid by at most one
    AdjustBid,
    /// Bet placed when playing pays off on an exact bid
    BetBonus,
}

impl PirateKind {
    pub fn ability(self) -> Option<PirateAbility> {
        match self {
            PirateKind::Standard => None,
            PirateKind::RoiseDLaney => Some(PirateAbility::ChooseNextLead),
            PirateKind::BahijTheBandit => Some(PirateAbility::ExchangeHand),
            PirateKind::RascalOfRoatan => Some(PirateAbility::BetBonus),
            PirateKind::JuanitaJade => Some(PirateAbility::PreviewDeck),
            PirateKind::HarryTheGiant => Some(PirateAbility::AdjustBid),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CardKind {
    Number { color: CardColor, number: u8 },
    Escape,
    Pirate(PirateKind),
    Tigress,
    SkullKing,
    Mermaid,
    Kraken,
}

/// Capability tag: a card carrying one needs a decision when it is played.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ChoiceKind {
    /// Played either as a pirate or as an escape
    TigressMode,
    /// Bet of 0, 10 or 20 points
    RascalBet,
}

impl CardKind {
    pub fn color(self) -> Option<CardColor> {
        match self {
            CardKind::Number { color, .. } => Some(color),
            _ => None,
        }
    }

    pub fn is_number(self) -> bool {
        matches!(self, CardKind::Number { .. })
    }

    pub fn play_choice(self) -> Option<ChoiceKind> {
        match self {
            CardKind::Tigress => Some(ChoiceKind::TigressMode),
            CardKind::Pirate(PirateKind::RascalOfRoatan) => Some(ChoiceKind::RascalBet),
            _ => None,
        }
    }

    /// Points awarded to whoever captures this card.
    pub fn capture_bonus(self) -> i32 {
        match self {
            CardKind::Number {
                color: CardColor::Black,
                number: MAX_NUMBER,
            } => 20,
            CardKind::Number {
                number: MAX_NUMBER, ..
            } => 10,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Card {
    pub id: CardId,
    pub kind: CardKind,
}

impl Card {
    pub fn new(id: CardId, kind: CardKind) -> Self {
        Self { id, kind }
    }
}
