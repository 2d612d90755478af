//! Card id parsing and formatting.
//!
//! Id grammar:
//! - `number:<COLOR>:<n>` with COLOR in GREEN/YELLOW/PURPLE/BLACK and n in 1..=14
//! - `escape:<i>`, `pirates:<i>`, `mermaid:<i>`
//! - `tigress`, `skulking`, `kraken`
//! - named pirates: `roiseDLaney`, `bahijTheBandit`, `rascalOfRoatan`,
//!   `juanitaJade`, `harryTheGiant`

use std::str::FromStr;

use super::cards_types::{Card, CardColor, CardId, CardKind, PirateKind, MAX_NUMBER, MIN_NUMBER};
use crate::errors::domain::{DomainError, ValidationKind};

pub const ESCAPE_PREFIX: &str = "escape";
pub const PIRATE_PREFIX: &str = "pirates";
pub const MERMAID_PREFIX: &str = "mermaid";

impl CardColor {
    pub fn as_str(self) -> &'static str {
        match self {
            CardColor::Green => "GREEN",
            CardColor::Yellow => "YELLOW",
            CardColor::Purple => "PURPLE",
            CardColor::Black => "BLACK",
        }
    }
}

impl FromStr for CardColor {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GREEN" => Ok(CardColor::Green),
            "YELLOW" => Ok(CardColor::Yellow),
            "PURPLE" => Ok(CardColor::Purple),
            "BLACK" => Ok(CardColor::Black),
            _ => Err(DomainError::validation(
                ValidationKind::ParseCard,
                format!("Parse color: {s}"),
            )),
        }
    }
}

impl PirateKind {
    /// Fixed id of a named pirate; standard pirates are indexed instead.
    pub fn named_id(self) -> Option<&'static str> {
        match self {
            PirateKind::Standard => None,
            PirateKind::RoiseDLaney => Some("roiseDLaney"),
            PirateKind::BahijTheBandit => Some("bahijTheBandit"),
            PirateKind::RascalOfRoatan => Some("rascalOfRoatan"),
            PirateKind::JuanitaJade => Some("juanitaJade"),
            PirateKind::HarryTheGiant => Some("harryTheGiant"),
        }
    }
}

pub fn number_id(color: CardColor, number: u8) -> CardId {
    CardId::new(format!("number:{}:{number}", color.as_str()))
}

pub fn indexed_id(prefix: &str, index: usize) -> CardId {
    CardId::new(format!("{prefix}:{index}"))
}

fn parse_error(s: &str) -> DomainError {
    DomainError::validation(ValidationKind::ParseCard, format!("Parse card: {s}"))
}

fn parse_index(s: &str, raw: &str) -> Result<usize, DomainError> {
    raw.parse::<usize>().map_err(|_| parse_error(s))
}

impl FromStr for CardKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let head = parts.next().ok_or_else(|| parse_error(s))?;
        let kind = match head {
            "number" => {
                let color = parts.next().ok_or_else(|| parse_error(s))?;
                let number = parts.next().ok_or_else(|| parse_error(s))?;
                let color = color.parse::<CardColor>().map_err(|_| parse_error(s))?;
                let number = number.parse::<u8>().map_err(|_| parse_error(s))?;
                if !(MIN_NUMBER..=MAX_NUMBER).contains(&number) {
                    return Err(parse_error(s));
                }
                CardKind::Number { color, number }
            }
            ESCAPE_PREFIX | PIRATE_PREFIX | MERMAID_PREFIX => {
                let index = parts.next().ok_or_else(|| parse_error(s))?;
                parse_index(s, index)?;
                match head {
                    ESCAPE_PREFIX => CardKind::Escape,
                    PIRATE_PREFIX => CardKind::Pirate(PirateKind::Standard),
                    _ => CardKind::Mermaid,
                }
            }
            "tigress" => CardKind::Tigress,
            "skulking" => CardKind::SkullKing,
            "kraken" => CardKind::Kraken,
            "roiseDLaney" => CardKind::Pirate(PirateKind::RoiseDLaney),
            "bahijTheBandit" => CardKind::Pirate(PirateKind::BahijTheBandit),
            "rascalOfRoatan" => CardKind::Pirate(PirateKind::RascalOfRoatan),
            "juanitaJade" => CardKind::Pirate(PirateKind::JuanitaJade),
            "harryTheGiant" => CardKind::Pirate(PirateKind::HarryTheGiant),
            _ => return Err(parse_error(s)),
        };
        if parts.next().is_some() {
            return Err(parse_error(s));
        }
        Ok(kind)
    }
}

impl FromStr for Card {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = s.parse::<CardKind>()?;
        Ok(Card::new(CardId::from(s), kind))
    }
}

/// Parse a batch of ids; fails on the first invalid one.
pub fn try_parse_cards<I, S>(tokens: I) -> Result<Vec<Card>, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|s| s.as_ref().parse::<Card>())
        .collect()
}
