use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, ValidationKind};

pub const ROOM_MIN_SIZE: u32 = 2;
pub const ROOM_MAX_SIZE: u32 = 6;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeckVariant {
    Standard,
    Expansion,
}

impl DeckVariant {
    pub const fn deck_size(self) -> u32 {
        match self {
            DeckVariant::Standard => 68,
            DeckVariant::Expansion => 71,
        }
    }
}

/// Table configuration fixed when the room is created.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameRule {
    pub room_size: u32,
    pub number_of_rounds: u32,
    pub deck_variant: DeckVariant,
}

impl GameRule {
    pub fn new(
        room_size: u32,
        number_of_rounds: u32,
        deck_variant: DeckVariant,
    ) -> Result<Self, DomainError> {
        if !(ROOM_MIN_SIZE..=ROOM_MAX_SIZE).contains(&room_size) {
            return Err(DomainError::validation(
                ValidationKind::RoomSize,
                format!("Room size {room_size} outside {ROOM_MIN_SIZE}..={ROOM_MAX_SIZE}"),
            ));
        }
        // The last round deals `number_of_rounds` cards to every seat.
        if number_of_rounds == 0 || room_size * number_of_rounds > deck_variant.deck_size() {
            return Err(DomainError::validation(
                ValidationKind::RoundCount,
                format!(
                    "{number_of_rounds} rounds cannot be dealt to {room_size} players from a {}-card deck",
                    deck_variant.deck_size()
                ),
            ));
        }
        Ok(Self {
            room_size,
            number_of_rounds,
            deck_variant,
        })
    }

    pub fn max_rounds_for(room_size: u32, deck_variant: DeckVariant) -> u32 {
        deck_variant.deck_size() / room_size.max(1)
    }
}

/// Cards dealt to each player in `round` (1-based).
pub fn hand_size_for_round(round: u32) -> u32 {
    round
}

pub fn valid_bid_range(round: u32) -> RangeInclusive<u32> {
    0..=round
}

/// Range a bid may be moved to when the bid-change ability triggers.
pub fn bid_change_range(current_bid: u32, round: u32) -> RangeInclusive<u32> {
    current_bid.saturating_sub(1)..=(current_bid + 1).min(round)
}

pub fn require_valid_bid(bid: u32, round: u32) -> Result<u32, DomainError> {
    if valid_bid_range(round).contains(&bid) {
        Ok(bid)
    } else {
        Err(DomainError::validation(
            ValidationKind::InvalidBid,
            format!("Bid {bid} outside 0..={round}"),
        ))
    }
}
