//! Trick rules: which card beats which, who takes a trick, what may be played.

use super::cards_types::{Card, CardColor, CardId, CardKind};
use super::ids::PlayerId;
use super::play_choice::PlayChoice;

pub const SKULL_KING_PER_PIRATE: i32 = 30;
pub const MERMAID_CAPTURES_SKULL_KING: i32 = 50;

/// How a card behaves in battle once its play-time choice is known.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Number { color: CardColor, number: u8 },
    Escape,
    Pirate,
    SkullKing,
    Mermaid,
    Kraken,
}

pub fn role_of(kind: CardKind, choice: Option<PlayChoice>) -> Role {
    match kind {
        CardKind::Number { color, number } => Role::Number { color, number },
        CardKind::Escape => Role::Escape,
        CardKind::Pirate(_) => Role::Pirate,
        CardKind::Tigress => match choice {
            Some(PlayChoice::TigressAsEscape) => Role::Escape,
            _ => Role::Pirate,
        },
        CardKind::SkullKing => Role::SkullKing,
        CardKind::Mermaid => Role::Mermaid,
        CardKind::Kraken => Role::Kraken,
    }
}

/// True when `current` keeps the trick against `next`, played after it.
pub fn holds_against(current: Role, next: Role) -> bool {
    match current {
        Role::Number { color, number } => match next {
            Role::Number {
                color: next_color,
                number: next_number,
            } => {
                if color == next_color {
                    number > next_number
                } else {
                    !next_color.is_trump()
                }
            }
            Role::Escape => true,
            _ => false,
        },
        Role::Escape => next == Role::Escape,
        Role::Pirate => !matches!(next, Role::SkullKing | Role::Kraken),
        Role::SkullKing => !matches!(next, Role::Mermaid | Role::Kraken),
        Role::Mermaid => !matches!(next, Role::SkullKing | Role::Pirate | Role::Kraken),
        Role::Kraken => true,
    }
}

/// A card on the table, in play order.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PlayedCard {
    pub player_id: PlayerId,
    pub card_id: CardId,
    pub kind: CardKind,
    pub choice: Option<PlayChoice>,
}

impl PlayedCard {
    pub fn role(&self) -> Role {
        role_of(self.kind, self.choice)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TrickOutcome {
    Won {
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
}

impl TrickOutcome {
    /// Player who takes the trick and leads the next one.
    pub fn taker(&self) -> &PlayerId {
        match self {
            TrickOutcome::Won { winner_id, .. } | TrickOutcome::AllRanAway { winner_id, .. } => {
                winner_id
            }
            TrickOutcome::KrakenAppeared { must_have_won } => must_have_won,
        }
    }
}

fn strongest<'a>(plays: impl IntoIterator<Item = &'a PlayedCard>) -> Option<&'a PlayedCard> {
    plays.into_iter().fold(None, |best, play| match best {
        Some(current) if holds_against(current.role(), play.role()) => Some(current),
        _ => Some(play),
    })
}

/// Decide a complete trick. Returns `None` for an empty field.
///
/// A mermaid takes any trick containing the skull king, whatever the play
/// order and whatever pirates followed.
pub fn resolve_trick(plays: &[PlayedCard]) -> Option<TrickOutcome> {
    let top = strongest(plays)?;
    let base: i32 = plays.iter().map(|p| p.kind.capture_bonus()).sum();
    let skull_king_played = plays.iter().any(|p| p.role() == Role::SkullKing);
    let first_mermaid = plays.iter().find(|p| p.role() == Role::Mermaid);

    let outcome = match top.role() {
        Role::Escape => TrickOutcome::AllRanAway {
            winner_id: top.player_id.clone(),
            card_id: top.card_id.clone(),
        },
        Role::Kraken => {
            let rest = strongest(plays.iter().filter(|p| p.role() != Role::Kraken));
            TrickOutcome::KrakenAppeared {
                must_have_won: rest.unwrap_or(top).player_id.clone(),
            }
        }
        Role::SkullKing | Role::Mermaid | Role::Pirate if skull_king_played => {
            match first_mermaid {
                Some(mermaid) => TrickOutcome::Won {
                    winner_id: mermaid.player_id.clone(),
                    card_id: mermaid.card_id.clone(),
                    bonus: base + MERMAID_CAPTURES_SKULL_KING,
                },
                None => {
                    let pirates =
                        plays.iter().filter(|p| p.role() == Role::Pirate).count() as i32;
                    TrickOutcome::Won {
                        winner_id: top.player_id.clone(),
                        card_id: top.card_id.clone(),
                        bonus: base + SKULL_KING_PER_PIRATE * pirates,
                    }
                }
            }
        }
        _ => TrickOutcome::Won {
            winner_id: top.player_id.clone(),
            card_id: top.card_id.clone(),
            bonus: base,
        },
    };
    Some(outcome)
}

/// Colour fixed by the first numbered card in the trick.
pub fn follow_color<'a>(kinds: impl IntoIterator<Item = &'a CardKind>) -> Option<CardColor> {
    kinds.into_iter().find_map(|kind| kind.color())
}

pub fn hand_has_color(hand: &[Card], color: CardColor) -> bool {
    hand.iter().any(|c| c.kind.color() == Some(color))
}

pub fn can_play(hand: &[Card], card: &Card, must_follow: Option<CardColor>) -> bool {
    let Some(follow) = must_follow else {
        return true;
    };
    match card.kind.color() {
        Some(color) if color != follow => !hand_has_color(hand, follow),
        _ => true,
    }
}

pub fn legal_cards(hand: &[Card], must_follow: Option<CardColor>) -> Vec<CardId> {
    hand.iter()
        .filter(|card| can_play(hand, card, must_follow))
        .map(|card| card.id.clone())
        .collect()
}
