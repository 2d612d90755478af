//! Card catalogs per deck variant.

use std::collections::HashMap;

use super::cards_parsing::{indexed_id, number_id, ESCAPE_PREFIX, MERMAID_PREFIX, PIRATE_PREFIX};
use super::cards_types::{Card, CardColor, CardId, CardKind, PirateKind, MAX_NUMBER, MIN_NUMBER};
use super::rules::DeckVariant;
use crate::errors::domain::{DomainError, ValidationKind};

const ESCAPES: usize = 5;
const STANDARD_PIRATES: usize = 5;
const MERMAIDS: usize = 2;

const NAMED_PIRATES: [PirateKind; 5] = [
    PirateKind::RoiseDLaney,
    PirateKind::BahijTheBandit,
    PirateKind::RascalOfRoatan,
    PirateKind::JuanitaJade,
    PirateKind::HarryTheGiant,
];

/// Immutable set of every card that exists in a game, looked up by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardCatalog {
    cards: Vec<Card>,
    index: HashMap<CardId, usize>,
}

impl CardCatalog {
    pub fn for_variant(variant: DeckVariant) -> Self {
        let cards = match variant {
            DeckVariant::Standard => standard_cards(),
            DeckVariant::Expansion => expansion_cards(),
        };
        let index = cards
            .iter()
            .enumerate()
            .map(|(i, card)| (card.id.clone(), i))
            .collect();
        Self { cards, index }
    }

    /// Build from cards received over the wire; ids must be unique.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, DomainError> {
        let mut index = HashMap::with_capacity(cards.len());
        for (i, card) in cards.iter().enumerate() {
            if index.insert(card.id.clone(), i).is_some() {
                return Err(DomainError::validation(
                    ValidationKind::DuplicateCard,
                    format!("Duplicate card id in catalog: {}", card.id),
                ));
            }
        }
        Ok(Self { cards, index })
    }

    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.index.get(id).map(|&i| &self.cards[i])
    }

    pub fn kind_of(&self, id: &CardId) -> Option<CardKind> {
        self.get(id).map(|card| card.kind)
    }

    pub fn contains(&self, id: &CardId) -> bool {
        self.index.contains_key(id)
    }

    pub fn contains_all<'a>(&self, ids: impl IntoIterator<Item = &'a CardId>) -> bool {
        ids.into_iter().all(|id| self.contains(id))
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

fn number_cards() -> impl Iterator<Item = Card> {
    CardColor::ALL.into_iter().flat_map(|color| {
        (MIN_NUMBER..=MAX_NUMBER)
            .map(move |number| Card::new(number_id(color, number), CardKind::Number { color, number }))
    })
}

fn indexed(prefix: &'static str, count: usize, kind: CardKind) -> impl Iterator<Item = Card> {
    (0..count).map(move |i| Card::new(indexed_id(prefix, i), kind))
}

fn standard_cards() -> Vec<Card> {
    number_cards()
        .chain(indexed(ESCAPE_PREFIX, ESCAPES, CardKind::Escape))
        .chain(indexed(
            PIRATE_PREFIX,
            STANDARD_PIRATES,
            CardKind::Pirate(PirateKind::Standard),
        ))
        .chain([
            Card::new(CardId::from("tigress"), CardKind::Tigress),
            Card::new(CardId::from("skulking"), CardKind::SkullKing),
        ])
        .collect()
}

fn expansion_cards() -> Vec<Card> {
    let named = NAMED_PIRATES.into_iter().filter_map(|pirate| {
        pirate
            .named_id()
            .map(|id| Card::new(CardId::from(id), CardKind::Pirate(pirate)))
    });
    number_cards()
        .chain(indexed(ESCAPE_PREFIX, ESCAPES, CardKind::Escape))
        .chain(indexed(MERMAID_PREFIX, MERMAIDS, CardKind::Mermaid))
        .chain(named)
        .chain([
            Card::new(CardId::from("tigress"), CardKind::Tigress),
            Card::new(CardId::from("skulking"), CardKind::SkullKing),
            Card::new(CardId::from("kraken"), CardKind::Kraken),
        ])
        .collect()
}
