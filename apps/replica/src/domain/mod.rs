//! Domain layer: card model, rules, phases and the replication protocol.

pub mod cards_logic;
pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod catalog;
pub mod event_log;
pub mod events;
pub mod ids;
pub mod play_choice;
pub mod rules;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod snapshot_adapter;
pub mod state;
pub mod transitions;

#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_props_replay;
#[cfg(test)]
mod tests_session;
#[cfg(test)]
mod tests_transitions;

// Re-exports for ergonomics
pub use cards_logic::{legal_cards, resolve_trick, TrickOutcome};
pub use cards_types::{Card, CardColor, CardId, CardKind, ChoiceKind, PirateKind};
pub use catalog::CardCatalog;
pub use event_log::{EventLog, LogEntry};
pub use events::{EventKind, GameEvent};
pub use ids::{PlayerId, RoomId};
pub use rules::{DeckVariant, GameRule};
pub use scoring::{round_score, RoundScores, Score, ScoreBoard};
pub use session::GameSession;
pub use snapshot::{to_snapshot, GameSnapshot, PhaseSnapshot};
pub use snapshot_adapter::{decode_snapshot, from_snapshot};
pub use state::{Phase, PhaseKind, SessionContext};
pub use transitions::{step, Disposition, IgnoreReason, Step};
