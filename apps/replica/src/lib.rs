#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod protocol;
pub mod replay;
pub mod rooms;
pub mod telemetry;


pub use config::ReplicaConfig;
pub use domain::{GameEvent, GameSession, GameSnapshot, Phase, PhaseKind, SessionContext};
pub use error::AppError;
pub use protocol::{translate, GameCommand, Intent, ServerFrame};
pub use rooms::RoomRegistry;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
