#![allow(dead_code)]


use replica::domain::{GameRule, PlayerId, RoomId, SessionContext};

// Logging is auto-installed for every integration test binary
#[ctor::ctor]
fn init_logging() {
    replica_test_support::logging::init();
}

pub fn pid(id: &str) -> PlayerId {
    PlayerId::from(id)
}

pub fn seats(n: usize) -> Vec<PlayerId> {
    (1..=n).map(|i| PlayerId::new(format!("p{i}"))).collect()
}

/// Context for room `r1`, owned by the first seat.
pub fn context(rule: GameRule, viewer: &PlayerId) -> SessionContext {
    SessionContext::new(RoomId::from("r1"), viewer.clone(), pid("p1"), rule)
}
