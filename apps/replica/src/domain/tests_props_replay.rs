use std::sync::Arc;

use proptest::prelude::*;

use crate::domain::events::GameEvent;
use crate::domain::session::GameSession;
use crate::domain::snapshot::to_snapshot;
use crate::domain::snapshot_adapter::{decode_snapshot, from_snapshot};
use crate::domain::state::PhaseKind;
use crate::domain::test_fixtures::{bidding_session, ctx, joined, pid, trick_session};
use crate::domain::{test_gens, test_prelude};

/// Sessions in each of the live starting points the generators can push
/// around from.
fn start(which: usize, viewer: &str) -> GameSession {
    match which {
        0 => {
            let mut session = GameSession::bootstrap(ctx(viewer, 4));
            session.apply(joined("p2"));
            session.apply(joined("p3"));
            session
        }
        1 => bidding_session(viewer),
        _ => trick_session(viewer),
    }
}

fn viewer() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["p1", "p2", "p3"])
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Same starting point and events give the same phase and the same log.
    #[test]
    fn prop_replay_is_deterministic(
        which in 0usize..3,
        viewer in viewer(),
        events in test_gens::events(40),
    ) {
        let mut a = start(which, viewer);
        let mut b = start(which, viewer);
        for event in &events {
            a.apply(event.clone());
            b.apply(event.clone());
        }
        prop_assert_eq!(a.phase(), b.phase());
        prop_assert_eq!(a.log().entries(), b.log().entries());
    }

    /// Every reachable phase survives phase → snapshot → phase, both in
    /// memory and through JSON.
    #[test]
    fn prop_snapshot_round_trips_every_reachable_phase(
        which in 0usize..3,
        viewer in viewer(),
        events in test_gens::events(30),
    ) {
        let mut session = start(which, viewer);
        for event in events {
            let phase = session.apply(event);
            let snapshot = to_snapshot(&phase);
            prop_assert_eq!(snapshot.state.kind(), phase.kind());

            let rebuilt = from_snapshot(&pid(viewer), &snapshot).expect("own snapshot decodes");
            prop_assert_eq!(&rebuilt, phase.as_ref());

            let json = serde_json::to_string(&snapshot).expect("snapshot encodes");
            let decoded = decode_snapshot(&json).expect("snapshot JSON decodes");
            prop_assert_eq!(&decoded, &snapshot);
        }
    }

    /// Keep-alives never produce a new phase value.
    #[test]
    fn prop_keep_alive_is_identity(
        which in 0usize..3,
        viewer in viewer(),
        events in test_gens::events(20),
    ) {
        let mut session = start(which, viewer);
        for event in events {
            session.apply(event);
            let before = session.phase();
            let after = session.apply(GameEvent::KeepAlive);
            prop_assert!(Arc::ptr_eq(&before, &after));
        }
    }

    /// Finished rounds are never rewritten; only a replay starts a fresh
    /// board.
    #[test]
    fn prop_score_board_only_grows(
        which in 0usize..3,
        viewer in viewer(),
        events in test_gens::events(40),
    ) {
        let mut session = start(which, viewer);
        for event in events {
            let before = session.phase();
            let after = session.apply(event);
            if before.kind() == PhaseKind::Finished {
                continue;
            }
            if let (Some(old), Some(new)) = (before.score_board(), after.score_board()) {
                prop_assert!(old.is_prefix_of(new), "{:?} -> {:?}", old, new);
            }
        }
    }

    /// Every event lands in the log exactly once, in arrival order.
    #[test]
    fn prop_log_records_every_event(
        which in 0usize..3,
        events in test_gens::events(30),
    ) {
        let mut session = start(which, "p1");
        let already = session.log().len();
        for event in &events {
            session.apply(event.clone());
        }
        let entries = session.log().entries();
        prop_assert_eq!(entries.len(), already + events.len());
        for (entry, event) in entries[already..].iter().zip(&events) {
            prop_assert_eq!(&entry.event, event);
        }
        prop_assert!(entries.windows(2).all(|w| w[0].seq < w[1].seq));
    }
}
