use std::sync::Arc;

use crate::domain::events::{EventKind, GameEvent};
use crate::domain::session::GameSession;
use crate::domain::snapshot::{to_snapshot, PhaseSnapshot};
use crate::domain::state::PhaseKind;
use crate::domain::test_fixtures::{bidding_session, ctx, joined, pid, played, trick_session};
use crate::domain::transitions::{Disposition, IgnoreReason};
use crate::errors::domain::{DomainError, ProtocolKind};

#[test]
fn bootstrap_starts_in_lobby_with_empty_log() {
    let session = GameSession::bootstrap(ctx("p1", 3));
    assert_eq!(session.phase().kind(), PhaseKind::Lobby);
    assert_eq!(session.phase().player_ids(), vec![pid("p1")]);
    assert!(session.log().is_empty());
}

#[test]
fn earlier_phase_handles_survive_later_events() {
    let mut session = bidding_session("p1");
    let held = session.phase();
    session.apply(GameEvent::BidDeclared {
        player_id: pid("p1"),
        bid: 1,
    });
    assert_eq!(held.kind(), PhaseKind::Bidding);
    assert_ne!(held, session.phase());
    assert!(!Arc::ptr_eq(&held, &session.phase()));
}

#[test]
fn log_entries_carry_phase_kind_and_disposition() {
    let mut session = GameSession::bootstrap(ctx("p1", 3));
    session.apply(joined("p2"));
    session.apply(joined("p2"));
    session.apply(GameEvent::KeepAlive);

    let entries = session.log().entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].kind, EventKind::PlayerJoined);
    assert_eq!(entries[0].phase, PhaseKind::Lobby);
    assert_eq!(entries[0].disposition, Disposition::Applied);
    assert_eq!(
        entries[1].disposition,
        Disposition::ignored(IgnoreReason::AlreadyJoined(pid("p2")))
    );
    assert_eq!(entries[2].disposition, Disposition::Unchanged);
    assert_eq!(
        entries.iter().map(|e| e.seq).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}

#[test]
fn skip_records_without_applying() {
    let mut session = trick_session("p1");
    let before = session.phase();
    let logged = session.log().len();

    session.skip(played("p1", "number:GREEN:5"), IgnoreReason::Duplicate);

    assert!(Arc::ptr_eq(&before, &session.phase()));
    let last = session.log().last().expect("skip is logged");
    assert_eq!(session.log().len(), logged + 1);
    assert_eq!(last.kind, EventKind::CardPlayed);
    assert_eq!(last.phase, PhaseKind::Trick);
    assert_eq!(last.disposition, Disposition::ignored(IgnoreReason::Duplicate));
}

#[test]
fn restore_swaps_phase_and_keeps_log() {
    let mut behind = bidding_session("p2");
    let ahead = trick_session("p2");
    let log_len = behind.log().len();

    let phase = behind
        .restore(&to_snapshot(&ahead.phase()))
        .expect("restore from own snapshot");

    assert_eq!(phase, ahead.phase());
    assert_eq!(behind.log().len(), log_len);
    assert_eq!(phase.context().viewer, pid("p2"));
}

#[test]
fn restore_with_bad_hand_keeps_current_phase() {
    let mut session = trick_session("p1");
    let before = session.phase();
    let mut snapshot = to_snapshot(&before);
    if let PhaseSnapshot::Trick(trick) = &mut snapshot.state {
        trick.my_cards.push("number:RED:3".into());
    }

    let err = session.restore(&snapshot).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Protocol(ProtocolKind::MalformedSnapshot, _)
    ));
    assert!(Arc::ptr_eq(&before, &session.phase()));
}

#[test]
fn restore_from_another_room_is_rejected() {
    let mut session = bidding_session("p2");
    let before = session.phase();
    let mut snapshot = to_snapshot(&trick_session("p2").phase());
    snapshot.room_id = "elsewhere".into();

    let err = session.restore(&snapshot).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Protocol(ProtocolKind::MalformedSnapshot, _)
    ));
    assert!(Arc::ptr_eq(&before, &session.phase()));
    assert_ne!(session.phase().context().room_id, snapshot.room_id);
}

#[test]
fn from_snapshot_starts_with_fresh_log() {
    let source = trick_session("p1");
    let snapshot = to_snapshot(&source.phase());

    let replica = GameSession::from_snapshot(&pid("p1"), &snapshot).expect("valid snapshot");
    assert_eq!(replica.phase(), source.phase());
    assert!(replica.log().is_empty());
    assert!(!replica.log().same_log(source.log()));
}

#[test]
fn cloned_sessions_share_the_log() {
    let mut session = GameSession::bootstrap(ctx("p1", 3));
    let observer = session.clone();
    session.apply(joined("p3"));
    assert!(observer.log().same_log(session.log()));
    assert_eq!(observer.log().len(), 1);
    assert_eq!(observer.phase().player_ids(), vec![pid("p1")]);
}
