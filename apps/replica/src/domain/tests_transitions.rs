use std::sync::Arc;

use crate::domain::events::{BidPlayer, GameEvent};
use crate::domain::scoring::{RoundScores, Score, ScoreBoard};
use crate::domain::session::GameSession;
use crate::domain::state::{Phase, PhaseKind};
use crate::domain::test_fixtures::{
    bidding_session, cid, cids, ctx, current_trick, deal, joined, pid, played, trick_session,
};
use crate::domain::transitions::{step, Disposition, IgnoreReason};
use crate::domain::CardColor;

#[test]
fn lobby_round_trip_to_bidding() {
    let mut session = GameSession::bootstrap(ctx("p1", 2));
    session.apply(joined("p2"));
    let phase = session.apply(GameEvent::GameStarted {
        deal: deal(&[("p1", 1), ("p2", 1)], 69, &["kraken"]),
    });

    let Phase::Bidding(bidding) = phase.as_ref() else {
        panic!("expected bidding, got {:?}", phase.kind());
    };
    assert_eq!(bidding.dealer_id, pid("p1"));
    assert_eq!(bidding.round, 1);
    assert!(bidding.score_board.is_empty());
    assert_eq!(bidding.players.len(), 2);
    assert!(bidding.players.iter().all(|p| p.bid.is_none()));
    assert_eq!(bidding.my_cards, cids(&["kraken"]));
}

#[test]
fn lobby_join_leave_and_duplicates() {
    let mut session = GameSession::bootstrap(ctx("p1", 4));
    session.apply(joined("p2"));
    session.apply(joined("p3"));
    session.apply(joined("p2"));
    session.apply(GameEvent::PlayerLeft {
        player_id: pid("p9"),
    });
    session.apply(GameEvent::PlayerLeft {
        player_id: pid("p2"),
    });

    assert_eq!(session.phase().player_ids(), vec![pid("p1"), pid("p3")]);
    let entries = session.log().entries();
    assert_eq!(entries.len(), 5);
    assert_eq!(
        entries[2].disposition,
        Disposition::ignored(IgnoreReason::AlreadyJoined(pid("p2")))
    );
    assert_eq!(
        entries[3].disposition,
        Disposition::ignored(IgnoreReason::UnknownPlayer(pid("p9")))
    );
}

#[test]
fn dealer_falls_back_when_owner_left() {
    let mut session = GameSession::bootstrap(ctx("p2", 3));
    session.apply(joined("p2"));
    session.apply(joined("p3"));
    session.apply(GameEvent::PlayerLeft {
        player_id: pid("p1"),
    });
    let phase = session.apply(GameEvent::GameStarted {
        deal: deal(&[("p2", 1), ("p3", 1)], 69, &[]),
    });
    let Phase::Bidding(bidding) = phase.as_ref() else {
        panic!("expected bidding");
    };
    assert_eq!(bidding.dealer_id, pid("p2"));
}

#[test]
fn bids_only_touch_declaring_player() {
    let mut session = bidding_session("p2");
    let phase = session.apply(GameEvent::BidDeclared {
        player_id: pid("p2"),
        bid: 3,
    });
    let Phase::Bidding(bidding) = phase.as_ref() else {
        panic!("expected bidding");
    };
    assert_eq!(bidding.player(&pid("p1")).unwrap().bid, None);
    assert_eq!(bidding.player(&pid("p2")).unwrap().bid, Some(3));
}

#[test]
fn trick_sequencing_after_bids() {
    let mut session = bidding_session("p1");
    session.apply(GameEvent::BidDeclared {
        player_id: pid("p1"),
        bid: 2,
    });
    session.apply(GameEvent::BidDeclared {
        player_id: pid("p2"),
        bid: 1,
    });
    let phase = session.apply(GameEvent::TrickStarted {
        deck: 40,
        trick: 1,
        players: vec![
            BidPlayer {
                player_id: pid("p1"),
                bid: 2,
                cards: 3,
            },
            BidPlayer {
                player_id: pid("p2"),
                bid: 1,
                cards: 3,
            },
        ],
    });

    let Phase::Trick(trick) = phase.as_ref() else {
        panic!("expected trick");
    };
    assert_eq!(trick.round, 1);
    assert_eq!(trick.trick, 1);
    assert_eq!(trick.deck, 40);
    assert!(trick.field.is_empty());
    assert_eq!(trick.stack, 0);
    assert!(trick.players.iter().all(|p| p.tricks_won == 0 && p.bonus == 0));
    assert_eq!(trick.player(&pid("p1")).unwrap().declared_bid, 2);
    assert_eq!(trick.player(&pid("p2")).unwrap().declared_bid, 1);
    assert_eq!(trick.lead_id, pid("p1"));
}

#[test]
fn card_played_builds_a_new_trick_value() {
    let mut session = trick_session("p1");
    let before = session.phase();
    let after = session.apply(played("p1", "number:YELLOW:9"));

    let old = before.current_trick().unwrap();
    let new = after.current_trick().unwrap();
    assert!(!Arc::ptr_eq(old, new));
    assert!(old.field.is_empty());
    assert_eq!(old.my_cards.len(), 3);

    assert_eq!(new.field.len(), 1);
    assert_eq!(new.must_follow, Some(CardColor::Yellow));
    assert_eq!(new.player(&pid("p1")).unwrap().cards, 2);
    assert!(!new.my_cards.contains(&cid("number:YELLOW:9")));
    assert_eq!(new.to_act(), Some(&pid("p2")));
}

#[test]
fn special_cards_do_not_fix_the_follow_colour() {
    let mut session = trick_session("p2");
    session.apply(played("p1", "tigress"));
    assert_eq!(current_trick(&session).must_follow, None);
    session.apply(played("p2", "number:BLACK:3"));
    assert_eq!(current_trick(&session).must_follow, Some(CardColor::Black));
}

#[test]
fn trick_resolution_moves_field_to_stack() {
    let mut session = trick_session("p1");
    session.apply(played("p1", "number:GREEN:5"));
    session.apply(played("p2", "number:GREEN:12"));
    let phase = session.apply(GameEvent::TrickWon {
        winner_id: pid("p2"),
        card_id: cid("number:GREEN:12"),
        bonus: 0,
    });

    let trick = phase.current_trick().unwrap();
    assert!(trick.field.is_empty());
    assert_eq!(trick.stack, 2);
    assert_eq!(trick.trick, 2);
    assert_eq!(trick.must_follow, None);
    assert_eq!(trick.lead_id, pid("p2"));
    assert_eq!(trick.player(&pid("p2")).unwrap().tricks_won, 1);
    assert_eq!(trick.player(&pid("p1")).unwrap().tricks_won, 0);
}

#[test]
fn kraken_and_escape_resolutions_credit_the_named_player() {
    let mut session = trick_session("p1");
    session.apply(played("p1", "tigress"));
    session.apply(played("p2", "bahijTheBandit"));
    session.apply(GameEvent::KrakenAppeared {
        must_have_won: pid("p1"),
    });
    let trick = current_trick(&session);
    assert_eq!(trick.lead_id, pid("p1"));
    assert_eq!(trick.player(&pid("p1")).unwrap().tricks_won, 1);

    session.apply(GameEvent::AllRanAway {
        winner_id: pid("p2"),
        card_id: cid("escape:0"),
    });
    let trick = current_trick(&session);
    assert_eq!(trick.lead_id, pid("p2"));
    assert_eq!(trick.player(&pid("p2")).unwrap().bonus, 0);
    assert_eq!(trick.trick, 3);
}

#[test]
fn hand_change_resume_for_viewer() {
    let mut session = trick_session("p2");
    session.apply(played("p1", "number:GREEN:5"));
    session.apply(played("p2", "number:GREEN:12"));
    session.apply(GameEvent::TrickWon {
        winner_id: pid("p2"),
        card_id: cid("number:GREEN:12"),
        bonus: 0,
    });
    let before = session.phase();
    let wait = session.apply(GameEvent::HandChangeAvailable {
        player_id: pid("p2"),
        draw_cards: cids(&["number:PURPLE:1", "number:PURPLE:2"]),
        draw_count: Some(2),
    });

    let Phase::HandChangeWaiting(waiting) = wait.as_ref() else {
        panic!("expected hand change wait");
    };
    assert!(Arc::ptr_eq(&waiting.trick, before.current_trick().unwrap()));
    assert_eq!(waiting.draw_cards.as_ref().map(Vec::len), Some(2));

    let phase = session.apply(GameEvent::HandChanged {
        player_id: pid("p2"),
        returned_cards: cids(&["number:BLACK:3"]),
    });
    let trick = phase.current_trick().unwrap();
    assert_eq!(phase.kind(), PhaseKind::Trick);
    assert_eq!(
        trick.my_cards,
        cids(&["bahijTheBandit", "number:PURPLE:1", "number:PURPLE:2"])
    );
    assert_eq!(trick.player(&pid("p2")).unwrap().cards, 3);
    assert_eq!(trick.player(&pid("p1")).unwrap().cards, 2);
    assert_eq!(trick.deck, before.current_trick().unwrap().deck - 1);

    // The wrapped trick was not touched.
    assert_eq!(
        waiting.trick.my_cards,
        cids(&["number:BLACK:3", "bahijTheBandit"])
    );
}

#[test]
fn hand_change_for_other_player_adjusts_counts_only() {
    let mut session = trick_session("p1");
    let wait = session.apply(GameEvent::HandChangeAvailable {
        player_id: pid("p2"),
        draw_cards: cids(&["number:PURPLE:1", "number:PURPLE:2"]),
        draw_count: Some(2),
    });
    let Phase::HandChangeWaiting(waiting) = wait.as_ref() else {
        panic!("expected hand change wait");
    };
    assert_eq!(waiting.draw_cards, None);

    let phase = session.apply(GameEvent::HandChanged {
        player_id: pid("p2"),
        returned_cards: cids(&["number:GREEN:1", "number:GREEN:2"]),
    });
    let trick = phase.current_trick().unwrap();
    assert_eq!(trick.my_cards, cids(&super::test_fixtures::P1_HAND));
    assert_eq!(trick.player(&pid("p2")).unwrap().cards, 3);
}

#[test]
fn lead_change_and_bid_change_resume_into_trick() {
    let mut session = trick_session("p1");
    session.apply(GameEvent::NextTrickLeadChangeAvailable {
        player_id: pid("p1"),
    });
    assert_eq!(session.phase().kind(), PhaseKind::NextTrickLeadChanging);
    let phase = session.apply(GameEvent::NextTrickLeadChanged {
        player_id: pid("p1"),
        new_lead_id: pid("p2"),
    });
    assert_eq!(phase.current_trick().unwrap().lead_id, pid("p2"));

    session.apply(GameEvent::BidChangeAvailable {
        player_id: pid("p2"),
        min: 0,
        max: 2,
    });
    let Phase::BidDeclareChangeWaiting(wait) = session.phase().as_ref().clone() else {
        panic!("expected bid change wait");
    };
    assert_eq!((wait.min, wait.max), (0, 2));
    let phase = session.apply(GameEvent::BidChanged {
        player_id: pid("p2"),
        bid: 2,
    });
    assert_eq!(
        phase.current_trick().unwrap().player(&pid("p2")).unwrap().declared_bid,
        2
    );
}

#[test]
fn future_predicate_returns_the_same_trick() {
    let mut session = trick_session("p1");
    let before = session.phase();
    let wait = session.apply(GameEvent::FuturePredicateAvailable {
        player_id: pid("p1"),
        deck_cards: cids(&["number:PURPLE:4"]),
    });
    let Phase::FuturePredicateWaiting(waiting) = wait.as_ref() else {
        panic!("expected predicate wait");
    };
    assert_eq!(waiting.deck_cards, Some(cids(&["number:PURPLE:4"])));

    let after = session.apply(GameEvent::FuturePredicated {
        player_id: pid("p1"),
    });
    assert!(Arc::ptr_eq(
        after.current_trick().unwrap(),
        before.current_trick().unwrap()
    ));
}

#[test]
fn wait_phases_ignore_unrelated_events() {
    let mut session = trick_session("p1");
    session.apply(GameEvent::NextTrickLeadChangeAvailable {
        player_id: pid("p1"),
    });
    let before = session.phase();
    let after = session.apply(played("p2", "number:GREEN:12"));
    assert_eq!(before, after);
    assert_eq!(
        session.log().last().unwrap().disposition,
        Disposition::ignored(IgnoreReason::NotApplicable)
    );
}

#[test]
fn unknown_ids_are_no_ops() {
    let mut session = trick_session("p1");
    let before = session.phase();
    session.apply(played("p7", "number:GREEN:1"));
    session.apply(played("p2", "number:RED:1"));
    session.apply(GameEvent::TrickWon {
        winner_id: pid("p7"),
        card_id: cid("kraken"),
        bonus: 10,
    });
    session.apply(GameEvent::NextTrickLeadChangeAvailable {
        player_id: pid("ghost"),
    });
    assert_eq!(session.phase(), before);

    let reasons: Vec<_> = session
        .log()
        .entries()
        .into_iter()
        .rev()
        .take(4)
        .map(|e| e.disposition)
        .collect();
    assert!(reasons.contains(&Disposition::ignored(IgnoreReason::UnknownCard(cid(
        "number:RED:1"
    )))));
    assert!(reasons.contains(&Disposition::ignored(IgnoreReason::UnknownPlayer(pid(
        "ghost"
    )))));
}

#[test]
fn rounds_accumulate_and_next_round_carries_scoreboard() {
    let mut session = trick_session("p1");
    let scores = RoundScores::new()
        .with(pid("p1"), Score { score: 40, bonus: 0 })
        .with(pid("p2"), Score { score: -10, bonus: 0 });
    session.apply(GameEvent::RoundFinished {
        scores: scores.clone(),
    });
    let phase = session.apply(GameEvent::RoundStarted {
        round: 2,
        dealer_id: pid("p2"),
        deal: deal(&[("p1", 2), ("p2", 2)], 67, &["kraken", "tigress"]),
    });
    let Phase::Bidding(bidding) = phase.as_ref() else {
        panic!("expected bidding");
    };
    assert_eq!(bidding.round, 2);
    assert_eq!(bidding.dealer_id, pid("p2"));
    assert_eq!(bidding.score_board.rounds(), &[scores]);
    assert!(bidding.players.iter().all(|p| p.cards == 2 && p.bid.is_none()));
}

#[test]
fn game_finished_then_replay_or_end() {
    let mut session = trick_session("p1");
    let round = RoundScores::new()
        .with(pid("p1"), Score { score: 40, bonus: 0 })
        .with(pid("p2"), Score { score: -10, bonus: 0 });
    session.apply(GameEvent::RoundFinished {
        scores: round.clone(),
    });
    let phase = session.apply(GameEvent::GameFinished {
        winner_id: pid("p1"),
        score_board: ScoreBoard::new().appended(round),
    });
    let Phase::Finished(finished) = phase.as_ref() else {
        panic!("expected finished");
    };
    assert_eq!(finished.winner_id, pid("p1"));
    assert_eq!(finished.score_board.len(), 1);

    let mut replay = session.clone();
    let phase = replay.apply(GameEvent::RoundStarted {
        round: 1,
        dealer_id: pid("p1"),
        deal: deal(&[("p1", 1), ("p2", 1)], 69, &["kraken"]),
    });
    let Phase::Bidding(bidding) = phase.as_ref() else {
        panic!("expected bidding");
    };
    assert!(bidding.score_board.is_empty());
    assert_eq!(bidding.players.len(), 2);

    let phase = session.apply(GameEvent::GameEnded);
    assert_eq!(phase.kind(), PhaseKind::Ended);
}

#[test]
fn final_board_that_rewrites_history_is_not_accepted() {
    let mut session = trick_session("p1");
    let round = RoundScores::new().with(pid("p1"), Score { score: 40, bonus: 0 });
    session.apply(GameEvent::RoundFinished {
        scores: round.clone(),
    });
    let forged = ScoreBoard::new().appended(RoundScores::new().with(pid("p1"), Score { score: 99, bonus: 0 }));
    let phase = session.apply(GameEvent::GameFinished {
        winner_id: pid("p1"),
        score_board: forged,
    });
    assert_eq!(phase.score_board().unwrap().rounds(), &[round]);
}

#[test]
fn ended_absorbs_everything() {
    let mut session = trick_session("p1");
    session.apply(GameEvent::GameFinished {
        winner_id: pid("p1"),
        score_board: ScoreBoard::new(),
    });
    let ended = session.apply(GameEvent::GameEnded);
    for event in [
        GameEvent::KeepAlive,
        joined("p5"),
        GameEvent::GameEnded,
        GameEvent::RoundStarted {
            round: 1,
            dealer_id: pid("p1"),
            deal: deal(&[], 0, &[]),
        },
    ] {
        let step = step(&ended, &event);
        assert_eq!(step.next, None);
        assert_eq!(step.disposition, Disposition::ignored(IgnoreReason::Terminal));
        assert_eq!(session.apply(event), ended);
    }
}

#[test]
fn keep_alive_is_logged_without_changing_phase() {
    let mut session = trick_session("p1");
    let before = session.phase();
    let len = session.log().len();
    let after = session.apply(GameEvent::KeepAlive);
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(session.log().len(), len + 1);
    assert_eq!(session.log().last().unwrap().disposition, Disposition::Unchanged);
}

#[test]
fn events_out_of_phase_are_recorded_and_ignored() {
    let mut session = GameSession::bootstrap(ctx("p1", 2));
    let before = session.phase();
    session.apply(played("p1", "kraken"));
    session.apply(GameEvent::GameEnded);
    assert_eq!(session.phase(), before);
    assert!(session
        .log()
        .entries()
        .iter()
        .all(|e| e.disposition == Disposition::ignored(IgnoreReason::NotApplicable)
            && e.phase == PhaseKind::Lobby));
}

#[test]
fn hand_changed_for_another_player_is_ignored() {
    let mut session = trick_session("p1");
    let wait = session.apply(GameEvent::HandChangeAvailable {
        player_id: pid("p2"),
        draw_cards: vec![],
        draw_count: Some(2),
    });
    let phase = session.apply(GameEvent::HandChanged {
        player_id: pid("p1"),
        returned_cards: vec![],
    });

    assert!(Arc::ptr_eq(&phase, &wait));
    assert_eq!(
        session.log().entries().last().unwrap().disposition,
        Disposition::ignored(IgnoreReason::NotApplicable)
    );
}

#[test]
fn oversized_hand_change_counts_saturate() {
    let mut session = trick_session("p1");
    session.apply(GameEvent::HandChangeAvailable {
        player_id: pid("p2"),
        draw_cards: vec![],
        draw_count: Some(u32::MAX),
    });
    let phase = session.apply(GameEvent::HandChanged {
        player_id: pid("p2"),
        returned_cards: vec![],
    });

    let trick = phase.current_trick().unwrap();
    assert_eq!(trick.player(&pid("p2")).unwrap().cards, u32::MAX);
    assert_eq!(trick.deck, 0);
}

#[test]
fn trick_bonus_saturates() {
    let mut session = trick_session("p1");
    for bonus in [i32::MAX, 1] {
        session.apply(GameEvent::TrickWon {
            winner_id: pid("p2"),
            card_id: cid("number:GREEN:12"),
            bonus,
        });
    }

    let phase = session.phase();
    let p2 = phase.current_trick().unwrap().player(&pid("p2")).unwrap();
    assert_eq!(p2.bonus, i32::MAX);
    assert_eq!(p2.tricks_won, 2);
}
