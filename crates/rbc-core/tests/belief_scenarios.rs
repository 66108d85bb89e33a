use rand::SeedableRng;
use rand::rngs::StdRng;
use rbc_core::belief::{
    BeliefSet, MoveOutcome, SenseObservation, apply_move_result, cap, castling_successors,
    expand_opponent_moves, filter_by_sense, quiet_successors,
};
use rbc_core::game::referee::{Referee, sense_window};
use rbc_core::model::chess_move::Move;
use rbc_core::model::color::Color;
use rbc_core::model::piece::{Piece, PieceKind};
use rbc_core::model::position::Position;
use rbc_core::model::square::Square;
use std::time::Duration;

fn sq(name: &str) -> Square {
    name.parse().expect("valid square")
}

fn mv(uci: &str) -> Move {
    uci.parse().expect("valid move")
}

/// Belief set after White's first move is unknown to Black.
fn after_one_ply() -> BeliefSet {
    expand_opponent_moves(&BeliefSet::from_position(Position::starting()), false)
}

#[test]
fn opening_expansion_has_exactly_twenty_successors() {
    let set = after_one_ply();
    assert_eq!(set.len(), 20);
    let start = Position::starting();
    for uci in ["e2e4", "g1f3", "a2a3", "h2h4", "b1c3"] {
        assert!(set.contains(&start.play(mv(uci))), "missing {uci}");
    }
}

#[test]
fn sensing_empty_e4_excludes_the_e4_candidate() {
    let set = after_one_ply();
    let e4_line = Position::starting().play(mv("e2e4"));
    assert!(set.contains(&e4_line));

    let observation = SenseObservation::new(vec![(sq("e4"), None)]);
    let filtered = filter_by_sense(&set, &observation);
    assert!(!filtered.contains(&e4_line));
    assert_eq!(filtered.len(), set.len() - 1);
}

#[test]
fn sense_filter_keeps_truth_for_every_window() {
    let set = after_one_ply();
    let truth = Position::starting().play(mv("b1c3"));
    for center in Square::all().filter(|s| !s.is_edge()) {
        let observation = SenseObservation::observe(&truth, sense_window(center));
        let filtered = filter_by_sense(&set, &observation);
        assert!(filtered.contains(&truth), "truth lost sensing {center}");
        assert!(filtered.len() <= set.len());
    }
}

#[test]
fn blocked_double_push_keeps_only_blocked_candidates() {
    let requested = MoveOutcome {
        requested: Some(mv("e2e4")),
        taken: None,
        captured: false,
        capture_square: None,
    };

    let knight = Piece::new(PieceKind::Knight, Color::Black);
    let blocked = Position::starting().with_piece(sq("e3"), Some(knight));
    let blocked_set = BeliefSet::from_position(blocked.clone());
    let survivors = apply_move_result(&blocked_set, &requested, Color::White);
    assert_eq!(survivors.len(), 1);
    assert!(survivors.contains(&blocked));

    let open_set = BeliefSet::from_position(Position::starting());
    assert!(apply_move_result(&open_set, &requested, Color::White).is_empty());
}

#[test]
fn cap_draws_exactly_limit_members_from_large_set() {
    // Distinct halfmove clocks give 15,000 distinct encodings.
    let positions: BeliefSet = (0..15_000)
        .map(|clock| {
            let fen = format!("4k3/8/8/8/8/8/8/4K3 w - - {clock} 1");
            Position::from_fen(&fen).expect("fen")
        })
        .collect();
    assert_eq!(positions.len(), 15_000);
    let mut rng = StdRng::seed_from_u64(2024);
    let capped = cap(&positions, 10_000, &mut rng);
    assert_eq!(capped.len(), 10_000);
    assert!(capped.iter().all(|p| positions.contains(p)));

    let tiny = cap(&capped, 20_000, &mut rng);
    assert_eq!(tiny.len(), 10_000);
}

#[test]
fn capture_expansion_members_come_from_captures() {
    let position = Position::from_fen("4k3/8/2n5/4p3/3P4/8/8/4K3 b - - 0 1").expect("fen");
    let set = BeliefSet::from_position(position);
    let captures = expand_opponent_moves(&set, true);
    assert_eq!(captures.len(), 2);
    for successor in &captures {
        let on_d4 = successor.piece_at(sq("d4")).map(|p| p.color);
        assert_eq!(on_d4, Some(Color::Black));
        assert_eq!(successor.pieces(PieceKind::Pawn, Color::White).count(), 0);
    }
}

#[test]
fn quiet_expansion_adds_at_most_two_castles() {
    let position = Position::from_fen("r3k2r/pppppppp/8/8/8/8/8/4K3 b kq - 0 1").expect("fen");
    let quiet = quiet_successors(&position);
    let castles = castling_successors(&position);
    assert_eq!(castles.len(), 2);
    let set = expand_opponent_moves(&BeliefSet::from_position(position), false);
    assert!(set.len() <= quiet.len() + castles.len());
    for castle in castles {
        assert!(set.contains(&castle));
    }
}

#[test]
fn tracker_follows_a_refereed_opening() {
    let mut referee = Referee::new(Position::starting(), Duration::from_secs(60), None);
    // Black's view: knows the start, White moves unseen.
    let mut beliefs = BeliefSet::from_position(Position::starting());

    referee.apply_move(None, Some(mv("d2d4")));
    let (captured, _) = referee.opponent_move_result();
    beliefs = expand_opponent_moves(&beliefs, captured);
    assert!(beliefs.contains(referee.board()));

    let observation = referee.sense(Some(sq("d3")));
    beliefs = filter_by_sense(&beliefs, &observation);
    assert!(beliefs.contains(referee.board()));
    assert!(beliefs.len() < 20);

    let outcome = referee.apply_move(Some(sq("d3")), Some(mv("d7d5")));
    beliefs = apply_move_result(&beliefs, &outcome, Color::Black);
    assert!(beliefs.contains(referee.board()));
}
