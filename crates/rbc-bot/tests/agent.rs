use rbc_bot::bot::MoveSource;
use rbc_bot::oracle::{Oracle, OracleError};
use rbc_bot::policy::Player;
use rbc_bot::{AgentParams, BeliefAgent};
use rbc_core::belief::{MoveOutcome, SenseObservation};
use rbc_core::game::referee::{Referee, move_actions};
use rbc_core::model::chess_move::Move;
use rbc_core::model::color::Color;
use rbc_core::model::piece::{Piece, PieceKind};
use rbc_core::model::position::Position;
use rbc_core::model::square::Square;
use std::time::Duration;

fn sq(name: &str) -> Square {
    name.parse().expect("square")
}

fn mv(uci: &str) -> Move {
    uci.parse().expect("move")
}

type Reply = Result<Option<Move>, OracleError>;

/// Oracle double that answers from a closure and counts lifecycle calls.
struct ScriptedOracle<F> {
    respond: F,
    queries: usize,
    restarts: usize,
    shutdowns: usize,
    restart_fails: bool,
}

impl<F> ScriptedOracle<F>
where
    F: FnMut(usize, &Position) -> Reply,
{
    fn new(respond: F) -> Self {
        Self {
            respond,
            queries: 0,
            restarts: 0,
            shutdowns: 0,
            restart_fails: false,
        }
    }
}

impl<F> Oracle for ScriptedOracle<F>
where
    F: FnMut(usize, &Position) -> Reply,
{
    fn best_move(&mut self, position: &Position, _limit: Duration) -> Reply {
        let index = self.queries;
        self.queries += 1;
        (self.respond)(index, position)
    }

    fn restart(&mut self) -> Result<(), OracleError> {
        self.restarts += 1;
        if self.restart_fails {
            Err(OracleError::NotRunning)
        } else {
            Ok(())
        }
    }

    fn shutdown(&mut self) {
        self.shutdowns += 1;
    }
}

fn silent_oracle() -> ScriptedOracle<impl FnMut(usize, &Position) -> Reply> {
    ScriptedOracle::new(|_: usize, _: &Position| Ok(None))
}

/// Black agent that has just been told White moved without capturing.
fn black_after_first_white_move<F>(oracle: ScriptedOracle<F>) -> BeliefAgent<ScriptedOracle<F>>
where
    F: FnMut(usize, &Position) -> Reply,
{
    let mut agent = BeliefAgent::with_seed(oracle, AgentParams::default(), 7);
    agent.handle_game_start(Color::Black, &Position::starting(), "white");
    agent.handle_opponent_move_result(false, None);
    agent
}

fn black_menu_after(uci: &str) -> Vec<Move> {
    move_actions(&Position::starting().play(mv(uci)))
}

#[test]
fn white_skips_the_first_opponent_report() {
    let mut agent = BeliefAgent::with_seed(silent_oracle(), AgentParams::default(), 1);
    agent.handle_game_start(Color::White, &Position::starting(), "black");
    agent.handle_opponent_move_result(false, None);
    assert_eq!(agent.beliefs().map(|b| b.len()), Some(1));
}

#[test]
fn black_expands_to_twenty_after_first_report() {
    let agent = black_after_first_white_move(silent_oracle());
    assert_eq!(agent.beliefs().map(|b| b.len()), Some(20));
}

#[test]
fn immediate_king_capture_beats_the_oracle() {
    let oracle = ScriptedOracle::new(|_: usize, _: &Position| Ok(Some(mv("e1e2"))));
    let mut agent = BeliefAgent::with_seed(oracle, AgentParams::default(), 2);
    let board = Position::from_fen("k7/8/8/8/8/8/8/R3K3 w - - 0 1").expect("fen");
    agent.handle_game_start(Color::White, &board, "black");

    let chosen = agent.choose_move(&move_actions(&board), 30.0);
    assert_eq!(chosen, Some(mv("a1a8")));
    assert_eq!(agent.oracle().queries, 0);
    assert_eq!(
        agent.last_selection().map(|s| s.source),
        Some(MoveSource::KingCapture)
    );
}

#[test]
fn most_recommended_legal_move_wins() {
    let e4_pawn = Some(Piece::new(PieceKind::Pawn, Color::White));
    let oracle = ScriptedOracle::new(move |_: usize, position: &Position| {
        if position.piece_at(sq("e4")) == e4_pawn {
            Ok(Some(mv("c7c5")))
        } else {
            Ok(Some(mv("e7e5")))
        }
    });
    let mut agent = black_after_first_white_move(oracle);

    let chosen = agent.choose_move(&black_menu_after("e2e4"), 30.0);
    assert_eq!(chosen, Some(mv("e7e5")));
    let selection = agent.last_selection().expect("selection");
    assert_eq!(selection.source, MoveSource::Oracle { votes: 19 });
    assert_eq!(selection.queried, 20);
    assert_eq!(agent.oracle().queries, 20);
}

#[test]
fn unlisted_recommendations_fall_back_to_random_menu_move() {
    let oracle = ScriptedOracle::new(|_: usize, _: &Position| Ok(Some(mv("a7a1"))));
    let mut agent = black_after_first_white_move(oracle);
    let menu = black_menu_after("d2d4");

    let chosen = agent.choose_move(&menu, 30.0).expect("a move");
    assert!(menu.contains(&chosen));
    assert_eq!(
        agent.last_selection().map(|s| s.source),
        Some(MoveSource::Random)
    );
}

#[test]
fn oracle_failures_restart_and_skip_the_vote() {
    let oracle = ScriptedOracle::new(|index: usize, _: &Position| {
        if index % 2 == 0 {
            Err(OracleError::Terminated)
        } else {
            Ok(Some(mv("g8f6")))
        }
    });
    let mut agent = black_after_first_white_move(oracle);

    let chosen = agent.choose_move(&black_menu_after("e2e4"), 30.0);
    assert_eq!(chosen, Some(mv("g8f6")));
    let selection = agent.last_selection().expect("selection");
    assert_eq!(selection.failures, 10);
    assert_eq!(selection.source, MoveSource::Oracle { votes: 10 });
    assert_eq!(agent.oracle().restarts, 10);
}

#[test]
fn failed_restart_abandons_the_vote() {
    let mut oracle = ScriptedOracle::new(|_: usize, _: &Position| Err(OracleError::Terminated));
    oracle.restart_fails = true;
    let mut agent = black_after_first_white_move(oracle);
    let menu = black_menu_after("e2e4");

    let chosen = agent.choose_move(&menu, 30.0).expect("a move");
    assert!(menu.contains(&chosen));
    assert_eq!(agent.oracle().queries, 1);
    assert_eq!(agent.oracle().restarts, 1);
}

#[test]
fn empty_beliefs_degrade_to_random_choices() {
    let mut agent = black_after_first_white_move(silent_oracle());
    let queen = Some(Piece::new(PieceKind::Queen, Color::White));
    agent.handle_sense_result(&SenseObservation::new(vec![(sq("e5"), queen)]));
    assert_eq!(agent.beliefs().map(|b| b.len()), Some(0));

    let squares: Vec<Square> = Square::all().collect();
    let menu = black_menu_after("e2e4");
    let sense = agent.choose_sense(&squares, &menu, 30.0);
    assert!(sense.is_some_and(|square| !square.is_edge()));
    let chosen = agent.choose_move(&menu, 30.0);
    assert!(chosen.is_some_and(|m| menu.contains(&m)));
    assert_eq!(agent.oracle().queries, 0);
}

#[test]
fn empty_expansion_keeps_prior_beliefs_and_targets_lost_square() {
    let mut agent = BeliefAgent::with_seed(silent_oracle(), AgentParams::default(), 3);
    agent.handle_game_start(Color::Black, &Position::starting(), "white");
    // No capture exists from the opening, so the expansion is empty.
    agent.handle_opponent_move_result(true, Some(sq("d7")));
    assert_eq!(agent.beliefs().map(|b| b.len()), Some(1));
    assert_eq!(
        agent.tracker().and_then(|t| t.my_piece_captured),
        Some(sq("d7"))
    );

    let squares: Vec<Square> = Square::all().collect();
    let sense = agent.choose_sense(&squares, &[], 30.0);
    assert_eq!(sense, Some(sq("d7")));
}

#[test]
fn sensed_king_updates_tracker() {
    let mut agent = black_after_first_white_move(silent_oracle());
    assert_eq!(agent.tracker().and_then(|t| t.opponent_king), Some(Square::E1));
    let king = Some(Piece::new(PieceKind::King, Color::White));
    agent.handle_sense_result(&SenseObservation::new(vec![(sq("d3"), None), (sq("e2"), king)]));
    assert_eq!(agent.tracker().and_then(|t| t.opponent_king), Some(sq("e2")));
}

#[test]
fn move_result_advances_candidates() {
    let mut agent = BeliefAgent::with_seed(silent_oracle(), AgentParams::default(), 4);
    agent.handle_game_start(Color::White, &Position::starting(), "black");
    let outcome = MoveOutcome {
        requested: Some(mv("e2e4")),
        taken: Some(mv("e2e4")),
        captured: false,
        capture_square: None,
    };
    agent.handle_move_result(&outcome);
    let expected = Position::starting().play(mv("e2e4"));
    let beliefs = agent.beliefs().expect("in game");
    assert_eq!(beliefs.len(), 1);
    assert!(beliefs.contains(&expected));
    assert_eq!(agent.tracker().map(|t| t.moves_made), Some(1));
}

#[test]
fn refereed_turn_keeps_the_true_board() {
    let oracle = ScriptedOracle::new(|_: usize, _: &Position| Ok(Some(mv("e7e5"))));
    let mut agent = BeliefAgent::with_seed(oracle, AgentParams::default(), 5);
    let mut referee = Referee::new(Position::starting(), Duration::from_secs(900), None);
    agent.handle_game_start(Color::Black, referee.board(), "white");

    referee.apply_move(None, Some(mv("e2e4")));
    let (captured, square) = referee.opponent_move_result();
    agent.handle_opponent_move_result(captured, square);

    let sense_actions = referee.sense_actions();
    let menu = referee.move_actions();
    let sense = agent.choose_sense(&sense_actions, &menu, 900.0);
    agent.handle_sense_result(&referee.sense(sense));
    assert!(agent.beliefs().is_some_and(|b| b.contains(referee.board())));

    let requested = agent.choose_move(&menu, 900.0);
    assert_eq!(requested, Some(mv("e7e5")));
    let outcome = referee.apply_move(sense, requested);
    agent.handle_move_result(&outcome);
    assert!(agent.beliefs().is_some_and(|b| b.contains(referee.board())));

    agent.handle_game_end(None, None, referee.history());
    assert_eq!(agent.oracle().shutdowns, 1);
    assert!(agent.beliefs().is_none());
}
