use std::time::{Duration, Instant};

use rbc_bot::policy::Player;
use rbc_core::game::history::GameHistory;
use rbc_core::game::referee::{Referee, WinReason};
use rbc_core::model::color::Color;
use rbc_core::model::position::Position;
use tracing::{Level, event};

/// What a finished local game produced.
pub struct GameOutcome {
    pub winner: Option<Color>,
    pub reason: Option<WinReason>,
    pub history: GameHistory,
    pub seconds_left: [f64; 2],
    pub elapsed: Duration,
}

/// Plays one game between `players[0]` (White) and `players[1]` (Black).
///
/// Off-menu senses and moves are treated as no sense and a pass.
pub fn play_game(
    players: [&mut dyn Player; 2],
    names: [&str; 2],
    clock: Duration,
    max_fullmoves: Option<u32>,
) -> GameOutcome {
    let started = Instant::now();
    let mut referee = Referee::new(Position::starting(), clock, max_fullmoves);
    let mut seats = players;

    for color in Color::BOTH {
        let opponent = names[color.opposite().index()];
        seats[color.index()].handle_game_start(color, referee.board(), opponent);
    }

    while !referee.is_over() {
        let color = referee.turn();
        let player = &mut seats[color.index()];
        let turn_start = Instant::now();

        let (captured, capture_square) = referee.opponent_move_result();
        player.handle_opponent_move_result(captured, capture_square);

        let sense_actions = referee.sense_actions();
        let move_actions = referee.move_actions();
        let sense = player
            .choose_sense(&sense_actions, &move_actions, referee.seconds_left(color))
            .filter(|square| sense_actions.contains(square));
        player.handle_sense_result(&referee.sense(sense));

        let requested = player
            .choose_move(&move_actions, referee.seconds_left(color))
            .filter(|mv| move_actions.contains(mv));

        referee.charge(color, turn_start.elapsed());
        if referee.is_over() {
            break;
        }

        let outcome = referee.apply_move(sense, requested);
        player.handle_move_result(&outcome);

        event!(
            target: "rbc_bench::game",
            Level::DEBUG,
            color = %color,
            sense = ?sense.map(|sq| sq.to_string()),
            requested = ?requested.map(|mv| mv.uci()),
            taken = ?outcome.taken.map(|mv| mv.uci()),
            captured = outcome.captured,
            "turn"
        );
    }

    let winner = referee.winner();
    let reason = referee.reason();
    for seat in seats.iter_mut() {
        seat.handle_game_end(winner, reason, referee.history());
    }

    GameOutcome {
        winner,
        reason,
        history: referee.history().clone(),
        seconds_left: [
            referee.seconds_left(Color::White),
            referee.seconds_left(Color::Black),
        ],
        elapsed: started.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbc_bot::policy::RandomPlayer;
    use rbc_core::belief::{MoveOutcome, SenseObservation};
    use rbc_core::model::chess_move::Move;
    use rbc_core::model::square::Square;

    /// Replays a fixed move list and records what it was told.
    struct Scripted {
        moves: Vec<Move>,
        observations: usize,
        outcomes: Vec<MoveOutcome>,
        ended: bool,
    }

    impl Scripted {
        fn new(moves: &[&str]) -> Self {
            Self {
                moves: moves.iter().rev().map(|m| m.parse().unwrap()).collect(),
                observations: 0,
                outcomes: Vec::new(),
                ended: false,
            }
        }
    }

    impl Player for Scripted {
        fn handle_game_start(&mut self, _color: Color, _board: &Position, _opponent: &str) {}

        fn choose_sense(&mut self, _: &[Square], _: &[Move], _: f64) -> Option<Square> {
            Some("e4".parse().unwrap())
        }

        fn handle_sense_result(&mut self, observation: &SenseObservation) {
            assert_eq!(observation.len(), 9);
            self.observations += 1;
        }

        fn choose_move(&mut self, _: &[Move], _: f64) -> Option<Move> {
            self.moves.pop()
        }

        fn handle_move_result(&mut self, outcome: &MoveOutcome) {
            self.outcomes.push(*outcome);
        }

        fn handle_game_end(&mut self, _: Option<Color>, _: Option<WinReason>, _: &GameHistory) {
            self.ended = true;
        }
    }

    #[test]
    fn scripted_game_ends_in_king_capture() {
        // White walks the queen into Black's king while Black shuffles.
        let mut white = Scripted::new(&["e2e3", "d1h5", "h5f7", "f7e8"]);
        let mut black = Scripted::new(&["a7a6", "a6a5", "a5a4"]);
        let outcome = play_game(
            [&mut white, &mut black],
            ["white", "black"],
            Duration::from_secs(60),
            None,
        );
        assert_eq!(outcome.winner, Some(Color::White));
        assert_eq!(outcome.reason, Some(WinReason::KingCapture));
        assert_eq!(outcome.history.turn_count(), 7);
        assert!(white.ended && black.ended);
        assert_eq!(white.observations, 4);
        assert!(white.outcomes[2].captured);
    }

    #[test]
    fn turn_limit_stops_random_games() {
        let mut white = RandomPlayer::with_seed(1);
        let mut black = RandomPlayer::with_seed(2);
        let outcome = play_game(
            [&mut white, &mut black],
            ["a", "b"],
            Duration::from_secs(60),
            Some(5),
        );
        assert!(outcome.reason.is_some());
        assert!(outcome.history.turn_count() <= 10);
    }
}
