mod random;

pub use random::RandomPlayer;

use rbc_core::belief::{MoveOutcome, SenseObservation};
use rbc_core::game::history::GameHistory;
use rbc_core::game::referee::WinReason;
use rbc_core::model::chess_move::Move;
use rbc_core::model::color::Color;
use rbc_core::model::position::Position;
use rbc_core::model::square::Square;

/// Lifecycle hooks a game driver calls on each player, in order, every turn.
pub trait Player {
    fn handle_game_start(&mut self, color: Color, board: &Position, opponent_name: &str);

    /// What the opponent's last move did to us; called at the start of every own turn.
    fn handle_opponent_move_result(
        &mut self,
        _captured_my_piece: bool,
        _capture_square: Option<Square>,
    ) {
    }

    fn choose_sense(
        &mut self,
        sense_actions: &[Square],
        move_actions: &[Move],
        seconds_left: f64,
    ) -> Option<Square>;

    fn handle_sense_result(&mut self, _observation: &SenseObservation) {}

    /// `None` passes the turn.
    fn choose_move(&mut self, move_actions: &[Move], seconds_left: f64) -> Option<Move>;

    fn handle_move_result(&mut self, _outcome: &MoveOutcome) {}

    fn handle_game_end(
        &mut self,
        _winner: Option<Color>,
        _reason: Option<WinReason>,
        _history: &GameHistory,
    ) {
    }
}
