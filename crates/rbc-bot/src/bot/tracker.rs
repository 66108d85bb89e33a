use rbc_core::model::color::Color;
use rbc_core::model::position::Position;
use rbc_core::model::square::Square;

/// Per-game facts the agent carries between lifecycle hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerState {
    pub color: Color,
    /// Last square the opponent king was known or sensed to occupy.
    pub opponent_king: Option<Square>,
    /// Where the opponent captured one of our pieces on its last move.
    pub my_piece_captured: Option<Square>,
    /// Set when our capture landed on the last-known king square without taking the king.
    pub opponent_king_captured: Option<Square>,
    /// Our own completed moves.
    pub moves_made: u32,
    awaiting_first_report: bool,
}

impl TrackerState {
    pub fn new(color: Color, start: &Position) -> Self {
        Self {
            color,
            opponent_king: start.king(color.opposite()),
            my_piece_captured: None,
            opponent_king_captured: None,
            moves_made: 0,
            awaiting_first_report: color == Color::White,
        }
    }

    /// True exactly once for White: the first opponent report precedes any opponent move.
    pub fn take_first_report(&mut self) -> bool {
        std::mem::replace(&mut self.awaiting_first_report, false)
    }

    pub fn record_opponent_capture(&mut self, square: Option<Square>) {
        self.my_piece_captured = square;
    }

    /// Notes a capture of ours; a hit on the recorded king square means the king slipped away.
    pub fn record_own_capture(&mut self, square: Option<Square>) {
        if square.is_some() && square == self.opponent_king {
            self.opponent_king_captured = square;
        }
        self.moves_made += 1;
    }
}
