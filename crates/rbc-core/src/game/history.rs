use crate::game::referee::WinReason;
use crate::model::chess_move::Move;
use crate::model::color::Color;
use crate::model::square::Square;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TurnRecord {
    pub color: Color,
    pub sense: Option<Square>,
    pub requested: Option<Move>,
    pub taken: Option<Move>,
    pub capture_square: Option<Square>,
    pub fen_after: String,
}

/// Full record of a local game, serialisable for later replay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameHistory {
    pub start_fen: String,
    pub turns: Vec<TurnRecord>,
    pub winner: Option<Color>,
    pub reason: Option<WinReason>,
}

impl GameHistory {
    pub fn new(start_fen: String) -> Self {
        Self {
            start_fen,
            turns: Vec::new(),
            winner: None,
            reason: None,
        }
    }

    pub(crate) fn push(&mut self, record: TurnRecord) {
        self.turns.push(record);
    }

    pub(crate) fn finish(&mut self, winner: Option<Color>, reason: WinReason) {
        self.winner = winner;
        self.reason = Some(reason);
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    pub fn captures_by(&self, color: Color) -> usize {
        self.turns
            .iter()
            .filter(|turn| turn.color == color && turn.capture_square.is_some())
            .count()
    }

    pub fn summary(&self) -> String {
        let result = match (self.winner, self.reason) {
            (Some(color), Some(reason)) => format!("{color} wins by {}", reason.as_str()),
            (None, Some(reason)) => format!("draw by {}", reason.as_str()),
            _ => "unfinished".to_string(),
        };
        format!("{} turns, {result}", self.turns.len())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::GameHistory;
    use crate::game::referee::Referee;
    use crate::model::position::Position;
    use std::time::Duration;

    #[test]
    fn history_serializes_moves_as_uci() {
        let mut referee = Referee::new(Position::starting(), Duration::from_secs(10), None);
        referee.apply_move(Some("e4".parse().unwrap()), Some("e2e4".parse().unwrap()));
        let json = referee.history().to_json().unwrap();
        assert!(json.contains("\"requested\": \"e2e4\""));
        assert!(json.contains("\"sense\": \"e4\""));

        let restored = GameHistory::from_json(&json).unwrap();
        assert_eq!(&restored, referee.history());
        assert_eq!(restored.summary(), "1 turns, unfinished");
    }

    #[test]
    fn finished_summary_names_winner() {
        let start = Position::from_fen("4k3/8/8/8/8/8/8/4KQ2 w - - 0 1").unwrap();
        let mut referee = Referee::new(start, Duration::from_secs(10), None);
        referee.apply_move(None, Some("f1f7".parse().unwrap()));
        referee.apply_move(None, None);
        referee.apply_move(None, Some("f7e8".parse().unwrap()));
        let history = referee.history();
        assert_eq!(history.captures_by(crate::model::color::Color::White), 1);
        assert_eq!(history.summary(), "3 turns, White wins by king_capture");
    }
}
