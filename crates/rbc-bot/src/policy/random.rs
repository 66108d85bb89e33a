use super::Player;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rbc_core::model::chess_move::Move;
use rbc_core::model::color::Color;
use rbc_core::model::position::Position;
use rbc_core::model::square::Square;

/// Senses and moves uniformly at random. Useful as a baseline opponent.
pub struct RandomPlayer {
    rng: SmallRng,
}

impl RandomPlayer {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Player for RandomPlayer {
    fn handle_game_start(&mut self, _color: Color, _board: &Position, _opponent_name: &str) {}

    fn choose_sense(
        &mut self,
        sense_actions: &[Square],
        _move_actions: &[Move],
        _seconds_left: f64,
    ) -> Option<Square> {
        sense_actions.choose(&mut self.rng).copied()
    }

    fn choose_move(&mut self, move_actions: &[Move], _seconds_left: f64) -> Option<Move> {
        move_actions.choose(&mut self.rng).copied()
    }
}
