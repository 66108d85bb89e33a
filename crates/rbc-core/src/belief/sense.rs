//! Sense observations and the filter that applies them.

use super::BeliefSet;
use crate::model::color::Color;
use crate::model::piece::{Piece, PieceKind};
use crate::model::position::Position;
use crate::model::square::Square;
use serde::{Deserialize, Serialize};

/// Contents of every square revealed by one sense.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SenseObservation {
    squares: Vec<(Square, Option<Piece>)>,
}

impl SenseObservation {
    pub fn new(squares: Vec<(Square, Option<Piece>)>) -> Self {
        Self { squares }
    }

    /// Reads the observed squares off a known position.
    pub fn observe(position: &Position, squares: impl IntoIterator<Item = Square>) -> Self {
        Self {
            squares: squares
                .into_iter()
                .map(|sq| (sq, position.piece_at(sq)))
                .collect(),
        }
    }

    pub fn squares(&self) -> &[(Square, Option<Piece>)] {
        &self.squares
    }

    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    /// True when `position` agrees on occupancy, kind and color of every observed square.
    pub fn matches(&self, position: &Position) -> bool {
        self.squares
            .iter()
            .all(|(square, seen)| position.piece_at(*square) == *seen)
    }

    /// First observed square holding the king of the side opposing `perspective`.
    pub fn opponent_king(&self, perspective: Color) -> Option<Square> {
        let wanted = Piece::new(PieceKind::King, perspective.opposite());
        self.squares
            .iter()
            .find(|(_, seen)| *seen == Some(wanted))
            .map(|(square, _)| *square)
    }
}

/// Keeps the candidates that agree with every observed square.
///
/// An empty result is returned as-is.
pub fn filter_by_sense(beliefs: &BeliefSet, observation: &SenseObservation) -> BeliefSet {
    beliefs
        .iter()
        .filter(|candidate| observation.matches(candidate))
        .cloned()
        .collect()
}
