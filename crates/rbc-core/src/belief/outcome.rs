//! Narrowing the belief set with the result of our own move.

use super::BeliefSet;
use crate::model::chess_move::Move;
use crate::model::color::Color;
use crate::model::piece::PieceKind;
use crate::model::position::Position;
use crate::model::square::Square;
use serde::{Deserialize, Serialize};

/// What the referee reports after we request a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub requested: Option<Move>,
    pub taken: Option<Move>,
    pub captured: bool,
    pub capture_square: Option<Square>,
}

impl MoveOutcome {
    pub fn passed() -> Self {
        Self::default()
    }
}

/// Keeps the candidates consistent with `outcome` and advances those where
/// a move was actually taken.
///
/// Candidates are evaluated with `perspective` to move. When a requested move
/// was rejected, only pawn requests can be explained; any other piece drops
/// the candidate.
pub fn apply_move_result(beliefs: &BeliefSet, outcome: &MoveOutcome, perspective: Color) -> BeliefSet {
    let mut next = BeliefSet::with_capacity(beliefs.len());
    for candidate in beliefs {
        let board = candidate.with_turn(perspective);
        match (outcome.taken, outcome.requested) {
            (Some(taken), _) => {
                if taken_is_consistent(&board, taken, outcome) {
                    next.insert(board.play(taken));
                }
            }
            (None, Some(requested)) => {
                if rejection_is_explained(&board, requested) {
                    next.insert(candidate.clone());
                }
            }
            (None, None) => {
                next.insert(candidate.clone());
            }
        }
    }
    next
}

fn taken_is_consistent(board: &Position, taken: Move, outcome: &MoveOutcome) -> bool {
    if !board.is_pseudo_legal(taken) {
        return false;
    }
    if outcome.captured {
        outcome
            .capture_square
            .and_then(|square| board.piece_at(square))
            .is_some_and(|victim| victim.kind != PieceKind::King)
    } else {
        board.is_empty_at(taken.to)
    }
}

/// A rejected pawn request is explained by a blocker (pushes) or by the
/// target being empty (diagonals).
fn rejection_is_explained(board: &Position, requested: Move) -> bool {
    let is_pawn = board
        .piece_at(requested.from)
        .is_some_and(|piece| piece.kind == PieceKind::Pawn);
    if !is_pawn {
        return false;
    }

    let from = requested.from;
    let to = requested.to;
    if from.file() != to.file() {
        return board.is_empty_at(to);
    }

    let rank_step = to.rank() as i8 - from.rank() as i8;
    if rank_step.abs() == 2 {
        from.offset(0, rank_step.signum())
            .is_some_and(|between| !board.is_empty_at(between))
    } else {
        !board.is_empty_at(to)
    }
}
