//! Opponent-move expansion: every hidden move the opponent could have made.

use super::BeliefSet;
use crate::model::chess_move::Move;
use crate::model::position::{CastlingSide, Position};
use crate::model::square::Square;

/// Expands each candidate by every opponent move consistent with the capture signal.
///
/// With `captured_my_piece == false` the successors come from moves (and the
/// pass) whose destination is empty, plus castling. With `true` they come from
/// every capturing move, en passant included. The result may be empty; the
/// caller decides whether to keep the prior set.
pub fn expand_opponent_moves(beliefs: &BeliefSet, captured_my_piece: bool) -> BeliefSet {
    let mut next = BeliefSet::with_capacity(beliefs.len() * 24);
    for candidate in beliefs {
        let successors = if captured_my_piece {
            capture_successors(candidate)
        } else {
            let mut quiet = quiet_successors(candidate);
            quiet.extend(castling_successors(candidate));
            quiet
        };
        for successor in successors {
            next.insert(successor);
        }
    }
    next
}

/// Successors for moves onto empty squares. The pass is encoded as the null
/// move `a1a1` and is subject to the same empty-destination test.
pub fn quiet_successors(position: &Position) -> Vec<Position> {
    position
        .pseudo_legal_moves()
        .into_iter()
        .chain(std::iter::once(Move::NULL))
        .filter(|mv| position.is_empty_at(mv.to))
        .map(|mv| position.play(mv))
        .collect()
}

/// Successors for every capturing move of the side to move.
pub fn capture_successors(position: &Position) -> Vec<Position> {
    position
        .pseudo_legal_moves()
        .into_iter()
        .filter(|mv| position.is_capture(*mv))
        .map(|mv| position.play(mv))
        .collect()
}

/// At most two successors: one two-file king step per castling right the side
/// to move still holds, whenever the king's destination square is empty. The
/// squares the king and rook pass over are not inspected, so a castle behind a
/// piece we only believe is there still survives.
pub fn castling_successors(position: &Position) -> Vec<Position> {
    let mover = position.turn();
    let Some(king) = position.king(mover) else {
        return Vec::new();
    };
    CastlingSide::BOTH
        .into_iter()
        .filter(|side| position.has_castling_right(mover, *side))
        .filter_map(|side| Square::from_coords(side.king_target_file(), king.rank()))
        .filter(|to| position.is_empty_at(*to))
        .map(|to| position.play(Move::new(king, to)))
        .collect()
}
