//! Sense square selection.

use super::{AgentParams, TrackerState};
use rand::Rng;
use rand::seq::SliceRandom;
use rbc_core::belief::BeliefSet;
use rbc_core::model::square::Square;

/// Picks where to sense next, or `None` when every offered square is on the edge.
///
/// A pending king re-sense wins, then the square of a piece we just lost.
/// Otherwise every interior square is scored against the whole belief set.
pub fn choose_sense<R: Rng + ?Sized>(
    beliefs: &BeliefSet,
    sense_actions: &[Square],
    tracker: &mut TrackerState,
    params: &AgentParams,
    rng: &mut R,
) -> Option<Square> {
    let interior: Vec<Square> = sense_actions
        .iter()
        .copied()
        .filter(|square| !square.is_edge())
        .collect();
    if interior.is_empty() {
        return None;
    }

    let roll: f64 = rng.gen_range(0.0..1.0);

    if let Some(recorded) = tracker.opponent_king_captured.take() {
        let shift: i16 = if roll < params.resense_right_chance { 1 } else { -1 };
        let shifted = u8::try_from(recorded.index() as i16 + shift)
            .ok()
            .and_then(Square::new);
        return Some(shifted.unwrap_or(recorded));
    }

    if let Some(lost) = tracker.my_piece_captured {
        return Some(lost);
    }

    if beliefs.is_empty() {
        return interior.choose(rng).copied();
    }

    let king_focus = tracker
        .opponent_king
        .filter(|_| roll < params.king_proximity_chance);
    let opponent = tracker.color.opposite();
    let mut scores = vec![0i64; interior.len()];
    for candidate in beliefs {
        if let Some(king) = king_focus {
            for (score, square) in scores.iter_mut().zip(&interior) {
                *score += i64::from(params.king_bonus - i32::from(king.distance(*square)));
            }
        }
        for (square, piece) in candidate.occupied() {
            if piece.color != opponent {
                continue;
            }
            for (score, target) in scores.iter_mut().zip(&interior) {
                *score += i64::from(params.piece_bonus - i32::from(square.distance(*target)));
            }
        }
    }

    best_scoring(&interior, &scores)
}

/// First square holding the highest score.
fn best_scoring(squares: &[Square], scores: &[i64]) -> Option<Square> {
    let mut best: Option<(Square, i64)> = None;
    for (square, score) in squares.iter().zip(scores) {
        if best.is_none_or(|(_, top)| *score > top) {
            best = Some((*square, *score));
        }
    }
    best.map(|(square, _)| square)
}
