use super::BeliefSet;
use crate::model::color::Color;
use crate::model::square::Square;
use std::collections::HashMap;

/// Coarse summary of a belief set, for logging.
#[derive(Debug, Clone, PartialEq)]
pub struct BeliefMetrics {
    pub candidates: usize,
    pub king_squares: usize,
    pub modal_king_square: Option<Square>,
    pub modal_king_share: f32,
}

impl BeliefMetrics {
    /// Summarises where the king of `perspective`'s opponent might be.
    pub fn from_set(beliefs: &BeliefSet, perspective: Color) -> Self {
        let mut counts: HashMap<Square, usize> = HashMap::new();
        for candidate in beliefs {
            if let Some(king) = candidate.king(perspective.opposite()) {
                *counts.entry(king).or_default() += 1;
            }
        }

        let modal = counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(square, count)| (*square, *count));

        let modal_king_share = match modal {
            Some((_, count)) if !beliefs.is_empty() => count as f32 / beliefs.len() as f32,
            _ => 0.0,
        };

        Self {
            candidates: beliefs.len(),
            king_squares: counts.len(),
            modal_king_square: modal.map(|(square, _)| square),
            modal_king_share,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BeliefMetrics;
    use crate::belief::{BeliefSet, expand_opponent_moves};
    use crate::model::color::Color;
    use crate::model::position::Position;
    use crate::model::square::Square;

    #[test]
    fn opening_king_is_pinned_down() {
        let set = expand_opponent_moves(&BeliefSet::from_position(Position::starting()), false);
        let metrics = BeliefMetrics::from_set(&set, Color::Black);
        assert_eq!(metrics.candidates, 20);
        assert_eq!(metrics.king_squares, 1);
        assert_eq!(metrics.modal_king_square, Some(Square::E1));
        assert!((metrics.modal_king_share - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_set_has_no_mode() {
        let metrics = BeliefMetrics::from_set(&BeliefSet::new(), Color::White);
        assert_eq!(metrics.candidates, 0);
        assert_eq!(metrics.modal_king_square, None);
        assert_eq!(metrics.modal_king_share, 0.0);
    }
}
