//! The belief set: every candidate position not yet ruled out.

use crate::model::position::Position;
use std::collections::HashSet;
use std::collections::hash_set;

/// Unordered collection of unique candidate positions.
///
/// Filtering and expansion never mutate a set in place; each step builds a
/// fresh set that replaces the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeliefSet {
    candidates: HashSet<Position>,
}

impl BeliefSet {
    pub fn new() -> Self {
        Self {
            candidates: HashSet::new(),
        }
    }

    /// Seeds a set with exactly one known position (game start).
    pub fn from_position(position: Position) -> Self {
        let mut candidates = HashSet::with_capacity(1);
        candidates.insert(position);
        Self { candidates }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            candidates: HashSet::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn contains(&self, position: &Position) -> bool {
        self.candidates.contains(position)
    }

    pub fn iter(&self) -> hash_set::Iter<'_, Position> {
        self.candidates.iter()
    }

    /// Adds a candidate while a new set is being assembled; duplicates collapse.
    pub(crate) fn insert(&mut self, position: Position) -> bool {
        self.candidates.insert(position)
    }
}

impl FromIterator<Position> for BeliefSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self {
            candidates: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for BeliefSet {
    type Item = Position;
    type IntoIter = hash_set::IntoIter<Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.into_iter()
    }
}

impl<'a> IntoIterator for &'a BeliefSet {
    type Item = &'a Position;
    type IntoIter = hash_set::Iter<'a, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}
