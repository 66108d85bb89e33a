//! Move selection: immediate king captures first, then an oracle vote.

use super::{AgentParams, TrackerState};
use crate::oracle::Oracle;
use rand::Rng;
use rand::seq::SliceRandom;
use rbc_core::belief::{BeliefSet, cap};
use rbc_core::model::chess_move::Move;
use rbc_core::model::color::Color;
use rbc_core::model::piece::PieceKind;
use std::collections::HashMap;
use tracing::{Level, event};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    KingCapture,
    Oracle { votes: usize },
    Random,
    NoMoves,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSelection {
    pub chosen: Option<Move>,
    pub source: MoveSource,
    pub queried: usize,
    pub failures: usize,
}

impl MoveSelection {
    fn new(chosen: Option<Move>, source: MoveSource) -> Self {
        Self {
            chosen,
            source,
            queried: 0,
            failures: 0,
        }
    }
}

/// Chooses a move and returns the (possibly capped) belief set alongside it.
pub fn choose_move<O, R>(
    beliefs: BeliefSet,
    move_actions: &[Move],
    tracker: &TrackerState,
    oracle: &mut O,
    params: &AgentParams,
    rng: &mut R,
) -> (BeliefSet, MoveSelection)
where
    O: Oracle + ?Sized,
    R: Rng + ?Sized,
{
    if move_actions.is_empty() {
        return (beliefs, MoveSelection::new(None, MoveSource::NoMoves));
    }
    if let Some(mv) = find_king_capture(&beliefs, move_actions, tracker.color) {
        return (beliefs, MoveSelection::new(Some(mv), MoveSource::KingCapture));
    }

    let beliefs = cap(&beliefs, params.sample_limit, rng);
    let selection = vote_with_oracle(&beliefs, move_actions, oracle, params, rng);
    (beliefs, selection)
}

/// A move in `move_actions` that takes the opponent king in some candidate.
pub fn find_king_capture(beliefs: &BeliefSet, move_actions: &[Move], color: Color) -> Option<Move> {
    for candidate in beliefs {
        let Some(king) = candidate.king(color.opposite()) else {
            continue;
        };
        for attacker in candidate.attackers(color, king) {
            let direct = Move::new(attacker, king);
            if move_actions.contains(&direct) {
                return Some(direct);
            }
            let pawn = candidate
                .piece_at(attacker)
                .is_some_and(|piece| piece.kind == PieceKind::Pawn);
            if pawn {
                let promoting = Move::with_promotion(attacker, king, PieceKind::Queen);
                if move_actions.contains(&promoting) {
                    return Some(promoting);
                }
            }
        }
    }
    None
}

/// Polls the oracle once per valid candidate and returns the most
/// recommended move that is on the menu.
pub fn vote_with_oracle<O, R>(
    beliefs: &BeliefSet,
    move_actions: &[Move],
    oracle: &mut O,
    params: &AgentParams,
    rng: &mut R,
) -> MoveSelection
where
    O: Oracle + ?Sized,
    R: Rng + ?Sized,
{
    let slice = params.time_slice(beliefs.len());
    let mut tally = Tally::default();
    let mut queried = 0;
    let mut failures = 0;

    for candidate in beliefs {
        if candidate.validate().is_err() {
            continue;
        }
        queried += 1;
        match oracle.best_move(candidate, slice) {
            Ok(Some(mv)) => tally.add(mv),
            Ok(None) => {}
            Err(err) => {
                failures += 1;
                event!(
                    target: "rbc_bot::oracle",
                    Level::WARN,
                    error = %err,
                    fen = %candidate.to_fen(),
                    "oracle query failed; restarting"
                );
                if let Err(err) = oracle.restart() {
                    event!(
                        target: "rbc_bot::oracle",
                        Level::WARN,
                        error = %err,
                        "oracle restart failed; abandoning vote"
                    );
                    break;
                }
            }
        }
    }

    let (chosen, source) = match tally.best_among(move_actions) {
        Some((mv, votes)) => (Some(mv), MoveSource::Oracle { votes }),
        None => (move_actions.choose(rng).copied(), MoveSource::Random),
    };
    MoveSelection {
        chosen,
        source,
        queried,
        failures,
    }
}

/// Vote counts that remember first-recommendation order for tie breaks.
#[derive(Debug, Default)]
struct Tally {
    order: Vec<Move>,
    counts: HashMap<Move, usize>,
}

impl Tally {
    fn add(&mut self, mv: Move) {
        let count = self.counts.entry(mv).or_insert(0);
        if *count == 0 {
            self.order.push(mv);
        }
        *count += 1;
    }

    fn best_among(&self, allowed: &[Move]) -> Option<(Move, usize)> {
        let mut best: Option<(Move, usize)> = None;
        for mv in &self.order {
            if !allowed.contains(mv) {
                continue;
            }
            let votes = self.counts.get(mv).copied().unwrap_or(0);
            if best.is_none_or(|(_, top)| votes > top) {
                best = Some((*mv, votes));
            }
        }
        best
    }
}
