//! The belief-tracking agent.
//!
//! Every hook hands the current `BeliefSet` and `TrackerState` to one of the
//! pure steps in `rbc_core::belief` or to the selectors here, and stores what
//! comes back.

mod params;
mod play;
mod sense;
mod tracker;

pub use params::AgentParams;
pub use play::{MoveSelection, MoveSource, choose_move, find_king_capture, vote_with_oracle};
pub use sense::choose_sense;
pub use tracker::TrackerState;

use crate::oracle::Oracle;
use crate::policy::Player;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rbc_core::belief::telemetry::BeliefMetrics;
use rbc_core::belief::{
    BeliefSet, MoveOutcome, SenseObservation, apply_move_result, cap, expand_opponent_moves,
    filter_by_sense,
};
use rbc_core::game::history::GameHistory;
use rbc_core::game::referee::WinReason;
use rbc_core::model::chess_move::Move;
use rbc_core::model::color::Color;
use rbc_core::model::position::Position;
use rbc_core::model::square::Square;
use tracing::{Level, event};

struct GameContext {
    tracker: TrackerState,
    beliefs: BeliefSet,
}

/// Tracks every position consistent with what it has seen and plays the
/// move an oracle recommends most often across them.
pub struct BeliefAgent<O: Oracle> {
    oracle: O,
    params: AgentParams,
    rng: SmallRng,
    game: Option<GameContext>,
    last_selection: Option<MoveSelection>,
}

impl<O: Oracle> BeliefAgent<O> {
    pub fn new(oracle: O, params: AgentParams) -> Self {
        Self::with_rng(oracle, params, SmallRng::from_entropy())
    }

    pub fn with_seed(oracle: O, params: AgentParams, seed: u64) -> Self {
        Self::with_rng(oracle, params, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(oracle: O, params: AgentParams, rng: SmallRng) -> Self {
        Self {
            oracle,
            params,
            rng,
            game: None,
            last_selection: None,
        }
    }

    pub fn params(&self) -> &AgentParams {
        &self.params
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Current candidates, or `None` outside a game.
    pub fn beliefs(&self) -> Option<&BeliefSet> {
        self.game.as_ref().map(|game| &game.beliefs)
    }

    pub fn tracker(&self) -> Option<&TrackerState> {
        self.game.as_ref().map(|game| &game.tracker)
    }

    pub fn last_selection(&self) -> Option<&MoveSelection> {
        self.last_selection.as_ref()
    }

    fn log_step(&self, step: &'static str, before: usize) {
        let Some(game) = &self.game else {
            return;
        };
        event!(
            target: "rbc_bot::agent",
            Level::DEBUG,
            step,
            color = %game.tracker.color,
            before,
            after = game.beliefs.len(),
            "belief update"
        );
    }
}

impl<O: Oracle> Player for BeliefAgent<O> {
    fn handle_game_start(&mut self, color: Color, board: &Position, opponent_name: &str) {
        event!(
            target: "rbc_bot::agent",
            Level::INFO,
            color = %color,
            opponent = opponent_name,
            fen = %board.to_fen(),
            "game start"
        );
        self.game = Some(GameContext {
            tracker: TrackerState::new(color, board),
            beliefs: BeliefSet::from_position(board.clone()),
        });
        self.last_selection = None;
    }

    fn handle_opponent_move_result(&mut self, captured_my_piece: bool, capture_square: Option<Square>) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        if game.tracker.take_first_report() {
            return;
        }
        let before = game.beliefs.len();
        game.tracker
            .record_opponent_capture(capture_square.filter(|_| captured_my_piece));

        let expanded = expand_opponent_moves(&game.beliefs, captured_my_piece);
        if expanded.is_empty() {
            event!(
                target: "rbc_bot::agent",
                Level::WARN,
                captured_my_piece,
                before,
                "opponent expansion produced no candidates; keeping prior beliefs"
            );
        } else {
            game.beliefs = cap(&expanded, self.params.sample_limit, &mut self.rng);
        }
        self.log_step("opponent_move", before);
    }

    fn choose_sense(
        &mut self,
        sense_actions: &[Square],
        _move_actions: &[Move],
        seconds_left: f64,
    ) -> Option<Square> {
        let Some(game) = self.game.as_mut() else {
            return sense_actions.choose(&mut self.rng).copied();
        };
        let chosen = choose_sense(
            &game.beliefs,
            sense_actions,
            &mut game.tracker,
            &self.params,
            &mut self.rng,
        );
        event!(
            target: "rbc_bot::agent",
            Level::DEBUG,
            sense = ?chosen.map(|sq| sq.to_string()),
            candidates = game.beliefs.len(),
            seconds_left,
            "sense chosen"
        );
        chosen
    }

    fn handle_sense_result(&mut self, observation: &SenseObservation) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        if let Some(king) = observation.opponent_king(game.tracker.color) {
            game.tracker.opponent_king = Some(king);
        }
        let before = game.beliefs.len();
        game.beliefs = filter_by_sense(&game.beliefs, observation);
        if game.beliefs.is_empty() {
            event!(
                target: "rbc_bot::agent",
                Level::WARN,
                before,
                "sense eliminated every candidate"
            );
        }
        self.log_step("sense", before);
    }

    fn choose_move(&mut self, move_actions: &[Move], seconds_left: f64) -> Option<Move> {
        let Some(game) = self.game.as_mut() else {
            return move_actions.choose(&mut self.rng).copied();
        };
        let before = game.beliefs.len();
        let beliefs = std::mem::take(&mut game.beliefs);
        let (beliefs, selection) = choose_move(
            beliefs,
            move_actions,
            &game.tracker,
            &mut self.oracle,
            &self.params,
            &mut self.rng,
        );
        game.beliefs = beliefs;

        let metrics = BeliefMetrics::from_set(&game.beliefs, game.tracker.color);
        event!(
            target: "rbc_bot::agent",
            Level::INFO,
            color = %game.tracker.color,
            before,
            candidates = metrics.candidates,
            king_squares = metrics.king_squares,
            modal_king_share = metrics.modal_king_share,
            source = ?selection.source,
            queried = selection.queried,
            failures = selection.failures,
            chosen = ?selection.chosen.map(|mv| mv.uci()),
            seconds_left,
            "move chosen"
        );
        let chosen = selection.chosen;
        self.last_selection = Some(selection);
        chosen
    }

    fn handle_move_result(&mut self, outcome: &MoveOutcome) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        let before = game.beliefs.len();
        game.beliefs = apply_move_result(&game.beliefs, outcome, game.tracker.color);
        game.tracker
            .record_own_capture(outcome.capture_square.filter(|_| outcome.captured));
        self.log_step("move_result", before);
    }

    fn handle_game_end(
        &mut self,
        winner: Option<Color>,
        reason: Option<WinReason>,
        history: &GameHistory,
    ) {
        self.oracle.shutdown();
        let color = self.game.take().map(|game| game.tracker.color);
        event!(
            target: "rbc_bot::agent",
            Level::INFO,
            color = ?color,
            winner = ?winner,
            reason = ?reason,
            summary = %history.summary(),
            "game end"
        );
    }
}
