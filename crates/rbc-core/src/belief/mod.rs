//! Belief tracking over candidate positions.
//!
//! This module is composed of:
//! - `set`: the `BeliefSet` container of unique candidates.
//! - `expand`: successors for every hidden opponent move.
//! - `sense`: observations and the filter that applies them.
//! - `outcome`: narrowing and advancing after our own move.
//! - `sampler`: the cardinality cap.
//! - `telemetry`: summaries for logging.

mod expand;
mod outcome;
mod sampler;
mod sense;
mod set;
pub mod telemetry;

pub use expand::{capture_successors, castling_successors, expand_opponent_moves, quiet_successors};
pub use outcome::{MoveOutcome, apply_move_result};
pub use sampler::{DEFAULT_SAMPLE_LIMIT, cap};
pub use sense::{SenseObservation, filter_by_sense};
pub use set::BeliefSet;
