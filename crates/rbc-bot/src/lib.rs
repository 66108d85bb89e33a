pub mod bot;
pub mod oracle;
pub mod policy;

pub use bot::{AgentParams, BeliefAgent, MoveSelection, MoveSource, TrackerState};
pub use oracle::{EngineConfig, Oracle, OracleError, UciEngine};
pub use policy::{Player, RandomPlayer};
