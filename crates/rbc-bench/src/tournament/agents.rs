use std::path::PathBuf;
use std::time::Duration;

use rbc_bot::oracle::{EngineConfig, OracleError, UciEngine};
use rbc_bot::policy::{Player, RandomPlayer};
use rbc_bot::{AgentParams, BeliefAgent};
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{AgentConfig, AgentKind};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid parameter for agent '{name}': {message}")]
    InvalidParam { name: String, message: String },
    #[error("agent '{name}' could not start its engine: {source}")]
    Engine {
        name: String,
        #[source]
        source: OracleError,
    },
}

/// A validated recipe for building fresh players for every game.
pub(super) struct AgentBlueprint {
    pub(super) name: String,
    implementation: AgentImplementation,
}

enum AgentImplementation {
    Belief(BeliefOptions),
    Random,
}

impl AgentBlueprint {
    pub(super) fn from_configs(configs: &[AgentConfig]) -> Result<Vec<Self>, AgentError> {
        configs.iter().map(Self::from_config).collect()
    }

    fn from_config(config: &AgentConfig) -> Result<Self, AgentError> {
        let implementation = match config.kind {
            AgentKind::Belief => {
                AgentImplementation::Belief(BeliefOptions::from_params(&config.name, &config.params)?)
            }
            AgentKind::Random => AgentImplementation::Random,
        };
        Ok(Self {
            name: config.name.clone(),
            implementation,
        })
    }

    pub(super) fn spawn_player(&self, seed: u64) -> Result<Box<dyn Player>, AgentError> {
        match &self.implementation {
            AgentImplementation::Random => Ok(Box::new(RandomPlayer::with_seed(seed))),
            AgentImplementation::Belief(options) => {
                let engine = UciEngine::launch(&options.engine).map_err(|source| {
                    AgentError::Engine {
                        name: self.name.clone(),
                        source,
                    }
                })?;
                event!(
                    target: "rbc_bench::agents",
                    Level::DEBUG,
                    agent = %self.name,
                    sample_limit = options.params.sample_limit,
                    "belief agent ready"
                );
                Ok(Box::new(BeliefAgent::with_seed(
                    engine,
                    options.params.clone(),
                    seed,
                )))
            }
        }
    }
}

/// Belief agent settings: YAML params first, then the environment, then defaults.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct BeliefOptions {
    pub(super) engine: EngineConfig,
    pub(super) params: AgentParams,
}

impl BeliefOptions {
    fn from_params(name: &str, params: &serde_yaml::Value) -> Result<Self, AgentError> {
        Self::from_params_with(name, params, EngineConfig::from_env(), AgentParams::from_env())
    }

    pub(super) fn from_params_with(
        name: &str,
        params: &serde_yaml::Value,
        env_engine: EngineConfig,
        env_params: AgentParams,
    ) -> Result<Self, AgentError> {
        let invalid = |message: &str| AgentError::InvalidParam {
            name: name.to_string(),
            message: message.to_string(),
        };

        let mut engine = EngineConfig::default();
        let mut agent_params = env_params;

        if !params.is_null() {
            let mapping = params
                .as_mapping()
                .ok_or_else(|| invalid("expected mapping for belief params"))?;

            for (key, value) in mapping {
                match key.as_str() {
                    Some("engine") => {
                        let path = value
                            .as_str()
                            .ok_or_else(|| invalid("engine must be a string"))?;
                        engine.path = Some(PathBuf::from(path));
                    }
                    Some("args") => {
                        let seq = value
                            .as_sequence()
                            .ok_or_else(|| invalid("args must be an array of strings"))?;
                        engine.args = seq
                            .iter()
                            .filter_map(|v| v.as_str().map(|s| s.to_string()))
                            .collect();
                    }
                    Some("sample_limit") => {
                        let limit = value
                            .as_u64()
                            .filter(|limit| *limit > 0)
                            .ok_or_else(|| invalid("sample_limit must be a positive integer"))?;
                        agent_params.sample_limit = usize::try_from(limit)
                            .map_err(|_| invalid("sample_limit is too large"))?;
                    }
                    Some("move_budget_secs") => {
                        let secs = value
                            .as_f64()
                            .filter(|secs| secs.is_finite() && *secs > 0.0)
                            .ok_or_else(|| invalid("move_budget_secs must be a positive number"))?;
                        agent_params.move_budget = Duration::from_secs_f64(secs);
                    }
                    _ => {}
                }
            }
        }

        let engine = engine.or(env_engine);
        if engine.path.is_none() {
            return Err(invalid(
                "no engine configured; set params.engine or STOCKFISH_EXECUTABLE",
            ));
        }

        Ok(Self {
            engine,
            params: agent_params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> serde_yaml::Value {
        serde_yaml::from_str(text).expect("yaml")
    }

    #[test]
    fn params_override_environment() {
        let options = BeliefOptions::from_params_with(
            "belief",
            &yaml("engine: /opt/sf\nargs: [\"--threads\", \"1\"]\nsample_limit: 500\nmove_budget_secs: 2.5\n"),
            EngineConfig::new("/env/sf"),
            AgentParams::default(),
        )
        .expect("valid");
        assert_eq!(options.engine.path, Some(PathBuf::from("/opt/sf")));
        assert_eq!(options.engine.args, vec!["--threads", "1"]);
        assert_eq!(options.params.sample_limit, 500);
        assert_eq!(options.params.move_budget, Duration::from_millis(2500));
    }

    #[test]
    fn environment_engine_fills_gap() {
        let options = BeliefOptions::from_params_with(
            "belief",
            &yaml("{}"),
            EngineConfig::new("/env/sf"),
            AgentParams::default(),
        )
        .expect("valid");
        assert_eq!(options.engine.path, Some(PathBuf::from("/env/sf")));
        assert_eq!(options.params, AgentParams::default());
    }

    #[test]
    fn missing_engine_is_rejected() {
        let err = BeliefOptions::from_params_with(
            "belief",
            &serde_yaml::Value::Null,
            EngineConfig::default(),
            AgentParams::default(),
        )
        .expect_err("no engine");
        assert!(matches!(err, AgentError::InvalidParam { .. }));
    }

    #[test]
    fn zero_sample_limit_is_rejected() {
        let err = BeliefOptions::from_params_with(
            "belief",
            &yaml("engine: /opt/sf\nsample_limit: 0\n"),
            EngineConfig::default(),
            AgentParams::default(),
        )
        .expect_err("zero limit");
        assert!(err.to_string().contains("sample_limit"));
    }
}
