use rbc_core::belief::DEFAULT_SAMPLE_LIMIT;
use std::time::Duration;

/// Tunables for the belief agent's sense and move heuristics.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentParams {
    /// Cap on candidates kept after expansion and before oracle queries.
    pub sample_limit: usize,
    /// Total oracle time for one move, split evenly across candidates.
    pub move_budget: Duration,
    /// Chance per sense choice of scoring proximity to the last-known king.
    pub king_proximity_chance: f64,
    pub king_bonus: i32,
    pub piece_bonus: i32,
    /// Chance of re-sensing one square above the recorded king square rather than below.
    pub resense_right_chance: f64,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            move_budget: Duration::from_secs(10),
            king_proximity_chance: 0.10,
            king_bonus: 8,
            piece_bonus: 6,
            resense_right_chance: 0.20,
        }
    }
}

impl AgentParams {
    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    pub fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let sample_limit = read("RBC_SAMPLE_LIMIT")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(defaults.sample_limit);

        let move_budget = read("RBC_MOVE_BUDGET_SECS")
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(Duration::from_secs_f64)
            .unwrap_or(defaults.move_budget);

        Self {
            sample_limit,
            move_budget,
            ..defaults
        }
    }

    /// Oracle time for each of `candidates` queries.
    pub fn time_slice(&self, candidates: usize) -> Duration {
        match u32::try_from(candidates) {
            Ok(0) => self.move_budget,
            Ok(n) => self.move_budget / n,
            Err(_) => Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AgentParams;
    use std::time::Duration;

    #[test]
    fn overrides_come_from_reader() {
        let params = AgentParams::from_reader(|key| match key {
            "RBC_SAMPLE_LIMIT" => Some("250".into()),
            "RBC_MOVE_BUDGET_SECS" => Some("0.5".into()),
            _ => None,
        });
        assert_eq!(params.sample_limit, 250);
        assert_eq!(params.move_budget, Duration::from_millis(500));
        assert_eq!(params.king_bonus, 8);
    }

    #[test]
    fn malformed_overrides_keep_defaults() {
        let params = AgentParams::from_reader(|_| Some("lots".into()));
        assert_eq!(params, AgentParams::default());
    }

    #[test]
    fn budget_is_split_across_candidates() {
        let params = AgentParams::default();
        assert_eq!(params.time_slice(0), Duration::from_secs(10));
        assert_eq!(params.time_slice(4), Duration::from_millis(2500));
        assert_eq!(params.time_slice(10_000), Duration::from_millis(1));
    }
}
