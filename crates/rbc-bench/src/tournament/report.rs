use std::fs;
use std::path::Path;

use rbc_core::game::referee::WinReason;
use rbc_core::model::color::Color;

/// Running win/draw/loss tallies for each agent.
#[derive(Debug, Clone, PartialEq)]
pub struct Standings {
    run_id: String,
    agents: Vec<AgentRecord>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentRecord {
    pub name: String,
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub wins_as_white: usize,
    pub king_captures: usize,
    pub timeouts: usize,
}

impl AgentRecord {
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64
        }
    }
}

impl Standings {
    pub fn new(run_id: &str, names: &[&str]) -> Self {
        Self {
            run_id: run_id.to_string(),
            agents: names
                .iter()
                .map(|name| AgentRecord {
                    name: name.to_string(),
                    ..AgentRecord::default()
                })
                .collect(),
        }
    }

    pub fn agents(&self) -> &[AgentRecord] {
        &self.agents
    }

    /// Records one game; `seating[c]` is the agent index that played color `c`.
    pub fn record(&mut self, seating: [usize; 2], winner: Option<Color>, reason: Option<WinReason>) {
        for color in Color::BOTH {
            let Some(record) = self.agents.get_mut(seating[color.index()]) else {
                continue;
            };
            record.games += 1;
            match winner {
                Some(won) if won == color => {
                    record.wins += 1;
                    if color == Color::White {
                        record.wins_as_white += 1;
                    }
                    if reason == Some(WinReason::KingCapture) {
                        record.king_captures += 1;
                    }
                }
                Some(_) => {
                    record.losses += 1;
                    if reason == Some(WinReason::Timeout) {
                        record.timeouts += 1;
                    }
                }
                None => record.draws += 1,
            }
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut rows = String::new();
        rows.push_str(&format!("# Match Summary: {}\n\n", self.run_id));
        rows.push_str("| Agent | Games | Wins | Losses | Draws | Win % | Wins as White | King captures | Lost on time |\n");
        rows.push_str("|-------|-------|------|--------|-------|-------|---------------|---------------|--------------|\n");
        for agent in &self.agents {
            rows.push_str(&format!(
                "| {name} | {games} | {wins} | {losses} | {draws} | {rate:.1}% | {white} | {kings} | {timeouts} |\n",
                name = agent.name,
                games = agent.games,
                wins = agent.wins,
                losses = agent.losses,
                draws = agent.draws,
                rate = agent.win_rate() * 100.0,
                white = agent.wins_as_white,
                kings = agent.king_captures,
                timeouts = agent.timeouts,
            ));
        }
        rows
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        fs::write(path.as_ref(), self.to_markdown())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tallies_both_sides_of_each_game() {
        let mut standings = Standings::new("t", &["belief", "random"]);
        standings.record([0, 1], Some(Color::White), Some(WinReason::KingCapture));
        standings.record([1, 0], Some(Color::White), Some(WinReason::Timeout));
        standings.record([0, 1], None, Some(WinReason::TurnLimit));

        let belief = &standings.agents()[0];
        assert_eq!((belief.games, belief.wins, belief.losses, belief.draws), (3, 1, 1, 1));
        assert_eq!(belief.king_captures, 1);
        assert_eq!(belief.timeouts, 1);

        let random = &standings.agents()[1];
        assert_eq!(random.wins_as_white, 1);
        assert!((random.win_rate() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn markdown_lists_every_agent() {
        let mut standings = Standings::new("demo", &["a", "b"]);
        standings.record([0, 1], Some(Color::Black), Some(WinReason::KingCapture));
        let markdown = standings.to_markdown();
        assert!(markdown.starts_with("# Match Summary: demo"));
        assert!(markdown.contains("| a | 1 | 0 | 1 | 0 | 0.0% |"));
        assert!(markdown.contains("| b | 1 | 1 | 0 | 0 | 100.0% |"));
    }
}
