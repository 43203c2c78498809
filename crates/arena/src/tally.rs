//! Win/loss/tie counting across a batch

use serde::{Deserialize, Serialize};

use crate::error::ArenaError;
use crate::outcome::Outcome;

/// Counts of countable outcomes.
///
/// Serializes as the summary mapping printed at the end of a batch:
/// `{"P0":3,"P1":1,"Tie":0}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    #[serde(rename = "P0")]
    pub player0_wins: u32,
    #[serde(rename = "P1")]
    pub player1_wins: u32,
    #[serde(rename = "Tie")]
    pub ties: u32,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one trial. `Unparseable` is rejected and leaves the tally unchanged.
    pub fn record(&mut self, trial: u32, outcome: Outcome, output: &str) -> Result<(), ArenaError> {
        match outcome {
            Outcome::Player0Wins => self.player0_wins += 1,
            Outcome::Player1Wins => self.player1_wins += 1,
            Outcome::Tie => self.ties += 1,
            Outcome::Unparseable => {
                return Err(ArenaError::Unparseable {
                    trial,
                    output: output.to_string(),
                })
            }
        }
        Ok(())
    }

    /// Count for a single outcome (always 0 for `Unparseable`)
    pub fn count(&self, outcome: Outcome) -> u32 {
        match outcome {
            Outcome::Player0Wins => self.player0_wins,
            Outcome::Player1Wins => self.player1_wins,
            Outcome::Tie => self.ties,
            Outcome::Unparseable => 0,
        }
    }

    pub fn total_games(&self) -> u32 {
        self.player0_wins + self.player1_wins + self.ties
    }

    /// Score from player 0's perspective (1 for win, 0.5 for tie, 0 for loss)
    pub fn score(&self) -> f64 {
        let total = self.total_games() as f64;
        if total == 0.0 {
            return 0.5;
        }
        (self.player0_wins as f64 + 0.5 * self.ties as f64) / total
    }

    /// Summary mapping as a single JSON line
    pub fn to_summary(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                "{{\"P0\":{},\"P1\":{},\"Tie\":{}}}",
                self.player0_wins, self.player1_wins, self.ties
            )
        })
    }

    /// Generate a text report for two named players
    pub fn generate_report(&self, player0: &str, player1: &str) -> String {
        let mut report = String::new();
        report.push_str(&format!("=== {} vs {} ===\n", player0, player1));
        report.push_str(&format!(
            "{:<20} {:>6} {:>6} {:>6}\n",
            "Games", "P0", "P1", "Tie"
        ));
        report.push_str(&"-".repeat(41));
        report.push('\n');
        report.push_str(&format!(
            "{:<20} {:>6} {:>6} {:>6}\n",
            self.total_games(),
            self.player0_wins,
            self.player1_wins,
            self.ties
        ));
        report.push_str(&format!("Score ({}): {:.1}%\n", player0, self.score() * 100.0));
        report
    }
}

#[cfg(test)]
#[path = "tally_tests.rs"]
mod tally_tests;
