//! Classification of a game's final output line

use serde::{Deserialize, Serialize};

/// Line printed by grandeur when a player wins, split around the player digit
const WIN_PREFIX: &str = "GAME OVER! Player ";
const WIN_SUFFIX: &str = " wins!";

/// Line printed by grandeur when nobody can move
const STALEMATE_LINE: &str = "GAME OVER! Stalemate!";

/// Result of a single trial
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Outcome {
    Player0Wins,
    Player1Wins,
    Tie,
    /// The final line matched neither known pattern
    Unparseable,
}

impl Outcome {
    /// Classify one line of game output.
    ///
    /// Surrounding whitespace (including a trailing `\r`) is ignored; the rest
    /// must match one of the literal result lines exactly.
    pub fn from_line(line: &str) -> Self {
        let line = line.trim();

        if line == STALEMATE_LINE {
            return Outcome::Tie;
        }

        match line
            .strip_prefix(WIN_PREFIX)
            .and_then(|rest| rest.strip_suffix(WIN_SUFFIX))
        {
            Some("0") => Outcome::Player0Wins,
            Some("1") => Outcome::Player1Wins,
            _ => Outcome::Unparseable,
        }
    }

    /// Classify a full transcript by its last non-blank line.
    pub fn from_output(output: &str) -> Self {
        match final_line(output) {
            Some(line) => Self::from_line(line),
            None => Outcome::Unparseable,
        }
    }

    /// Whether this outcome may be counted in a tally
    pub fn is_countable(self) -> bool {
        !matches!(self, Outcome::Unparseable)
    }

    /// Short label used in the printed summary
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Player0Wins => "P0",
            Outcome::Player1Wins => "P1",
            Outcome::Tie => "Tie",
            Outcome::Unparseable => "?",
        }
    }
}

/// Last line of `output` that contains anything besides whitespace.
pub fn final_line(output: &str) -> Option<&str> {
    output.lines().rev().find(|line| !line.trim().is_empty())
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod outcome_tests;
