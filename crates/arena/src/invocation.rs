//! Per-trial command line for the game program

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::outcome::Outcome;

/// Default location of the game executable
pub const DEFAULT_PROGRAM: &str = "./grandeur";

/// Log file for a trial inside `log_dir`
pub fn log_file_path(log_dir: &Path, index: u32) -> PathBuf {
    log_dir.join(format!("game.{}", index))
}

/// One game between two players.
///
/// The trial index doubles as the seed passed to the game, so rerunning the
/// same index replays the same game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trial {
    pub index: u32,
    pub player0: String,
    pub player1: String,
    pub log_path: Option<PathBuf>,
}

impl Trial {
    pub fn new(index: u32, player0: &str, player1: &str, log_dir: Option<&Path>) -> Self {
        Self {
            index,
            player0: player0.to_string(),
            player1: player1.to_string(),
            log_path: log_dir.map(|dir| log_file_path(dir, index)),
        }
    }

    pub fn seed(&self) -> u32 {
        self.index
    }

    /// Arguments for the game program: `-s <seed> [-l <log>] <p0> <p1>`
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-s".into(), self.seed().to_string().into()];
        if let Some(log_path) = &self.log_path {
            args.push("-l".into());
            args.push(log_path.as_os_str().to_owned());
        }
        args.push(self.player0.as_str().into());
        args.push(self.player1.as_str().into());
        args
    }
}

/// A finished trial
#[derive(Debug, Clone)]
pub struct TrialRecord {
    pub index: u32,
    pub outcome: Outcome,
    /// Raw text the result was read from
    pub output: String,
}

#[cfg(test)]
#[path = "invocation_tests.rs"]
mod invocation_tests;
