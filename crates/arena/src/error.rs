//! Errors that abort a batch

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Exit code for usage problems and failed game processes
pub const EXIT_FAILURE: i32 = 1;
/// Exit code when a game's result line could not be classified
pub const EXIT_UNPARSEABLE: i32 = 2;

/// Every error is fatal to the whole batch; nothing is retried.
#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("usage: {0}")]
    Usage(String),

    #[error("trial {trial}: failed to launch {}: {source}", .program.display())]
    Spawn {
        trial: u32,
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("trial {trial}: game exited with {status}{}", stderr_suffix(.stderr))]
    ExitStatus {
        trial: u32,
        status: ExitStatus,
        stderr: String,
    },

    #[error("trial {trial}: failed waiting for game: {source}")]
    Wait {
        trial: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("trial {trial}: game did not finish within {}s", .limit.as_secs_f64())]
    TrialTimeout { trial: u32, limit: Duration },

    #[error("log directory {} does not exist", .path.display())]
    MissingLogDirectory { path: PathBuf },

    #[error("trial {trial}: failed to read log file {}: {source}", .path.display())]
    LogRead {
        trial: u32,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("trial {trial}: couldn't find winner in game output: {output:?}")]
    Unparseable { trial: u32, output: String },
}

impl ArenaError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ArenaError::Unparseable { .. } => EXIT_UNPARSEABLE,
            _ => EXIT_FAILURE,
        }
    }

    /// Index of the trial that failed, if the error belongs to one
    pub fn trial(&self) -> Option<u32> {
        match self {
            ArenaError::Spawn { trial, .. }
            | ArenaError::ExitStatus { trial, .. }
            | ArenaError::Wait { trial, .. }
            | ArenaError::TrialTimeout { trial, .. }
            | ArenaError::LogRead { trial, .. }
            | ArenaError::Unparseable { trial, .. } => Some(*trial),
            ArenaError::Usage(_) | ArenaError::MissingLogDirectory { .. } => None,
        }
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}
