//! Batch runner for playing many games between two players

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tracing::{debug, info, warn};

use crate::error::ArenaError;
use crate::invocation::{Trial, TrialRecord, DEFAULT_PROGRAM};
use crate::launcher::{GameLauncher, ProcessLauncher};
use crate::outcome::Outcome;
use crate::tally::Tally;

/// Where a trial's final line is read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ResultSource {
    /// The game's captured standard output
    #[default]
    Stdout,
    /// The per-trial log file written by the game
    LogFile,
}

/// Configuration for a batch
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of games to play
    pub iterations: u32,
    /// Player identifiers, passed through to the game untouched
    pub player0: String,
    pub player1: String,
    /// Directory for `game.<index>` transcripts (None = no log files)
    pub log_dir: Option<PathBuf>,
    pub result_source: ResultSource,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            player0: String::new(),
            player1: String::new(),
            log_dir: None,
            result_source: ResultSource::Stdout,
        }
    }
}

impl BatchConfig {
    pub fn new(iterations: u32, player0: &str, player1: &str) -> Self {
        Self {
            iterations,
            player0: player0.to_string(),
            player1: player1.to_string(),
            ..Default::default()
        }
    }

    /// Log directory, treating an empty path the same as none
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
    }

    /// Check everything that can be checked before the first game starts.
    ///
    /// The log directory is never created here; it has to exist already.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.result_source == ResultSource::LogFile && self.log_dir().is_none() {
            return Err(ArenaError::Usage(
                "reading results from log files requires a log directory".to_string(),
            ));
        }
        if let Some(dir) = self.log_dir() {
            if !dir.is_dir() {
                return Err(ArenaError::MissingLogDirectory {
                    path: dir.to_path_buf(),
                });
            }
        }
        Ok(())
    }

    fn trial(&self, index: u32) -> Trial {
        Trial::new(index, &self.player0, &self.player1, self.log_dir())
    }
}

/// Runs trials one after another and tallies their outcomes
pub struct BatchRunner {
    config: BatchConfig,
}

impl BatchRunner {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Play every trial in order.
    ///
    /// Trial indices run from 1 to `iterations` and double as seeds. The first
    /// failure aborts the batch; the partial tally is only logged.
    pub fn run_batch(&self, launcher: &mut dyn GameLauncher) -> Result<Tally, ArenaError> {
        self.config.validate()?;

        let mut tally = Tally::new();
        info!(
            iterations = self.config.iterations,
            player0 = %self.config.player0,
            player1 = %self.config.player1,
            "starting batch"
        );

        for index in 1..=self.config.iterations {
            let record = match self.run_trial(launcher, index) {
                Ok(record) => record,
                Err(e) => {
                    warn!(trial = index, partial = %tally.to_summary(), "batch aborted");
                    return Err(e);
                }
            };

            if let Err(e) = tally.record(record.index, record.outcome, &record.output) {
                warn!(trial = index, partial = %tally.to_summary(), "batch aborted");
                return Err(e);
            }

            info!(
                "Game {}/{}: {} - Score: {}-{}-{}",
                index,
                self.config.iterations,
                record.outcome.label(),
                tally.player0_wins,
                tally.player1_wins,
                tally.ties
            );
        }

        Ok(tally)
    }

    /// Play one trial and classify its result
    pub fn run_trial(
        &self,
        launcher: &mut dyn GameLauncher,
        index: u32,
    ) -> Result<TrialRecord, ArenaError> {
        let trial = self.config.trial(index);
        let stdout = launcher.launch(&trial)?;

        let output = match (self.config.result_source, &trial.log_path) {
            (ResultSource::LogFile, Some(path)) => {
                std::fs::read_to_string(path).map_err(|source| ArenaError::LogRead {
                    trial: index,
                    path: path.clone(),
                    source,
                })?
            }
            _ => stdout,
        };

        let outcome = Outcome::from_output(&output);
        debug!(trial = index, ?outcome, "classified game");

        Ok(TrialRecord {
            index,
            outcome,
            output,
        })
    }
}

/// Run a batch against the default game executable
pub fn run_batch(
    iterations: u32,
    log_dir: Option<&Path>,
    player0: &str,
    player1: &str,
) -> Result<Tally, ArenaError> {
    let config = BatchConfig {
        log_dir: log_dir.map(Path::to_path_buf),
        ..BatchConfig::new(iterations, player0, player1)
    };
    let mut launcher = ProcessLauncher::new(DEFAULT_PROGRAM);
    BatchRunner::new(config).run_batch(&mut launcher)
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod runner_tests;
