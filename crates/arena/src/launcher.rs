//! Launching the game program for one trial

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::ArenaError;
use crate::invocation::Trial;

/// How often a timed trial checks whether the game has exited
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Something that can play a trial and hand back the game's standard output.
///
/// The batch runner only talks to games through this trait, so tests can
/// swap the real process for a scripted one.
pub trait GameLauncher {
    /// Play `trial` to completion and return everything it printed.
    fn launch(&mut self, trial: &Trial) -> Result<String, ArenaError>;
}

/// Runs the game executable as a child process, one trial at a time
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl ProcessLauncher {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Kill games that run longer than `limit`
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, trial: &Trial) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(trial.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    fn spawn_error(&self, trial: &Trial, source: std::io::Error) -> ArenaError {
        ArenaError::Spawn {
            trial: trial.index,
            program: self.program.clone(),
            source,
        }
    }

    /// Wait for the child, killing it once `limit` has passed
    fn wait_with_timeout(
        &self,
        trial: &Trial,
        mut child: Child,
        limit: Duration,
    ) -> Result<(ExitStatus, Vec<u8>, Vec<u8>), ArenaError> {
        // Drain both pipes on helper threads so a chatty game can't block on a full pipe
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let start = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if start.elapsed() >= limit => {
                    warn!(trial = trial.index, pid = child.id(), "game timed out, killing it");
                    if let Err(e) = child.kill() {
                        warn!(trial = trial.index, error = %e, "failed to kill game");
                    }
                    let _ = child.wait();
                    return Err(ArenaError::TrialTimeout {
                        trial: trial.index,
                        limit,
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(source) => {
                    let _ = child.kill();
                    return Err(ArenaError::Wait {
                        trial: trial.index,
                        source,
                    });
                }
            }
        };

        Ok((status, collect(stdout), collect(stderr)))
    }
}

impl GameLauncher for ProcessLauncher {
    fn launch(&mut self, trial: &Trial) -> Result<String, ArenaError> {
        debug!(
            trial = trial.index,
            program = %self.program.display(),
            args = ?trial.args(),
            "spawning game"
        );

        let (status, stdout, stderr) = match self.timeout {
            None => {
                let output = self
                    .command(trial)
                    .output()
                    .map_err(|e| self.spawn_error(trial, e))?;
                (output.status, output.stdout, output.stderr)
            }
            Some(limit) => {
                let child = self
                    .command(trial)
                    .spawn()
                    .map_err(|e| self.spawn_error(trial, e))?;
                self.wait_with_timeout(trial, child, limit)?
            }
        };

        if !status.success() {
            return Err(ArenaError::ExitStatus {
                trial: trial.index,
                status,
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
            });
        }

        if !stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&stderr);
            debug!(trial = trial.index, stderr = %stderr.trim_end(), "game wrote to stderr");
        }

        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        // A read error just truncates what we captured
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}
