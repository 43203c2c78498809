use super::*;

const P0_WINS: &str = "GAME OVER! Player 0 wins!\n";
const P1_WINS: &str = "GAME OVER! Player 1 wins!\n";
const STALEMATE: &str = "GAME OVER! Stalemate!\n";

/// Stand-in for the game program; output is a pure function of the trial
struct StubLauncher<F> {
    play: F,
    launched: Vec<Trial>,
}

impl<F> StubLauncher<F>
where
    F: FnMut(&Trial) -> Result<String, ArenaError>,
{
    fn new(play: F) -> Self {
        Self {
            play,
            launched: Vec::new(),
        }
    }
}

impl<F> GameLauncher for StubLauncher<F>
where
    F: FnMut(&Trial) -> Result<String, ArenaError>,
{
    fn launch(&mut self, trial: &Trial) -> Result<String, ArenaError> {
        self.launched.push(trial.clone());
        (self.play)(trial)
    }
}

fn always(output: &'static str) -> impl FnMut(&Trial) -> Result<String, ArenaError> {
    move |_| Ok(format!("Player 0 made move: take 3\n{}", output))
}

#[test]
fn test_player0_always_wins() {
    let runner = BatchRunner::new(BatchConfig::new(5, "greedy", "random"));
    let mut launcher = StubLauncher::new(always(P0_WINS));

    let tally = runner.run_batch(&mut launcher).unwrap();

    assert_eq!(
        tally,
        Tally {
            player0_wins: 5,
            player1_wins: 0,
            ties: 0
        }
    );
    assert_eq!(launcher.launched.len(), 5);
}

#[test]
fn test_alternating_wins_and_stalemates() {
    let runner = BatchRunner::new(BatchConfig::new(4, "greedy", "greedy"));
    let mut launcher = StubLauncher::new(|trial: &Trial| {
        Ok(if trial.seed() % 2 == 1 { P0_WINS } else { STALEMATE }.to_string())
    });

    let tally = runner.run_batch(&mut launcher).unwrap();

    assert_eq!(
        tally,
        Tally {
            player0_wins: 2,
            player1_wins: 0,
            ties: 2
        }
    );
}

#[test]
fn test_player1_wins_counted_as_player1() {
    let runner = BatchRunner::new(BatchConfig::new(3, "random", "minimax"));
    let mut launcher = StubLauncher::new(always(P1_WINS));

    let tally = runner.run_batch(&mut launcher).unwrap();

    assert_eq!(tally.player1_wins, 3);
    assert_eq!(tally.player0_wins, 0);
}

#[test]
fn test_counts_sum_to_iterations() {
    for n in [0u32, 1, 2, 7, 25] {
        let runner = BatchRunner::new(BatchConfig::new(n, "a", "b"));
        let mut launcher = StubLauncher::new(|trial: &Trial| {
            Ok(match trial.seed() % 3 {
                0 => P0_WINS,
                1 => P1_WINS,
                _ => STALEMATE,
            }
            .to_string())
        });

        let tally = runner.run_batch(&mut launcher).unwrap();
        assert_eq!(tally.total_games(), n);
    }
}

#[test]
fn test_zero_iterations_launches_nothing() {
    let runner = BatchRunner::new(BatchConfig::new(0, "a", "b"));
    let mut launcher = StubLauncher::new(always(P0_WINS));

    let tally = runner.run_batch(&mut launcher).unwrap();

    assert_eq!(tally, Tally::new());
    assert!(launcher.launched.is_empty());
}

#[test]
fn test_unparseable_output_aborts() {
    let runner = BatchRunner::new(BatchConfig::new(5, "a", "b"));
    let mut launcher = StubLauncher::new(|trial: &Trial| {
        Ok(if trial.index == 3 {
            "ERROR: crashed\n".to_string()
        } else {
            P0_WINS.to_string()
        })
    });

    let err = runner.run_batch(&mut launcher).unwrap_err();

    match &err {
        ArenaError::Unparseable { trial, output } => {
            assert_eq!(*trial, 3);
            assert_eq!(output, "ERROR: crashed\n");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.exit_code(), 2);
    assert_eq!(launcher.launched.len(), 3, "no trials after the failing one");
}

#[test]
fn test_launch_failure_aborts_without_retry() {
    let runner = BatchRunner::new(BatchConfig::new(4, "a", "b"));
    let mut launcher = StubLauncher::new(|trial: &Trial| {
        if trial.index == 2 {
            Err(ArenaError::Spawn {
                trial: trial.index,
                program: PathBuf::from("./grandeur"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        } else {
            Ok(STALEMATE.to_string())
        }
    });

    let err = runner.run_batch(&mut launcher).unwrap_err();

    assert_eq!(err.trial(), Some(2));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(launcher.launched.len(), 2);
}

#[test]
fn test_trials_are_seeded_by_index_in_order() {
    let runner = BatchRunner::new(BatchConfig::new(3, "p0", "p1"));
    let mut launcher = StubLauncher::new(always(STALEMATE));

    runner.run_batch(&mut launcher).unwrap();

    let seeds: Vec<u32> = launcher.launched.iter().map(Trial::seed).collect();
    assert_eq!(seeds, [1, 2, 3]);
    assert!(launcher
        .launched
        .iter()
        .all(|t| t.player0 == "p0" && t.player1 == "p1" && t.log_path.is_none()));
}

#[test]
fn test_missing_log_dir_is_fatal() {
    let config = BatchConfig {
        log_dir: Some(PathBuf::from("/definitely/not/a/real/arena/logdir")),
        ..BatchConfig::new(2, "a", "b")
    };
    let runner = BatchRunner::new(config);
    let mut launcher = StubLauncher::new(always(P0_WINS));

    let err = runner.run_batch(&mut launcher).unwrap_err();

    assert!(matches!(err, ArenaError::MissingLogDirectory { .. }));
    assert!(launcher.launched.is_empty());
}

#[test]
fn test_empty_log_dir_means_no_logging() {
    let config = BatchConfig {
        log_dir: Some(PathBuf::new()),
        ..BatchConfig::new(1, "a", "b")
    };
    let runner = BatchRunner::new(config);
    let mut launcher = StubLauncher::new(always(P0_WINS));

    runner.run_batch(&mut launcher).unwrap();

    assert!(launcher.launched[0].log_path.is_none());
}

#[test]
fn test_log_file_source_requires_log_dir() {
    let config = BatchConfig {
        result_source: ResultSource::LogFile,
        ..BatchConfig::new(1, "a", "b")
    };

    let err = config.validate().unwrap_err();

    assert!(matches!(err, ArenaError::Usage(_)));
}

#[test]
fn test_log_file_source_reads_log() {
    let dir = tempfile::tempdir().unwrap();
    let config = BatchConfig {
        log_dir: Some(dir.path().to_path_buf()),
        result_source: ResultSource::LogFile,
        ..BatchConfig::new(2, "a", "b")
    };
    let runner = BatchRunner::new(config);
    // Stdout says nothing useful; only the log file carries the result
    let mut launcher = StubLauncher::new(|trial: &Trial| {
        let path = trial.log_path.as_ref().unwrap();
        std::fs::write(path, format!("Initial board state:\n{}", P1_WINS)).unwrap();
        Ok(String::new())
    });

    let tally = runner.run_batch(&mut launcher).unwrap();

    assert_eq!(tally.player1_wins, 2);
    assert!(dir.path().join("game.1").exists());
    assert!(dir.path().join("game.2").exists());
}

#[test]
fn test_missing_log_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = BatchConfig {
        log_dir: Some(dir.path().to_path_buf()),
        result_source: ResultSource::LogFile,
        ..BatchConfig::new(1, "a", "b")
    };
    let runner = BatchRunner::new(config);
    let mut launcher = StubLauncher::new(always(P0_WINS));

    let err = runner.run_batch(&mut launcher).unwrap_err();

    assert!(matches!(err, ArenaError::LogRead { trial: 1, .. }));
}

#[test]
fn test_run_trial_record() {
    let runner = BatchRunner::new(BatchConfig::new(1, "a", "b"));
    let mut launcher = StubLauncher::new(always(STALEMATE));

    let record = runner.run_trial(&mut launcher, 9).unwrap();

    assert_eq!(record.index, 9);
    assert_eq!(record.outcome, Outcome::Tie);
    assert!(record.output.ends_with(STALEMATE));
}
