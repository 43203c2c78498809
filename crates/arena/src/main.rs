//! Arena CLI
//!
//! Pit two grandeur players against each other and print the tally.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use arena::error::EXIT_FAILURE;
use arena::{
    ArenaError, BatchConfig, BatchRunner, ProcessLauncher, ResultSource, Tally, DEFAULT_PROGRAM,
};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::{error, info, Level};

#[derive(Parser, Debug)]
#[command(
    name = "arena",
    version,
    about = "Play many grandeur games between two players and count who wins",
    after_help = "Example:\n  arena --log-dir logs 100 greedy random"
)]
struct Cli {
    /// Number of games to play
    iterations: u32,
    /// First player, passed to the game as-is
    player0: String,
    /// Second player, passed to the game as-is
    player1: String,

    /// Game executable
    #[arg(long, default_value = DEFAULT_PROGRAM)]
    program: PathBuf,
    /// Existing directory to keep one transcript per game in (game.<n>)
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,
    /// Where to read each game's final line from
    #[arg(long, value_enum, default_value_t = ResultSource::Stdout)]
    result_source: ResultSource,
    /// Kill a game that runs longer than this many seconds
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,
    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> Level {
        match (self.quiet, self.verbose) {
            (true, _) => Level::WARN,
            (false, 0) => Level::INFO,
            (false, 1) => Level::DEBUG,
            (false, _) => Level::TRACE,
        }
    }
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<Tally> {
    let config = BatchConfig {
        log_dir: cli.log_dir.clone(),
        result_source: cli.result_source,
        ..BatchConfig::new(cli.iterations, &cli.player0, &cli.player1)
    };

    let mut launcher = ProcessLauncher::new(&cli.program);
    if let Some(secs) = cli.timeout_secs {
        launcher = launcher.with_timeout(Duration::from_secs(secs));
    }

    let runner = BatchRunner::new(config);
    let tally = runner
        .run_batch(&mut launcher)
        .with_context(|| format!("{} vs {} aborted", cli.player0, cli.player1))?;
    Ok(tally)
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    let code = err
        .downcast_ref::<ArenaError>()
        .map(ArenaError::exit_code)
        .unwrap_or(EXIT_FAILURE);
    u8::try_from(code).unwrap_or(EXIT_FAILURE as u8)
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and are not failures
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EXIT_FAILURE as u8),
            };
        }
    };

    init_logging(cli.log_level());

    match run(&cli) {
        Ok(tally) => {
            for line in tally.generate_report(&cli.player0, &cli.player1).lines() {
                info!("{}", line);
            }
            println!("{}", tally.to_summary());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}
