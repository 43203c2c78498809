//! Batch runner for the grandeur board game
//!
//! This crate provides infrastructure for:
//! - Launching the game program once per trial with a reproducible seed
//! - Classifying each game's final output line
//! - Tallying player 0 wins, player 1 wins and stalemates
//!
//! # Usage
//!
//! ```bash
//! # Play 100 games between the greedy and random players
//! cargo run -p arena -- 100 greedy random
//!
//! # Keep a transcript of every game in logs/game.<n>
//! cargo run -p arena -- --log-dir logs 100 greedy random
//! ```

pub mod error;
mod invocation;
mod launcher;
mod outcome;
mod runner;
mod tally;

pub use error::ArenaError;
pub use invocation::*;
pub use launcher::*;
pub use outcome::*;
pub use runner::*;
pub use tally::*;
