//! Command-line interface for strictly_chess_tui.

use std::path::PathBuf;

use clap::Parser;

/// Strictly Chess - play chess against a UCI engine in the terminal
#[derive(Parser, Debug)]
#[command(name = "strictly_chess_tui")]
#[command(about = "Terminal chess against a UCI engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the UCI engine executable
    #[arg(long, default_value = "stockfish")]
    pub engine: PathBuf,

    /// Fixed search depth for engine moves
    #[arg(long, default_value = "5")]
    pub depth: u32,

    /// Log file (tracing output; the terminal is left to the board)
    #[arg(long, default_value = "strictly_chess_tui.log")]
    pub log_file: PathBuf,
}
