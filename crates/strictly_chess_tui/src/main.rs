//! Strictly Chess - terminal chess against a UCI engine.

use anyhow::Result;
use clap::Parser;

use strictly_chess_tui::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    strictly_chess_tui::tui::run(&cli).await
}
