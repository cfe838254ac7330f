//! Binary crate for the `meteo` terminal weather display.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration and alert toggles
//! - Human-friendly rendering of the core's screen models

use clap::Parser;

mod cli;
mod logging;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    logging::init(cmd.verbose);
    cmd.run().await
}
