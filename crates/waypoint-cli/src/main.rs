//! Waypoint CLI Application
//!
//! Command-line front end for the waypoint planning engine. Logging goes to
//! stderr and is controlled by `RUST_LOG`.

mod args;
mod cli;
mod renderer;

use Commands::*;
use anyhow::Result;
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::{OutputMode, TerminalRenderer};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        no_color,
        json,
        command,
    } = Args::parse();

    let cli = Cli::new(TerminalRenderer::new(OutputMode::from_flags(no_color, json)));

    info!("Waypoint started");

    match command {
        Analyze(args) => cli.analyze(&args),
        Chain(args) => cli.chain(args),
        Validate(args) => cli.validate(&args),
        Show(args) => cli.show(&args).await,
        Run(args) => cli.run(&args).await,
    }
}
