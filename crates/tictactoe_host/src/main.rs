//! tictactoe - terminal front end for the match host.

use anyhow::Result;
use clap::Parser;
use tictactoe_host::{Cli, Command, HostConfig, MatchHost, play, play_all_openings};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play { mode, seed } => {
            // Keep the board readable: logs go to stderr and stay quiet by default.
            initialize_tracing("warn");
            let config = HostConfig::load_or_default(&cli.config)?;
            let config = match seed {
                Some(seed) => config.with_seed(Some(seed)),
                None => config,
            };
            let mut host = MatchHost::new(config);
            let outcome = play(&mut host, mode.into()).await?;
            info!(%outcome, "Match finished");
            Ok(())
        }
        Command::BenchBot => {
            initialize_tracing("info,tictactoe_match=debug");
            run_bench()
        }
    }
}

/// Prints self-play results for every opening.
#[instrument]
fn run_bench() -> Result<()> {
    println!("{:<10} {:<16} {:>5} {:>10}", "opening", "outcome", "plies", "ms");
    for game in play_all_openings() {
        println!(
            "{:<10} {:<16} {:>5} {:>10.2}",
            game.opening.to_string(),
            game.outcome.to_string(),
            game.plies,
            game.elapsed.as_secs_f64() * 1000.0
        );
    }
    Ok(())
}

fn initialize_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
