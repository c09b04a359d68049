//! Command-line interface for the tictactoe host.

use clap::{Parser, Subcommand, ValueEnum};
use tictactoe_match::Mode;

/// Tic-tac-toe match host with a minimax opponent
#[derive(Parser, Debug)]
#[command(name = "tictactoe")]
#[command(about = "Authoritative tic-tac-toe match host", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the host configuration file
    #[arg(short, long, global = true, default_value = "tictactoe.toml")]
    pub config: std::path::PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a match in the terminal
    Play {
        /// Against the bot (pvc) or hot-seat (pvp)
        #[arg(short, long, value_enum, default_value_t = ModeArg::Pvc)]
        mode: ModeArg,

        /// Override the configured random seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Let the bot play itself from every opening
    BenchBot,
}

/// Match mode as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Two humans sharing the terminal
    Pvp,
    /// One human against the bot
    Pvc,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Pvp => Mode::PlayerVsPlayer,
            ModeArg::Pvc => Mode::PlayerVsAutomated,
        }
    }
}
