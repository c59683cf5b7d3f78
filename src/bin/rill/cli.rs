use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Минимальный CLI для rill (pairs + errno)
#[derive(Parser, Debug)]
#[command(name = "rill", version, about = "rill pairs buffer CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Load `key val` lines into a pairs buffer and print it
    ///
    /// Формат входа: по одной паре на строку, десятичные u64:
    ///   # comment
    ///   1 10
    ///   2 20
    Pairs {
        /// Input file (stdin if omitted)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Initial capacity
        #[arg(long, default_value_t = 16)]
        cap: usize,
        /// Max capacity (overrides RILL_PAIRS_MAX_CAP)
        #[arg(long)]
        max_cap: Option<usize>,
        /// Print one JSON object instead of text
        #[arg(long)]
        json: bool,
        /// Append metrics snapshot
        #[arg(long)]
        metrics: bool,
    },
    /// Print effective configuration (env + defaults)
    Config {
        #[arg(long)]
        json: bool,
    },
}
