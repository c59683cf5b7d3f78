use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};

use rill::errno;

mod cli;
mod cmd_config;
mod cmd_pairs;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт — info.
    // Пример: RUST_LOG=debug rill pairs --input kv.txt
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        // Детали из errno-слота (если библиотека что-то туда записала).
        let rec = errno::current();
        if !rec.is_empty() {
            eprintln!("rill errno: {}", rec);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    match cli.cmd {
        cli::Cmd::Pairs { input, cap, max_cap, json, metrics } =>
            cmd_pairs::exec(input, cap, max_cap, json, metrics),

        cli::Cmd::Config { json } =>
            cmd_config::exec(json),
    }
}
