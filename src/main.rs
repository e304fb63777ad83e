//! Shelf Watch CLI

use std::process;

use clap::Parser;

mod cli;

fn main() {
    let _env = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = cli::Cli::parse();

    if let Err(error) = cli.run() {
        eprintln!("{error}");
        process::exit(1);
    }
}
