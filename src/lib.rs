pub mod aggregate;
pub mod cli;
pub mod data;
pub mod explore;
pub mod export;
pub mod filter;
pub mod loader;
pub mod preview;
pub mod render;
pub mod table;
pub mod theme;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("resto_explore", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Explore(args) => explore::execute(&args),
        Commands::Export(args) => export::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
    }
}
