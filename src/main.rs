mod config;
mod difficulty;
mod food;
mod game;
mod scores;
mod snake;
mod term;
mod ui;

use std::fs::File;

use anyhow::Context;
use clap::Parser;
use simplelog::{LevelFilter, WriteLogger};

use crate::config::Config;

pub type TermInt = u16;
pub type Coords = (u16, u16);

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // stdout belongs to the game, so logs go to a file
    let log_file = File::create(&config.log_file)
        .with_context(|| format!("creating log file {}", config.log_file.display()))?;
    WriteLogger::init(log_level(config.verbose), simplelog::Config::default(), log_file)
        .context("initializing logger")?;

    log::info!("Starting snake on a {}x{} field", config.cols, config.rows);

    let mut game = game::SnakeGame::new(config)?;

    // Always hand the terminal back, even if the game loop failed
    let res = game.initialize().and_then(|_| game.run());
    let restored = game.shutdown();

    if let Err(e) = &res {
        log::error!("Game ended with error: {:#}", e);
    }

    res.and(restored.map_err(anyhow::Error::from))
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
