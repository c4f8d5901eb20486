mod app;
mod config;
mod error;
mod game;
mod grid;
mod input;
mod render;
mod scheduler;
mod snake;
mod term;

use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::terminal;
use log::{error, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use simplelog::{Config as LogConfig, WriteLogger};

use crate::app::Controller;
use crate::config::{Cli, Config};
use crate::game::Session;
use crate::scheduler::{RepeatingTask, SystemClock};
use crate::term::Terminal;

pub type TermInt = u16;
pub type Coords = (i32, i32);

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal is in raw mode while playing, so the log goes to a file
    WriteLogger::init(
        cli.log_level,
        LogConfig::default(),
        File::create(&cli.log_file)
            .with_context(|| format!("cannot create log file {}", cli.log_file.display()))?,
    )
    .context("cannot initialize logger")?;

    let config = match Config::from_cli(&cli, terminal::size()?) {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    let rng = match cli.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    info!("starting with {:?}, seed {:?}", config, cli.seed);

    let ticker = RepeatingTask::new(config.tick_period(), SystemClock);
    let mut term = Terminal::new(config.cell_width)?;
    let session = Session::new(config, rng)?;

    term.setup()?;
    let mut controller = Controller::new(session, ticker, term);
    let result = controller.run();
    // dropping the controller restores the terminal before any error is printed
    let final_score = controller.session().score();
    drop(controller);

    match &result {
        Ok(()) => info!("exiting, last score {}", final_score),
        Err(e) => error!("exiting on error: {:#}", e),
    }
    result
}
