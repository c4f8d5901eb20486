use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;

use crate::TermInt;
use crate::error::ConfigError;
use crate::snake::Direction;

pub const DEFAULT_TICK_PERIOD_MS: u64 = 200;
pub const DEFAULT_POINT_VALUE: u32 = 1;
pub const DEFAULT_CELL_WIDTH: u16 = 2;

/// Border on each side plus the score line under the board.
const RESERVED_COLUMNS: TermInt = 2;
const RESERVED_ROWS: TermInt = 3;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(author, version, about = "Snake on a grid, in your terminal", long_about = None)]
pub struct Cli {
    /// Number of columns in the grid. Defaults to what fits in the terminal.
    #[arg(long, value_name = "CELLS", allow_hyphen_values = true)]
    pub width: Option<i32>,
    /// Number of rows in the grid. Defaults to what fits in the terminal.
    #[arg(long, value_name = "CELLS", allow_hyphen_values = true)]
    pub height: Option<i32>,
    /// Milliseconds between two moves of the snake.
    #[arg(long = "tick-ms", value_name = "MILLISECONDS", default_value_t = DEFAULT_TICK_PERIOD_MS)]
    pub tick_period_ms: u64,
    /// Points awarded for each piece of food.
    #[arg(long, value_name = "POINTS", default_value_t = DEFAULT_POINT_VALUE)]
    pub points: u32,
    /// Heading of the snake when a game starts (up, down, left, right).
    #[arg(long = "start", value_name = "DIRECTION", default_value = "up")]
    pub start_direction: Direction,
    /// Terminal columns used to draw one grid cell.
    #[arg(long, value_name = "COLUMNS", default_value_t = DEFAULT_CELL_WIDTH)]
    pub cell_width: u16,
    /// Seed for food placement, for reproducible games.
    #[arg(long)]
    pub seed: Option<u64>,
    /// File the log is written to.
    #[arg(long, value_name = "PATH", default_value = "gridsnake.log")]
    pub log_file: PathBuf,
    /// Log verbosity (off, error, warn, info, debug, trace).
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: LevelFilter,
}

/// Settings that stay fixed for the lifetime of a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub grid_width: i32,
    pub grid_height: i32,
    pub tick_period_ms: u64,
    pub point_value: u32,
    pub start_direction: Direction,
    pub cell_width: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            grid_width: 20,
            grid_height: 15,
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            point_value: DEFAULT_POINT_VALUE,
            start_direction: Direction::Up,
            cell_width: DEFAULT_CELL_WIDTH,
        }
    }
}

impl Config {
    /// Builds the configuration from the command line, sizing the grid to the
    /// terminal for any dimension not given explicitly.
    pub fn from_cli(cli: &Cli, terminal_size: (TermInt, TermInt)) -> Result<Self, ConfigError> {
        if cli.cell_width == 0 {
            return Err(ConfigError::NonPositiveCellWidth(0));
        }

        let (fit_width, fit_height) = fit_grid(terminal_size, cli.cell_width);
        let config = Config {
            grid_width: cli.width.unwrap_or(fit_width),
            grid_height: cli.height.unwrap_or(fit_height),
            tick_period_ms: cli.tick_period_ms,
            point_value: cli.points,
            start_direction: cli.start_direction,
            cell_width: cli.cell_width,
        };

        let too_narrow = cli.width.is_none() && fit_width <= 0;
        let too_short = cli.height.is_none() && fit_height <= 0;
        if too_narrow || too_short {
            return Err(ConfigError::TerminalTooSmall { columns: terminal_size.0, rows: terminal_size.1 });
        }

        config.validate()?;

        if config.grid_width > fit_width {
            return Err(ConfigError::GridTooLarge { axis: "width", value: config.grid_width, max: fit_width });
        }
        if config.grid_height > fit_height {
            return Err(ConfigError::GridTooLarge { axis: "height", value: config.grid_height, max: fit_height });
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width <= 0 {
            return Err(ConfigError::NonPositiveDimension { axis: "width", value: self.grid_width });
        }
        if self.grid_height <= 0 {
            return Err(ConfigError::NonPositiveDimension { axis: "height", value: self.grid_height });
        }
        if (self.grid_width as i64) * (self.grid_height as i64) < 2 {
            return Err(ConfigError::GridTooSmall { width: self.grid_width, height: self.grid_height });
        }
        if self.tick_period_ms == 0 {
            return Err(ConfigError::NonPositiveTickPeriod(self.tick_period_ms));
        }
        if self.cell_width == 0 {
            return Err(ConfigError::NonPositiveCellWidth(self.cell_width));
        }
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub fn center(&self) -> (i32, i32) {
        (self.grid_width / 2, self.grid_height / 2)
    }
}

/// Largest grid that fits in a terminal of the given size.
pub fn fit_grid((columns, rows): (TermInt, TermInt), cell_width: u16) -> (i32, i32) {
    let width = columns.saturating_sub(RESERVED_COLUMNS) / cell_width.max(1);
    let height = rows.saturating_sub(RESERVED_ROWS);
    (width as i32, height as i32)
}
