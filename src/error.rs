use std::fmt::{self, Display, Formatter};

/// Everything that can stop a session from being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NonPositiveDimension { axis: &'static str, value: i32 },
    NonPositiveTickPeriod(u64),
    NonPositiveCellWidth(u16),
    /// Fewer than two cells leaves no room for food next to the snake.
    GridTooSmall { width: i32, height: i32 },
    GridTooLarge { axis: &'static str, value: i32, max: i32 },
    TerminalTooSmall { columns: u16, rows: u16 },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveDimension { axis, value } => {
                write!(f, "grid {} must be positive, got {}", axis, value)
            }
            ConfigError::NonPositiveTickPeriod(ms) => {
                write!(f, "tick period must be positive, got {}ms", ms)
            }
            ConfigError::NonPositiveCellWidth(w) => {
                write!(f, "cell width must be positive, got {}", w)
            }
            ConfigError::GridTooSmall { width, height } => {
                write!(f, "a {}x{} grid has no room for food, it needs at least 2 cells", width, height)
            }
            ConfigError::GridTooLarge { axis, value, max } => {
                write!(f, "grid {} of {} does not fit in the terminal, at most {} fits", axis, value, max)
            }
            ConfigError::TerminalTooSmall { columns, rows } => {
                write!(f, "terminal of {}x{} is too small to fit a grid", columns, rows)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
