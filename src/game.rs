use log::{debug, info, trace};
use rand::Rng;

use crate::Coords;
use crate::config::Config;
use crate::error::ConfigError;
use crate::grid::{Cell, Grid};
use crate::input::{InputBuffer, InputEvent};
use crate::snake::{Direction, Snake};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Running,
    Ended,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session had already ended; nothing moved.
    Idle,
    Moved { new_head: Coords, vacated: Option<Coords> },
    Ate { new_head: Coords },
    GameOver { score: u32 },
    /// The snake covers the whole board, there is nowhere left for food.
    Won { score: u32 },
}

/// One play-through: board, snake, pending input and score.
pub struct Session<R: Rng> {
    config: Config,
    rng: R,
    grid: Grid,
    snake: Snake,
    input: InputBuffer,
    score: u32,
    state: GameState,
}

impl<R: Rng> Session<R> {
    pub fn new(config: Config, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let (grid, snake) = fresh_board(&config, &mut rng)?;
        info!(
            "new session on a {}x{} grid, heading {:?}",
            config.grid_width, config.grid_height, config.start_direction
        );

        Ok(Session { config, rng, grid, snake, input: InputBuffer::new(), score: 0, state: GameState::Running })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.input.pending()
    }

    /// Feeds an input event to the buffer; it only takes effect on the next tick.
    pub fn handle_input(&mut self, event: InputEvent) {
        if self.state == GameState::Running {
            self.input.handle(event, self.snake.heading());
        }
    }

    /// Advances the simulation by one step.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state == GameState::Ended {
            return TickOutcome::Idle;
        }

        if let Some(dir) = self.input.consume() {
            if self.snake.set_heading(dir) {
                trace!("heading {:?}", dir);
            }
        }

        let new_head = self.snake.next_head();
        if self.is_fatal(new_head, self.snake.tail()) {
            self.state = GameState::Ended;
            info!("game over at {:?}, score {}", new_head, self.score);
            return TickOutcome::GameOver { score: self.score };
        }
        self.snake.advance();

        let outcome = if self.grid.get(new_head) == Cell::Food {
            self.score += self.config.point_value;
            debug!("ate food at {:?}, length {}, score {}", new_head, self.snake.len(), self.score);
            TickOutcome::Ate { new_head }
        } else {
            let vacated = self.snake.pop_tail();
            if let Some(pos) = vacated {
                self.grid.set(pos, Cell::Empty);
            }
            TickOutcome::Moved { new_head, vacated }
        };

        self.grid.set(new_head, Cell::SnakeBody);

        if let TickOutcome::Ate { .. } = outcome {
            match self.grid.random_empty(&mut self.rng) {
                Some(food) => self.grid.set(food, Cell::Food),
                None => {
                    self.state = GameState::Ended;
                    info!("board full, score {}", self.score);
                    return TickOutcome::Won { score: self.score };
                }
            }
        }

        debug_assert!(self.snake.body().all(|pos| self.grid.get(*pos) == Cell::SnakeBody));
        debug_assert_eq!(self.snake.len(), self.grid.count(Cell::SnakeBody));
        outcome
    }

    /// Throws the current play-through away and starts a fresh one.
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        let (grid, snake) = fresh_board(&self.config, &mut self.rng)?;
        self.grid = grid;
        self.snake = snake;
        self.input = InputBuffer::new();
        self.score = 0;
        self.state = GameState::Running;
        info!("session restarted");
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    // Checked against the board as it was before this tick's changes. The
    // cell the tail leaves this tick counts as free: food is never on the
    // snake, so a move onto the tail is never a growing move.
    fn is_fatal(&self, new_head: Coords, old_tail: Coords) -> bool {
        if !self.grid.is_in_bounds(new_head) {
            return true;
        }
        self.grid.get(new_head) == Cell::SnakeBody && new_head != old_tail
    }
}

fn fresh_board<R: Rng>(config: &Config, rng: &mut R) -> Result<(Grid, Snake), ConfigError> {
    let mut grid = Grid::new(config.grid_width, config.grid_height)?;
    let snake = Snake::new(config.center(), config.start_direction);
    grid.set(snake.head(), Cell::SnakeBody);

    // validated configs have at least two cells, so this always finds one
    if let Some(food) = grid.random_empty(rng) {
        grid.set(food, Cell::Food);
    }

    Ok((grid, snake))
}
