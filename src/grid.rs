use crate::Coords;
use crate::error::ConfigError;

use rand::Rng;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    SnakeBody,
    Food,
}

/// Occupancy of every position on the board, stored row by row.
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Result<Self, ConfigError> {
        if width <= 0 {
            return Err(ConfigError::NonPositiveDimension { axis: "width", value: width });
        }
        if height <= 0 {
            return Err(ConfigError::NonPositiveDimension { axis: "height", value: height });
        }

        let cells = vec![Cell::Empty; width as usize * height as usize];
        Ok(Grid { width, height, cells })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_in_bounds(&self, (x, y): Coords) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    pub fn get(&self, pos: Coords) -> Cell {
        self.cells[self.index(pos)]
    }

    pub fn set(&mut self, pos: Coords, cell: Cell) {
        let i = self.index(pos);
        self.cells[i] = cell;
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }

    /// Every cell with its coordinates, in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Coords, Cell)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| ((i as i32 % width, i as i32 / width), *cell))
    }

    /// Picks a uniformly random empty cell by rejection sampling.
    /// Returns `None` if the board has no empty cell left.
    pub fn random_empty<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Coords> {
        if !self.cells.contains(&Cell::Empty) {
            return None;
        }

        loop {
            let pos = (rng.gen_range(0..self.width), rng.gen_range(0..self.height));
            if self.get(pos) == Cell::Empty {
                return Some(pos);
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn index(&self, pos: Coords) -> usize {
        debug_assert!(self.is_in_bounds(pos), "{:?} is outside the grid", pos);
        pos.1 as usize * self.width as usize + pos.0 as usize
    }
}
