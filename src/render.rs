use anyhow::Result;

use crate::Coords;
use crate::grid::{Cell, Grid};
use crate::snake::{Direction, Snake};

/// A surface the board can be painted on.
pub trait Renderer {
    fn clear(&mut self, width: i32, height: i32) -> Result<()>;
    fn draw_cell(&mut self, x: i32, y: i32, cell: Cell) -> Result<()>;
    /// Redraws the head cell so it shows where the snake is going.
    fn draw_head(&mut self, _x: i32, _y: i32, _heading: Direction) -> Result<()> {
        Ok(())
    }
    /// Marks the body of a snake that just died.
    fn draw_dead(&mut self, _body: &[Coords]) -> Result<()> {
        Ok(())
    }
    /// Called once the whole board has been drawn.
    fn present(&mut self, _score: u32) -> Result<()> {
        Ok(())
    }
}

/// Repaints every cell, row by row, then the head on top.
pub fn draw_grid<R: Renderer + ?Sized>(grid: &Grid, snake: &Snake, score: u32, renderer: &mut R) -> Result<()> {
    renderer.clear(grid.width(), grid.height())?;
    for ((x, y), cell) in grid.cells() {
        renderer.draw_cell(x, y, cell)?;
    }
    let (x, y) = snake.head();
    renderer.draw_head(x, y, snake.heading())?;
    renderer.present(score)
}
