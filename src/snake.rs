use std::collections::VecDeque;
use std::str::FromStr;

use crate::Coords;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Up),
            "down" => Ok(Down),
            "left" => Ok(Left),
            "right" => Ok(Right),
            other => Err(format!("unknown direction '{}', expected up, down, left or right", other)),
        }
    }
}

/// The snake's body, head first. Growth is decided by the caller: `advance`
/// never drops the tail, `pop_tail` does.
pub struct Snake {
    body: VecDeque<Coords>,
    heading: Direction,
}

impl Snake {
    pub fn new(start: Coords, heading: Direction) -> Self {
        let mut body = VecDeque::new();
        body.push_back(start);
        Snake { body, heading }
    }

    pub fn body(&self) -> impl Iterator<Item = &Coords> + '_ {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn tail(&self) -> Coords {
        self.body[self.body.len() - 1]
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Turns the snake, unless that would send it straight back into itself.
    pub fn set_heading(&mut self, direction: Direction) -> bool {
        if direction == self.heading.opposite() {
            return false;
        }
        self.heading = direction;
        true
    }

    /// Where the head will be after the next `advance`.
    pub fn next_head(&self) -> Coords {
        let (x, y) = self.head();
        let (dx, dy) = self.heading.delta();
        (x + dx, y + dy)
    }

    pub fn advance(&mut self) -> Coords {
        let new_head = self.next_head();
        self.body.push_front(new_head);
        new_head
    }

    /// Removes the last segment. The head is never removed.
    pub fn pop_tail(&mut self) -> Option<Coords> {
        if self.body.len() > 1 {
            self.body.pop_back()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_snake_has_a_single_segment() {
        let snake = Snake::new((2, 2), Right);
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), (2, 2));
        assert_eq!(snake.tail(), (2, 2));
        assert_eq!(snake.heading(), Right);
    }

    #[test]
    fn advance_moves_one_cell_along_heading() {
        for (dir, expected) in [(Up, (5, 4)), (Down, (5, 6)), (Left, (4, 5)), (Right, (6, 5))] {
            let mut snake = Snake::new((5, 5), dir);
            assert_eq!(snake.advance(), expected);
            assert_eq!(snake.head(), expected);
            assert_eq!(snake.len(), 2);
        }
    }

    #[test]
    fn pop_tail_removes_the_oldest_segment() {
        let mut snake = Snake::new((1, 1), Right);
        snake.advance();
        assert_eq!(snake.pop_tail(), Some((1, 1)));
        assert_eq!(snake.body().copied().collect::<Vec<_>>(), vec![(2, 1)]);
        assert_eq!(snake.pop_tail(), None);
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn reversal_is_a_silent_no_op() {
        let mut snake = Snake::new((1, 1), Right);
        assert!(!snake.set_heading(Left));
        assert_eq!(snake.heading(), Right);
        assert!(snake.set_heading(Up));
        assert_eq!(snake.heading(), Up);
        assert!(!snake.set_heading(Down));
        assert!(snake.set_heading(Up));
    }

    #[test]
    fn parses_directions_case_insensitively() {
        assert_eq!("UP".parse::<Direction>(), Ok(Up));
        assert_eq!(" right ".parse::<Direction>(), Ok(Right));
        assert!("north".parse::<Direction>().is_err());
    }
}
