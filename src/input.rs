use crossterm::event::KeyCode;
use log::trace;

use crate::snake::Direction::{self, *};

/// A position on the drawing surface, in surface units (terminal cells here).
pub type ScreenPoint = (i32, i32);

/// Input as it reaches the game, already detached from the device that produced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyCode),
    GestureStart(ScreenPoint),
    GestureUpdate(ScreenPoint),
}

pub fn direction_for_key(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Right),
        _ => None,
    }
}

/// Classifies a swipe by its dominant axis. Ties go to the horizontal axis.
pub fn direction_for_swipe(from: ScreenPoint, to: ScreenPoint) -> Option<Direction> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    if dx == 0 && dy == 0 {
        return None;
    }

    if dx.abs() >= dy.abs() {
        Some(if dx > 0 { Right } else { Left })
    } else {
        Some(if dy > 0 { Down } else { Up })
    }
}

/// Holds the one direction that will be applied at the next tick.
#[derive(Default)]
pub struct InputBuffer {
    pending: Option<Direction>,
    gesture_origin: Option<ScreenPoint>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers `direction` unless it reverses the heading the snake has right now.
    /// Later proposals overwrite earlier ones.
    pub fn propose_direction(&mut self, direction: Direction, live_heading: Direction) -> bool {
        if direction == live_heading.opposite() {
            trace!("ignoring reversal from {:?} to {:?}", live_heading, direction);
            return false;
        }
        self.pending = Some(direction);
        true
    }

    pub fn gesture_start(&mut self, point: ScreenPoint) {
        self.gesture_origin = Some(point);
    }

    pub fn gesture_update(&mut self, point: ScreenPoint, live_heading: Direction) -> bool {
        let origin = match self.gesture_origin {
            Some(origin) => origin,
            None => return false,
        };

        match direction_for_swipe(origin, point) {
            Some(dir) => self.propose_direction(dir, live_heading),
            None => false,
        }
    }

    pub fn handle(&mut self, event: InputEvent, live_heading: Direction) -> bool {
        let direction = match event {
            InputEvent::Key(code) => direction_for_key(code),
            InputEvent::GestureStart(point) => {
                self.gesture_start(point);
                return false;
            }
            InputEvent::GestureUpdate(point) => return self.gesture_update(point, live_heading),
        };

        match direction {
            Some(dir) => self.propose_direction(dir, live_heading),
            None => {
                trace!("ignoring unmapped input {:?}", event);
                false
            }
        }
    }

    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }

    /// Takes the buffered direction; `None` means keep the current heading.
    pub fn consume(&mut self) -> Option<Direction> {
        self.pending.take()
    }
}
