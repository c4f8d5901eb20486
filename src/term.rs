use crate::{Coords, TermInt};
use crate::app::{Control, InputSource, SessionUi};
use crate::grid::Cell;
use crate::input::InputEvent;
use crate::render::Renderer;
use crate::snake::Direction;

use std::io::{Stdout, Write, stdout};
use std::time::Duration;

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{
    poll, read, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent,
    MouseEventKind,
};
use log::debug;

type Pos = (TermInt, TermInt);

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const EMPTY_CHAR: char = ' ';
const DEAD_SNAKE_CHAR: char = 'X';

/// The crossterm front end: draws the board, reads keys and mouse drags,
/// and asks the player whether to play again.
pub struct Terminal {
    width: TermInt,
    height: TermInt,
    cell_width: TermInt,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
    board: Option<Pos>,
    active: bool,
}

struct Message {
    top_left: Pos,
    width: TermInt,
    height: TermInt,
}

impl Terminal {
    pub fn new(cell_width: TermInt) -> crossterm::Result<Self> {
        let (width, height) = terminal::size()?;
        let screen = vec![' '; width as usize * height as usize];
        Ok(Terminal {
            width,
            height,
            cell_width,
            stdout: stdout(),
            screen,
            current_msg: None,
            board: None,
            active: false,
        })
    }

    pub fn setup(&mut self) -> crossterm::Result<()> {
        execute!(self.stdout, EnterAlternateScreen, EnableMouseCapture)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        self.active = true;
        Ok(())
    }

    pub fn restore(&mut self) -> crossterm::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, DisableMouseCapture, LeaveAlternateScreen)
    }

    pub fn read_key_blocking(&self) -> crossterm::Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    pub fn show_message(&mut self, lines: &[&str]) -> crossterm::Result<()> {
        if self.current_msg.is_some() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        self.current_msg = Some(Message { width: msg_width, height: msg_height, top_left });
        self.flush()
    }

    pub fn hide_message(&mut self) -> crossterm::Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height {
            for x_diff in 0..msg.width {
                let (x, y) = (msg.top_left.0 + x_diff, msg.top_left.1 + y_diff);
                if let Some(i) = self.screen_index((x, y)) {
                    let ch = self.screen[i];
                    self.print_at_no_save((x, y), ch)?;
                }
            }
        }

        self.flush()
    }

    pub fn print_at(&mut self, pos: Pos, ch: char) -> crossterm::Result<()> {
        if let Some(i) = self.screen_index(pos) {
            queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
            self.screen[i] = ch;
        }
        Ok(())
    }

    pub fn print_str_at(&mut self, pos: Pos, s: &str) -> crossterm::Result<()> {
        for (i, ch) in s.chars().enumerate() {
            self.print_at((pos.0.saturating_add(i as TermInt), pos.1), ch)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> crossterm::Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_borders(&mut self, width: TermInt, height: TermInt) -> crossterm::Result<()> {
        let end_x = width - 1;
        let end_y = height - 1;

        for x in 0..width {
            let ch = if x == 0 || x == end_x {'+'} else {'-'};
            self.print_at((x, 0), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in 1..end_y {
            self.print_at((0, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        Ok(())
    }

    fn fill_cell(&mut self, (x, y): Coords, ch: char) -> crossterm::Result<()> {
        let left = (x as TermInt).saturating_mul(self.cell_width).saturating_add(1);
        for i in 0..self.cell_width {
            self.print_at((left.saturating_add(i), (y as TermInt).saturating_add(1)), ch)?;
        }
        Ok(())
    }

    fn print_at_no_save(&mut self, pos: Pos, ch: char) -> crossterm::Result<()> {
        // To be used for printing messages, where we don't wanna overwrite our
        // local buffer to restore it when the message is hidden
        if self.screen_index(pos).is_some() {
            queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        }
        Ok(())
    }

    fn screen_index(&self, (x, y): Pos) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(self.width as usize * y as usize + x as usize)
        } else {
            None
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

impl Renderer for Terminal {
    fn clear(&mut self, width: i32, height: i32) -> anyhow::Result<()> {
        let outer = (
            (width as TermInt).saturating_mul(self.cell_width).saturating_add(2),
            (height as TermInt).saturating_add(2),
        );
        // borders only need redrawing when the board size changes
        if self.board != Some(outer) {
            execute!(self.stdout, terminal::Clear(ClearType::All))?;
            self.screen = vec![' '; self.width as usize * self.height as usize];
            self.draw_borders(outer.0, outer.1)?;
            self.board = Some(outer);
        }
        Ok(())
    }

    fn draw_cell(&mut self, x: i32, y: i32, cell: Cell) -> anyhow::Result<()> {
        let ch = match cell {
            Cell::Empty => EMPTY_CHAR,
            Cell::SnakeBody => SNAKE_BODY_CHAR,
            Cell::Food => FOOD_CHAR,
        };
        self.fill_cell((x, y), ch)?;
        Ok(())
    }

    fn draw_head(&mut self, x: i32, y: i32, heading: Direction) -> anyhow::Result<()> {
        self.fill_cell((x, y), head_char(heading))?;
        Ok(())
    }

    fn draw_dead(&mut self, body: &[Coords]) -> anyhow::Result<()> {
        for pos in body {
            self.fill_cell(*pos, DEAD_SNAKE_CHAR)?;
        }
        self.flush()?;
        Ok(())
    }

    fn present(&mut self, score: u32) -> anyhow::Result<()> {
        let row = self.board.map(|(_, h)| h).unwrap_or(0);
        self.print_str_at((1, row), &format!("Score: {:<8}", score))?;
        self.flush()?;
        Ok(())
    }
}

impl SessionUi for Terminal {
    fn notify_game_over(&mut self, score: u32, won: bool) -> anyhow::Result<bool> {
        let title = if won {"You won!"} else {"Game over!"};
        self.show_message(&[
            title,
            &*format!("Score: {}", score),
            "",
            "Play again? (y/n)",
        ])?;

        let again = loop {
            let ev = self.read_key_blocking()?;
            if is_ctrl_c(&ev) {
                break false;
            }
            match ev.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => break true,
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('q') | KeyCode::Esc => break false,
                _ => {}
            }
        };

        self.hide_message()?;
        Ok(again)
    }

    fn show_paused(&mut self, paused: bool) -> anyhow::Result<()> {
        if paused {
            self.show_message(&["Paused", "Press Esc to resume", "or q to quit"])?;
        } else {
            self.hide_message()?;
        }
        Ok(())
    }
}

impl InputSource for Terminal {
    fn poll_controls(&mut self, timeout: Duration) -> anyhow::Result<Vec<Control>> {
        let mut controls = vec![];

        // Wait for the first event, then drain whatever else is queued
        let mut wait = timeout;
        while poll(wait)? {
            wait = Duration::from_millis(0);
            if let Some(control) = to_control(read()?) {
                controls.push(control);
            }
        }

        Ok(controls)
    }
}

fn to_control(ev: Event) -> Option<Control> {
    match ev {
        Event::Key(key) if is_ctrl_c(&key) => Some(Control::Quit),
        Event::Key(KeyEvent { code, .. }) => match code {
            KeyCode::Char('q') => Some(Control::Quit),
            KeyCode::Esc | KeyCode::Char('p') => Some(Control::TogglePause),
            code => Some(Control::Input(InputEvent::Key(code))),
        },
        Event::Mouse(MouseEvent { kind, column, row, .. }) => {
            let point = (column as i32, row as i32);
            match kind {
                MouseEventKind::Down(_) => Some(Control::Input(InputEvent::GestureStart(point))),
                MouseEventKind::Drag(_) => Some(Control::Input(InputEvent::GestureUpdate(point))),
                _ => None,
            }
        }
        Event::Resize(w, h) => {
            debug!("terminal resized to {}x{}, keeping the current grid", w, h);
            None
        }
    }
}

fn head_char(heading: Direction) -> char {
    match heading {
        Direction::Up => '^',
        Direction::Down => 'v',
        Direction::Left => '<',
        Direction::Right => '>',
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
