use std::time::Duration;

use anyhow::Result;
use log::{debug, info};
use rand::Rng;

use crate::game::{GameState, Session, TickOutcome};
use crate::input::InputEvent;
use crate::render::{draw_grid, Renderer};
use crate::scheduler::{Clock, RepeatingTask};

/// How long to wait for input while no tick is scheduled (paused).
const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Control {
    Input(InputEvent),
    TogglePause,
    Quit,
}

pub trait InputSource {
    /// Waits at most `timeout` and returns whatever arrived meanwhile.
    fn poll_controls(&mut self, timeout: Duration) -> Result<Vec<Control>>;
}

pub trait SessionUi {
    /// Tells the player the game is over. Returns whether to play again.
    fn notify_game_over(&mut self, score: u32, won: bool) -> Result<bool>;
    fn show_paused(&mut self, paused: bool) -> Result<()>;
}

/// Drives a session from a repeating task and a front end.
pub struct Controller<R: Rng, C: Clock, F> {
    session: Session<R>,
    ticker: RepeatingTask<C>,
    frontend: F,
    paused: bool,
}

impl<R, C, F> Controller<R, C, F>
where
    R: Rng,
    C: Clock,
    F: Renderer + SessionUi + InputSource,
{
    pub fn new(session: Session<R>, ticker: RepeatingTask<C>, frontend: F) -> Self {
        Controller { session, ticker, frontend, paused: false }
    }

    pub fn session(&self) -> &Session<R> {
        &self.session
    }

    /// Plays until the player quits or declines a new game.
    pub fn run(&mut self) -> Result<()> {
        self.ticker.start();
        self.redraw()?;

        loop {
            let timeout = self.ticker.time_until_next().unwrap_or(IDLE_POLL);
            for control in self.frontend.poll_controls(timeout)? {
                match control {
                    Control::Quit => {
                        info!("quit requested");
                        self.ticker.cancel();
                        return Ok(());
                    }
                    Control::TogglePause => self.toggle_pause()?,
                    Control::Input(event) if !self.paused => {
                        self.session.handle_input(event);
                        debug!("{:?}, buffered {:?}", event, self.session.pending_direction());
                    }
                    Control::Input(_) => {}
                }
            }

            while self.ticker.poll() {
                if !self.step()? {
                    return Ok(());
                }
            }
        }
    }

    /// Runs one tick and redraws. Returns false once the player is done.
    pub fn step(&mut self) -> Result<bool> {
        let outcome = self.session.tick();
        self.redraw()?;

        let (score, won) = match outcome {
            TickOutcome::GameOver { score } => (score, false),
            TickOutcome::Won { score } => (score, true),
            _ => return Ok(true),
        };

        self.ticker.cancel();
        if !won {
            let body: Vec<_> = self.session.snake().body().copied().collect();
            self.frontend.draw_dead(&body)?;
        }
        if !self.frontend.notify_game_over(score, won)? {
            return Ok(false);
        }

        self.session.restart()?;
        self.ticker.start();
        self.redraw()?;
        Ok(true)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn toggle_pause(&mut self) -> Result<()> {
        if self.session.state() == GameState::Ended {
            return Ok(());
        }

        self.paused = !self.paused;
        debug!("paused: {}", self.paused);
        if self.paused {
            self.ticker.cancel();
        } else {
            self.ticker.start();
        }
        self.frontend.show_paused(self.paused)
    }

    fn redraw(&mut self) -> Result<()> {
        draw_grid(self.session.grid(), self.session.snake(), self.session.score(), &mut self.frontend)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::Coords;
    use crate::config::Config;
    use crate::grid::Cell;
    use crate::scheduler::ManualClock;
    use crate::snake::Direction;
    use crossterm::event::KeyCode;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const PERIOD: Duration = Duration::from_millis(100);

    /// Plays back scripted input, advancing the shared clock on every poll.
    struct FakeFrontend {
        clock: ManualClock,
        script: VecDeque<Vec<Control>>,
        answers: VecDeque<bool>,
        game_overs: Vec<(u32, bool)>,
        frames: usize,
        cells_drawn: usize,
        heads: Vec<(Coords, Direction)>,
        dead_bodies: Vec<Vec<Coords>>,
        pause_overlays: Vec<bool>,
    }

    impl FakeFrontend {
        fn new(clock: ManualClock, script: Vec<Vec<Control>>, answers: Vec<bool>) -> Self {
            FakeFrontend {
                clock,
                script: script.into(),
                answers: answers.into(),
                game_overs: vec![],
                frames: 0,
                cells_drawn: 0,
                heads: vec![],
                dead_bodies: vec![],
                pause_overlays: vec![],
            }
        }
    }

    impl Renderer for FakeFrontend {
        fn clear(&mut self, _width: i32, _height: i32) -> Result<()> {
            self.frames += 1;
            Ok(())
        }

        fn draw_cell(&mut self, _x: i32, _y: i32, _cell: Cell) -> Result<()> {
            self.cells_drawn += 1;
            Ok(())
        }

        fn draw_head(&mut self, x: i32, y: i32, heading: Direction) -> Result<()> {
            self.heads.push(((x, y), heading));
            Ok(())
        }

        fn draw_dead(&mut self, body: &[Coords]) -> Result<()> {
            self.dead_bodies.push(body.to_vec());
            Ok(())
        }
    }

    impl SessionUi for FakeFrontend {
        fn notify_game_over(&mut self, score: u32, won: bool) -> Result<bool> {
            self.game_overs.push((score, won));
            Ok(self.answers.pop_front().unwrap_or(false))
        }

        fn show_paused(&mut self, paused: bool) -> Result<()> {
            self.pause_overlays.push(paused);
            Ok(())
        }
    }

    impl InputSource for FakeFrontend {
        fn poll_controls(&mut self, timeout: Duration) -> Result<Vec<Control>> {
            self.clock.advance(timeout);
            Ok(self.script.pop_front().unwrap_or_default())
        }
    }

    fn controller(
        width: i32,
        script: Vec<Vec<Control>>,
        answers: Vec<bool>,
    ) -> Controller<ChaCha8Rng, ManualClock, FakeFrontend> {
        let config = Config {
            grid_width: width,
            grid_height: 5,
            start_direction: Direction::Right,
            tick_period_ms: PERIOD.as_millis() as u64,
            ..Config::default()
        };
        let clock = ManualClock::new();
        let session = Session::new(config.clone(), ChaCha8Rng::seed_from_u64(3)).unwrap();
        let ticker = RepeatingTask::new(config.tick_period(), clock.clone());
        Controller::new(session, ticker, FakeFrontend::new(clock, script, answers))
    }

    #[test]
    fn declining_a_new_game_ends_the_run() {
        let mut ctl = controller(5, vec![], vec![false]);
        ctl.run().unwrap();

        let fe = &ctl.frontend;
        assert_eq!(fe.game_overs.len(), 1);
        assert!(!fe.game_overs[0].1);
        assert!(!ctl.ticker.is_active());
        assert_eq!(ctl.session().state(), GameState::Ended);
        // initial frame plus one per tick, every one covering the whole grid
        assert!(fe.frames >= 4);
        assert_eq!(fe.cells_drawn, fe.frames * 25);
        assert_eq!(fe.heads.len(), fe.frames);
    }

    #[test]
    fn dead_snake_is_marked_before_the_prompt() {
        let mut ctl = controller(5, vec![], vec![false]);
        ctl.run().unwrap();

        // the fatal move is never applied, so the marked body is the one on screen
        let fe = &ctl.frontend;
        assert_eq!(fe.dead_bodies.len(), 1);
        assert_eq!(fe.dead_bodies[0], ctl.session().snake().body().copied().collect::<Vec<_>>());
        assert_eq!(fe.heads.last(), Some(&(ctl.session().snake().head(), Direction::Right)));
    }

    #[test]
    fn accepting_restarts_with_a_fresh_session() {
        let mut ctl = controller(5, vec![], vec![true, false]);
        ctl.run().unwrap();

        assert_eq!(ctl.frontend.game_overs.len(), 2);
        assert_eq!(ctl.session().state(), GameState::Ended);
    }

    #[test]
    fn step_restarts_immediately_on_yes() {
        let mut ctl = controller(5, vec![], vec![true]);
        ctl.ticker.start();
        while ctl.session().state() == GameState::Running && ctl.frontend.game_overs.is_empty() {
            assert!(ctl.step().unwrap());
        }

        assert_eq!(ctl.frontend.game_overs.len(), 1);
        assert_eq!(ctl.session().state(), GameState::Running);
        assert_eq!(ctl.session().snake().len(), 1);
        assert_eq!(ctl.session().score(), 0);
        assert_eq!(ctl.session().snake().heading(), Direction::Right);
        assert!(ctl.ticker.is_active());
    }

    #[test]
    fn quit_stops_without_a_game_over() {
        let mut ctl = controller(9, vec![vec![Control::Quit]], vec![]);
        ctl.run().unwrap();

        assert!(ctl.frontend.game_overs.is_empty());
        assert!(!ctl.ticker.is_active());
        assert_eq!(ctl.session().state(), GameState::Running);
    }

    #[test]
    fn input_reaches_the_snake_on_the_next_tick() {
        let mut ctl = controller(
            9,
            vec![vec![Control::Input(InputEvent::Key(KeyCode::Up))], vec![Control::Quit]],
            vec![],
        );
        ctl.run().unwrap();

        assert_eq!(ctl.session().snake().heading(), Direction::Up);
        assert_eq!(ctl.session().snake().head(), (4, 1));
    }

    #[test]
    fn paused_game_does_not_tick() {
        let mut ctl = controller(
            9,
            vec![
                vec![Control::TogglePause],
                vec![Control::Input(InputEvent::Key(KeyCode::Up))],
                vec![],
                vec![],
                vec![Control::Quit],
            ],
            vec![],
        );
        ctl.run().unwrap();

        let s = ctl.session();
        assert_eq!(s.snake().head(), (4, 2));
        assert_eq!(s.pending_direction(), None);
        assert_eq!(ctl.frontend.pause_overlays, vec![true]);
    }
}
