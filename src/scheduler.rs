use std::time::{Duration, Instant};
#[cfg(test)]
use std::{cell::Cell, rc::Rc};

pub trait Clock {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[cfg(test)]
#[derive(Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        ManualClock { now: Rc::new(Cell::new(Instant::now())) }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// A cancellable task that comes due once per period.
pub struct RepeatingTask<C: Clock> {
    period: Duration,
    next_due: Option<Instant>,
    clock: C,
}

impl<C: Clock> RepeatingTask<C> {
    pub fn new(period: Duration, clock: C) -> Self {
        RepeatingTask { period, next_due: None, clock }
    }

    pub fn start(&mut self) {
        self.next_due = Some(self.clock.now() + self.period);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Returns true if a tick is due, and schedules the one after it.
    pub fn poll(&mut self) -> bool {
        let due = match self.next_due {
            Some(due) => due,
            None => return false,
        };

        let now = self.clock.now();
        if now < due {
            return false;
        }

        // Far behind (a blocking prompt, a suspended process): skip the
        // missed ticks instead of firing them back to back
        let next = due + self.period;
        self.next_due = Some(if next <= now { now + self.period } else { next });
        true
    }

    pub fn time_until_next(&self) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(self.clock.now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(100);

    #[test]
    fn fires_once_per_period() {
        let clock = ManualClock::new();
        let mut task = RepeatingTask::new(PERIOD, clock.clone());
        assert!(!task.poll());

        task.start();
        assert!(!task.poll());
        assert_eq!(task.time_until_next(), Some(PERIOD));

        clock.advance(Duration::from_millis(99));
        assert!(!task.poll());
        clock.advance(Duration::from_millis(1));
        assert!(task.poll());
        assert!(!task.poll());

        clock.advance(PERIOD);
        assert!(task.poll());
    }

    #[test]
    fn cancel_is_immediate_and_idempotent() {
        let clock = ManualClock::new();
        let mut task = RepeatingTask::new(PERIOD, clock.clone());
        task.start();
        clock.advance(PERIOD * 3);

        task.cancel();
        task.cancel();
        assert!(!task.is_active());
        assert!(!task.poll());
        assert_eq!(task.time_until_next(), None);

        clock.advance(PERIOD * 10);
        assert!(!task.poll());
    }

    #[test]
    fn restart_rearms_from_now() {
        let clock = ManualClock::new();
        let mut task = RepeatingTask::new(PERIOD, clock.clone());
        task.start();
        task.cancel();
        clock.advance(PERIOD * 5);

        task.start();
        assert!(!task.poll());
        clock.advance(PERIOD);
        assert!(task.poll());
    }

    #[test]
    fn falling_behind_does_not_burst() {
        let clock = ManualClock::new();
        let mut task = RepeatingTask::new(PERIOD, clock.clone());
        task.start();
        clock.advance(PERIOD * 4);

        assert!(task.poll());
        assert!(!task.poll());
        assert_eq!(task.time_until_next(), Some(PERIOD));
    }
}
