/// The three periodic drivers that run an active session: the ~60 Hz
/// motion/collision tick, the one-second countdown, and the per-difficulty
/// spawner.  They are owned as a single set so starting and stopping them is
/// one operation — there is no way to leave a stray interval running against
/// reset state.
///
/// Polling is explicit: the frame loop passes in "now" and receives how many
/// times each driver came due, which also keeps the whole thing testable
/// without sleeping.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::compute::spawn_interval;
use crate::entities::Difficulty;

/// Period of the motion/collision driver (~60 Hz).
pub const SIM_TICK: Duration = Duration::from_micros(16_667);
/// Period of the countdown driver.
pub const TIMER_TICK: Duration = Duration::from_secs(1);

/// A fixed-rate deadline.  `poll` catches up if the caller was delayed, so a
/// slow frame never silently drops simulation time.
struct Interval {
    period: Duration,
    next: Instant,
}

impl Interval {
    fn new(period: Duration, now: Instant) -> Self {
        Interval {
            period,
            next: now + period,
        }
    }

    /// Number of times this interval has come due since the last poll.
    fn poll(&mut self, now: Instant) -> u32 {
        let mut fired = 0;
        while self.next <= now {
            fired += 1;
            self.next += self.period;
        }
        fired
    }
}

/// How many times each driver came due.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DueTicks {
    pub sim: u32,
    pub timer: u32,
    pub spawn: u32,
}

/// The owned driver set for one session.
pub struct Drivers {
    running: bool,
    sim: Interval,
    timer: Interval,
    spawn: Interval,
}

impl Drivers {
    /// Start all three drivers, phase-aligned to `now`.
    pub fn start(difficulty: &Difficulty, now: Instant) -> Self {
        let spawn_period = spawn_interval(difficulty);
        debug!(?difficulty, ?spawn_period, "starting session drivers");
        Drivers {
            running: true,
            sim: Interval::new(SIM_TICK, now),
            timer: Interval::new(TIMER_TICK, now),
            spawn: Interval::new(spawn_period, now),
        }
    }

    /// Report due ticks.  A stopped set always reports zero.
    pub fn poll(&mut self, now: Instant) -> DueTicks {
        if !self.running {
            return DueTicks::default();
        }
        DueTicks {
            sim: self.sim.poll(now),
            timer: self.timer.poll(now),
            spawn: self.spawn.poll(now),
        }
    }

    /// Stop all three drivers at once.  Idempotent.
    pub fn stop(&mut self) {
        if self.running {
            debug!("stopping session drivers");
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
