/// Level countdown: a cancellable once-per-period timer owned by the session.
///
/// Two ways to drive it:
///   - `tick()`: one period elapsed (tests, external tick sources)
///   - `advance(elapsed)`: wall-clock time from the game loop; fires as many
///     ticks as whole periods accumulated
///
/// Once it expires or is cancelled it never fires again.

use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Countdown {
    remaining: u32,
    period: Duration,
    carry: Duration,
    running: bool,
}

/// Result of feeding time into the countdown.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TickOutcome {
    /// Not running (expired or cancelled) or no full period elapsed.
    Idle,
    /// One or more seconds were taken off; still time left.
    Ticked,
    /// Reached zero on this call.
    Expired,
}

impl Countdown {
    pub fn new(seconds: u32, period: Duration) -> Self {
        Countdown {
            remaining: seconds,
            period: period.max(Duration::from_millis(1)),
            carry: Duration::ZERO,
            running: true,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn cancel(&mut self) {
        self.running = false;
        self.carry = Duration::ZERO;
    }

    /// One period elapsed.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            TickOutcome::Expired
        } else {
            TickOutcome::Ticked
        }
    }

    /// Feed wall-clock time; leftover below one period carries to the next call.
    pub fn advance(&mut self, elapsed: Duration) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }
        self.carry += elapsed;
        let mut outcome = TickOutcome::Idle;
        while self.carry >= self.period {
            self.carry -= self.period;
            outcome = self.tick();
            if outcome == TickOutcome::Expired {
                self.carry = Duration::ZERO;
                break;
            }
        }
        outcome
    }
}
