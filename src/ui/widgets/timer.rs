//! Countdown timer state
//!
//! Plain value type: the event loop delivers ticks, `advance` mutates, the
//! renderer reads `view`. No terminal types leak in here.

use std::time::Duration;

/// Tick cadence for the countdown
pub const TIMER_TICK: Duration = Duration::from_secs(1);

/// Default countdown length, matching the dashboard's one-minute session
/// timer.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    remaining: Duration,
    running: bool,
}

impl TimerState {
    pub fn new(timeout: Duration) -> Self {
        Self {
            remaining: timeout,
            running: true,
        }
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Consume one tick. Stops at zero; extra ticks are no-ops.
    pub fn advance(&mut self) {
        if !self.running {
            return;
        }
        self.remaining = self.remaining.saturating_sub(TIMER_TICK);
        if self.remaining.is_zero() {
            self.running = false;
        }
    }

    /// Full reset to a fresh countdown, discarding elapsed time.
    pub fn reset(&mut self) {
        *self = Self::new(DEFAULT_TIMEOUT);
    }

    pub fn view(&self) -> String {
        let secs = self.remaining.as_secs();
        if secs >= 60 {
            format!("{}m{:02}s", secs / 60, secs % 60)
        } else {
            format!("{secs}s")
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_and_stops_at_zero() {
        let mut timer = TimerState::new(Duration::from_secs(2));
        assert!(timer.running());
        timer.advance();
        assert_eq!(timer.remaining(), Duration::from_secs(1));
        timer.advance();
        assert!(!timer.running());
        timer.advance();
        assert_eq!(timer.remaining(), Duration::ZERO);
    }

    #[test]
    fn reset_restores_full_countdown() {
        let mut timer = TimerState::new(Duration::from_secs(5));
        timer.advance();
        timer.reset();
        assert_eq!(timer.remaining(), DEFAULT_TIMEOUT);
        assert!(timer.running());
    }

    #[test]
    fn view_formats_minutes_and_seconds() {
        assert_eq!(TimerState::new(Duration::from_secs(60)).view(), "1m00s");
        assert_eq!(TimerState::new(Duration::from_secs(59)).view(), "59s");
    }
}
