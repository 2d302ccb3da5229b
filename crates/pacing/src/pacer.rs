use std::thread;
use std::time::{Duration, Instant};

use gravsim_common::SimError;
use gravsim_common::error::require_rate;

/// Below this much remaining time the wait switches from sleeping to spinning.
pub const SPIN_THRESHOLD: Duration = Duration::from_millis(2);
/// Length of one coarse sleep; OS sleeps for "1 ms" routinely take up to 2.
pub const COARSE_STEP: Duration = Duration::from_micros(950);

/// Wait for `duration` with sub-millisecond precision.
///
/// Short coarse sleeps run while more than [`SPIN_THRESHOLD`] remains, each
/// followed by a fresh clock reading; the rest is a busy-wait on the clock.
pub fn sleep_precise(duration: Duration) {
    let deadline = Instant::now() + duration;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining <= SPIN_THRESHOLD {
            break;
        }
        thread::sleep(COARSE_STEP);
    }
    while Instant::now() < deadline {
        std::hint::spin_loop();
    }
}

/// Timing of one paced tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickTiming {
    /// Time spent on the work itself.
    pub elapsed: Duration,
    /// Time spent waiting afterwards.
    pub slept: Duration,
    /// The work took at least a full period; nothing was slept.
    pub overran: bool,
}

/// Holds a loop to a target tick rate.
///
/// Call [`tick_start`](Pacer::tick_start) before the work and
/// [`tick_end_and_sleep`](Pacer::tick_end_and_sleep) after it.
#[derive(Debug, Clone)]
pub struct Pacer {
    rate: f64,
    period: Duration,
    tick_start: Instant,
}

impl Pacer {
    pub fn new(ticks_per_second: f64) -> Result<Self, SimError> {
        let mut pacer = Self {
            rate: 0.0,
            period: Duration::ZERO,
            tick_start: Instant::now(),
        };
        pacer.set_tick_rate(ticks_per_second)?;
        Ok(pacer)
    }

    pub fn tick_rate(&self) -> f64 {
        self.rate
    }

    /// Target period, `1 / tick_rate`.
    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn set_tick_rate(&mut self, ticks_per_second: f64) -> Result<(), SimError> {
        let rate = require_rate("tick rate", ticks_per_second)?;
        let period = Duration::try_from_secs_f64(rate.recip())
            .map_err(|_| SimError::out_of_range("tick rate", rate))?;
        if rate != self.rate {
            tracing::debug!(rate, ?period, "tick rate set");
        }
        self.rate = rate;
        self.period = period;
        Ok(())
    }

    pub fn tick_start(&mut self) {
        self.tick_start = Instant::now();
    }

    /// Time since the last [`tick_start`](Pacer::tick_start).
    pub fn tick_end(&self) -> Duration {
        self.tick_start.elapsed()
    }

    /// Measure the tick and sleep out the rest of the period, if any is left.
    pub fn tick_end_and_sleep(&mut self) -> TickTiming {
        let elapsed = self.tick_end();
        match self.period.checked_sub(elapsed) {
            Some(remaining) if !remaining.is_zero() => {
                sleep_precise(remaining);
                TickTiming {
                    elapsed,
                    slept: remaining,
                    overran: false,
                }
            }
            _ => {
                tracing::trace!(?elapsed, period = ?self.period, "tick overran its budget");
                TickTiming {
                    elapsed,
                    slept: Duration::ZERO,
                    overran: true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_is_inverse_rate() {
        let pacer = Pacer::new(50.0).unwrap();
        assert_eq!(pacer.tick_rate(), 50.0);
        assert_eq!(pacer.period(), Duration::from_millis(20));
    }

    #[test]
    fn rejects_bad_rates_and_keeps_previous() {
        assert!(Pacer::new(0.0).is_err());
        assert!(Pacer::new(-60.0).is_err());
        assert!(Pacer::new(f64::NAN).is_err());
        assert!(Pacer::new(1e-300).is_err());
        assert!(Pacer::new(f64::INFINITY).is_err());

        let mut pacer = Pacer::new(30.0).unwrap();
        assert!(pacer.set_tick_rate(0.0).is_err());
        assert_eq!(pacer.tick_rate(), 30.0);
    }

    #[test]
    fn precise_sleep_waits_at_least_requested() {
        for ms in [0, 1, 3, 12] {
            let wanted = Duration::from_millis(ms);
            let start = Instant::now();
            sleep_precise(wanted);
            let took = start.elapsed();
            assert!(took >= wanted, "{took:?} < {wanted:?}");
            assert!(took < wanted + Duration::from_millis(50), "{took:?}");
        }
    }

    #[test]
    fn tick_fills_the_period() {
        let mut pacer = Pacer::new(100.0).unwrap();
        let start = Instant::now();
        pacer.tick_start();
        let timing = pacer.tick_end_and_sleep();
        let took = start.elapsed();
        assert!(!timing.overran);
        assert!(took >= Duration::from_millis(10), "{took:?}");
        assert_eq!(timing.elapsed + timing.slept, pacer.period());
    }

    #[test]
    fn overrun_does_not_sleep() {
        let mut pacer = Pacer::new(1000.0).unwrap();
        pacer.tick_start();
        thread::sleep(Duration::from_millis(5));
        let timing = pacer.tick_end_and_sleep();
        assert!(timing.overran);
        assert_eq!(timing.slept, Duration::ZERO);
        assert!(timing.elapsed >= Duration::from_millis(5));
    }
}
