//! Pacing: make a unit of work repeat at a configured rate.
//!
//! # Invariants
//! - An overrunning tick is never compensated; the next one starts at once.
//! - Waits finish with a busy-poll of the clock, so wake-up error stays well
//!   under a millisecond at the cost of spinning for the final ~2 ms.

mod pacer;
mod timer;

pub use pacer::{COARSE_STEP, Pacer, SPIN_THRESHOLD, TickTiming, sleep_precise};
pub use timer::FrameTimer;
