//! Runtime: the physics, render and console contexts and their supervisor.
//!
//! Each context runs on its own thread and talks to the others only through
//! the shared universe, the shared view and a pair of [`Signal`]s.
//!
//! # Invariants
//! - A context stops once its `signal_in` is non-positive; it never touches
//!   another context's signals.
//! - The first context to report a non-positive `signal_out` decides the exit
//!   code of the whole process, and the supervisor hands that code to every
//!   other context within one poll.

mod contexts;
mod signal;
mod supervisor;

pub use contexts::{console_context, physics_context, render_context, spawn_line_reader};
pub use signal::{
    ContextSignals, EXIT_INIT_FAILURE, EXIT_OK, EXIT_PANIC, EXIT_PRESENT_FAILURE, RUNNING, Signal,
};
pub use supervisor::{SUPERVISOR_RATE, Supervisor};
