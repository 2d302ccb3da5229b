//! Text console: one command per line against the shared universe and view.
//!
//! # Invariants
//! - A failed command reports its error and changes nothing else; the console
//!   keeps running.
//! - User-facing quantities pass through [`Units`] on the way in and out; the
//!   integrator never sees presentation scaling.

mod command;
mod session;
mod units;

pub use command::{AddArgs, BodyProperty, CameraProperty, Command, CommandLine, GetTarget, SetTarget};
pub use session::{Console, ConsoleError, Reply};
pub use units::Units;
