//! Shared value types for the gravity simulator.
//!
//! # Invariants
//! - Bodies carry no identity of their own; the name they are registered
//!   under in the universe is their only key.
//! - Orientation angles are degrees, normalized into `[0, 360)` by the
//!   integrator and by every camera setter.

pub mod constants;
pub mod error;
pub mod types;

pub use error::SimError;
pub use types::{Angles, Body, Color};
