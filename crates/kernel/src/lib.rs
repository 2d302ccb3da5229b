//! Universe kernel: authoritative body registry, global scaling parameters,
//! the per-tick integrator and the synchronized handle every thread shares.
//!
//! # Invariants
//! - A whole tick runs inside one critical section; readers never observe a
//!   half-integrated body set.
//! - Within a tick every body moves before any gravitational delta is computed.
//! - Setters validate first and leave the previous value on failure.

pub mod integrator;
pub mod presets;
pub mod shared;
pub mod universe;

pub use integrator::{StepParams, TickReport};
pub use presets::Preset;
pub use shared::SharedUniverse;
pub use universe::{Settings, TickOutcome, Transition, Universe};
