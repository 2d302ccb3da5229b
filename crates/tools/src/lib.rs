//! Developer tooling: read-only views over the universe for the console and logs.
//!
//! # Invariants
//! - Inspection never mutates the universe.

mod inspector;

pub use inspector::{Diagnostics, UniverseInspector, UniverseSummary};
