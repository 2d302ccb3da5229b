//! Rendering adapter: observer camera, per-frame composition and the seams a
//! graphics backend plugs into.
//!
//! # Invariants
//! - Rendering never mutates the universe; the only state it writes is the
//!   camera position of a locked camera.
//! - Frames are composed while the universe lock is held, with the view lock
//!   taken second, so a locked camera never lags its body by a tick.

mod camera;
mod frame;
mod renderer;
mod surface;
mod view;

pub use camera::{Camera, LOCK_DISTANCE_RADII, PHI_MAX, PHI_MIN};
pub use frame::{Frame, compose_frame, couple_camera};
pub use renderer::{DebugTextRenderer, Renderer};
pub use surface::{HeadlessSurface, RenderError, RenderSurface, TextSurface};
pub use view::{SharedView, View};
