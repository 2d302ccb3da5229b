use std::sync::{Arc, Mutex, MutexGuard};

use gravsim_common::error::require_rate;
use gravsim_common::{Body, SimError};

use crate::camera::Camera;

/// Everything the render context reads besides the universe.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub camera: Camera,
    /// Target frames per second for the render context.
    frame_rate: f64,
}

impl Default for View {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            frame_rate: 60.0,
        }
    }
}

impl View {
    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }
}

/// Cloneable, mutex-guarded handle to the view.
///
/// Lock order: when both are needed, take the universe lock first.
#[derive(Debug, Clone, Default)]
pub struct SharedView {
    inner: Arc<Mutex<View>>,
}

impl SharedView {
    pub fn new(view: View) -> Self {
        Self {
            inner: Arc::new(Mutex::new(view)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, View> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("view lock poisoned by a panicking thread; recovering");
            poisoned.into_inner()
        })
    }

    pub fn camera(&self) -> Camera {
        self.lock().camera.clone()
    }

    /// Mutate the camera inside the critical section.
    pub fn update<R>(&self, f: impl FnOnce(&mut Camera) -> R) -> R {
        f(&mut self.lock().camera)
    }

    pub fn lock_camera(&self, name: &str, body: &Body) -> Result<(), SimError> {
        self.update(|camera| camera.lock(name, body))?;
        tracing::info!(body = name, "camera locked");
        Ok(())
    }

    pub fn unlock_camera(&self) -> Result<String, SimError> {
        let name = self.update(Camera::unlock)?;
        tracing::info!(body = %name, "camera unlocked");
        Ok(name)
    }

    pub fn change_lock_distance(&self, delta: f64) -> f64 {
        self.update(|camera| {
            camera.change_lock_distance(delta);
            camera.lock_distance()
        })
    }

    pub fn frame_rate(&self) -> f64 {
        self.lock().frame_rate
    }

    pub fn set_frame_rate(&self, frame_rate: f64) -> Result<(), SimError> {
        self.lock().frame_rate = require_rate("frame rate", frame_rate)?;
        Ok(())
    }
}
