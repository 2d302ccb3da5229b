use glam::DVec3;
use gravsim_common::Body;
use gravsim_kernel::Universe;

use crate::camera::Camera;

/// Everything a backend needs to draw one frame, detached from the locks.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub tick: u64,
    /// Simulated seconds.
    pub elapsed: f64,
    /// Bodies in name order.
    pub bodies: Vec<(String, Body)>,
    pub camera: Camera,
    /// Position of the light-source body, if there is one.
    pub light: Option<DVec3>,
}

/// Move a locked camera onto its body. Returns whether the camera moved.
///
/// A lock naming a body that no longer exists leaves the camera in place.
pub fn couple_camera(universe: &Universe, camera: &mut Camera) -> bool {
    let Some(target) = camera
        .locked_body()
        .and_then(|name| universe.body(name))
        .map(|body| body.position)
    else {
        return false;
    };
    camera.follow(target);
    true
}

/// Couple the camera, then snapshot the universe and camera into a frame.
///
/// Callers hold the universe lock (and the view lock for `camera`) for the
/// duration, so body positions and the locked camera agree.
pub fn compose_frame(universe: &Universe, camera: &mut Camera) -> Frame {
    couple_camera(universe, camera);
    let light = universe
        .bodies()
        .values()
        .rev()
        .find(|body| body.is_light_source())
        .map(|body| body.position);
    Frame {
        tick: universe.tick(),
        elapsed: universe.elapsed(),
        bodies: universe
            .bodies()
            .iter()
            .map(|(name, body)| (name.clone(), *body))
            .collect(),
        camera: camera.clone(),
        light,
    }
}
