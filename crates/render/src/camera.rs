use glam::{DMat4, DVec3};
use gravsim_common::error::require_non_negative;
use gravsim_common::types::wrap_degrees;
use gravsim_common::{Angles, Body, SimError};
use serde::{Deserialize, Serialize};

/// A freshly locked camera stands this many body radii away.
pub const LOCK_DISTANCE_RADII: f64 = 5.0;
/// Vertical angle limits; the poles themselves would flip the view.
pub const PHI_MIN: f64 = 0.1;
pub const PHI_MAX: f64 = 179.9;

/// Observer state. Not simulated; moved by input, by the console and, while
/// locked, by the render tick.
///
/// Angles are degrees: theta is heading in the xy plane, phi is measured
/// down from +z, psi is roll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    position: DVec3,
    angles: Angles,
    /// m/s
    speed: f64,
    /// degrees/s
    rotation_speed: f64,
    /// degrees per pointer unit
    sensitivity: f64,
    locked_body: Option<String>,
    lock_distance: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            angles: Angles::new(90.0, 90.0, 0.0),
            speed: 1.0,
            rotation_speed: 1.0,
            sensitivity: 1.0,
            locked_body: None,
            lock_distance: 0.0,
        }
    }
}

impl Camera {
    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn angles(&self) -> Angles {
        self.angles
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn rotation_speed(&self) -> f64 {
        self.rotation_speed
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    pub fn locked_body(&self) -> Option<&str> {
        self.locked_body.as_deref()
    }

    pub fn is_locked(&self) -> bool {
        self.locked_body.is_some()
    }

    pub fn lock_distance(&self) -> f64 {
        self.lock_distance
    }

    /// Unit vector the camera looks along.
    pub fn facing(&self) -> DVec3 {
        let theta = self.angles.theta.to_radians();
        let phi = self.angles.phi.to_radians();
        DVec3::new(theta.cos() * phi.sin(), theta.sin() * phi.sin(), phi.cos())
    }

    pub fn set_position(&mut self, position: DVec3) {
        self.position = position;
    }

    pub fn translate(&mut self, delta: DVec3) {
        self.position += delta;
    }

    /// Set all three angles, each reduced into `[0, 360)`.
    pub fn set_angles(&mut self, angles: Angles) {
        self.angles = angles.wrapped();
    }

    /// Turn by `delta`. Heading and roll wrap; phi stops just short of the poles.
    pub fn rotate(&mut self, delta: Angles) {
        let phi = self.angles.phi + delta.phi;
        self.angles = Angles {
            theta: wrap_degrees(self.angles.theta + delta.theta),
            phi: if phi > 180.0 {
                PHI_MAX
            } else if phi < 0.0 {
                PHI_MIN
            } else {
                phi
            },
            psi: wrap_degrees(self.angles.psi + delta.psi),
        };
    }

    /// Move relative to the heading in the xy plane; `up` is along +z.
    pub fn move_relative(&mut self, forward: f64, right: f64, up: f64) {
        let theta = self.angles.theta.to_radians();
        let (sin, cos) = theta.sin_cos();
        self.position += DVec3::new(
            forward * cos + right * sin,
            forward * sin - right * cos,
            up,
        );
    }

    /// Held-key movement: each axis in `[-1, 1]`, scaled by speed and `dt`.
    pub fn fly(&mut self, forward: f64, right: f64, up: f64, dt: f64) {
        let step = self.speed * dt;
        self.move_relative(forward * step, right * step, up * step);
    }

    /// Pointer-driven look: pixel deltas scaled by sensitivity.
    pub fn look(&mut self, dx: f64, dy: f64) {
        self.rotate(Angles::new(-dx * self.sensitivity, dy * self.sensitivity, 0.0));
    }

    /// Held-key turning, scaled by rotation speed and `dt`.
    pub fn turn(&mut self, yaw: f64, pitch: f64, roll: f64, dt: f64) {
        let step = self.rotation_speed * dt;
        self.rotate(Angles::new(yaw * step, pitch * step, roll * step));
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<(), SimError> {
        self.speed = require_non_negative("camera speed", speed)?;
        Ok(())
    }

    pub fn set_rotation_speed(&mut self, rotation_speed: f64) -> Result<(), SimError> {
        self.rotation_speed = require_non_negative("rotation speed", rotation_speed)?;
        Ok(())
    }

    pub fn set_sensitivity(&mut self, sensitivity: f64) -> Result<(), SimError> {
        self.sensitivity = require_non_negative("sensitivity", sensitivity)?;
        Ok(())
    }

    /// Bind to `name`, standing off [`LOCK_DISTANCE_RADII`] radii from `body`.
    pub fn lock(&mut self, name: &str, body: &Body) -> Result<(), SimError> {
        if name.is_empty() {
            return Err(SimError::InvalidName);
        }
        self.locked_body = Some(name.to_string());
        self.lock_distance = body.radius * LOCK_DISTANCE_RADII;
        Ok(())
    }

    pub fn unlock(&mut self) -> Result<String, SimError> {
        self.locked_body.take().ok_or(SimError::NotLocked)
    }

    pub fn set_lock_distance(&mut self, distance: f64) -> Result<(), SimError> {
        self.lock_distance = require_non_negative("lock distance", distance)?;
        Ok(())
    }

    /// Add `delta` to the standoff distance, never going below zero.
    pub fn change_lock_distance(&mut self, delta: f64) {
        self.lock_distance = (self.lock_distance + delta).max(0.0);
    }

    /// Stand `lock_distance` behind `target` along the facing vector.
    pub fn follow(&mut self, target: DVec3) {
        self.position = target - self.facing() * self.lock_distance;
    }

    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.position, self.position + self.facing(), DVec3::Z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: DVec3, b: DVec3) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn default_camera_faces_plus_y() {
        let cam = Camera::default();
        assert!(close(cam.facing(), DVec3::Y));
        assert!(!cam.is_locked());
        let view = cam.view_matrix();
        assert!(!view.col(0).x.is_nan());
    }

    #[test]
    fn facing_is_unit_length() {
        let mut cam = Camera::default();
        for (theta, phi) in [(0.0, 10.0), (123.0, 45.0), (300.0, 179.9)] {
            cam.set_angles(Angles::new(theta, phi, 0.0));
            assert!((cam.facing().length() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn set_angles_wraps() {
        let mut cam = Camera::default();
        cam.set_angles(Angles::new(725.0, -10.0, 360.0));
        assert_eq!(cam.angles(), Angles::new(5.0, 350.0, 0.0));
    }

    #[test]
    fn rotate_clamps_phi_and_wraps_heading() {
        let mut cam = Camera::default();
        cam.rotate(Angles::new(300.0, 100.0, -10.0));
        assert_eq!(cam.angles().theta, 30.0);
        assert_eq!(cam.angles().phi, PHI_MAX);
        assert_eq!(cam.angles().psi, 350.0);
        cam.rotate(Angles::new(0.0, -500.0, 0.0));
        assert_eq!(cam.angles().phi, PHI_MIN);
    }

    #[test]
    fn move_relative_follows_heading() {
        let mut cam = Camera::default(); // heading +y
        cam.move_relative(2.0, 0.0, 0.0);
        assert!(close(cam.position(), DVec3::new(0.0, 2.0, 0.0)));
        cam.move_relative(0.0, 1.0, 3.0);
        assert!(close(cam.position(), DVec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn fly_scales_by_speed() {
        let mut cam = Camera::default();
        cam.set_speed(10.0).unwrap();
        cam.fly(1.0, 0.0, 0.0, 0.5);
        assert!(close(cam.position(), DVec3::new(0.0, 5.0, 0.0)));
    }

    #[test]
    fn negative_rates_rejected() {
        let mut cam = Camera::default();
        assert!(cam.set_speed(-1.0).is_err());
        assert!(cam.set_rotation_speed(-1.0).is_err());
        assert!(cam.set_sensitivity(-0.1).is_err());
        assert_eq!(cam.speed(), 1.0);
        cam.set_sensitivity(0.0).unwrap();
        cam.look(100.0, 100.0);
        assert_eq!(cam.angles(), Angles::new(90.0, 90.0, 0.0));
    }

    #[test]
    fn lock_sets_standoff_from_radius() {
        let mut cam = Camera::default();
        let body = Body::at(DVec3::ZERO, 2.0, 1.0);
        assert_eq!(cam.lock("", &body), Err(SimError::InvalidName));
        assert!(!cam.is_locked());

        cam.lock("earth", &body).unwrap();
        assert_eq!(cam.locked_body(), Some("earth"));
        assert_eq!(cam.lock_distance(), 10.0);

        assert_eq!(cam.unlock(), Ok("earth".to_string()));
        assert_eq!(cam.unlock(), Err(SimError::NotLocked));
    }

    #[test]
    fn lock_distance_never_negative() {
        let mut cam = Camera::default();
        cam.lock("a", &Body::at(DVec3::ZERO, 1.0, 1.0)).unwrap();
        cam.change_lock_distance(-2.0);
        assert_eq!(cam.lock_distance(), 3.0);
        cam.change_lock_distance(-100.0);
        assert_eq!(cam.lock_distance(), 0.0);
        assert!(cam.set_lock_distance(-1.0).is_err());
        cam.set_lock_distance(7.5).unwrap();
        assert_eq!(cam.lock_distance(), 7.5);
    }

    #[test]
    fn follow_stands_behind_target() {
        let mut cam = Camera::default();
        cam.lock("a", &Body::at(DVec3::ZERO, 1.0, 1.0)).unwrap();
        cam.follow(DVec3::new(10.0, 10.0, 10.0));
        assert!(close(cam.position(), DVec3::new(10.0, 5.0, 10.0)));

        cam.set_angles(Angles::new(0.0, 90.0, 0.0)); // now facing +x
        cam.follow(DVec3::new(10.0, 10.0, 10.0));
        assert!(close(cam.position(), DVec3::new(5.0, 10.0, 10.0)));
    }
}
