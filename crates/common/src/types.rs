use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, require_finite_vec, require_non_negative, require_unit};

/// Orientation or angular rate in degrees: horizontal (theta), vertical (phi), spin (psi).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Angles {
    pub theta: f64,
    pub phi: f64,
    pub psi: f64,
}

impl Angles {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(theta: f64, phi: f64, psi: f64) -> Self {
        Self { theta, phi, psi }
    }

    /// Every component reduced into `[0, 360)`, however many turns it carries.
    pub fn wrapped(self) -> Self {
        Self {
            theta: wrap_degrees(self.theta),
            phi: wrap_degrees(self.phi),
            psi: wrap_degrees(self.psi),
        }
    }

    pub fn to_dvec3(self) -> DVec3 {
        DVec3::new(self.theta, self.phi, self.psi)
    }

    /// `self + rate * dt`, wrapped.
    pub fn advanced(self, rate: Angles, dt: f64) -> Self {
        Self {
            theta: self.theta + rate.theta * dt,
            phi: self.phi + rate.phi * dt,
            psi: self.psi + rate.psi * dt,
        }
        .wrapped()
    }
}

/// Reduce an angle in degrees into `[0, 360)`.
pub fn wrap_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Linear RGB, each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        require_unit("red", self.red)?;
        require_unit("green", self.green)?;
        require_unit("blue", self.blue)?;
        Ok(())
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A gravitating sphere.
///
/// Positions are meters in the simulation's internal frame, velocities m/s,
/// angles degrees and angular rates degrees/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: DVec3,
    pub velocity: DVec3,
    pub orientation: Angles,
    pub angular_velocity: Angles,
    /// Meters.
    pub radius: f64,
    /// Kilograms.
    pub mass: f64,
    /// `1.0` marks a light source.
    pub luminosity: f32,
    pub color: Color,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            velocity: DVec3::ZERO,
            orientation: Angles::ZERO,
            angular_velocity: Angles::ZERO,
            radius: 0.0,
            mass: 0.0,
            luminosity: 0.1,
            color: Color::WHITE,
        }
    }
}

impl Body {
    /// A body at rest at `position`.
    pub fn at(position: DVec3, radius: f64, mass: f64) -> Self {
        Self {
            position,
            radius,
            mass,
            ..Self::default()
        }
    }

    pub fn with_velocity(mut self, velocity: DVec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_spin(mut self, angular_velocity: Angles) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn with_appearance(mut self, luminosity: f32, color: Color) -> Self {
        self.luminosity = luminosity;
        self.color = color;
        self
    }

    pub fn is_light_source(&self) -> bool {
        self.luminosity == 1.0
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Check the physical and visual ranges: every vector and angle finite,
    /// mass and radius non-negative, luminosity and color inside `[0, 1]`.
    pub fn validate(&self) -> Result<(), SimError> {
        require_finite_vec("position", self.position)?;
        require_finite_vec("velocity", self.velocity)?;
        require_finite_vec("orientation", self.orientation.to_dvec3())?;
        require_finite_vec("angular velocity", self.angular_velocity.to_dvec3())?;
        require_non_negative("mass", self.mass)?;
        require_non_negative("radius", self.radius)?;
        require_unit("luminosity", self.luminosity)?;
        self.color.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_body_is_a_dim_white_point() {
        let b = Body::default();
        assert_eq!(b.position, DVec3::ZERO);
        assert_eq!(b.mass, 0.0);
        assert_eq!(b.luminosity, 0.1);
        assert_eq!(b.color, Color::WHITE);
        assert!(!b.is_light_source());
        assert!(b.validate().is_ok());
    }

    #[test]
    fn wrap_handles_multiple_turns_both_ways() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert!((wrap_degrees(1090.0) - 10.0).abs() < 1e-9);
        assert!((wrap_degrees(-30.0) - 330.0).abs() < 1e-9);
        assert!((wrap_degrees(-750.0) - 330.0).abs() < 1e-9);
        let tiny = wrap_degrees(-1e-15);
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn advanced_angles_stay_in_range() {
        let a = Angles::new(350.0, 10.0, 0.0).advanced(Angles::new(20.0, -20.0, 7200.5), 1.0);
        assert!((a.theta - 10.0).abs() < 1e-9);
        assert!((a.phi - 350.0).abs() < 1e-9);
        assert!((a.psi - 0.5).abs() < 1e-9);
    }

    #[test]
    fn validate_rejects_out_of_range_fields() {
        let negative_mass = Body::at(DVec3::ZERO, 1.0, -1.0);
        assert!(matches!(
            negative_mass.validate(),
            Err(SimError::OutOfRange { what: "mass", .. })
        ));

        let bright = Body::default().with_appearance(1.5, Color::WHITE);
        assert!(bright.validate().is_err());

        let off_color = Body::default().with_appearance(0.5, Color::new(0.2, 1.2, 0.0));
        assert!(matches!(
            off_color.validate(),
            Err(SimError::OutOfRange { what: "green", .. })
        ));
    }

    #[test]
    fn validate_rejects_non_finite_motion() {
        let nan_spin = Body::default().with_spin(Angles::new(f64::NAN, 0.0, 0.0));
        assert!(matches!(
            nan_spin.validate(),
            Err(SimError::OutOfRange { what: "angular velocity", .. })
        ));
        let runaway = Body::default().with_velocity(DVec3::new(0.0, f64::INFINITY, 0.0));
        assert!(runaway.validate().is_err());
        let lost = Body::at(DVec3::splat(f64::NAN), 1.0, 1.0);
        assert!(lost.validate().is_err());
        assert!(Body::at(DVec3::ONE, f64::INFINITY, 1.0).validate().is_err());
    }

    #[test]
    fn light_source_means_exactly_one() {
        let sun = Body::default().with_appearance(1.0, Color::new(1.0, 0.9, 0.6));
        assert!(sun.is_light_source());
        let dim = Body::default().with_appearance(0.99, Color::WHITE);
        assert!(!dim.is_light_source());
    }
}
