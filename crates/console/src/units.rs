use glam::DVec3;
use gravsim_common::SimError;
use gravsim_common::error::require_positive;

/// Conversion between console units and internal units.
///
/// Lengths and velocities scale by `length`; radii additionally by `radius`
/// (a visual exaggeration); masses by `length³`, which keeps accelerations
/// consistent with the scaled lengths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Units {
    length: f64,
    radius: f64,
}

impl Default for Units {
    fn default() -> Self {
        Self {
            length: 1.0,
            radius: 1.0,
        }
    }
}

impl Units {
    pub fn new(length: f64, radius: f64) -> Result<Self, SimError> {
        Ok(Self {
            length: require_positive("length scale", length)?,
            radius: require_positive("radius scale", radius)?,
        })
    }

    pub fn length_in(&self, value: f64) -> f64 {
        value * self.length
    }

    pub fn length_out(&self, value: f64) -> f64 {
        value / self.length
    }

    pub fn length_in_vec(&self, value: DVec3) -> DVec3 {
        value * self.length
    }

    pub fn length_out_vec(&self, value: DVec3) -> DVec3 {
        value / self.length
    }

    pub fn radius_in(&self, value: f64) -> f64 {
        value * self.length * self.radius
    }

    pub fn radius_out(&self, value: f64) -> f64 {
        value / self.length / self.radius
    }

    pub fn mass_in(&self, value: f64) -> f64 {
        value * self.length.powi(3)
    }

    pub fn mass_out(&self, value: f64) -> f64 {
        value / self.length.powi(3)
    }
}
