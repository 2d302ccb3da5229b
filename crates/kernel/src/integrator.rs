//! One integration tick over a body registry.
//!
//! The update runs in two phases: every body first coasts along its velocity
//! and spin, then every ordered pair `(a, b)` adds `b`'s pull to `a`'s
//! velocity, measured from the already-moved positions. That ordering is kept
//! deliberately; it is not a symplectic scheme.

use std::collections::BTreeMap;

use glam::DVec3;
use gravsim_common::Body;
use gravsim_common::constants::{C, G, MIN_SEPARATION};
use serde::{Deserialize, Serialize};

/// Scalars one tick needs, resolved from the universe settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepParams {
    /// Simulated seconds advanced by this tick.
    pub dt: f64,
    pub gravity_scaling: f64,
    /// Divisor applied to the speed of light inside the relativistic term.
    pub causality_scaling: f64,
}

impl StepParams {
    pub fn effective_c(&self) -> f64 {
        C / self.causality_scaling
    }
}

/// What a completed tick did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick counter after this tick.
    pub tick: u64,
    pub dt: f64,
    /// Ordered pairs skipped because the attracted body sat inside the
    /// source's causality-scaled Schwarzschild radius.
    pub horizon_crossings: usize,
}

/// Advance `bodies` by one tick. Returns the number of skipped horizon pairs.
pub fn advance(bodies: &mut BTreeMap<String, Body>, params: &StepParams) -> usize {
    kinematic_update(bodies.values_mut(), params.dt);
    gravitational_update(bodies, params)
}

/// Move every body along its velocity and spin it by its angular velocity.
pub fn kinematic_update<'a>(bodies: impl Iterator<Item = &'a mut Body>, dt: f64) {
    for body in bodies {
        body.position += body.velocity * dt;
        body.orientation = body.orientation.advanced(body.angular_velocity, dt);
    }
}

/// Apply pairwise gravitational velocity deltas, reading current positions.
pub fn gravitational_update(bodies: &mut BTreeMap<String, Body>, params: &StepParams) -> usize {
    let sources: Vec<(DVec3, f64)> = bodies.values().map(|b| (b.position, b.mass)).collect();
    let c_eff = params.effective_c();
    let mut crossings = 0;

    for (i, body) in bodies.values_mut().enumerate() {
        for (j, &(source_position, source_mass)) in sources.iter().enumerate() {
            if i == j {
                continue;
            }
            let d = source_position - body.position;
            let r2 = d.length_squared();
            let r = r2.sqrt();
            if r <= MIN_SEPARATION {
                continue;
            }
            let Some(g) = relativistic_acceleration(source_mass, r2, r, c_eff) else {
                crossings += 1;
                continue;
            };
            let f = params.dt * g * params.gravity_scaling / r;
            body.velocity += d * f;
        }
    }

    crossings
}

/// `G·m/r² / √(1 − 2·G·m/(r·c²))`, or `None` once the square root's argument
/// is no longer positive.
pub fn relativistic_acceleration(mass: f64, r2: f64, r: f64, c_eff: f64) -> Option<f64> {
    let horizon_ratio = 2.0 * G * mass / (r * c_eff * c_eff);
    // NaN fails this comparison too
    if !(horizon_ratio < 1.0) {
        return None;
    }
    Some(G * mass / r2 / (1.0 - horizon_ratio).sqrt())
}
