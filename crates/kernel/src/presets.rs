use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use gravsim_common::constants::{MOON, PLANETS, Reference, SUN};
use gravsim_common::{Body, Color, SimError};

use crate::universe::Universe;

/// Named starting configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Empty,
    /// Sun, the eight planets and the Moon on circular orbits in the xy plane.
    SolarSystem,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Empty, Preset::SolarSystem];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Empty => "empty",
            Preset::SolarSystem => "solar-system",
        }
    }

    /// Replace the universe's bodies with this preset's. Scalars are untouched.
    pub fn populate(&self, universe: &mut Universe) -> Result<(), SimError> {
        universe.clear_bodies();
        match self {
            Preset::Empty => {}
            Preset::SolarSystem => {
                universe.add_body(
                    SUN.name,
                    Body::at(DVec3::ZERO, SUN.radius, SUN.mass)
                        .with_appearance(1.0, Color::new(1.0, 0.85, 0.4)),
                )?;
                let mut earth = None;
                for (reference, color) in PLANETS.iter().zip(PLANET_COLORS) {
                    let body = orbiting(reference, DVec3::ZERO, DVec3::ZERO)
                        .with_appearance(0.1, color);
                    if reference.name == "earth" {
                        earth = Some(body);
                    }
                    universe.add_body(reference.name, body)?;
                }
                if let Some(earth) = earth {
                    universe.add_body(
                        MOON.name,
                        orbiting(&MOON, earth.position, earth.velocity)
                            .with_appearance(0.1, Color::new(0.7, 0.7, 0.7)),
                    )?;
                }
            }
        }
        tracing::info!(
            preset = self.name(),
            bodies = universe.body_count(),
            "preset loaded"
        );
        Ok(())
    }
}

const PLANET_COLORS: [Color; 8] = [
    Color::new(0.6, 0.6, 0.6),
    Color::new(0.9, 0.8, 0.5),
    Color::new(0.2, 0.4, 1.0),
    Color::new(0.9, 0.4, 0.2),
    Color::new(0.8, 0.7, 0.5),
    Color::new(0.9, 0.8, 0.6),
    Color::new(0.6, 0.9, 0.9),
    Color::new(0.3, 0.4, 0.9),
];

/// Place `reference` on +x of its parent moving along +y.
fn orbiting(reference: &Reference, parent_position: DVec3, parent_velocity: DVec3) -> Body {
    Body::at(
        parent_position + DVec3::new(reference.distance, 0.0, 0.0),
        reference.radius,
        reference.mass,
    )
    .with_velocity(parent_velocity + DVec3::new(0.0, reference.speed, 0.0))
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == s || (s == "solar" && *p == Preset::SolarSystem))
            .ok_or_else(|| SimError::NotFound(s.to_string()))
    }
}
