//! Physical constants (SI) and reference values for the solar-system preset.

/// Gravitational constant, m³·kg⁻¹·s⁻².
pub const G: f64 = 6.6743e-11;
/// Speed of light in vacuum, m/s.
pub const C: f64 = 299_792_458.0;

/// Pairs closer than this (meters) exert no force on each other.
pub const MIN_SEPARATION: f64 = 1e-18;

/// Reference values for one body: radius (m), mass (kg), orbital distance
/// from its parent (m) and mean orbital speed (m/s).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reference {
    pub name: &'static str,
    pub radius: f64,
    pub mass: f64,
    pub distance: f64,
    pub speed: f64,
}

pub const SUN: Reference = Reference {
    name: "sun",
    radius: 695_700_000.0,
    mass: 1.9885e30,
    distance: 0.0,
    speed: 0.0,
};

/// Planets in orbital order, all orbiting the Sun.
pub const PLANETS: [Reference; 8] = [
    Reference {
        name: "mercury",
        radius: 2439.7e3,
        mass: 3.3011e23,
        distance: 57.91e9,
        speed: 47.36e3,
    },
    Reference {
        name: "venus",
        radius: 6_051_800.0,
        mass: 4.8675e24,
        distance: 108.21e9,
        speed: 35.02e3,
    },
    Reference {
        name: "earth",
        radius: 6371.0e3,
        mass: 5.972168e24,
        distance: 149.598023e9,
        speed: 29.7827e3,
    },
    Reference {
        name: "mars",
        radius: 3389.5e3,
        mass: 6.4171e23,
        distance: 227.939366e9,
        speed: 24.07e3,
    },
    Reference {
        name: "jupiter",
        radius: 69911.0e3,
        mass: 1.8982e27,
        distance: 778.479e9,
        speed: 13.06e3,
    },
    Reference {
        name: "saturn",
        radius: 58232.0e3,
        mass: 5.6834e26,
        distance: 1433.53e9,
        speed: 9.68e3,
    },
    Reference {
        name: "uranus",
        radius: 25362.0e3,
        mass: 8.681e25,
        distance: 2870.972e9,
        speed: 6.8e3,
    },
    Reference {
        name: "neptune",
        radius: 24622.0e3,
        mass: 1.02409e26,
        distance: 4.5e12,
        speed: 5.43e3,
    },
];

/// The Moon; distance and speed are relative to Earth.
pub const MOON: Reference = Reference {
    name: "moon",
    radius: 1737.4e3,
    mass: 7.346e22,
    distance: 384_399.0e3,
    speed: 1.022e3,
};

/// Schwarzschild radius of `mass` for a given effective speed of light.
pub fn schwarzschild_radius(mass: f64, c_eff: f64) -> f64 {
    2.0 * G * mass / (c_eff * c_eff)
}
