use std::fmt;

use glam::DVec3;
use gravsim_kernel::{Settings, Universe};
use serde::Serialize;

/// Read-only queries for debugging and the console.
pub struct UniverseInspector;

impl UniverseInspector {
    pub fn summary(universe: &Universe) -> UniverseSummary {
        UniverseSummary {
            tick: universe.tick(),
            elapsed: universe.elapsed(),
            body_count: universe.body_count(),
            settings: universe.settings(),
            diagnostics: Self::diagnostics(universe),
        }
    }

    /// Conserved quantities of the body set. Under Newtonian gravity with no
    /// horizon crossings, momentum is conserved tick to tick up to rounding.
    pub fn diagnostics(universe: &Universe) -> Diagnostics {
        let mut total_mass = 0.0;
        let mut weighted = DVec3::ZERO;
        let mut momentum = DVec3::ZERO;
        let mut kinetic_energy = 0.0;
        for body in universe.bodies().values() {
            total_mass += body.mass;
            weighted += body.position * body.mass;
            momentum += body.velocity * body.mass;
            kinetic_energy += 0.5 * body.mass * body.velocity.length_squared();
        }
        let center_of_mass = if total_mass > 0.0 {
            weighted / total_mass
        } else {
            DVec3::ZERO
        };
        Diagnostics {
            total_mass,
            center_of_mass: center_of_mass.to_array(),
            momentum: momentum.to_array(),
            kinetic_energy,
        }
    }

    pub fn to_json(summary: &UniverseSummary) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(summary)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pub total_mass: f64,
    pub center_of_mass: [f64; 3],
    pub momentum: [f64; 3],
    pub kinetic_energy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniverseSummary {
    pub tick: u64,
    /// Simulated seconds.
    pub elapsed: f64,
    pub body_count: usize,
    pub settings: Settings,
    pub diagnostics: Diagnostics,
}

impl fmt::Display for UniverseSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.settings;
        let d = &self.diagnostics;
        writeln!(
            f,
            "Universe: tick={} t={:.3} s bodies={} paused={}",
            self.tick, self.elapsed, self.body_count, s.paused
        )?;
        writeln!(
            f,
            "Scaling: tickSpeed={} timeScaling={} gravityScaling={} cScaling={}",
            s.tick_speed, s.time_scaling, s.gravity_scaling, s.causality_scaling
        )?;
        write!(
            f,
            "Mass={:.4e} kg momentum=({:.4e}, {:.4e}, {:.4e}) kinetic={:.4e} J",
            d.total_mass, d.momentum[0], d.momentum[1], d.momentum[2], d.kinetic_energy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gravsim_common::Body;

    fn pair() -> Universe {
        let mut u = Universe::new();
        u.add_body("a", Body::at(DVec3::ZERO, 1.0, 3.0e12)).unwrap();
        u.add_body(
            "b",
            Body::at(DVec3::new(400.0, 0.0, 0.0), 1.0, 1.0e12).with_velocity(DVec3::Y),
        )
        .unwrap();
        u
    }

    #[test]
    fn summary_reflects_state() {
        let mut u = pair();
        u.step();
        let s = UniverseInspector::summary(&u);
        assert_eq!(s.tick, 1);
        assert_eq!(s.body_count, 2);
        assert!(s.to_string().contains("bodies=2"));
    }

    #[test]
    fn center_of_mass_is_weighted() {
        let d = UniverseInspector::diagnostics(&pair());
        assert_eq!(d.total_mass, 4.0e12);
        assert!((d.center_of_mass[0] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn momentum_conserved_across_ticks() {
        let mut u = pair();
        let before = UniverseInspector::diagnostics(&u).momentum;
        for _ in 0..200 {
            u.step();
        }
        let after = UniverseInspector::diagnostics(&u).momentum;
        let scale: f64 = u.bodies().values().map(|b| b.mass * b.speed()).sum();
        for axis in 0..3 {
            assert!(
                (after[axis] - before[axis]).abs() < 1e-9 * scale,
                "axis {axis}: {} vs {}",
                before[axis],
                after[axis]
            );
        }
    }

    #[test]
    fn empty_universe_diagnostics_are_zero() {
        let d = UniverseInspector::diagnostics(&Universe::new());
        assert_eq!(d.total_mass, 0.0);
        assert_eq!(d.center_of_mass, [0.0; 3]);
    }

    #[test]
    fn json_has_settings() {
        let json = UniverseInspector::to_json(&UniverseInspector::summary(&pair())).unwrap();
        assert!(json.contains("\"tick_speed\": 60.0"));
        assert!(json.contains("\"body_count\": 2"));
    }
}
