use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use gravsim_common::{Body, SimError};

use crate::universe::{Settings, TickOutcome, Transition, Universe};

/// Cloneable handle to the one universe all contexts share.
///
/// Every access goes through a single mutex. A tick holds it for the whole
/// integration, so readers see either the state before the tick or after it.
/// Readers receive owned snapshots that do not track later mutation.
#[derive(Debug, Clone, Default)]
pub struct SharedUniverse {
    inner: Arc<Mutex<Universe>>,
}

impl SharedUniverse {
    pub fn new(universe: Universe) -> Self {
        Self {
            inner: Arc::new(Mutex::new(universe)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Universe> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("universe lock poisoned by a panicking thread; recovering");
            poisoned.into_inner()
        })
    }

    /// Run `f` with shared access inside the critical section.
    pub fn read<R>(&self, f: impl FnOnce(&Universe) -> R) -> R {
        f(&self.lock())
    }

    /// Run `f` with exclusive access inside the critical section.
    pub fn write<R>(&self, f: impl FnOnce(&mut Universe) -> R) -> R {
        f(&mut self.lock())
    }

    /// Advance one tick under the lock.
    pub fn step(&self) -> TickOutcome {
        let _span = tracing::trace_span!("physics_tick").entered();
        self.lock().step()
    }

    pub fn snapshot(&self) -> Universe {
        self.lock().clone()
    }

    /// See [`Universe::add_body`].
    pub fn add_body(&self, name: impl Into<String>, body: Body) -> Result<(), SimError> {
        self.lock().add_body(name, body)
    }

    /// See [`Universe::remove_body`].
    pub fn remove_body(&self, name: &str) -> Result<Body, SimError> {
        self.lock().remove_body(name)
    }

    pub fn clear_bodies(&self) {
        self.lock().clear_bodies();
    }

    /// Owned copy of one body.
    pub fn body(&self, name: &str) -> Option<Body> {
        self.lock().body(name).copied()
    }

    /// Owned copy of every body, in name order.
    pub fn bodies(&self) -> BTreeMap<String, Body> {
        self.lock().bodies().clone()
    }

    /// Mutate one body inside the critical section.
    pub fn update_body<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut Body) -> R,
    ) -> Result<R, SimError> {
        self.lock().update_body(name, f)
    }

    /// Copy of the scalar settings.
    pub fn settings(&self) -> Settings {
        self.lock().settings()
    }

    /// Ticks per real second.
    pub fn tick_speed(&self) -> f64 {
        self.lock().tick_speed()
    }

    /// The physics context picks the new rate up on its next tick.
    pub fn set_tick_speed(&self, tick_speed: f64) -> Result<(), SimError> {
        self.lock().set_tick_speed(tick_speed)
    }

    /// Simulated seconds per real second.
    pub fn time_scaling(&self) -> f64 {
        self.lock().time_scaling()
    }

    pub fn set_time_scaling(&self, time_scaling: f64) -> Result<(), SimError> {
        self.lock().set_time_scaling(time_scaling)
    }

    /// Multiplier on every pairwise pull.
    pub fn gravity_scaling(&self) -> f64 {
        self.lock().gravity_scaling()
    }

    /// Any finite value; NaN and infinities are rejected.
    pub fn set_gravity_scaling(&self, gravity_scaling: f64) -> Result<(), SimError> {
        self.lock().set_gravity_scaling(gravity_scaling)
    }

    /// Divisor on the speed of light.
    pub fn causality_scaling(&self) -> f64 {
        self.lock().causality_scaling()
    }

    pub fn set_causality_scaling(&self, causality_scaling: f64) -> Result<(), SimError> {
        self.lock().set_causality_scaling(causality_scaling)
    }

    pub fn is_paused(&self) -> bool {
        self.lock().is_paused()
    }

    /// See [`Universe::pause`].
    pub fn pause(&self) -> Transition {
        self.lock().pause()
    }

    /// See [`Universe::unpause`].
    pub fn unpause(&self) -> Transition {
        self.lock().unpause()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use std::thread;

    #[test]
    fn clones_share_one_universe() {
        let a = SharedUniverse::default();
        let b = a.clone();
        a.add_body("earth", Body::at(DVec3::ZERO, 1.0, 1.0)).unwrap();
        assert!(b.body("earth").is_some());
        b.pause();
        assert!(a.is_paused());
    }

    #[test]
    fn snapshots_do_not_follow_later_mutation() {
        let shared = SharedUniverse::default();
        shared
            .add_body("a", Body::default().with_velocity(DVec3::X))
            .unwrap();
        let before = shared.bodies();
        shared.step();
        assert_eq!(before["a"].position, DVec3::ZERO);
        assert_ne!(shared.body("a").unwrap().position, DVec3::ZERO);
    }

    #[test]
    fn readers_never_see_a_partial_tick() {
        // Every body moves by the same amount per tick, so a consistent
        // snapshot always has identical x coordinates.
        let shared = SharedUniverse::default();
        shared.set_gravity_scaling(0.0).unwrap();
        for i in 0..50 {
            shared
                .add_body(
                    format!("b{i:02}"),
                    Body::default().with_velocity(DVec3::new(60.0, 0.0, 0.0)),
                )
                .unwrap();
        }

        let writer = {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    shared.step();
                }
            })
        };

        for _ in 0..500 {
            let xs: Vec<f64> = shared.read(|u| u.bodies().values().map(|b| b.position.x).collect());
            assert!(xs.windows(2).all(|w| w[0] == w[1]));
        }
        writer.join().unwrap();
        assert_eq!(shared.read(|u| u.tick()), 500);
    }

    #[test]
    fn failed_setter_keeps_old_value() {
        let shared = SharedUniverse::default();
        shared.set_tick_speed(90.0).unwrap();
        assert!(shared.set_tick_speed(-5.0).is_err());
        assert_eq!(shared.tick_speed(), 90.0);
    }
}
