use std::collections::BTreeMap;

use gravsim_common::error::{require_finite, require_positive, require_rate};
use gravsim_common::{Body, SimError};
use serde::{Deserialize, Serialize};

use crate::integrator::{self, StepParams, TickReport};

/// Global scalar parameters of the universe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Ticks per real second, > 0.
    pub tick_speed: f64,
    /// Simulated seconds per real second, > 0.
    pub time_scaling: f64,
    /// Multiplier on every pairwise pull; negative repels, zero disables gravity.
    pub gravity_scaling: f64,
    /// Divisor on the speed of light used by the relativistic correction, > 0.
    pub causality_scaling: f64,
    pub paused: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_speed: 60.0,
            time_scaling: 1.0,
            gravity_scaling: 1.0,
            causality_scaling: 1.0,
            paused: false,
        }
    }
}

/// Result of a pause or unpause request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Transitioned,
    AlreadyInState,
}

/// Result of one call to [`Universe::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    Paused,
    Advanced(TickReport),
}

/// The authoritative set of bodies plus the scalars that drive integration.
///
/// Bodies are keyed by name; BTreeMap keeps iteration (and therefore
/// floating-point summation order) stable between runs.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    bodies: BTreeMap<String, Body>,
    settings: Settings,
    tick: u64,
    /// Simulated seconds accumulated over all advanced ticks.
    elapsed: f64,
}

impl Universe {
    /// An empty universe with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a universe from externally supplied settings, validating each
    /// constrained scalar.
    pub fn with_settings(settings: Settings) -> Result<Self, SimError> {
        let mut universe = Self::new();
        universe.set_tick_speed(settings.tick_speed)?;
        universe.set_time_scaling(settings.time_scaling)?;
        universe.set_causality_scaling(settings.causality_scaling)?;
        universe.set_gravity_scaling(settings.gravity_scaling)?;
        universe.settings.paused = settings.paused;
        Ok(universe)
    }

    /// Copy of the current scalar settings.
    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Number of ticks advanced so far; paused ticks do not count.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds since creation.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// All bodies in name order.
    pub fn bodies(&self) -> &BTreeMap<String, Body> {
        &self.bodies
    }

    /// Look up a body by name.
    pub fn body(&self, name: &str) -> Option<&Body> {
        self.bodies.get(name)
    }

    /// Insert `body` under `name`, replacing any body already registered there.
    pub fn add_body(&mut self, name: impl Into<String>, body: Body) -> Result<(), SimError> {
        let name = name.into();
        if name.is_empty() {
            return Err(SimError::InvalidName);
        }
        if self.bodies.insert(name.clone(), body).is_some() {
            tracing::debug!(%name, "body replaced");
        } else {
            tracing::debug!(%name, "body added");
        }
        Ok(())
    }

    /// Remove and return a body; the registry is untouched when it is absent.
    pub fn remove_body(&mut self, name: &str) -> Result<Body, SimError> {
        let body = self
            .bodies
            .remove(name)
            .ok_or_else(|| SimError::NotFound(name.to_string()))?;
        tracing::debug!(%name, "body removed");
        Ok(body)
    }

    /// Drop every body.
    pub fn clear_bodies(&mut self) {
        tracing::debug!(count = self.bodies.len(), "bodies cleared");
        self.bodies.clear();
    }

    /// Mutate one body in place.
    pub fn update_body<R>(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut Body) -> R,
    ) -> Result<R, SimError> {
        self.bodies
            .get_mut(name)
            .map(f)
            .ok_or_else(|| SimError::NotFound(name.to_string()))
    }

    /// Ticks per real second.
    pub fn tick_speed(&self) -> f64 {
        self.settings.tick_speed
    }

    /// Set ticks per real second. The rate must be positive, finite and have a
    /// period a pacer can represent.
    pub fn set_tick_speed(&mut self, tick_speed: f64) -> Result<(), SimError> {
        self.settings.tick_speed = require_rate("tick speed", tick_speed)?;
        Ok(())
    }

    /// Simulated seconds per real second.
    pub fn time_scaling(&self) -> f64 {
        self.settings.time_scaling
    }

    /// Set simulated seconds per real second; positive and finite.
    pub fn set_time_scaling(&mut self, time_scaling: f64) -> Result<(), SimError> {
        self.settings.time_scaling = require_positive("time scaling", time_scaling)?;
        Ok(())
    }

    /// Multiplier on every pairwise pull.
    pub fn gravity_scaling(&self) -> f64 {
        self.settings.gravity_scaling
    }

    /// Set the gravity multiplier. Any finite value is accepted, including
    /// zero and negatives.
    pub fn set_gravity_scaling(&mut self, gravity_scaling: f64) -> Result<(), SimError> {
        self.settings.gravity_scaling = require_finite("gravity scaling", gravity_scaling)?;
        Ok(())
    }

    /// Divisor on the speed of light.
    pub fn causality_scaling(&self) -> f64 {
        self.settings.causality_scaling
    }

    /// Set the divisor on the speed of light; positive and finite.
    pub fn set_causality_scaling(&mut self, causality_scaling: f64) -> Result<(), SimError> {
        self.settings.causality_scaling =
            require_positive("causality scaling", causality_scaling)?;
        Ok(())
    }

    pub fn is_paused(&self) -> bool {
        self.settings.paused
    }

    /// Stop advancing. A second pause reports [`Transition::AlreadyInState`].
    pub fn pause(&mut self) -> Transition {
        if self.settings.paused {
            return Transition::AlreadyInState;
        }
        self.settings.paused = true;
        tracing::info!(tick = self.tick, "universe paused");
        Transition::Transitioned
    }

    /// Resume advancing from the frozen state.
    pub fn unpause(&mut self) -> Transition {
        if !self.settings.paused {
            return Transition::AlreadyInState;
        }
        self.settings.paused = false;
        tracing::info!(tick = self.tick, "universe resumed");
        Transition::Transitioned
    }

    /// Simulated seconds one tick covers: `time_scaling / tick_speed`.
    pub fn dt(&self) -> f64 {
        self.settings.time_scaling / self.settings.tick_speed
    }

    pub fn step_params(&self) -> StepParams {
        StepParams {
            dt: self.dt(),
            gravity_scaling: self.settings.gravity_scaling,
            causality_scaling: self.settings.causality_scaling,
        }
    }

    /// Advance one tick unless paused.
    pub fn step(&mut self) -> TickOutcome {
        if self.settings.paused {
            return TickOutcome::Paused;
        }
        let params = self.step_params();
        let horizon_crossings = integrator::advance(&mut self.bodies, &params);
        self.tick += 1;
        self.elapsed += params.dt;
        TickOutcome::Advanced(TickReport {
            tick: self.tick,
            dt: params.dt,
            horizon_crossings,
        })
    }
}
