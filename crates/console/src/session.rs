use clap::Parser;
use clap::error::ErrorKind;
use glam::DVec3;
use gravsim_common::error::{require_finite, require_finite_vec, require_non_negative};
use gravsim_common::{Angles, Body, Color, SimError};
use gravsim_kernel::{SharedUniverse, Transition};
use gravsim_render::{Camera, DebugTextRenderer, Renderer, SharedView, compose_frame};
use gravsim_tools::UniverseInspector;

use crate::command::{
    AddArgs, BodyProperty, CameraProperty, Command, CommandLine, GetTarget, SetTarget,
};
use crate::units::Units;

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// The line did not parse; the payload is clap's rendered message.
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// What the console loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print this (possibly empty) text and keep reading.
    Text(String),
    /// Stop the console and request shutdown.
    Quit,
}

impl Reply {
    fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    fn ok() -> Self {
        Self::Text(String::new())
    }
}

/// Executes console lines against the shared universe and view.
///
/// Each command takes the universe lock and the view lock at most once each,
/// universe first, so it can interleave freely with the physics and render
/// contexts.
#[derive(Debug, Clone)]
pub struct Console {
    universe: SharedUniverse,
    view: SharedView,
    units: Units,
}

impl Console {
    pub fn new(universe: SharedUniverse, view: SharedView, units: Units) -> Self {
        Self {
            universe,
            view,
            units,
        }
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn execute(&self, line: &str) -> Result<Reply, ConsoleError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return Ok(Reply::ok());
        }
        let parsed = match CommandLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(err) => {
                return match err.kind() {
                    ErrorKind::DisplayHelp
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                        Ok(Reply::Text(err.render().to_string()))
                    }
                    _ => Err(ConsoleError::Usage(err.render().to_string())),
                };
            }
        };
        tracing::debug!(command = ?parsed.command, "console command");
        self.run(parsed.command)
    }

    fn run(&self, command: Command) -> Result<Reply, ConsoleError> {
        match command {
            Command::Add(args) => self.add(args),
            Command::Clear => {
                self.universe.clear_bodies();
                Ok(Reply::ok())
            }
            Command::Get { target } => self.get(target),
            Command::Set { target } => self.set(target),
            Command::Lock { name } => {
                let body = self
                    .universe
                    .body(&name)
                    .ok_or_else(|| SimError::NotFound(name.clone()))?;
                self.view.lock_camera(&name, &body)?;
                Ok(Reply::ok())
            }
            Command::Unlock => {
                let name = self.view.unlock_camera()?;
                Ok(Reply::text(format!("unlocked from {name}")))
            }
            Command::Distance { delta } => {
                if !self.view.camera().is_locked() {
                    return Err(SimError::NotLocked.into());
                }
                let delta = require_finite("distance", delta)?;
                let distance = self.view.change_lock_distance(self.units.length_in(delta));
                Ok(Reply::text(format!("{}", self.units.length_out(distance))))
            }
            Command::Pause => Ok(Reply::text(match self.universe.pause() {
                Transition::Transitioned => "paused",
                Transition::AlreadyInState => "already paused",
            })),
            Command::Resume => Ok(Reply::text(match self.universe.unpause() {
                Transition::Transitioned => "resumed",
                Transition::AlreadyInState => "already running",
            })),
            Command::Remove { name } => {
                self.universe.remove_body(&name)?;
                Ok(Reply::ok())
            }
            Command::Preset { preset } => {
                self.universe.write(|u| preset.populate(u))?;
                Ok(Reply::ok())
            }
            Command::View => {
                let frame = self
                    .universe
                    .read(|u| self.view.update(|camera| compose_frame(u, camera)));
                Ok(Reply::Text(DebugTextRenderer::new().render(&frame)))
            }
            Command::Quit => Ok(Reply::Quit),
        }
    }

    fn add(&self, args: AddArgs) -> Result<Reply, ConsoleError> {
        let u = &self.units;
        let color = match args.color.as_deref() {
            Some(&[red, green, blue]) => Color::new(red, green, blue),
            _ => Color::WHITE,
        };
        let spin = match args.spin.as_deref() {
            Some(&[theta, phi, psi]) => Angles::new(theta, phi, psi),
            _ => Angles::ZERO,
        };
        let body = Body::at(
            u.length_in_vec(DVec3::new(args.x, args.y, args.z)),
            u.radius_in(args.radius),
            u.mass_in(args.mass),
        )
        .with_velocity(u.length_in_vec(DVec3::new(args.x_vel, args.y_vel, args.z_vel)))
        .with_spin(spin)
        .with_appearance(args.luminosity, color);
        body.validate()?;
        self.universe.add_body(args.name, body)?;
        Ok(Reply::ok())
    }

    fn get(&self, target: GetTarget) -> Result<Reply, ConsoleError> {
        let text = match target {
            GetTarget::Bodies => self
                .universe
                .read(|u| u.bodies().keys().cloned().collect::<Vec<_>>())
                .join("\n"),
            GetTarget::Body { name } => {
                let body = self
                    .universe
                    .body(&name)
                    .ok_or(SimError::NotFound(name))?;
                self.describe_body(&body)
            }
            GetTarget::Camera => self.describe_camera(&self.view.camera()),
            GetTarget::CScaling => self.universe.causality_scaling().to_string(),
            GetTarget::GravityScaling => self.universe.gravity_scaling().to_string(),
            GetTarget::IsPaused => self.universe.is_paused().to_string(),
            GetTarget::TargetFramerate => self.view.frame_rate().to_string(),
            GetTarget::TickSpeed => self.universe.tick_speed().to_string(),
            GetTarget::TimeScaling => self.universe.time_scaling().to_string(),
            GetTarget::Summary { json } => {
                let summary = self.universe.read(UniverseInspector::summary);
                if json {
                    UniverseInspector::to_json(&summary)?
                } else {
                    summary.to_string()
                }
            }
        };
        Ok(Reply::Text(text))
    }

    fn set(&self, target: SetTarget) -> Result<Reply, ConsoleError> {
        match target {
            SetTarget::Body { name, property } => self.set_body(&name, property)?,
            SetTarget::Camera { property } => self.set_camera(property)?,
            SetTarget::CScaling { value } => self.universe.set_causality_scaling(value)?,
            SetTarget::GravityScaling { value } => self.universe.set_gravity_scaling(value)?,
            SetTarget::TargetFramerate { value } => self.view.set_frame_rate(value)?,
            SetTarget::TickSpeed { value } => self.universe.set_tick_speed(value)?,
            SetTarget::TimeScaling { value } => self.universe.set_time_scaling(value)?,
        }
        Ok(Reply::ok())
    }

    fn set_body(&self, name: &str, property: BodyProperty) -> Result<(), SimError> {
        let u = self.units;
        self.universe.update_body(name, |body| {
            // Validate on a copy so a rejected value leaves the body untouched.
            let mut next = *body;
            match property {
                BodyProperty::Coordinates { x, y, z } => {
                    next.position = u.length_in_vec(DVec3::new(x, y, z));
                }
                BodyProperty::DirectionalVelocities { x, y, z } => {
                    next.velocity = u.length_in_vec(DVec3::new(x, y, z));
                }
                BodyProperty::Velocity { speed } => {
                    let speed = require_non_negative("speed", speed)?;
                    let direction = next
                        .velocity
                        .try_normalize()
                        .ok_or(SimError::out_of_range("speed of a body at rest", speed))?;
                    next.velocity = direction * u.length_in(speed);
                }
                BodyProperty::Radius { value } => next.radius = u.radius_in(value),
                BodyProperty::Mass { value } => next.mass = u.mass_in(value),
                BodyProperty::Luminosity { value } => next.luminosity = value,
                BodyProperty::Color { red, green, blue } => {
                    next.color = Color::new(red, green, blue);
                }
                BodyProperty::Spin { theta, phi, psi } => {
                    next.angular_velocity = Angles::new(theta, phi, psi);
                }
            }
            next.validate()?;
            *body = next;
            Ok(())
        })?
    }

    fn set_camera(&self, property: CameraProperty) -> Result<(), SimError> {
        let u = self.units;
        match property {
            CameraProperty::Coordinates { x, y, z } => {
                let position =
                    require_finite_vec("camera position", u.length_in_vec(DVec3::new(x, y, z)))?;
                self.view.update(|camera| camera.set_position(position));
                Ok(())
            }
            CameraProperty::Angles { theta, phi, psi } => {
                require_finite_vec("camera angles", DVec3::new(theta, phi, psi))?;
                self.view
                    .update(|camera| camera.set_angles(Angles::new(theta, phi, psi)));
                Ok(())
            }
            CameraProperty::MoveSpeed { value } => {
                self.view.update(|camera| camera.set_speed(u.length_in(value)))
            }
            CameraProperty::RotationSpeed { value } => {
                self.view.update(|camera| camera.set_rotation_speed(value))
            }
            CameraProperty::Sensitivity { value } => {
                self.view.update(|camera| camera.set_sensitivity(value))
            }
            CameraProperty::LockDistance { value } => {
                self.view
                    .update(|camera| camera.set_lock_distance(u.length_in(value)))
            }
        }
    }

    fn describe_body(&self, body: &Body) -> String {
        let u = &self.units;
        let p = u.length_out_vec(body.position);
        let v = u.length_out_vec(body.velocity);
        let o = body.orientation;
        let w = body.angular_velocity;
        let c = body.color;
        let mut out = String::new();
        out.push_str(&format!("coordinates: {} {} {}\n", p.x, p.y, p.z));
        out.push_str(&format!("velocity: {} {} {}\n", v.x, v.y, v.z));
        out.push_str(&format!("speed: {}\n", u.length_out(body.speed())));
        out.push_str(&format!("orientation: {} {} {}\n", o.theta, o.phi, o.psi));
        out.push_str(&format!("spin: {} {} {}\n", w.theta, w.phi, w.psi));
        out.push_str(&format!("radius: {}\n", u.radius_out(body.radius)));
        out.push_str(&format!("mass: {}\n", u.mass_out(body.mass)));
        out.push_str(&format!("luminosity: {}\n", body.luminosity));
        out.push_str(&format!("color: {} {} {}", c.red, c.green, c.blue));
        out
    }

    fn describe_camera(&self, camera: &Camera) -> String {
        let u = &self.units;
        let p = u.length_out_vec(camera.position());
        let a = camera.angles();
        let mut out = String::new();
        out.push_str(&format!("coordinates: {} {} {}\n", p.x, p.y, p.z));
        out.push_str(&format!("angles: {} {} {}\n", a.theta, a.phi, a.psi));
        out.push_str(&format!("moveSpeed: {}\n", u.length_out(camera.speed())));
        out.push_str(&format!("rotationSpeed: {}\n", camera.rotation_speed()));
        out.push_str(&format!("sensitivity: {}\n", camera.sensitivity()));
        match camera.locked_body() {
            Some(name) => out.push_str(&format!(
                "locked: {name} at {}",
                u.length_out(camera.lock_distance())
            )),
            None => out.push_str("locked: no"),
        }
        out
    }
}
