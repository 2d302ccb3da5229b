use clap::{Args, Parser, Subcommand};
use gravsim_kernel::Preset;

/// One console line. The first word selects the command.
#[derive(Debug, Parser)]
#[command(
    name = "gravsim",
    no_binary_name = true,
    disable_version_flag = true,
    about = "Gravity simulator console"
)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a body, replacing any body with the same name
    #[command(allow_negative_numbers = true)]
    Add(AddArgs),
    /// Remove all bodies
    Clear,
    /// Print values of bodies or settings
    #[command(arg_required_else_help = true)]
    Get {
        #[command(subcommand)]
        target: GetTarget,
    },
    /// Change values of bodies or settings
    #[command(arg_required_else_help = true)]
    Set {
        #[command(subcommand)]
        target: SetTarget,
    },
    /// Lock the camera relative to a body
    Lock { name: String },
    /// Unbind the camera from the body it is locked to
    Unlock,
    /// Change the locked camera's distance by DELTA (negative moves closer)
    #[command(allow_negative_numbers = true)]
    Distance { delta: f64 },
    /// Pause the universe
    Pause,
    /// Unpause the universe
    #[command(alias = "unpause")]
    Resume,
    /// Remove a body
    Remove { name: String },
    /// Replace all bodies with a preset (empty, solar-system)
    Preset { preset: Preset },
    /// Print the current frame as text
    View,
    /// End the program
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub x_vel: f64,
    pub y_vel: f64,
    pub z_vel: f64,
    pub radius: f64,
    pub mass: f64,
    /// 0.0 to 1.0; exactly 1.0 makes the body the light source
    #[arg(long, default_value_t = 0.1)]
    pub luminosity: f32,
    /// Red, green and blue, each 0.0 to 1.0
    #[arg(long, num_args = 3, value_names = ["R", "G", "B"])]
    pub color: Option<Vec<f32>>,
    /// Angular velocity in degrees/s: theta, phi, psi
    #[arg(long, num_args = 3, value_names = ["THETA", "PHI", "PSI"])]
    pub spin: Option<Vec<f64>>,
}

#[derive(Debug, Subcommand)]
pub enum GetTarget {
    /// List body names
    Bodies,
    /// Show one body
    Body { name: String },
    /// Show the camera
    Camera,
    #[command(name = "c-scaling", alias = "cScaling")]
    CScaling,
    #[command(alias = "gravityScaling")]
    GravityScaling,
    #[command(alias = "isPaused")]
    IsPaused,
    #[command(alias = "targetFramerate")]
    TargetFramerate,
    #[command(alias = "tickSpeed")]
    TickSpeed,
    #[command(alias = "timeScaling")]
    TimeScaling,
    /// Tick, settings and conservation diagnostics
    Summary {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum SetTarget {
    /// Change one property of a body
    #[command(arg_required_else_help = true)]
    Body {
        name: String,
        #[command(subcommand)]
        property: BodyProperty,
    },
    /// Change one property of the camera
    #[command(arg_required_else_help = true)]
    Camera {
        #[command(subcommand)]
        property: CameraProperty,
    },
    #[command(name = "c-scaling", alias = "cScaling", allow_negative_numbers = true)]
    CScaling { value: f64 },
    #[command(alias = "gravityScaling", allow_negative_numbers = true)]
    GravityScaling { value: f64 },
    #[command(alias = "targetFramerate", allow_negative_numbers = true)]
    TargetFramerate { value: f64 },
    #[command(alias = "tickSpeed", allow_negative_numbers = true)]
    TickSpeed { value: f64 },
    #[command(alias = "timeScaling", allow_negative_numbers = true)]
    TimeScaling { value: f64 },
}

#[derive(Debug, Subcommand)]
pub enum BodyProperty {
    #[command(allow_negative_numbers = true)]
    Coordinates { x: f64, y: f64, z: f64 },
    #[command(alias = "directionalVelocities", allow_negative_numbers = true)]
    DirectionalVelocities { x: f64, y: f64, z: f64 },
    /// Rescale the velocity to this speed, keeping its direction
    #[command(allow_negative_numbers = true)]
    Velocity { speed: f64 },
    #[command(allow_negative_numbers = true)]
    Radius { value: f64 },
    #[command(allow_negative_numbers = true)]
    Mass { value: f64 },
    #[command(allow_negative_numbers = true)]
    Luminosity { value: f32 },
    #[command(allow_negative_numbers = true)]
    Color { red: f32, green: f32, blue: f32 },
    /// Angular velocity in degrees/s
    #[command(allow_negative_numbers = true)]
    Spin { theta: f64, phi: f64, psi: f64 },
}

#[derive(Debug, Subcommand)]
pub enum CameraProperty {
    #[command(allow_negative_numbers = true)]
    Coordinates { x: f64, y: f64, z: f64 },
    #[command(allow_negative_numbers = true)]
    Angles { theta: f64, phi: f64, psi: f64 },
    #[command(alias = "moveSpeed", allow_negative_numbers = true)]
    MoveSpeed { value: f64 },
    #[command(alias = "rotationSpeed", allow_negative_numbers = true)]
    RotationSpeed { value: f64 },
    #[command(allow_negative_numbers = true)]
    Sensitivity { value: f64 },
    #[command(alias = "lockDistance", allow_negative_numbers = true)]
    LockDistance { value: f64 },
}
