use std::io;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use gravsim_console::{Console, Units};
use gravsim_kernel::{Preset, SharedUniverse, Universe};
use gravsim_render::{HeadlessSurface, SharedView, TextSurface, View};
use gravsim_runtime::{
    Supervisor, console_context, physics_context, render_context, spawn_line_reader,
};
use gravsim_tools::UniverseInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gravsim",
    version,
    about = "Real-time gravity simulator driven from a text console"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Physics ticks per real second
    #[arg(long, default_value_t = 60.0)]
    tick_speed: f64,

    /// Simulated seconds per real second
    #[arg(long, default_value_t = 1.0)]
    time_scaling: f64,

    /// Multiplier on gravity; negative repels
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    gravity_scaling: f64,

    /// Divisor on the speed of light in the relativistic term
    #[arg(long, default_value_t = 1.0)]
    causality_scaling: f64,

    /// Render frames per real second
    #[arg(long, default_value_t = 60.0)]
    frame_rate: f64,

    /// Bodies to start with
    #[arg(long, default_value_t = Preset::Empty)]
    preset: Preset,

    /// Internal meters per console length unit
    #[arg(long, default_value_t = 1.0)]
    length_scale: f64,

    /// Extra factor on console radii, for visibility
    #[arg(long, default_value_t = 1.0)]
    radius_scale: f64,

    /// Start with the universe paused
    #[arg(long)]
    paused: bool,

    /// Where rendered frames go
    #[arg(long, value_enum, default_value_t = SurfaceKind::Headless)]
    surface: SurfaceKind,

    /// With `--surface text`, print one frame in this many
    #[arg(long, default_value_t = 60)]
    text_every: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SurfaceKind {
    /// Compose frames and drop them
    Headless,
    /// Print frames to stdout
    Text,
}

fn build_universe(cli: &Cli) -> anyhow::Result<Universe> {
    let mut universe = Universe::new();
    universe.set_tick_speed(cli.tick_speed)?;
    universe.set_time_scaling(cli.time_scaling)?;
    universe.set_gravity_scaling(cli.gravity_scaling)?;
    universe.set_causality_scaling(cli.causality_scaling)?;
    cli.preset
        .populate(&mut universe)
        .with_context(|| format!("loading preset {}", cli.preset))?;
    if cli.paused {
        universe.pause();
    }
    Ok(universe)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(io::stderr)
        .init();

    let universe = build_universe(&cli).context("invalid simulation settings")?;
    let units = Units::new(cli.length_scale, cli.radius_scale).context("invalid units")?;
    let view = SharedView::new(View::default());
    view.set_frame_rate(cli.frame_rate)
        .context("invalid frame rate")?;
    tracing::info!(
        "{}",
        UniverseInspector::summary(&universe)
            .to_string()
            .replace('\n', "; ")
    );
    let universe = SharedUniverse::new(universe);

    let mut supervisor = Supervisor::new();

    let u = universe.clone();
    supervisor
        .spawn("physics", move |signals| physics_context(u, signals))
        .context("spawning physics context")?;

    let (u, v) = (universe.clone(), view.clone());
    match cli.surface {
        SurfaceKind::Headless => supervisor.spawn("render", move |signals| {
            render_context(u, v, HeadlessSurface::new(), signals)
        }),
        SurfaceKind::Text => {
            let every = cli.text_every;
            supervisor.spawn("render", move |signals| {
                render_context(u, v, TextSurface::new(io::stdout(), every), signals)
            })
        }
    }
    .context("spawning render context")?;

    let console = Console::new(universe, view, units);
    let lines = spawn_line_reader(io::BufReader::new(io::stdin())).context("spawning console reader")?;
    supervisor
        .spawn("console", move |signals| {
            console_context(console, lines, io::stdout(), signals)
        })
        .context("spawning console context")?;

    let code = supervisor.run();
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
