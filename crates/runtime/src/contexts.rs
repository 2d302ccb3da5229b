use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use gravsim_console::{Console, Reply};
use gravsim_kernel::{SharedUniverse, TickOutcome};
use gravsim_pacing::{FrameTimer, Pacer, TickTiming};
use gravsim_render::{RenderSurface, SharedView, compose_frame};

use crate::signal::{ContextSignals, EXIT_INIT_FAILURE, EXIT_OK, EXIT_PRESENT_FAILURE};

/// How often the physics context logs its tick statistics.
const STATS_INTERVAL: Duration = Duration::from_secs(2);
/// Longest the console waits for a line before rechecking its signal.
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Rolling timing of a paced loop, logged at debug every [`STATS_INTERVAL`].
struct TickStats {
    context: &'static str,
    timer: FrameTimer,
    overruns: u64,
    last_report: Instant,
}

impl TickStats {
    fn new(context: &'static str) -> Self {
        Self {
            context,
            timer: FrameTimer::new(256),
            overruns: 0,
            last_report: Instant::now(),
        }
    }

    fn record(&mut self, timing: TickTiming) {
        self.timer.record(timing.elapsed);
        if timing.overran {
            self.overruns += 1;
        }
        if self.last_report.elapsed() < STATS_INTERVAL {
            return;
        }
        tracing::debug!(
            context = self.context,
            avg = ?self.timer.average(),
            max = ?self.timer.max(),
            overruns = self.overruns,
            "tick stats"
        );
        self.timer.clear();
        self.overruns = 0;
        self.last_report = Instant::now();
    }
}

/// Physics loop: one universe tick per pacer period.
///
/// The pacer follows the universe's tick speed, so a console change takes
/// effect on the next tick.
pub fn physics_context(universe: SharedUniverse, signals: ContextSignals) {
    let mut pacer = match Pacer::new(universe.tick_speed()) {
        Ok(pacer) => pacer,
        Err(err) => {
            tracing::error!(%err, "physics pacer rejected the tick speed");
            signals.stop(EXIT_INIT_FAILURE);
            return;
        }
    };
    let mut stats = TickStats::new("physics");

    while signals.should_run() {
        pacer.tick_start();
        let rate = universe.tick_speed();
        if rate != pacer.tick_rate() {
            if let Err(err) = pacer.set_tick_rate(rate) {
                tracing::warn!(%err, "keeping previous tick rate");
            }
        }
        if let TickOutcome::Advanced(report) = universe.step() {
            if report.horizon_crossings > 0 {
                tracing::warn!(
                    tick = report.tick,
                    pairs = report.horizon_crossings,
                    "pairs inside a horizon skipped"
                );
            }
        }
        stats.record(pacer.tick_end_and_sleep());
    }
    tracing::info!("physics context stopped");
}

/// Render loop: compose a frame under the universe and view locks, then hand
/// it to `surface` outside them.
///
/// A surface that fails to initialize stops the context before its first
/// frame with [`EXIT_INIT_FAILURE`].
pub fn render_context<S: RenderSurface>(
    universe: SharedUniverse,
    view: SharedView,
    mut surface: S,
    signals: ContextSignals,
) {
    if let Err(err) = surface.init() {
        tracing::error!(%err, "render surface failed to initialize");
        signals.stop(EXIT_INIT_FAILURE);
        return;
    }
    let mut pacer = match Pacer::new(view.frame_rate()) {
        Ok(pacer) => pacer,
        Err(err) => {
            tracing::error!(%err, "render pacer rejected the frame rate");
            signals.stop(EXIT_INIT_FAILURE);
            return;
        }
    };
    let mut stats = TickStats::new("render");

    while signals.should_run() {
        pacer.tick_start();
        let rate = view.frame_rate();
        if rate != pacer.tick_rate() {
            if let Err(err) = pacer.set_tick_rate(rate) {
                tracing::warn!(%err, "keeping previous frame rate");
            }
        }
        let frame = universe.read(|u| view.update(|camera| compose_frame(u, camera)));
        if let Err(err) = surface.present(&frame) {
            tracing::error!(%err, "render surface failed to present");
            signals.stop(EXIT_PRESENT_FAILURE);
            return;
        }
        stats.record(pacer.tick_end_and_sleep());
    }
    tracing::info!("render context stopped");
}

/// Console loop: execute each line received on `lines`, writing replies and
/// errors to `out`.
///
/// `quit` and end of input both stop the process with [`EXIT_OK`].
pub fn console_context<W: Write>(
    console: Console,
    lines: Receiver<String>,
    mut out: W,
    signals: ContextSignals,
) {
    while signals.should_run() {
        let line = match lines.recv_timeout(INPUT_POLL) {
            Ok(line) => line,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                tracing::info!("console input closed");
                signals.stop(EXIT_OK);
                return;
            }
        };
        let text = match console.execute(&line) {
            Ok(Reply::Quit) => {
                tracing::info!("quit requested");
                signals.stop(EXIT_OK);
                return;
            }
            Ok(Reply::Text(text)) => text,
            Err(err) => {
                tracing::debug!(%err, line = %line, "command failed");
                format!("error: {err}")
            }
        };
        if !text.is_empty() {
            if let Err(err) = writeln!(out, "{}", text.trim_end()).and_then(|()| out.flush()) {
                tracing::warn!(%err, "console output failed");
            }
        }
    }
    tracing::info!("console context stopped");
}

/// Read lines from `input` on a detached thread and forward them.
///
/// The reader may stay blocked after shutdown; it is never joined, and it
/// exits on its own once the receiver is dropped and another line arrives.
pub fn spawn_line_reader<R>(input: R) -> io::Result<Receiver<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("console-input".to_string())
        .spawn(move || {
            for line in input.lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(%err, "console input error");
                        break;
                    }
                }
            }
        })?;
    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{EXIT_PANIC, RUNNING};
    use crate::supervisor::Supervisor;
    use glam::DVec3;
    use gravsim_common::Body;
    use gravsim_console::Units;
    use gravsim_kernel::Universe;
    use gravsim_render::{Frame, HeadlessSurface, RenderError};
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    struct FailingSurface;

    impl RenderSurface for FailingSurface {
        fn init(&mut self) -> Result<(), RenderError> {
            Err(RenderError::Init("no display".to_string()))
        }

        fn present(&mut self, _frame: &Frame) -> Result<(), RenderError> {
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn moving_universe() -> SharedUniverse {
        let mut u = Universe::new();
        u.set_tick_speed(1000.0).unwrap();
        u.add_body(
            "probe",
            Body::at(DVec3::ZERO, 1.0, 0.0).with_velocity(DVec3::X),
        )
        .unwrap();
        SharedUniverse::new(u)
    }

    #[test]
    fn render_init_failure_stops_everything() {
        let universe = moving_universe();
        let view = SharedView::default();
        let mut sup = Supervisor::new();
        let u = universe.clone();
        let physics = sup.spawn("physics", move |s| physics_context(u, s)).unwrap();
        let (u, v) = (universe.clone(), view.clone());
        sup.spawn("render", move |s| render_context(u, v, FailingSurface, s))
            .unwrap();
        let console = Console::new(universe.clone(), view, Units::default());
        let (_tx, rx) = mpsc::channel::<String>();
        let console_signals = sup
            .spawn("console", move |s| console_context(console, rx, io::sink(), s))
            .unwrap();

        assert_eq!(sup.run_within(Duration::from_secs(10)), EXIT_INIT_FAILURE);
        assert_eq!(physics.signal_in.get(), EXIT_INIT_FAILURE);
        assert_eq!(console_signals.signal_in.get(), EXIT_INIT_FAILURE);
        assert_eq!(physics.signal_out.get(), RUNNING);
    }

    #[test]
    fn console_quit_stops_physics_and_render() {
        let universe = moving_universe();
        let view = SharedView::default();
        let out = Captured::default();
        let mut sup = Supervisor::new();
        let u = universe.clone();
        sup.spawn("physics", move |s| physics_context(u, s)).unwrap();
        let (u, v) = (universe.clone(), view.clone());
        sup.spawn("render", move |s| {
            render_context(u, v, HeadlessSurface::new(), s)
        })
        .unwrap();
        let console = Console::new(universe.clone(), view, Units::default());
        let (tx, rx) = mpsc::channel();
        let sink = out.clone();
        sup.spawn("console", move |s| console_context(console, rx, sink, s))
            .unwrap();

        tx.send("get tickSpeed".to_string()).unwrap();
        tx.send("frobnicate".to_string()).unwrap();
        tx.send("quit".to_string()).unwrap();
        assert_eq!(sup.run_within(Duration::from_secs(10)), EXIT_OK);

        let text = out.text();
        assert!(text.starts_with("1000\n"));
        assert!(text.contains("error:"));
    }

    #[test]
    fn physics_advances_until_signalled() {
        let universe = moving_universe();
        let signals = ContextSignals::new();
        let (u, s) = (universe.clone(), signals.clone());
        let handle = thread::spawn(move || physics_context(u, s));
        thread::sleep(Duration::from_millis(30));
        signals.signal_in.set(EXIT_OK);
        handle.join().unwrap();
        assert!(universe.read(|u| u.tick()) > 0);
        assert!(universe.body("probe").unwrap().position.x > 0.0);
        assert_eq!(signals.signal_out.get(), RUNNING);
    }

    #[test]
    fn render_keeps_locked_camera_on_its_body() {
        let universe = moving_universe();
        let view = SharedView::default();
        let probe = universe.body("probe").unwrap();
        view.lock_camera("probe", &probe).unwrap();
        let signals = ContextSignals::new();
        let (u, v, s) = (universe.clone(), view.clone(), signals.clone());
        let handle = thread::spawn(move || render_context(u, v, HeadlessSurface::new(), s));
        thread::sleep(Duration::from_millis(30));
        signals.signal_in.set(EXIT_OK);
        handle.join().unwrap();
        let camera = view.camera();
        let expected = probe.position - camera.facing() * camera.lock_distance();
        assert!((camera.position() - expected).length() < 1e-9);
    }

    #[test]
    fn closed_input_is_a_quit() {
        let universe = SharedUniverse::default();
        let console = Console::new(universe, SharedView::default(), Units::default());
        let rx = spawn_line_reader(Cursor::new(b"pause\nget isPaused\n".to_vec())).unwrap();
        let out = Captured::default();
        let signals = ContextSignals::new();
        console_context(console, rx, out.clone(), signals.clone());
        assert_eq!(signals.signal_out.code(), Some(EXIT_OK));
        assert_eq!(out.text(), "paused\ntrue\n");
    }

    #[test]
    fn console_honours_signal_in() {
        let console = Console::new(
            SharedUniverse::default(),
            SharedView::default(),
            Units::default(),
        );
        let (_tx, rx) = mpsc::channel::<String>();
        let signals = ContextSignals::new();
        signals.signal_in.set(EXIT_PANIC);
        console_context(console, rx, io::sink(), signals.clone());
        assert_eq!(signals.signal_out.get(), RUNNING);
    }
}
