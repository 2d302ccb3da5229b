use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

/// A context is running while its signals hold a positive value.
pub const RUNNING: i32 = 1;
/// Clean stop, e.g. the user typed `quit`.
pub const EXIT_OK: i32 = 0;
/// The render surface could not be created.
pub const EXIT_INIT_FAILURE: i32 = -1;
/// The render surface failed while presenting a frame.
pub const EXIT_PRESENT_FAILURE: i32 = -2;
/// A context panicked.
pub const EXIT_PANIC: i32 = -3;

/// Shared status word. Positive means running; anything else is an exit code.
#[derive(Debug, Clone)]
pub struct Signal(Arc<AtomicI32>);

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}

impl Signal {
    pub fn new() -> Self {
        Self(Arc::new(AtomicI32::new(RUNNING)))
    }

    pub fn get(&self) -> i32 {
        self.0.load(Ordering::Acquire)
    }

    pub fn set(&self, code: i32) {
        self.0.store(code, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.get() > 0
    }

    /// The exit code, once one has been set.
    pub fn code(&self) -> Option<i32> {
        let value = self.get();
        (value <= 0).then_some(value)
    }
}

/// The two signals a context owns: `signal_in` is written by the supervisor,
/// `signal_out` by the context itself.
#[derive(Debug, Clone, Default)]
pub struct ContextSignals {
    pub signal_in: Signal,
    pub signal_out: Signal,
}

impl ContextSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the loop should keep going.
    pub fn should_run(&self) -> bool {
        self.signal_in.is_running()
    }

    /// Report a local stop with `code`.
    pub fn stop(&self, code: i32) {
        self.signal_out.set(code);
    }
}
