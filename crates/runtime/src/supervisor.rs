use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use gravsim_pacing::Pacer;

use crate::signal::{ContextSignals, EXIT_OK, EXIT_PANIC};

/// Polls per second while waiting for a context to stop.
pub const SUPERVISOR_RATE: f64 = 100.0;

struct Context {
    name: String,
    signals: ContextSignals,
    handle: Option<JoinHandle<()>>,
}

/// Owns the context threads and runs the shutdown handshake.
///
/// Contexts are polled in the order they were spawned; when several stop
/// between two polls, the earliest-spawned one's code wins.
#[derive(Default)]
pub struct Supervisor {
    contexts: Vec<Context>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `body` on a named thread with a fresh pair of signals.
    ///
    /// A panic inside `body` is caught and reported as [`EXIT_PANIC`] so the
    /// rest of the process still shuts down.
    pub fn spawn<F>(&mut self, name: &str, body: F) -> io::Result<ContextSignals>
    where
        F: FnOnce(ContextSignals) + Send + 'static,
    {
        let signals = ContextSignals::new();
        let theirs = signals.clone();
        let context_name = name.to_string();
        let handle = thread::Builder::new().name(name.to_string()).spawn(move || {
            let out = theirs.signal_out.clone();
            if panic::catch_unwind(AssertUnwindSafe(|| body(theirs))).is_err() {
                tracing::error!(context = %context_name, "context panicked");
                out.set(EXIT_PANIC);
            }
        })?;
        tracing::info!(context = name, "context started");
        self.contexts.push(Context {
            name: name.to_string(),
            signals: signals.clone(),
            handle: Some(handle),
        });
        Ok(signals)
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Check every context once. If one has stopped, pass its code to all the
    /// others and return it.
    pub fn poll(&self) -> Option<i32> {
        let (index, code) = self
            .contexts
            .iter()
            .enumerate()
            .find_map(|(i, c)| c.signals.signal_out.code().map(|code| (i, code)))?;
        tracing::info!(
            context = %self.contexts[index].name,
            code,
            "context stopped; shutting down the rest"
        );
        for (i, context) in self.contexts.iter().enumerate() {
            if i != index {
                context.signals.signal_in.set(code);
            }
        }
        Some(code)
    }

    /// Poll at [`SUPERVISOR_RATE`] until some context stops, then wait for all
    /// of them and return the adopted exit code.
    pub fn run(mut self) -> i32 {
        if self.contexts.is_empty() {
            return EXIT_OK;
        }
        let mut pacer = match Pacer::new(SUPERVISOR_RATE) {
            Ok(pacer) => pacer,
            Err(err) => {
                tracing::error!(%err, "supervisor pacer rejected its rate");
                return EXIT_PANIC;
            }
        };
        let code = loop {
            pacer.tick_start();
            if let Some(code) = self.poll() {
                break code;
            }
            pacer.tick_end_and_sleep();
        };
        self.join_all();
        tracing::info!(code, "all contexts stopped");
        code
    }

    /// [`run`](Supervisor::run) on a helper thread, failing instead of
    /// hanging when the contexts do not all finish within `limit`.
    #[cfg(test)]
    pub(crate) fn run_within(self, limit: std::time::Duration) -> i32 {
        let (tx, rx) = std::sync::mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(self.run());
        });
        match rx.recv_timeout(limit) {
            Ok(code) => code,
            Err(_) => panic!("contexts still running after {limit:?}"),
        }
    }

    fn join_all(&mut self) {
        for context in &mut self.contexts {
            if let Some(handle) = context.handle.take() {
                if handle.join().is_err() {
                    tracing::warn!(context = %context.name, "context thread panicked outside its body");
                } else {
                    tracing::debug!(context = %context.name, "context joined");
                }
            }
        }
    }
}
