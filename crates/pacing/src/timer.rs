use std::time::Duration;

/// Rolling window of recent tick durations.
///
/// Fixed capacity; once full, each record overwrites the oldest sample.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    samples: Vec<Duration>,
    next: usize,
    full: bool,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: vec![Duration::ZERO; capacity.max(1)],
            next: 0,
            full: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    pub fn record(&mut self, sample: Duration) {
        self.samples[self.next] = sample;
        self.next = (self.next + 1) % self.samples.len();
        if self.next == 0 {
            self.full = true;
        }
    }

    /// Number of samples currently held.
    pub fn count(&self) -> usize {
        if self.full { self.samples.len() } else { self.next }
    }

    fn window(&self) -> &[Duration] {
        &self.samples[..self.count()]
    }

    pub fn average(&self) -> Duration {
        let window = self.window();
        if window.is_empty() {
            return Duration::ZERO;
        }
        window.iter().sum::<Duration>() / window.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.window().iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.window().iter().copied().min().unwrap_or(Duration::ZERO)
    }

    /// Achieved rate implied by the average sample, in ticks per second.
    pub fn rate(&self) -> f64 {
        let average = self.average().as_secs_f64();
        if average > 0.0 { average.recip() } else { 0.0 }
    }

    pub fn clear(&mut self) {
        self.next = 0;
        self.full = false;
    }
}
