use std::time::{Duration, Instant};

/// Times ticks and keeps a moving average of the tick period.
pub struct AverageTimer {
    started: Instant,
    last_lap: Instant,
    frames: Vec<(Instant, Duration)>,
    average: Option<Duration>,
    window: Duration,
}

impl AverageTimer {
    pub fn start(window: Duration) -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_lap: now,
            frames: Vec::new(),
            average: None,
            window,
        }
    }

    /// Closes the current period and returns the average over the window.
    pub fn lap(&mut self) -> Duration {
        let now = Instant::now();

        if let Some(cutoff) = now.checked_sub(self.window) {
            self.frames.retain(|&(t, _)| t > cutoff);
        }
        self.frames.push((now, now - self.last_lap));

        let total = self
            .frames
            .iter()
            .fold(Duration::ZERO, |acc, &(_, d)| acc + d);
        let count = u32::try_from(self.frames.len()).unwrap_or(u32::MAX);

        self.last_lap = now;
        *self.average.insert(total / count)
    }

    /// Time since the last [`AverageTimer::reset`].
    pub fn read(&self) -> Duration {
        self.started.elapsed()
    }

    pub const fn read_avg(&self) -> Option<Duration> {
        self.average
    }

    pub fn reset(&mut self) {
        self.started = Instant::now();
    }
}
