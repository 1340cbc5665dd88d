use web_time::Instant;

/// Wall clock for the animation loop.
///
/// Starts on the first query, so time spent between construction and the
/// first rendered frame is not counted.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    start: Option<Instant>,
}

impl Clock {
    /// Create a clock that is not yet running.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn start(&mut self) {
        self.start = Some(Instant::now());
    }

    /// Seconds since the clock started, starting it if needed.
    pub fn elapsed_time(&mut self) -> f32 {
        let start = match self.start {
            Some(start) => start,
            None => {
                self.start();
                return 0.0;
            }
        };
        start.elapsed().as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn first_query_starts_the_clock() {
        let mut clock = Clock::new();
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(clock.elapsed_time(), 0.0);
        assert!(clock.elapsed_time() < 0.04);
    }

    #[test]
    fn elapsed_time_is_monotonic() {
        let mut clock = Clock::new();
        let _ = clock.elapsed_time();
        std::thread::sleep(Duration::from_millis(5));
        let a = clock.elapsed_time();
        let b = clock.elapsed_time();
        assert!(a >= 0.004);
        assert!(b >= a);
    }
}
