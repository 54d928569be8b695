//! Frame timing
//!
//! Scenes are stepped once per loop iteration with the elapsed wall time in
//! milliseconds. The clock clamps long stalls (window drags, breakpoints) so
//! a single step never integrates more than `max_frame_ms`.

use std::time::{Duration, Instant};

/// Default cap on a single step's delta.
pub const DEFAULT_MAX_FRAME_MS: f32 = 100.0;

/// Measures time between loop iterations.
pub struct FrameClock {
    last: Instant,
    max_frame_ms: f32,
    time: SimulationTime,
}

impl FrameClock {
    pub fn new(max_frame_ms: f32) -> Self {
        Self {
            last: Instant::now(),
            max_frame_ms,
            time: SimulationTime::new(),
        }
    }

    /// Milliseconds since the previous call (or construction), clamped.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        let delta_ms = clamp_delta(elapsed, self.max_frame_ms);
        self.time.advance(delta_ms);
        delta_ms
    }

    pub fn time(&self) -> &SimulationTime {
        &self.time
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_MS)
    }
}

fn clamp_delta(elapsed: Duration, max_frame_ms: f32) -> f32 {
    (elapsed.as_micros() as f32 / 1000.0).min(max_frame_ms)
}

/// Simulated time as seen by the scenes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationTime {
    tick_count: u64,
    total_ms: f64,
}

impl SimulationTime {
    pub fn new() -> Self {
        Self {
            tick_count: 0,
            total_ms: 0.0,
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn advance(&mut self, delta_ms: f32) {
        self.tick_count += 1;
        self.total_ms += f64::from(delta_ms);
    }

    pub fn total_time(&self) -> Duration {
        Duration::from_secs_f64(self.total_ms / 1000.0)
    }
}

impl Default for SimulationTime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_is_clamped() {
        assert_eq!(clamp_delta(Duration::from_millis(16), 100.0), 16.0);
        assert_eq!(clamp_delta(Duration::from_secs(3), 100.0), 100.0);
    }

    #[test]
    fn test_simulation_time_accumulates() {
        let mut time = SimulationTime::new();
        time.advance(250.0);
        time.advance(750.0);

        assert_eq!(time.tick_count(), 2);
        assert_eq!(time.total_time(), Duration::from_secs(1));
    }

    #[test]
    fn test_clock_counts_ticks() {
        let mut clock = FrameClock::new(50.0);
        let delta = clock.tick();
        assert!((0.0..=50.0).contains(&delta));
        assert_eq!(clock.time().tick_count(), 1);
    }
}
