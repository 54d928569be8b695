//! Frame timing

use super::ring_buffer::RingBuffer;
use std::time::{Duration, Instant};

/// Rolling frame-rate estimate plus a periodic report trigger.
pub struct FrameTimer {
    last_frame: Instant,
    last_report: Instant,
    frame_times: RingBuffer<Duration>,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            last_report: now,
            frame_times: RingBuffer::new(capacity),
        }
    }

    /// Mark the end of a frame.
    pub fn frame(&mut self) {
        let now = Instant::now();
        self.frame_times.push(now.duration_since(self.last_frame));
        self.last_frame = now;
    }

    pub fn fps(&self) -> f64 {
        let avg = self.frame_times.average().as_secs_f64();
        if avg > 0.0 {
            1.0 / avg
        } else {
            0.0
        }
    }

    pub fn frame_time_ms(&self) -> f64 {
        self.frame_times.average().as_secs_f64() * 1000.0
    }

    /// Current fps, once every `interval`.
    pub fn report_due(&mut self, interval: Duration) -> Option<f64> {
        if self.last_report.elapsed() < interval {
            return None;
        }
        self.last_report = Instant::now();
        Some(self.fps())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_respects_interval() {
        let mut timer = FrameTimer::new(4);
        timer.frame();
        assert!(timer.report_due(Duration::from_secs(3600)).is_none());
        assert!(timer.report_due(Duration::ZERO).is_some());
    }
}
