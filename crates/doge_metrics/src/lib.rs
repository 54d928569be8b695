//! Doge Party Metrics - frame timing for the main loop
//!
//! # Feature Flags
//!
//! - `metrics` - Enable frame timing (default: disabled)
//!
//! # Usage
//!
//! ```ignore
//! use doge_metrics::FrameTimer;
//!
//! let mut timer = FrameTimer::new(120);
//! loop {
//!     timer.frame();
//!     if let Some(fps) = timer.report_due(std::time::Duration::from_secs(5)) {
//!         tracing::info!("fps: {fps:.1}");
//!     }
//! }
//! ```
//!
//! Without the `metrics` feature the timer is a zero-sized stub and
//! `report_due` never fires.

#[cfg(feature = "metrics")]
mod frame_timer;
#[cfg(feature = "metrics")]
mod ring_buffer;

#[cfg(feature = "metrics")]
pub use frame_timer::FrameTimer;
#[cfg(feature = "metrics")]
pub use ring_buffer::RingBuffer;

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
pub struct FrameTimer;

#[cfg(not(feature = "metrics"))]
impl FrameTimer {
    pub fn new(_capacity: usize) -> Self { Self }
    pub fn frame(&mut self) {}
    pub fn fps(&self) -> f64 { 0.0 }
    pub fn frame_time_ms(&self) -> f64 { 0.0 }
    pub fn report_due(&mut self, _interval: std::time::Duration) -> Option<f64> { None }
}
