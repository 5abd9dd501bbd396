//! Shared I/O runtime state.
//!
//! [`IoRuntime`] holds the state the original design kept in
//! process-wide statics: the global output-enable flag and the
//! cumulative I/O wall-time accumulator. It is injected explicitly —
//! share one `Arc<IoRuntime>` across every datafile that should count
//! toward the same totals. Relaxed atomics are sufficient: the model is
//! single-threaded and the counters are advisory.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// Enable flag and cumulative I/O time shared across datafile instances.
#[derive(Debug)]
pub struct IoRuntime {
    enabled: AtomicBool,
    io_time_us: AtomicU64,
}

impl IoRuntime {
    /// Create an enabled runtime with a zero time accumulator.
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
            io_time_us: AtomicU64::new(0),
        }
    }

    /// Whether write/append calls should touch the filesystem.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Enable or disable output. While disabled, write/append calls
    /// report success without invoking the format driver.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Add one call's elapsed wall time to the accumulator.
    pub fn record_elapsed(&self, elapsed: Duration) {
        self.io_time_us
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    /// Total wall time spent in read/write calls so far.
    pub fn io_time(&self) -> Duration {
        Duration::from_micros(self.io_time_us.load(Ordering::Relaxed))
    }
}

impl Default for IoRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_enabled_with_zero_time() {
        let rt = IoRuntime::new();
        assert!(rt.is_enabled());
        assert_eq!(rt.io_time(), Duration::ZERO);
    }

    #[test]
    fn enable_flag_toggles() {
        let rt = IoRuntime::new();
        rt.set_enabled(false);
        assert!(!rt.is_enabled());
        rt.set_enabled(true);
        assert!(rt.is_enabled());
    }

    #[test]
    fn elapsed_time_accumulates() {
        let rt = IoRuntime::new();
        rt.record_elapsed(Duration::from_micros(250));
        rt.record_elapsed(Duration::from_micros(750));
        assert_eq!(rt.io_time(), Duration::from_millis(1));
    }
}
