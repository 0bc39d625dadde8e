//! Abstract interface for time operations (for testability).

use std::sync::atomic::{AtomicU64, Ordering};

/// Clock port. Implementations return wall-clock time; the monotonicity of
/// command-interest stamps never depends on the clock behaving.
pub trait TimeSource: Send + Sync {
    /// Current time in whole milliseconds since the epoch.
    fn now_ms(&self) -> u64;

    /// Current time in whole seconds since the epoch.
    fn now_secs(&self) -> u64 {
        self.now_ms() / 1_000
    }
}

/// Default time source using system time.
#[derive(Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Settable clock for tests: holds a fixed millisecond value.
#[derive(Default)]
pub struct FixedTimeSource {
    now_ms: AtomicU64,
}

impl FixedTimeSource {
    /// Start the clock at `now_ms`.
    pub fn new(now_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(now_ms),
        }
    }

    /// Move the clock (forward or backward).
    pub fn set(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }
}

impl TimeSource for FixedTimeSource {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}
