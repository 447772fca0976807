use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::timer::{CalibrationStats, FrameLog, Timer};

/// Clock that only moves when told to. Clones share the same clock, so a test
/// can hold one handle and advance the time another owner observes.
#[derive(Debug, Clone)]
pub struct ManualTimer {
    now_ns: Arc<AtomicU64>,
    frames: Arc<Mutex<FrameLog>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self {
            now_ns: Arc::new(AtomicU64::new(0)),
            frames: Arc::new(Mutex::new(FrameLog::new(1000))),
        }
    }

    pub fn advance(&self, d: Duration) {
        self.now_ns.fetch_add(d.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Default for ManualTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for ManualTimer {
    type Timestamp = u64;

    fn now(&self) -> u64 {
        self.now_ns.load(Ordering::SeqCst)
    }

    fn elapsed(&self, ts: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(ts))
    }

    /// Sleeping advances the shared clock instead of blocking.
    fn sleep(&self, d: Duration) {
        self.advance(d);
    }

    fn record_frame(&mut self, d: Duration) {
        if let Ok(mut frames) = self.frames.lock() {
            frames.push(d);
        }
    }

    fn calibration_stats(&self) -> CalibrationStats {
        self.frames
            .lock()
            .map(|frames| frames.stats())
            .unwrap_or_default()
    }
}
