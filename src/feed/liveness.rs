//! Heartbeat liveness monitoring.
//!
//! ## Design
//!
//! The feed emits heartbeat-class events on a fixed cadence. The monitor
//! stores the stamp of the last observation and measures the time to the
//! next one; an elapsed time above the threshold is a timeout signal. The
//! stamp is refreshed on every observation regardless, so a single missed
//! window never cascades into repeated timeouts once heartbeats resume.
//!
//! The caller passes the observation time (the transport's receive
//! stamp); the monitor never reads a clock of its own, which keeps
//! timeout scenarios testable without sleeping.

use std::time::{Duration, Instant};

use tracing::warn;

/// Default timeout threshold between heartbeats.
pub const DEFAULT_THRESHOLD: Duration = Duration::from_secs(5);

/// Tracks time since the last heartbeat-class event.
#[derive(Debug)]
pub struct LivenessMonitor {
    last_beat: Instant,
    threshold: Duration,
}

impl LivenessMonitor {
    /// Create a monitor anchored at the current instant
    pub fn new(threshold: Duration) -> Self {
        Self::anchored(Instant::now(), threshold)
    }

    /// Create a monitor anchored at an explicit instant
    pub fn anchored(origin: Instant, threshold: Duration) -> Self {
        Self {
            last_beat: origin,
            threshold,
        }
    }

    /// The stamp of the last observation
    #[inline]
    pub fn last_beat(&self) -> Instant {
        self.last_beat
    }

    /// The configured timeout threshold
    #[inline]
    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Record a heartbeat observed at `now`.
    ///
    /// Returns `Some(elapsed)` when the time since the previous beat
    /// exceeded the threshold. The stored stamp is refreshed either way.
    pub fn observe(&mut self, now: Instant) -> Option<Duration> {
        let elapsed = now.saturating_duration_since(self.last_beat);
        self.last_beat = now;

        if elapsed > self.threshold {
            warn!(?elapsed, threshold = ?self.threshold, "heartbeat timeout");
            Some(elapsed)
        } else {
            None
        }
    }
}

impl Default for LivenessMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
