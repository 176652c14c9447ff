//! Read-after-write throttling.
//!
//! The platform replicates writes to its read stores asynchronously, so a
//! read issued right after a write can observe stale data. A connection keeps
//! one [`ConsistencyWindow`]: it times each write, assumes replication takes
//! about as long again, and makes the first read inside that estimate wait a
//! fixed delay. Later reads pass straight through until the next write.
//!
//! The window belongs to the connection, not to a resource, so unrelated
//! reads pay the delay too.

use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

/// Where the window is in its write/read cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Idle,
    WriteInFlight { started_at: Instant },
    WindowOpen { estimated_ready_at: Instant },
}

/// Per-connection eventual consistency estimator.
///
/// Not meant for overlapping use: writes and reads on one connection must be
/// issued one after another.
#[derive(Debug, Clone)]
pub struct ConsistencyWindow {
    state: WindowState,
    delay: Duration,
}

impl ConsistencyWindow {
    /// A window that delays the first read after a write by `delay`.
    pub fn new(delay: Duration) -> Self {
        Self {
            state: WindowState::Idle,
            delay,
        }
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether the next read will be checked against a pending estimate.
    pub fn is_pending(&self) -> bool {
        matches!(self.state, WindowState::WindowOpen { .. })
    }

    /// When replication is expected to have caught up, if a window is open.
    pub fn estimated_ready_at(&self) -> Option<Instant> {
        match self.state {
            WindowState::WindowOpen { estimated_ready_at } => Some(estimated_ready_at),
            _ => None,
        }
    }

    /// A write is about to be sent.
    pub fn start_write(&mut self) {
        self.state = WindowState::WriteInFlight {
            started_at: Instant::now(),
        };
    }

    /// The write completed; open a window as long as the write took.
    ///
    /// Ignored unless a write is in flight.
    pub fn end_write(&mut self) {
        if let WindowState::WriteInFlight { started_at } = self.state {
            let now = Instant::now();
            let elapsed = now.saturating_duration_since(started_at);
            self.state = WindowState::WindowOpen {
                estimated_ready_at: now + elapsed,
            };
        }
    }

    /// The write failed and changed nothing; forget it.
    pub fn cancel_write(&mut self) {
        if matches!(self.state, WindowState::WriteInFlight { .. }) {
            self.state = WindowState::Idle;
        }
    }

    /// Call before every read. Waits once if the read falls inside an open
    /// window, and returns how long it waited.
    pub async fn before_read(&mut self) -> Option<Duration> {
        let WindowState::WindowOpen { estimated_ready_at } = self.state else {
            return None;
        };

        self.state = WindowState::Idle;
        if Instant::now() >= estimated_ready_at {
            return None;
        }

        trace!(delay_ms = self.delay.as_millis() as u64, "waiting for replication");
        tokio::time::sleep(self.delay).await;
        Some(self.delay)
    }
}

impl Default for ConsistencyWindow {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}
