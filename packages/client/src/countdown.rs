//! Holder countdown with clock-skew reconciliation.
//!
//! The server and the client clocks are never assumed to agree. When a hand
//! state arrives the client records its own local time; the offset between
//! that and the server timestamp is the skew, and the hold is measured against
//! the local clock from then on.

use handraise_shared::protocol::RELEASED_TIMESTAMP;

/// Offset between the local clock and a server timestamp, taken on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSkew {
    captured_local: i64,
    offset: i64,
}

impl ClockSkew {
    pub fn capture(server_timestamp: i64, local_now: i64) -> Self {
        Self {
            captured_local: local_now,
            offset: local_now.saturating_sub(server_timestamp),
        }
    }

    /// Local time at which the server timestamp was received
    pub fn captured_local(&self) -> i64 {
        self.captured_local
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

/// Milliseconds left on a hold, or `None` when released or already over.
///
/// `captured_local` is the local time at which `server_timestamp` arrived.
/// Timestamps far enough apart to overflow `i64` count as no countdown.
pub fn remaining_millis(
    server_timestamp: i64,
    captured_local: i64,
    now_local: i64,
    timeout: i64,
) -> Option<i64> {
    if server_timestamp == RELEASED_TIMESTAMP {
        return None;
    }
    let skew = captured_local.checked_sub(server_timestamp)?;
    let started_local = skew.checked_add(server_timestamp)?;
    let elapsed = now_local.checked_sub(started_local)?;
    let remaining = timeout.checked_sub(elapsed)?;
    (remaining > 0).then_some(remaining)
}

/// Seconds with one decimal, e.g. `4.3`
pub fn format_remaining(remaining_millis: i64) -> String {
    format!("{:.1}", remaining_millis as f64 / 1000.0)
}

/// Reports a countdown value only when its whole-second bucket changes, so a
/// 50ms poll does not flood the terminal.
///
/// The clock is still polled every 50ms; only the printing is thinned to one
/// line per second. The value printed is the poll that crossed into the new
/// second, so it usually reads `N.0` and the tenth digit shows how late that
/// poll landed.
#[derive(Debug, Default)]
pub struct CountdownTracker {
    last_bucket: Option<i64>,
}

impl CountdownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the latest poll; returns the value to display when it should be shown.
    pub fn update(&mut self, remaining: Option<i64>) -> Option<i64> {
        let bucket = remaining.map(|ms| (ms + 999) / 1000);
        if bucket == self.last_bucket {
            return None;
        }
        self.last_bucket = bucket;
        remaining
    }

    pub fn reset(&mut self) {
        self.last_bucket = None;
    }
}
