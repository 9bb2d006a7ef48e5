//! Keep-alive schedule for the notification session.

/// Tracks when the next ping is due.
///
/// The deadline only moves when a ping is sent. Incoming traffic does not
/// count as activity, since the broker only watches what the client sends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeepAlive {
    interval_ms: u64,
    deadline_ms: u64,
}

impl KeepAlive {
    /// Pings every half keep-alive period, starting from `now_ms`.
    pub const fn new(now_ms: u64, keep_alive_secs: u16) -> Self {
        let interval_ms = keep_alive_secs as u64 * 1000 / 2;
        Self {
            interval_ms,
            deadline_ms: now_ms + interval_ms,
        }
    }

    pub fn deadline_ms(&self) -> u64 {
        self.deadline_ms
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms >= self.deadline_ms
    }

    /// Record a ping sent at `now_ms`.
    pub fn sent(&mut self, now_ms: u64) {
        self.deadline_ms = now_ms + self.interval_ms;
    }
}
