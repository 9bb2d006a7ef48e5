//! Bounded FIFO of decoded notifications.

use heapless::Deque;

use super::Notification;

/// FIFO that keeps the newest `N` entries: pushing into a full queue
/// evicts the oldest.
pub struct NotificationQueue<const N: usize> {
    items: Deque<Notification, N>,
}

impl<const N: usize> NotificationQueue<N> {
    pub const fn new() -> Self {
        Self {
            items: Deque::new(),
        }
    }

    /// Append `notification`. Returns the entry evicted to make room.
    pub fn push(&mut self, notification: Notification) -> Option<Notification> {
        let evicted = if self.items.is_full() {
            self.items.pop_front()
        } else {
            None
        };
        // Cannot fail: there is room now.
        let _ = self.items.push_back(notification);
        evicted
    }

    pub fn pop(&mut self) -> Option<Notification> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }
}

impl<const N: usize> Default for NotificationQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
