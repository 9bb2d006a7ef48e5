//! Time-based press debouncing.

use super::{elapsed, EdgeDirection, RawEdge};

/// Drops press edges that arrive less than `debounce_ms` after the last
/// accepted one.
///
/// Rejected edges do not restart the quiet period, so a bounce chain longer
/// than `debounce_ms` lets one edge through every `debounce_ms`. The
/// classifier discards those while the line still reads pressed.
pub struct DebounceFilter {
    debounce_ms: u32,
    last_accepted: Option<u32>,
}

impl DebounceFilter {
    pub const fn new(debounce_ms: u32) -> Self {
        Self {
            debounce_ms,
            last_accepted: None,
        }
    }

    /// Returns `true` if `edge` is a genuine press.
    ///
    /// Rising edges are never accepted: releases are detected by level
    /// polling in the classifier.
    pub fn accept(&mut self, edge: RawEdge) -> bool {
        if edge.direction != EdgeDirection::Falling {
            return false;
        }

        let quiet = self
            .last_accepted
            .map_or(true, |last| elapsed(edge.timestamp, last) >= self.debounce_ms);
        if quiet {
            self.last_accepted = Some(edge.timestamp);
        }
        quiet
    }

    /// Timestamp of the last accepted press, if any.
    pub fn last_accepted(&self) -> Option<u32> {
        self.last_accepted
    }
}
