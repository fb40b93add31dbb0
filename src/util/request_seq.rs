//! Sequence stamps for overlapping requests.
//!
//! Each request of a given kind takes a ticket before it is sent. When the
//! response arrives, only the newest ticket for that key may write to state;
//! older responses are dropped instead of overwriting newer data.

#[cfg(test)]
#[path = "request_seq_test.rs"]
mod request_seq_test;

use std::collections::HashMap;

/// Ticket returned by [`RequestSeq::begin`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    key: String,
    seq: u64,
}

/// Monotonic per-key request counter.
#[derive(Clone, Debug, Default)]
pub struct RequestSeq {
    next: u64,
    latest: HashMap<String, u64>,
}

impl RequestSeq {
    /// Stamp a new request for `key`, superseding any in flight.
    pub fn begin(&mut self, key: &str) -> Ticket {
        self.next += 1;
        self.latest.insert(key.to_owned(), self.next);
        Ticket { key: key.to_owned(), seq: self.next }
    }

    /// Whether `ticket` is still the newest request for its key.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest.get(&ticket.key) == Some(&ticket.seq)
    }

    /// Retire `ticket` if it is current. Returns whether its response may be applied.
    pub fn finish(&mut self, ticket: &Ticket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.latest.remove(&ticket.key);
        true
    }

    /// Whether any request for `key` is still outstanding.
    pub fn is_pending(&self, key: &str) -> bool {
        self.latest.contains_key(key)
    }
}
