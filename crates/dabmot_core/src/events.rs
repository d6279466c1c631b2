//! Decoder event feed.
//!
//! Completed objects and carousel updates are distributed to subscribers
//! through a small fan-out feed: each subscriber gets every event in
//! emission order, and a bounded history supports poll-style catch-up for
//! consumers that do not want a channel.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};

use crate::object::ObjectMetadata;
use crate::types::TransportId;

/// An event produced by the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotEvent {
    /// An object finished reassembly and verified its declared size.
    ObjectComplete {
        /// Transport id of the completed object.
        id: TransportId,
        /// Parsed header metadata.
        metadata: ObjectMetadata,
        /// The reassembled body, when the decoder is configured to carry
        /// bodies in events; otherwise fetch it from the carousel.
        body: Option<Vec<u8>>,
    },
    /// A directory cycle decoded successfully; the carousel's live set may
    /// have changed.
    DirectoryUpdated {
        /// Number of objects the directory declared.
        object_count: u16,
        /// Complete objects after the cycle.
        complete_objects: usize,
        /// Records evicted by the obsolete sweep.
        evicted: usize,
    },
}

/// One feed entry: an event and its emission sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    /// Monotonically increasing emission counter, starting at 1.
    pub sequence: u64,
    /// The event itself.
    pub event: MotEvent,
}

/// Distributes decoder events to subscribers.
#[derive(Debug)]
pub struct EventFeed {
    subscribers: RwLock<Vec<Sender<FeedItem>>>,
    history: RwLock<Vec<FeedItem>>,
    next_sequence: RwLock<u64>,
    max_history: usize,
}

impl EventFeed {
    /// Creates a feed with the given history limit.
    #[must_use]
    pub fn new(max_history: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            history: RwLock::new(Vec::new()),
            next_sequence: RwLock::new(1),
            max_history,
        }
    }

    /// Subscribes to all future events.
    pub fn subscribe(&self) -> Receiver<FeedItem> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.write().push(tx);
        rx
    }

    /// Emits one event to history and every live subscriber.
    pub fn emit(&self, event: MotEvent) {
        let item = {
            let mut next = self.next_sequence.write();
            let item = FeedItem {
                sequence: *next,
                event,
            };
            *next += 1;
            item
        };

        {
            let mut history = self.history.write();
            history.push(item.clone());
            if history.len() > self.max_history {
                let excess = history.len() - self.max_history;
                history.drain(0..excess);
            }
        }

        let mut subscribers = self.subscribers.write();
        subscribers.retain(|tx| tx.send(item.clone()).is_ok());
    }

    /// Returns history entries with `sequence > cursor`, up to `limit`.
    #[must_use]
    pub fn poll(&self, cursor: u64, limit: usize) -> Vec<FeedItem> {
        self.history
            .read()
            .iter()
            .filter(|item| item.sequence > cursor)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Latest emitted sequence number (0 when nothing was emitted).
    #[must_use]
    pub fn latest_sequence(&self) -> u64 {
        *self.next_sequence.read() - 1
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn complete_event(id: u32) -> MotEvent {
        MotEvent::ObjectComplete {
            id: TransportId::new(id),
            metadata: ObjectMetadata::default(),
            body: None,
        }
    }

    #[test]
    fn emit_and_receive() {
        let feed = EventFeed::new(16);
        let rx = feed.subscribe();

        feed.emit(complete_event(1));
        let item = rx.recv_timeout(Duration::from_millis(100)).unwrap();
        assert_eq!(item.sequence, 1);
        assert_eq!(item.event, complete_event(1));
    }

    #[test]
    fn multiple_subscribers_get_every_event() {
        let feed = EventFeed::new(16);
        let rx1 = feed.subscribe();
        let rx2 = feed.subscribe();

        feed.emit(complete_event(7));
        assert_eq!(rx1.recv().unwrap().event, complete_event(7));
        assert_eq!(rx2.recv().unwrap().event, complete_event(7));
    }

    #[test]
    fn dropped_subscriber_is_pruned() {
        let feed = EventFeed::new(16);
        let rx = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 1);
        drop(rx);
        feed.emit(complete_event(1));
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[test]
    fn poll_from_cursor() {
        let feed = EventFeed::new(16);
        for n in 1..=5 {
            feed.emit(complete_event(n));
        }
        let items = feed.poll(2, 10);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].sequence, 3);
        assert_eq!(feed.latest_sequence(), 5);
    }

    #[test]
    fn history_is_bounded() {
        let feed = EventFeed::new(3);
        for n in 1..=10 {
            feed.emit(complete_event(n));
        }
        let items = feed.poll(0, 100);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].sequence, 8);
    }

    #[test]
    fn events_serialize() {
        let event = MotEvent::DirectoryUpdated {
            object_count: 3,
            complete_objects: 2,
            evicted: 1,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: MotEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
