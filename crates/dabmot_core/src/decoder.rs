//! Decoder facade.
//!
//! [`MotDecoder`] is the entry point for embedding the reassembly engine.
//! It owns the directory tracker and carousel behind one mutex: applying a
//! segment and reading a carousel snapshot are each one critical section,
//! because a directory re-parse flips every record's obsolete flag as a
//! single logical transaction and must never interleave with segment
//! application. Completion and carousel-update events are fanned out
//! through an [`EventFeed`].

use bytes::Bytes;
use parking_lot::Mutex;
use std::sync::mpsc::Receiver;

use crate::config::DecoderConfig;
use crate::directory::MotDirectory;
use crate::error::{CoreResult, DecoderError};
use crate::events::{EventFeed, FeedItem, MotEvent};
use crate::object::ObjectMetadata;
use crate::stats::{DecoderStats, StatsSnapshot};
use crate::types::TransportId;

/// A point-in-time view of one carousel record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectStatus {
    /// Transport id of the record.
    pub id: TransportId,
    /// Whether reassembly has completed and verified.
    pub complete: bool,
    /// Whether the object is compressed or CA-scrambled and will never
    /// complete.
    pub unsupported: bool,
    /// Decoded ContentName, when the header carried one.
    pub content_name: Option<String>,
}

/// Thread-safe MOT decoder: segment ingestion in, completed objects out.
pub struct MotDecoder {
    directory: Mutex<MotDirectory>,
    feed: EventFeed,
    stats: DecoderStats,
    config: DecoderConfig,
}

impl MotDecoder {
    /// Creates a decoder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    /// Creates a decoder with the given configuration.
    #[must_use]
    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            directory: Mutex::new(MotDirectory::new()),
            feed: EventFeed::new(config.event_history),
            stats: DecoderStats::new(),
            config,
        }
    }

    /// Pushes one header or body segment for the object `id`.
    ///
    /// Returns true iff the object just became complete; an
    /// [`MotEvent::ObjectComplete`] is emitted on that transition.
    pub fn push_object_segment(
        &self,
        id: TransportId,
        data: &[u8],
        index: u16,
        is_last: bool,
        is_header: bool,
    ) -> bool {
        self.stats.record_object_segment();

        let event = {
            let mut directory = self.directory.lock();
            let was_unsupported = directory
                .carousel()
                .find(id)
                .is_some_and(|object| object.is_unsupported());
            let became_complete = directory.add_object_segment(id, data, index, is_last, is_header);
            if !was_unsupported
                && directory
                    .carousel()
                    .find(id)
                    .is_some_and(|object| object.is_unsupported())
            {
                self.stats.record_objects_unsupported(1);
            }
            if !became_complete {
                return false;
            }
            self.completion_event(&directory, id)
        };

        self.stats.record_object_completed();
        if let Some(event) = event {
            self.feed.emit(event);
        }
        true
    }

    /// Pushes one segment of the directory payload.
    ///
    /// Returns true iff the directory just reassembled and decoded
    /// successfully; [`MotEvent::ObjectComplete`] is emitted for every
    /// object the injected headers completed, followed by one
    /// [`MotEvent::DirectoryUpdated`].
    pub fn push_directory_segment(&self, data: &[u8], index: u16, is_last: bool) -> bool {
        self.stats.record_directory_segment();

        let mut events = Vec::new();
        {
            let mut directory = self.directory.lock();
            let was_complete = directory.is_payload_complete();
            let Some(update) = directory.add_segment(data, index, is_last) else {
                if !was_complete && directory.is_payload_complete() {
                    self.stats.record_directory_failure();
                }
                return false;
            };

            self.stats.record_directory_parsed(update.evicted as u64);
            self.stats
                .record_objects_unsupported(update.newly_unsupported as u64);
            for id in &update.newly_complete {
                self.stats.record_object_completed();
                events.extend(self.completion_event(&directory, *id));
            }
            events.push(MotEvent::DirectoryUpdated {
                object_count: update.object_count,
                complete_objects: update.complete_objects,
                evicted: update.evicted,
            });
        }

        for event in events {
            self.feed.emit(event);
        }
        true
    }

    fn completion_event(&self, directory: &MotDirectory, id: TransportId) -> Option<MotEvent> {
        let object = directory.carousel().find(id)?;
        Some(MotEvent::ObjectComplete {
            id,
            metadata: object.metadata().cloned().unwrap_or_default(),
            body: self
                .config
                .bodies_in_events
                .then(|| object.body().to_vec()),
        })
    }

    /// Subscribes to decoder events.
    pub fn subscribe(&self) -> Receiver<FeedItem> {
        self.feed.subscribe()
    }

    /// Returns feed history entries with sequence greater than `cursor`.
    #[must_use]
    pub fn poll_events(&self, cursor: u64, limit: usize) -> Vec<FeedItem> {
        self.feed.poll(cursor, limit)
    }

    /// Enumerates the carousel's current records.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ObjectStatus> {
        let directory = self.directory.lock();
        directory
            .carousel()
            .iter()
            .map(|object| ObjectStatus {
                id: object.id(),
                complete: object.is_complete(),
                unsupported: object.is_unsupported(),
                content_name: object.content_name().map(str::to_owned),
            })
            .collect()
    }

    /// Returns the reassembled body of a completed object.
    ///
    /// # Errors
    ///
    /// [`DecoderError::UnknownObject`] if the carousel has no record for
    /// `id`; [`DecoderError::ObjectIncomplete`] if reassembly has not
    /// finished.
    pub fn body_of(&self, id: TransportId) -> CoreResult<Bytes> {
        let directory = self.directory.lock();
        let object = directory
            .carousel()
            .find(id)
            .ok_or(DecoderError::UnknownObject {
                transport_id: id.as_u32(),
            })?;
        if !object.is_complete() {
            return Err(DecoderError::ObjectIncomplete {
                transport_id: id.as_u32(),
            });
        }
        Ok(object.body())
    }

    /// Returns the parsed metadata of an object whose header has decoded.
    ///
    /// # Errors
    ///
    /// [`DecoderError::UnknownObject`] if the carousel has no record for
    /// `id`; [`DecoderError::ObjectIncomplete`] if the header has not
    /// been decoded yet.
    pub fn metadata_of(&self, id: TransportId) -> CoreResult<ObjectMetadata> {
        let directory = self.directory.lock();
        let object = directory
            .carousel()
            .find(id)
            .ok_or(DecoderError::UnknownObject {
                transport_id: id.as_u32(),
            })?;
        object
            .metadata()
            .cloned()
            .ok_or(DecoderError::ObjectIncomplete {
                transport_id: id.as_u32(),
            })
    }

    /// Number of records currently in the carousel.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.directory.lock().carousel().len()
    }

    /// Returns a snapshot of the decoder statistics.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Discards the directory payload so a new directory version can be
    /// collected; the carousel keeps its records until the next cycle.
    pub fn reset_directory(&self) {
        self.directory.lock().reset();
    }

    /// Discards all state: directory payload and every carousel record.
    pub fn clear(&self) {
        let mut directory = self.directory.lock();
        directory.reset();
        directory.carousel_mut().clear();
    }
}

impl Default for MotDecoder {
    fn default() -> Self {
        Self::new()
    }
}
