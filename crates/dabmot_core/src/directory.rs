//! MOT directory tracking.
//!
//! The directory is itself a segmented entity. Once reassembled, its
//! payload names every object currently carried in the carousel and embeds
//! each object's header. Parsing a fresh directory is one logical
//! transaction against the carousel: mark every record obsolete, apply the
//! entries (reactivating or creating records and injecting their embedded
//! headers), then sweep whatever the broadcaster stopped advertising.

use dabmot_codec::{scan_extension, DirectoryCore, DirectoryEntries};

use crate::carousel::Carousel;
use crate::object::MotObject;
use crate::segment::SegmentBuffer;
use crate::types::TransportId;

/// Structured outcome of one successfully decoded directory cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryUpdate {
    /// Number of objects the directory declared.
    pub object_count: u16,
    /// Entries whose object is complete after header injection.
    pub complete_objects: usize,
    /// Objects that transitioned to complete during this cycle.
    pub newly_complete: Vec<TransportId>,
    /// Objects whose injected header just flagged compressed or
    /// CA-scrambled content.
    pub newly_unsupported: usize,
    /// Records evicted by the obsolete sweep.
    pub evicted: usize,
}

/// Tracks the active MOT directory and owns the object carousel.
///
/// The decoder keeps adding object segments even for transport ids the
/// current directory does not list yet; carousel maintenance happens only
/// when a new directory is received.
#[derive(Debug, Default)]
pub struct MotDirectory {
    buffer: SegmentBuffer,
    carousel: Carousel,
    complete_count: usize,
}

impl MotDirectory {
    /// Creates a directory tracker with an empty carousel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one directory segment.
    ///
    /// Returns `Some` exactly on the transition into "freshly reassembled
    /// and successfully decoded". Once the directory buffer is complete,
    /// further calls are no-ops until [`reset`](Self::reset); a payload
    /// that reassembled but failed to decode also stays absorbed, since
    /// re-feeding the same bytes cannot fix it.
    pub fn add_segment(&mut self, data: &[u8], index: u16, is_last: bool) -> Option<DirectoryUpdate> {
        if self.buffer.is_complete() {
            return None;
        }

        self.buffer.add_segment(data, index, is_last);
        if !self.buffer.is_complete() {
            tracing::trace!("directory segment received, not complete yet");
            return None;
        }

        tracing::debug!("directory is complete");
        let payload = self.buffer.assemble();
        let update = self.parse(&payload);
        if update.is_none() {
            tracing::warn!("directory parsing failed");
        }
        update
    }

    /// Feeds one object segment arriving independently of the directory.
    ///
    /// Looks up or creates the carousel record for `id` and returns true
    /// iff that object just became complete.
    pub fn add_object_segment(
        &mut self,
        id: TransportId,
        data: &[u8],
        index: u16,
        is_last: bool,
        is_header: bool,
    ) -> bool {
        if self.carousel.find(id).is_none() {
            // Not advertised by the current directory (yet); the next
            // directory cycle decides whether it survives.
            tracing::debug!(%id, carousel_size = self.carousel.len(), "new object");
            self.carousel.insert(MotObject::new(id));
        }
        let Some(object) = self.carousel.find_mut(id) else {
            return false;
        };

        if object.is_complete() {
            return false;
        }
        if object.add_segment(data, index, is_last, is_header) {
            self.complete_count += 1;
            tracing::debug!(%id, "object complete");
            return true;
        }
        false
    }

    /// Decodes a reassembled directory payload and synchronizes the
    /// carousel with it.
    fn parse(&mut self, payload: &[u8]) -> Option<DirectoryUpdate> {
        let core = match DirectoryCore::parse(payload) {
            Ok(core) => core,
            Err(error) => {
                tracing::warn!(%error, "unusable directory payload");
                return None;
            }
        };
        let directory_size = core.directory_size as usize;
        tracing::debug!(
            directory_size,
            object_count = core.object_count,
            carousel_period = core.carousel_period,
            segment_size = core.segment_size,
            extension_length = core.extension_length,
            "decoding directory"
        );

        let mut ok = true;

        // The directory extension shares the header-extension grammar; it
        // is validated but carries nothing this decoder acts on.
        let entries_offset = core.entries_offset();
        match payload.get(dabmot_codec::DIRECTORY_CORE_LEN..entries_offset) {
            Some(extension) => {
                if scan_extension(extension).truncated {
                    ok = false;
                }
            }
            None => ok = false,
        }

        // One logical transaction: mark all, apply entries, sweep.
        self.carousel.mark_all_obsolete();
        self.complete_count = 0;
        let mut newly_complete = Vec::new();
        let mut newly_unsupported: usize = 0;
        let mut entries_read: usize = 0;

        let bounded = &payload[..directory_size.min(payload.len())];
        for entry in DirectoryEntries::new(bounded, entries_offset.min(bounded.len())) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    tracing::warn!(%error, "directory entry stream damaged");
                    ok = false;
                    break;
                }
            };

            if entries_read >= usize::from(core.object_count) {
                // Protection against runaway parsing on corrupt input;
                // entries already applied stand.
                tracing::warn!(
                    declared = core.object_count,
                    "more entries than the directory declared"
                );
                ok = false;
                break;
            }
            entries_read += 1;

            let id = TransportId::from(entry.transport_id);
            tracing::debug!(%id, header_size = entry.header.len(), "directory entry");

            if !self.carousel.mark_active(id) {
                tracing::debug!(%id, "object not yet in carousel");
                self.carousel.insert(MotObject::new(id));
            }
            // The record exists now either way.
            let Some(object) = self.carousel.find_mut(id) else {
                continue;
            };

            // Inject the embedded header through the normal reassembly
            // path: segment 0, flagged last.
            let was_complete = object.is_complete();
            let was_unsupported = object.is_unsupported();
            object.add_segment(entry.header, 0, true, true);
            if object.is_complete() {
                self.complete_count += 1;
                if !was_complete {
                    newly_complete.push(id);
                }
            }
            if object.is_unsupported() && !was_unsupported {
                newly_unsupported += 1;
            }
        }

        let evicted = self.carousel.sweep_obsolete();

        if ok {
            Some(DirectoryUpdate {
                object_count: core.object_count,
                complete_objects: self.complete_count,
                newly_complete,
                newly_unsupported,
                evicted,
            })
        } else {
            None
        }
    }

    /// Whether the directory payload has been fully reassembled (whether
    /// or not it decoded successfully).
    #[must_use]
    pub fn is_payload_complete(&self) -> bool {
        self.buffer.is_complete()
    }

    /// Read access to the carousel for consumers enumerating objects.
    #[must_use]
    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    /// Mutable access to the carousel.
    pub fn carousel_mut(&mut self) -> &mut Carousel {
        &mut self.carousel
    }

    /// Number of complete objects observed since the last directory cycle.
    #[must_use]
    pub fn complete_count(&self) -> usize {
        self.complete_count
    }

    /// Discards the partially or fully received directory payload so a new
    /// directory version can be collected. The carousel is untouched.
    pub fn reset(&mut self) {
        self.buffer.reset();
    }
}
