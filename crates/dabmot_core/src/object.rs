//! Per-object reassembly.
//!
//! One [`MotObject`] owns the header and body segment buffers for a single
//! transport object. The header is parsed once its buffer completes; the
//! body is cross-checked against the header's declared size, and a
//! mismatch discards the reassembled body so the segments must be received
//! again [ETSI EN 301 234, 6.1].

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use dabmot_codec::{scan_extension, HeaderCore, HEADER_CORE_LEN};

use crate::segment::SegmentBuffer;
use crate::types::TransportId;

/// Parsed header fields exposed to external consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    /// Content type code (6-bit).
    pub content_type: u8,
    /// Content subtype code (9-bit).
    pub content_subtype: u16,
    /// Decoded ContentName, when present.
    pub content_name: Option<String>,
    /// Unrecognized extension parameters, id to raw data field.
    pub user_params: BTreeMap<u8, Vec<u8>>,
}

/// Reassembly state for one transport object.
#[derive(Debug, Clone)]
pub struct MotObject {
    id: TransportId,
    header: SegmentBuffer,
    body: SegmentBuffer,
    /// Declared body size; `None` until the header parses, and re-set to
    /// `None` whenever the header proves unusable so the object can never
    /// falsely complete.
    body_size: Option<usize>,
    metadata: Option<ObjectMetadata>,
    complete: bool,
    /// Carousel bookkeeping bit, not protocol state.
    obsolete: bool,
    /// Latched when the header flags compressed or CA-scrambled content.
    unsupported: bool,
}

impl MotObject {
    /// Creates an empty object for `id`.
    #[must_use]
    pub fn new(id: TransportId) -> Self {
        Self {
            id,
            header: SegmentBuffer::new(),
            body: SegmentBuffer::new(),
            body_size: None,
            metadata: None,
            complete: false,
            obsolete: false,
            unsupported: false,
        }
    }

    /// Returns the transport id.
    #[must_use]
    pub fn id(&self) -> TransportId {
        self.id
    }

    /// Feeds one header or body segment and returns the resulting
    /// completion flag.
    ///
    /// The header is parsed as soon as its buffer completes. Once the
    /// declared body size is known and the body buffer is complete, the
    /// reassembled length is checked against the declaration: an exact
    /// match completes the object, anything else discards the body.
    pub fn add_segment(&mut self, data: &[u8], index: u16, is_last: bool, is_header: bool) -> bool {
        if is_header {
            self.header.add_segment(data, index, is_last);
            if self.header.is_complete() {
                self.parse_header();
            }
        } else {
            self.body.add_segment(data, index, is_last);
        }

        if let Some(body_size) = self.body_size {
            if self.body.is_complete() {
                if self.body.total_size() == body_size {
                    self.complete = true;
                } else {
                    // The declared body size does not correspond to the
                    // reassembled body; the body shall be discarded.
                    tracing::debug!(
                        id = %self.id,
                        declared = body_size,
                        reassembled = self.body.total_size(),
                        "body size mismatch, discarding body"
                    );
                    self.body.reset();
                    self.complete = false;
                }
            }
        }

        self.complete
    }

    /// Parses the completed header buffer.
    fn parse_header(&mut self) {
        let data = self.header.assemble();

        let Ok(core) = HeaderCore::parse(&data) else {
            tracing::warn!(id = %self.id, "unexpected header length");
            self.invalidate();
            return;
        };

        let header_size = usize::from(core.header_size);
        if header_size > data.len() {
            // Declared header extends past the received bytes; treat the
            // header as not yet parseable.
            tracing::warn!(
                id = %self.id,
                declared = header_size,
                received = data.len(),
                "header size exceeds received header bytes"
            );
            self.invalidate();
            return;
        }

        self.body_size = Some(core.body_size as usize);

        let extension = &data[HEADER_CORE_LEN..header_size.max(HEADER_CORE_LEN)];
        let scan = scan_extension(extension);
        if scan.unsupported {
            self.unsupported = true;
        }

        self.metadata = Some(ObjectMetadata {
            content_type: core.content_type,
            content_subtype: core.content_subtype,
            content_name: scan.content_name,
            user_params: scan.user_params,
        });

        if scan.unsupported || scan.truncated {
            self.invalidate();
        }
    }

    /// Marks the size state unknown so completion can never be reported.
    fn invalidate(&mut self) {
        self.complete = false;
        self.body_size = None;
    }

    /// Whether header and body have been fully reassembled and verified.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Whether the header flagged content this decoder cannot process
    /// (compressed or CA-scrambled). Such objects never complete and
    /// should be ignored rather than retried.
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        self.unsupported
    }

    /// The reassembled body; empty unless the object is complete.
    #[must_use]
    pub fn body(&self) -> Bytes {
        if self.complete {
            self.body.assemble()
        } else {
            Bytes::new()
        }
    }

    /// Parsed header metadata, once the header has been decoded.
    #[must_use]
    pub fn metadata(&self) -> Option<&ObjectMetadata> {
        self.metadata.as_ref()
    }

    /// Content type code, once the header has been decoded.
    #[must_use]
    pub fn content_type(&self) -> Option<u8> {
        self.metadata.as_ref().map(|m| m.content_type)
    }

    /// Content subtype code, once the header has been decoded.
    #[must_use]
    pub fn content_subtype(&self) -> Option<u16> {
        self.metadata.as_ref().map(|m| m.content_subtype)
    }

    /// Decoded ContentName, when the header carried one.
    #[must_use]
    pub fn content_name(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.content_name.as_deref())
    }

    /// Carousel bookkeeping: whether this record is pending eviction.
    #[must_use]
    pub fn is_obsolete(&self) -> bool {
        self.obsolete
    }

    /// Carousel bookkeeping: marks or clears the pending-eviction bit.
    pub fn set_obsolete(&mut self, obsolete: bool) {
        self.obsolete = obsolete;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(body_size: u32, extension: &[u8]) -> Vec<u8> {
        let core = HeaderCore {
            body_size,
            header_size: (HEADER_CORE_LEN + extension.len()) as u16,
            content_type: 2,
            content_subtype: 5,
        };
        let mut out = core.encode().to_vec();
        out.extend_from_slice(extension);
        out
    }

    #[test]
    fn header_then_body_completes() {
        let mut object = MotObject::new(TransportId::new(1));
        let header = header_bytes(10, &[]);
        assert!(!object.add_segment(&header, 0, true, true));
        assert!(!object.add_segment(&[0, 1, 2, 3, 4, 5], 0, false, false));
        assert!(object.add_segment(&[6, 7, 8, 9], 1, true, false));
        assert!(object.is_complete());
        assert_eq!(object.content_type(), Some(2));
        assert_eq!(object.content_subtype(), Some(5));
        assert_eq!(object.body().len(), 10);
    }

    #[test]
    fn body_before_header_completes() {
        let mut object = MotObject::new(TransportId::new(1));
        assert!(!object.add_segment(&[0, 1, 2], 0, true, false));
        let header = header_bytes(3, &[]);
        assert!(object.add_segment(&header, 0, true, true));
        assert_eq!(object.body().as_ref(), &[0, 1, 2]);
    }

    #[test]
    fn size_mismatch_discards_body_then_recovers() {
        let mut object = MotObject::new(TransportId::new(1));
        let header = header_bytes(4, &[]);
        object.add_segment(&header, 0, true, true);

        // Wrongly segmented body sums to 3, not 4.
        assert!(!object.add_segment(&[1, 2, 3], 0, true, false));
        assert!(!object.is_complete());
        assert!(object.body().is_empty());

        // A full, correctly sized resend still completes.
        assert!(object.add_segment(&[1, 2, 3, 4], 0, true, false));
        assert_eq!(object.body().as_ref(), &[1, 2, 3, 4]);
    }

    #[test]
    fn content_name_exposed() {
        let mut name_param = vec![0xC0 | 0x0C, 6, 0xF0];
        name_param.extend_from_slice(b"a.png");
        let header = header_bytes(1, &name_param);

        let mut object = MotObject::new(TransportId::new(1));
        object.add_segment(&header, 0, true, true);
        assert_eq!(object.content_name(), Some("a.png"));

        object.add_segment(&[0xAB], 0, true, false);
        assert!(object.is_complete());
    }

    #[test]
    fn compressed_object_never_completes() {
        // CompressionType parameter, PLI 1.
        let header = header_bytes(2, &[0x40 | 0x11, 0x01]);
        let mut object = MotObject::new(TransportId::new(1));
        object.add_segment(&header, 0, true, true);
        assert!(object.is_unsupported());

        assert!(!object.add_segment(&[1, 2], 0, true, false));
        assert!(!object.is_complete());
        assert!(object.body().is_empty());
    }

    #[test]
    fn scrambled_object_never_completes() {
        // CAInfo parameter, PLI 1.
        let header = header_bytes(2, &[0x40 | 0x23, 0x01]);
        let mut object = MotObject::new(TransportId::new(1));
        object.add_segment(&header, 0, true, true);
        assert!(object.is_unsupported());
        assert!(!object.add_segment(&[1, 2], 0, true, false));
        assert!(!object.is_complete());
    }

    #[test]
    fn truncated_extension_invalidates_size_state() {
        // Extension declares a 4-byte field but the header ends first.
        let header = header_bytes(2, &[0x80 | 0x07, 1, 2]);
        let mut object = MotObject::new(TransportId::new(1));
        object.add_segment(&header, 0, true, true);
        // Metadata from the partial scan is still available...
        assert_eq!(object.content_type(), Some(2));
        // ...but the object can never complete.
        assert!(!object.add_segment(&[1, 2], 0, true, false));
        assert!(!object.is_complete());
    }

    #[test]
    fn short_header_invalidates() {
        let mut object = MotObject::new(TransportId::new(1));
        object.add_segment(&[0x00, 0x01, 0x02], 0, true, true);
        assert!(!object.is_complete());
        assert!(object.metadata().is_none());
        assert!(!object.add_segment(&[1], 0, true, false));
    }

    #[test]
    fn header_size_beyond_received_bytes_invalidates() {
        let core = HeaderCore {
            body_size: 1,
            header_size: 20, // declares 13 extension bytes that never arrive
            content_type: 2,
            content_subtype: 5,
        };
        let mut object = MotObject::new(TransportId::new(1));
        object.add_segment(&core.encode(), 0, true, true);
        assert!(!object.add_segment(&[0xFF], 0, true, false));
        assert!(!object.is_complete());
    }

    #[test]
    fn metadata_serializes() {
        let metadata = ObjectMetadata {
            content_type: 2,
            content_subtype: 1,
            content_name: Some("img.jpg".into()),
            user_params: BTreeMap::from([(0x0A, vec![1u8])]),
        };
        let json = serde_json::to_string(&metadata).unwrap();
        let back: ObjectMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, metadata);
    }
}
