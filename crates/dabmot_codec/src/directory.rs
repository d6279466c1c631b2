//! MOT directory core parsing and entry iteration.
//!
//! The directory payload [ETSI EN 301 234, 7.2.3] opens with a 13-byte
//! core: a 30-bit directory size bounding the whole payload, a 16-bit
//! object count, a 24-bit carousel period, a 13-bit segment size and a
//! 16-bit extension length. The extension block (shared TLV grammar with
//! the header extension) follows, then one entry per object: a 2-byte
//! transport id plus an embedded MOT header blob sized by its own 13-bit
//! header-size field.

use crate::error::{CodecError, CodecResult};
use crate::header::HeaderCore;

/// Size of the fixed MOT directory core in bytes.
pub const DIRECTORY_CORE_LEN: usize = 13;

/// The fixed part of an MOT directory payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryCore {
    /// Total size of the directory in bytes (30-bit field).
    pub directory_size: u32,
    /// Number of object entries the directory declares (16-bit field).
    pub object_count: u16,
    /// Maximum time in tenths of seconds for one carousel cycle (24-bit field).
    pub carousel_period: u32,
    /// Segment size used for objects in this carousel (13-bit field).
    pub segment_size: u16,
    /// Length of the directory extension block in bytes (16-bit field).
    pub extension_length: u16,
}

impl DirectoryCore {
    /// Parses the directory core from the start of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnexpectedEof`] for payloads shorter than
    /// [`DIRECTORY_CORE_LEN`] and [`CodecError::DeclaredSizeExceedsPayload`]
    /// when the declared directory size points past the bytes present.
    pub fn parse(data: &[u8]) -> CodecResult<Self> {
        if data.len() < DIRECTORY_CORE_LEN {
            return Err(CodecError::unexpected_eof("MOT directory core"));
        }

        let directory_size = (u32::from(data[0] & 0x3F) << 24)
            | (u32::from(data[1]) << 16)
            | (u32::from(data[2]) << 8)
            | u32::from(data[3]);
        if directory_size as usize > data.len() {
            return Err(CodecError::DeclaredSizeExceedsPayload {
                declared: directory_size as usize,
                available: data.len(),
            });
        }

        let object_count = (u16::from(data[4]) << 8) | u16::from(data[5]);
        let carousel_period =
            (u32::from(data[6]) << 16) | (u32::from(data[7]) << 8) | u32::from(data[8]);
        let segment_size = (u16::from(data[9] & 0x1F) << 8) | u16::from(data[10]);
        let extension_length = (u16::from(data[11]) << 8) | u16::from(data[12]);

        Ok(Self {
            directory_size,
            object_count,
            carousel_period,
            segment_size,
            extension_length,
        })
    }

    /// Encodes the directory core to its 13-byte wire form.
    ///
    /// Fields wider than their wire width are truncated to it.
    #[must_use]
    pub fn encode(&self) -> [u8; DIRECTORY_CORE_LEN] {
        let directory_size = self.directory_size & 0x3FFF_FFFF;
        let carousel_period = self.carousel_period & 0x00FF_FFFF;
        let segment_size = self.segment_size & 0x1FFF;

        [
            (directory_size >> 24) as u8,
            (directory_size >> 16) as u8,
            (directory_size >> 8) as u8,
            directory_size as u8,
            (self.object_count >> 8) as u8,
            self.object_count as u8,
            (carousel_period >> 16) as u8,
            (carousel_period >> 8) as u8,
            carousel_period as u8,
            (segment_size >> 8) as u8,
            segment_size as u8,
            (self.extension_length >> 8) as u8,
            self.extension_length as u8,
        ]
    }

    /// Byte offset of the first directory entry (past core and extension).
    #[must_use]
    pub fn entries_offset(&self) -> usize {
        DIRECTORY_CORE_LEN + usize::from(self.extension_length)
    }
}

/// One directory entry: a transport id and the embedded header blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry<'a> {
    /// Transport id the entry advertises.
    pub transport_id: u16,
    /// The embedded MOT header, sized by its own header-size field.
    pub header: &'a [u8],
}

/// Fallible iterator over directory entries.
///
/// Yields entries until the payload is exhausted; a truncated entry yields
/// one `Err` and ends iteration. The caller enforces the declared object
/// count.
#[derive(Debug)]
pub struct DirectoryEntries<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DirectoryEntries<'a> {
    /// Creates an iterator over `data`, which must already be bounded to
    /// the declared directory size, starting at the first entry.
    #[must_use]
    pub fn new(data: &'a [u8], start: usize) -> Self {
        Self { data, pos: start }
    }

    /// Current byte offset within the directory payload.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for DirectoryEntries<'a> {
    type Item = CodecResult<DirectoryEntry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }

        let offset = self.pos;
        let remainder = &self.data[offset..];
        if remainder.len() < 2 {
            self.pos = self.data.len();
            return Some(Err(CodecError::TruncatedEntry { offset }));
        }
        let transport_id = (u16::from(remainder[0]) << 8) | u16::from(remainder[1]);

        // The entry length comes from the embedded header's own size field.
        let header_size = match HeaderCore::parse(&remainder[2..]) {
            Ok(core) => usize::from(core.header_size),
            Err(_) => {
                self.pos = self.data.len();
                return Some(Err(CodecError::TruncatedEntry { offset }));
            }
        };
        if 2 + header_size > remainder.len() {
            self.pos = self.data.len();
            return Some(Err(CodecError::TruncatedEntry { offset }));
        }

        self.pos += 2 + header_size;
        Some(Ok(DirectoryEntry {
            transport_id,
            header: &remainder[2..2 + header_size],
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_bytes(transport_id: u16, body_size: u32) -> Vec<u8> {
        let core = HeaderCore {
            body_size,
            header_size: 7,
            content_type: 2,
            content_subtype: 1,
        };
        let mut out = transport_id.to_be_bytes().to_vec();
        out.extend_from_slice(&core.encode());
        out
    }

    fn directory_bytes(object_count: u16, entries: &[Vec<u8>]) -> Vec<u8> {
        let entry_len: usize = entries.iter().map(Vec::len).sum();
        let core = DirectoryCore {
            directory_size: (DIRECTORY_CORE_LEN + entry_len) as u32,
            object_count,
            carousel_period: 600,
            segment_size: 128,
            extension_length: 0,
        };
        let mut out = core.encode().to_vec();
        for entry in entries {
            out.extend_from_slice(entry);
        }
        out
    }

    #[test]
    fn parse_core_fields() {
        let data = directory_bytes(2, &[entry_bytes(1, 10), entry_bytes(2, 20)]);
        let core = DirectoryCore::parse(&data).unwrap();
        assert_eq!(core.directory_size as usize, data.len());
        assert_eq!(core.object_count, 2);
        assert_eq!(core.carousel_period, 600);
        assert_eq!(core.segment_size, 128);
        assert_eq!(core.extension_length, 0);
        assert_eq!(core.entries_offset(), DIRECTORY_CORE_LEN);
    }

    #[test]
    fn core_roundtrip() {
        let core = DirectoryCore {
            directory_size: 0x1234,
            object_count: 42,
            carousel_period: 0x00AB_CDEF,
            segment_size: 0x1FFF,
            extension_length: 9,
        };
        let mut data = core.encode().to_vec();
        data.resize(0x1234, 0);
        assert_eq!(DirectoryCore::parse(&data).unwrap(), core);
    }

    #[test]
    fn short_payload_rejected() {
        assert!(matches!(
            DirectoryCore::parse(&[0u8; DIRECTORY_CORE_LEN - 1]),
            Err(CodecError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn oversized_declaration_rejected() {
        let mut data = directory_bytes(0, &[]);
        data[3] += 1; // declared size now exceeds the payload
        assert!(matches!(
            DirectoryCore::parse(&data),
            Err(CodecError::DeclaredSizeExceedsPayload { .. })
        ));
    }

    #[test]
    fn iterate_entries() {
        let data = directory_bytes(2, &[entry_bytes(7, 10), entry_bytes(9, 20)]);
        let entries: Vec<_> = DirectoryEntries::new(&data, DIRECTORY_CORE_LEN)
            .collect::<CodecResult<_>>()
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].transport_id, 7);
        assert_eq!(entries[1].transport_id, 9);
        assert_eq!(
            HeaderCore::parse(entries[1].header).unwrap().body_size,
            20
        );
    }

    #[test]
    fn truncated_entry_reported_once() {
        let mut data = directory_bytes(1, &[entry_bytes(7, 10)]);
        data.truncate(data.len() - 3);
        let mut iter = DirectoryEntries::new(&data, DIRECTORY_CORE_LEN);
        assert!(matches!(
            iter.next(),
            Some(Err(CodecError::TruncatedEntry { .. }))
        ));
        assert!(iter.next().is_none());
    }
}
