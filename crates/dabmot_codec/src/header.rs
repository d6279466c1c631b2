//! MOT header core parsing.
//!
//! The header core is a fixed 56-bit structure [ETSI EN 301 234, 6.1]:
//! a 28-bit body size, a 13-bit header size (core + extension, in bytes),
//! a 6-bit content type and a 9-bit content subtype.

use crate::error::{CodecError, CodecResult};

/// Size of the fixed MOT header core in bytes.
pub const HEADER_CORE_LEN: usize = 7;

/// The fixed part of an MOT header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderCore {
    /// Total size of the reassembled body in bytes (28-bit field).
    pub body_size: u32,
    /// Total size of the header (core plus extension) in bytes (13-bit field).
    pub header_size: u16,
    /// Content type code (6-bit field).
    pub content_type: u8,
    /// Content subtype code (9-bit field).
    pub content_subtype: u16,
}

impl HeaderCore {
    /// Parses the header core from the start of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnexpectedEof`] if fewer than
    /// [`HEADER_CORE_LEN`] bytes are present.
    pub fn parse(data: &[u8]) -> CodecResult<Self> {
        if data.len() < HEADER_CORE_LEN {
            return Err(CodecError::unexpected_eof("MOT header core"));
        }

        let body_size = (u32::from(data[0]) << 20)
            | (u32::from(data[1]) << 12)
            | (u32::from(data[2]) << 4)
            | (u32::from(data[3]) >> 4);
        let header_size = (u16::from(data[3] & 0x0F) << 9)
            | (u16::from(data[4]) << 1)
            | (u16::from(data[5]) >> 7);
        let content_type = (data[5] >> 1) & 0x3F;
        let content_subtype = (u16::from(data[5] & 0x01) << 8) | u16::from(data[6]);

        Ok(Self {
            body_size,
            header_size,
            content_type,
            content_subtype,
        })
    }

    /// Encodes the header core to its 7-byte wire form.
    ///
    /// Fields wider than their wire width are truncated to it.
    #[must_use]
    pub fn encode(&self) -> [u8; HEADER_CORE_LEN] {
        let body_size = self.body_size & 0x0FFF_FFFF;
        let header_size = self.header_size & 0x1FFF;
        let content_type = self.content_type & 0x3F;
        let content_subtype = self.content_subtype & 0x01FF;

        [
            (body_size >> 20) as u8,
            (body_size >> 12) as u8,
            (body_size >> 4) as u8,
            (((body_size & 0x0F) << 4) as u8) | (header_size >> 9) as u8,
            (header_size >> 1) as u8,
            (((header_size & 0x01) << 7) as u8)
                | (content_type << 1)
                | (content_subtype >> 8) as u8,
            content_subtype as u8,
        ]
    }
}
