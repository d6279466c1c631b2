//! MOT header extension parameter scanning.
//!
//! The header extension (and the directory extension, which shares the
//! grammar) is a run of TLV parameters: a 2-bit parameter length indicator
//! (PLI) and a 6-bit parameter id, followed by a data field whose length
//! depends on the PLI. PLI 3 carries an explicit data length indicator of
//! 7 bits, or 15 bits when the high bit of the first length byte is set.
//!
//! Scanning is deliberately best-effort: a boundary violation marks the
//! scan as truncated but the walk keeps consuming whatever is still safely
//! boundable, matching receiver behavior on noisy broadcast input. The
//! caller must treat `truncated` as the overall failure signal.

use std::collections::BTreeMap;

use crate::charset::decode_text;

/// Extension parameter ids acted on by the decoder itself.
///
/// All other ids are application-specific from the decoder's point of view
/// and are stored verbatim for external consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtParameter {
    /// ContentName, the one parameter mandatory for usable objects.
    ContentName,
    /// CompressionType: body is compressed, which this decoder rejects.
    CompressionType,
    /// CAInfo: body is conditional-access scrambled, which this decoder rejects.
    CaInfo,
}

impl ExtParameter {
    /// Maps a 6-bit parameter id to a recognized parameter, if any.
    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0x0C => Some(Self::ContentName),
            0x11 => Some(Self::CompressionType),
            0x23 => Some(Self::CaInfo),
            _ => None,
        }
    }
}

/// Outcome of scanning one extension parameter run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionScan {
    /// Decoded ContentName, if the parameter was present and non-empty.
    pub content_name: Option<String>,
    /// Unrecognized parameters, id to raw data field. Duplicate ids keep
    /// the last occurrence.
    pub user_params: BTreeMap<u8, Vec<u8>>,
    /// A CompressionType or CAInfo parameter was seen; the surrounding
    /// object cannot be processed and must never report complete.
    pub unsupported: bool,
    /// A length indicator or data field crossed the buffer boundary.
    pub truncated: bool,
}

/// Scans a complete extension byte run.
///
/// `data` must be exactly the extension region (header bytes past the core,
/// or the directory extension block). Never fails outright; inspect
/// [`ExtensionScan::truncated`] for boundary violations.
#[must_use]
pub fn scan_extension(data: &[u8]) -> ExtensionScan {
    let mut scan = ExtensionScan::default();
    let len = data.len();
    let mut pos = 0;

    while pos < len {
        let pli = (data[pos] >> 6) & 0x03;
        let param_id = data[pos] & 0x3F;
        pos += 1;

        let mut field_len: usize = 0;
        match pli {
            0 => {}
            1 => field_len = 1,
            2 => field_len = 4,
            _ => {
                // Extended data length indicator.
                if pos < len {
                    let first = data[pos];
                    pos += 1;
                    let indicator = usize::from(first & 0x7F);
                    if first & 0x80 == 0 {
                        field_len = indicator;
                    } else if pos < len {
                        field_len = (indicator << 8) | usize::from(data[pos]);
                        pos += 1;
                    } else {
                        scan.truncated = true;
                    }
                } else {
                    scan.truncated = true;
                }
            }
        }

        if pos + field_len <= len {
            let field = &data[pos..pos + field_len];
            match ExtParameter::from_id(param_id) {
                Some(ExtParameter::ContentName) => {
                    // First data byte carries the character set indicator
                    // in its upper nibble.
                    if let Some((&charset, text)) = field.split_first() {
                        scan.content_name = Some(decode_text(charset >> 4, text));
                    }
                }
                Some(ExtParameter::CaInfo) => {
                    tracing::warn!("MOT object is CA scrambled, ignoring");
                    scan.unsupported = true;
                }
                Some(ExtParameter::CompressionType) => {
                    tracing::warn!("MOT object is compressed, ignoring");
                    scan.unsupported = true;
                }
                None => {
                    scan.user_params.insert(param_id, field.to_vec());
                }
            }
        } else {
            scan.truncated = true;
        }

        pos += field_len;
    }

    scan
}
