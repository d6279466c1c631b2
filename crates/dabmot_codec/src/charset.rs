//! DAB character set decoding for textual parameters.
//!
//! ContentName and other textual MOT parameters carry a 4-bit character
//! set indicator (ETSI TS 101 756, table 1) ahead of the text bytes.
//! Decoding is lossy: undecodable units become U+FFFD rather than failing
//! the surrounding header parse.

/// Character sets the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharsetId {
    /// EBU Latin based repertoire (indicator 0x0).
    EbuLatin,
    /// UCS-2, big endian (indicator 0x6).
    Ucs2,
    /// UTF-8 (indicator 0xF).
    Utf8,
}

impl CharsetId {
    /// Maps a 4-bit charset indicator to a known character set.
    ///
    /// Unknown indicators fall back to the EBU Latin repertoire, the
    /// default for DAB text.
    #[must_use]
    pub fn from_indicator(indicator: u8) -> Self {
        match indicator & 0x0F {
            0x6 => Self::Ucs2,
            0xF => Self::Utf8,
            _ => Self::EbuLatin,
        }
    }
}

/// Decodes text bytes according to the given charset indicator.
#[must_use]
pub fn decode_text(indicator: u8, bytes: &[u8]) -> String {
    match CharsetId::from_indicator(indicator) {
        CharsetId::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        CharsetId::Ucs2 => decode_ucs2(bytes),
        CharsetId::EbuLatin => decode_ebu_latin(bytes),
    }
}

fn decode_ucs2(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() / 2);
    for pair in bytes.chunks_exact(2) {
        let unit = u16::from_be_bytes([pair[0], pair[1]]);
        out.push(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER));
    }
    out
}

/// EBU Latin shares the printable ASCII range; the national-variant
/// positions outside it are replaced rather than mistranslated.
fn decode_ebu_latin(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x20..=0x7E => char::from(b),
            _ => char::REPLACEMENT_CHARACTER,
        })
        .collect()
}
