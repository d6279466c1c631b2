//! Test fixtures for header, directory, and segment construction.
//!
//! Provides builders for well-formed MOT payloads so tests can describe
//! scenarios at the field level instead of hand-packing bit fields.

use dabmot_codec::{DirectoryCore, HeaderCore, DIRECTORY_CORE_LEN, HEADER_CORE_LEN};

/// Builds a header payload: the 7-byte core followed by extension
/// parameters.
#[derive(Debug, Clone, Default)]
pub struct HeaderBuilder {
    body_size: u32,
    content_type: u8,
    content_subtype: u16,
    extension: Vec<u8>,
}

impl HeaderBuilder {
    /// Creates a builder with the given declared body size.
    #[must_use]
    pub fn new(body_size: u32) -> Self {
        Self {
            body_size,
            ..Self::default()
        }
    }

    /// Sets the content type and subtype codes.
    #[must_use]
    pub fn content_type(mut self, content_type: u8, content_subtype: u16) -> Self {
        self.content_type = content_type;
        self.content_subtype = content_subtype;
        self
    }

    /// Appends a ContentName parameter with the given charset indicator
    /// and raw name bytes.
    #[must_use]
    pub fn content_name(mut self, charset: u8, name: &[u8]) -> Self {
        let mut field = vec![charset << 4];
        field.extend_from_slice(name);
        self.param(0x0C, &field)
    }

    /// Appends an arbitrary extension parameter, choosing the shortest
    /// length encoding that fits the data field.
    #[must_use]
    pub fn param(mut self, id: u8, field: &[u8]) -> Self {
        let id = id & 0x3F;
        match field.len() {
            0 => self.extension.push(id),
            1 => {
                self.extension.push(0x40 | id);
                self.extension.extend_from_slice(field);
            }
            4 => {
                self.extension.push(0x80 | id);
                self.extension.extend_from_slice(field);
            }
            n if n <= 127 => {
                self.extension.push(0xC0 | id);
                self.extension.push(n as u8);
                self.extension.extend_from_slice(field);
            }
            n => {
                self.extension.push(0xC0 | id);
                self.extension.push(0x80 | ((n >> 8) as u8));
                self.extension.push(n as u8);
                self.extension.extend_from_slice(field);
            }
        }
        self
    }

    /// Appends raw extension bytes without any framing. Useful for
    /// malformed-input tests.
    #[must_use]
    pub fn raw_extension(mut self, bytes: &[u8]) -> Self {
        self.extension.extend_from_slice(bytes);
        self
    }

    /// Assembles the header payload.
    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let core = HeaderCore {
            body_size: self.body_size,
            header_size: (HEADER_CORE_LEN + self.extension.len()) as u16,
            content_type: self.content_type,
            content_subtype: self.content_subtype,
        };
        let mut out = core.encode().to_vec();
        out.extend_from_slice(&self.extension);
        out
    }
}

/// Builds a directory payload: the 13-byte core, an optional extension
/// block, and a list of (transport id, header payload) entries.
#[derive(Debug, Clone, Default)]
pub struct DirectoryBuilder {
    declared_count: Option<u16>,
    carousel_period: u32,
    segment_size: u16,
    extension: Vec<u8>,
    entries: Vec<(u16, Vec<u8>)>,
}

impl DirectoryBuilder {
    /// Creates an empty directory builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry for `transport_id` carrying the given header payload.
    #[must_use]
    pub fn entry(mut self, transport_id: u16, header: Vec<u8>) -> Self {
        self.entries.push((transport_id, header));
        self
    }

    /// Overrides the declared object count. By default the count matches
    /// the number of entries added.
    #[must_use]
    pub fn declared_count(mut self, count: u16) -> Self {
        self.declared_count = Some(count);
        self
    }

    /// Sets the carousel period field (tenths of seconds).
    #[must_use]
    pub fn carousel_period(mut self, period: u32) -> Self {
        self.carousel_period = period;
        self
    }

    /// Sets the advertised segment size field.
    #[must_use]
    pub fn segment_size(mut self, size: u16) -> Self {
        self.segment_size = size;
        self
    }

    /// Appends raw bytes to the directory extension block.
    #[must_use]
    pub fn extension(mut self, bytes: &[u8]) -> Self {
        self.extension.extend_from_slice(bytes);
        self
    }

    /// Assembles the directory payload.
    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let entries_len: usize = self.entries.iter().map(|(_, h)| 2 + h.len()).sum();
        let core = DirectoryCore {
            directory_size: (DIRECTORY_CORE_LEN + self.extension.len() + entries_len) as u32,
            object_count: self
                .declared_count
                .unwrap_or(self.entries.len() as u16),
            carousel_period: self.carousel_period,
            segment_size: self.segment_size,
            extension_length: self.extension.len() as u16,
        };
        let mut out = core.encode().to_vec();
        out.extend_from_slice(&self.extension);
        for (id, header) in &self.entries {
            out.extend_from_slice(&id.to_be_bytes());
            out.extend_from_slice(header);
        }
        out
    }
}

/// Splits `data` into equal-sized segments (the last one may be shorter),
/// returned as `(bytes, index, is_last)` triples ready to push.
#[must_use]
pub fn segmentize(data: &[u8], segment_size: usize) -> Vec<(Vec<u8>, u16, bool)> {
    assert!(segment_size > 0, "segment size must be positive");
    if data.is_empty() {
        return Vec::new();
    }
    let chunks: Vec<&[u8]> = data.chunks(segment_size).collect();
    let last = chunks.len() - 1;
    chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| (chunk.to_vec(), i as u16, i == last))
        .collect()
}
