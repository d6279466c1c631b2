//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while parsing MOT binary structures.
///
/// These cover structurally unparseable input only. Recoverable protocol
/// conditions (a truncated extension parameter, an unsupported content
/// flag) are reported through structured scan outcomes instead, because
/// the decoder keeps running on them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Input ended before a fixed-layout field could be read.
    #[error("unexpected end of input while reading {context}")]
    UnexpectedEof {
        /// What was being read when the input ran out.
        context: String,
    },

    /// A declared size field points past the bytes actually present.
    #[error("declared size {declared} exceeds available payload of {available} bytes")]
    DeclaredSizeExceedsPayload {
        /// The size the structure declared for itself.
        declared: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// A directory entry does not fit in the remaining directory payload.
    #[error("truncated directory entry at offset {offset}")]
    TruncatedEntry {
        /// Byte offset of the entry within the directory payload.
        offset: usize,
    },
}

impl CodecError {
    /// Creates an unexpected-EOF error.
    pub fn unexpected_eof(context: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            context: context.into(),
        }
    }
}
