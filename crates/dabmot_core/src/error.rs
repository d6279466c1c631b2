//! Error types for the MOT decoder core.

use thiserror::Error;

/// Result type for decoder operations.
pub type CoreResult<T> = Result<T, DecoderError>;

/// Errors that can occur in MOT decoder operations.
///
/// The reassembly layer is tolerant by design: most malformed input is
/// absorbed as a structured outcome (an object that never completes, a
/// directory cycle that reports failure). These errors cover the cases an
/// embedding application may still want to observe explicitly.
#[derive(Debug, Error)]
pub enum DecoderError {
    /// A binary structure could not be parsed at all.
    #[error("codec error: {0}")]
    Codec(#[from] dabmot_codec::CodecError),

    /// An object was requested that the carousel does not hold.
    #[error("unknown transport id {transport_id}")]
    UnknownObject {
        /// The transport id that was looked up.
        transport_id: u32,
    },

    /// An object exists but has not completed reassembly.
    #[error("object {transport_id} is not complete")]
    ObjectIncomplete {
        /// The transport id of the incomplete object.
        transport_id: u32,
    },
}
