//! # dabmot core
//!
//! Reassembly engine for MOT (Multimedia Object Transfer, ETSI EN 301
//! 234) object transfer in DAB data channels.
//!
//! This crate provides:
//! - Segment buffers that tolerate out-of-order and duplicated delivery
//! - Per-object reassembly with header decoding and body verification
//! - A directory-driven carousel that tracks the broadcaster's live set
//! - A thread-safe decoder facade with an event feed and statistics
//!
//! ```
//! use dabmot_core::{MotDecoder, TransportId};
//!
//! let decoder = MotDecoder::new();
//! // Header first (body size 3, declared header size 7).
//! decoder.push_object_segment(
//!     TransportId::new(1),
//!     &[0x00, 0x00, 0x00, 0x30, 0x03, 0x84, 0x05],
//!     0,
//!     true,
//!     true,
//! );
//! let done = decoder.push_object_segment(TransportId::new(1), b"abc", 0, true, false);
//! assert!(done);
//! assert_eq!(decoder.body_of(TransportId::new(1)).unwrap().as_ref(), b"abc");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod carousel;
pub mod config;
pub mod decoder;
pub mod directory;
pub mod error;
pub mod events;
pub mod object;
pub mod segment;
pub mod stats;
pub mod types;

pub use carousel::Carousel;
pub use config::DecoderConfig;
pub use decoder::{MotDecoder, ObjectStatus};
pub use directory::{DirectoryUpdate, MotDirectory};
pub use error::{CoreResult, DecoderError};
pub use events::{EventFeed, FeedItem, MotEvent};
pub use object::{MotObject, ObjectMetadata};
pub use segment::{SegmentBuffer, SEGMENT_INDEX_CEILING};
pub use stats::{DecoderStats, StatsSnapshot};
pub use types::TransportId;
