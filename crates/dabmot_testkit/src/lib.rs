//! # dabmot Testkit
//!
//! Test utilities for dabmot.
//!
//! This crate provides:
//! - Builders for header and directory payloads
//! - A segmenter for realistic delivery schedules
//! - Property-based test generators using proptest
//! - Tracing setup for test output
//!
//! ## Usage
//!
//! ```rust
//! use dabmot_core::{MotDecoder, TransportId};
//! use dabmot_testkit::prelude::*;
//!
//! let decoder = MotDecoder::new();
//! let header = HeaderBuilder::new(5).content_name(0xF, b"a.txt").build();
//! decoder.push_object_segment(TransportId::new(1), &header, 0, true, true);
//! for (bytes, index, is_last) in segmentize(b"hello", 2) {
//!     decoder.push_object_segment(TransportId::new(1), &bytes, index, is_last, false);
//! }
//! assert_eq!(decoder.body_of(TransportId::new(1)).unwrap().as_ref(), b"hello");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod logging;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::logging::*;
}

pub use fixtures::*;
pub use generators::*;
pub use logging::*;
