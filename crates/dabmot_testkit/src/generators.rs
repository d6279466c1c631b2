//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random payloads and delivery
//! schedules that maintain transport-level invariants.

use dabmot_core::TransportId;
use proptest::prelude::*;

use crate::fixtures::segmentize;

/// Strategy for generating transport ids in the 16-bit directory range.
pub fn transport_id_strategy() -> impl Strategy<Value = TransportId> {
    any::<u16>().prop_map(TransportId::from)
}

/// Strategy for generating non-empty object bodies.
pub fn body_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..512)
}

/// Strategy for generating plausible file names for ContentName fields.
pub fn content_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9_]{1,16}\\.(png|jpg|txt)").expect("Invalid regex")
}

/// A body together with a segmented delivery order.
#[derive(Debug, Clone)]
pub struct SegmentedBody {
    /// The original payload.
    pub data: Vec<u8>,
    /// `(bytes, index, is_last)` triples in delivery order, possibly
    /// shuffled and with duplicates.
    pub deliveries: Vec<(Vec<u8>, u16, bool)>,
}

/// Strategy that segments a random body and permutes its delivery order.
pub fn segmented_body_strategy() -> impl Strategy<Value = SegmentedBody> {
    (body_strategy(), 1usize..64).prop_flat_map(|(data, segment_size)| {
        let segments = segmentize(&data, segment_size);
        let indices = Just((0..segments.len()).collect::<Vec<_>>()).prop_shuffle();
        (Just(data), Just(segments), indices).prop_map(|(data, segments, order)| SegmentedBody {
            deliveries: order.into_iter().map(|i| segments[i].clone()).collect(),
            data,
        })
    })
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
