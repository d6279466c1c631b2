//! Segment reassembly buffer.
//!
//! MOT entities (headers, bodies, directories) are broadcast as segments
//! of equal size; only the last segment may be shorter [ETSI EN 301 234,
//! 5.1]. Segments arrive in arbitrary order over a lossy channel with no
//! retransmission, so the buffer keeps an index-addressable sequence with
//! empty placeholders for gaps and learns the segment count only when a
//! segment flagged "last" arrives.

use bytes::{Bytes, BytesMut};

/// Hard ceiling on segment indices; the wire format cannot represent more.
pub const SEGMENT_INDEX_CEILING: u16 = 8192;

/// An ordered, possibly sparse accumulation of segments for one entity.
#[derive(Debug, Clone, Default)]
pub struct SegmentBuffer {
    /// Received segments in index order; unreceived gaps are empty.
    segments: Vec<Bytes>,
    /// Declared segment count, known once a "last" segment arrives.
    num_segments: Option<usize>,
}

impl SegmentBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one segment at `index`.
    ///
    /// Out-of-range indices and empty payloads are silently ignored (the
    /// protocol-level defensive bound). A segment flagged `is_last` fixes
    /// the segment count at `index + 1`. Re-delivery of an equal-length
    /// segment is a no-op so retransmission cannot corrupt received data;
    /// a differently-sized slot (an unreceived placeholder, or stale data)
    /// is overwritten.
    pub fn add_segment(&mut self, data: &[u8], index: u16, is_last: bool) {
        if index >= SEGMENT_INDEX_CEILING || data.is_empty() {
            return;
        }

        if is_last {
            self.num_segments = Some(usize::from(index) + 1);
        }

        let index = usize::from(index);
        if index > self.segments.len() {
            self.segments.resize(index, Bytes::new());
        }

        if index < self.segments.len() {
            if self.segments[index].len() != data.len() {
                self.segments[index] = Bytes::copy_from_slice(data);
            }
        } else {
            self.segments.push(Bytes::copy_from_slice(data));
        }
    }

    /// Reports whether every declared segment has been received.
    ///
    /// False until a "last" segment establishes the count. Completeness
    /// then requires every segment below the last to be at least as long
    /// as the final one (equal size except the possibly-shorter last).
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let Some(count) = self.num_segments else {
            return false;
        };
        let Some(last) = self.segments.last() else {
            return false;
        };
        let last_len = last.len();

        if count != self.segments.len() {
            tracing::warn!(
                declared = count,
                received = self.segments.len(),
                "segment count does not match received slots"
            );
        }

        for n in 0..count.saturating_sub(1) {
            match self.segments.get(n) {
                Some(segment) if segment.len() >= last_len => {}
                _ => return false,
            }
        }
        true
    }

    /// Sum of received segment lengths across the declared count.
    ///
    /// Only meaningful once a "last" segment has established the count;
    /// returns 0 before that.
    #[must_use]
    pub fn total_size(&self) -> usize {
        let count = self.num_segments.unwrap_or(0);
        self.segments.iter().take(count).map(Bytes::len).sum()
    }

    /// Concatenates all received segments in index order.
    ///
    /// Returns whatever is present even when incomplete; callers must
    /// check [`is_complete`](Self::is_complete) first.
    #[must_use]
    pub fn assemble(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(self.segments.iter().map(Bytes::len).sum());
        for segment in &self.segments {
            out.extend_from_slice(segment);
        }
        out.freeze()
    }

    /// Clears all segments and invalidates the count.
    pub fn reset(&mut self) {
        self.segments.clear();
        self.num_segments = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_buffer_incomplete() {
        let buffer = SegmentBuffer::new();
        assert!(!buffer.is_complete());
        assert_eq!(buffer.total_size(), 0);
        assert!(buffer.assemble().is_empty());
    }

    #[test]
    fn in_order_delivery() {
        let mut buffer = SegmentBuffer::new();
        buffer.add_segment(&[1, 2, 3], 0, false);
        assert!(!buffer.is_complete());
        buffer.add_segment(&[4, 5], 1, true);
        assert!(buffer.is_complete());
        assert_eq!(buffer.total_size(), 5);
        assert_eq!(buffer.assemble().as_ref(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn out_of_order_delivery() {
        let mut buffer = SegmentBuffer::new();
        buffer.add_segment(&[6], 2, true);
        assert!(!buffer.is_complete());
        buffer.add_segment(&[3, 4, 5], 1, false);
        assert!(!buffer.is_complete());
        buffer.add_segment(&[0, 1, 2], 0, false);
        assert!(buffer.is_complete());
        assert_eq!(buffer.assemble().as_ref(), &[0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn last_segment_alone_is_complete_entity() {
        let mut buffer = SegmentBuffer::new();
        buffer.add_segment(&[9, 9], 0, true);
        assert!(buffer.is_complete());
        assert_eq!(buffer.total_size(), 2);
    }

    #[test]
    fn gap_means_incomplete() {
        let mut buffer = SegmentBuffer::new();
        buffer.add_segment(&[0, 1], 0, false);
        buffer.add_segment(&[4], 2, true);
        assert!(!buffer.is_complete());
    }

    #[test]
    fn index_ceiling_ignored() {
        let mut buffer = SegmentBuffer::new();
        buffer.add_segment(&[1], SEGMENT_INDEX_CEILING, true);
        assert!(!buffer.is_complete());
        assert!(buffer.assemble().is_empty());
    }

    #[test]
    fn zero_length_segment_ignored() {
        let mut buffer = SegmentBuffer::new();
        buffer.add_segment(&[], 0, true);
        assert!(!buffer.is_complete());
    }

    #[test]
    fn duplicate_equal_length_is_idempotent() {
        let mut buffer = SegmentBuffer::new();
        buffer.add_segment(&[1, 2], 0, false);
        buffer.add_segment(&[3], 1, true);
        let before = buffer.assemble();
        // Same length, different content: must not overwrite.
        buffer.add_segment(&[9, 9], 0, false);
        assert_eq!(buffer.assemble(), before);
        assert!(buffer.is_complete());
    }

    #[test]
    fn different_length_overwrites_stale_slot() {
        let mut buffer = SegmentBuffer::new();
        buffer.add_segment(&[1, 2], 0, false);
        buffer.add_segment(&[1, 2, 3], 0, false);
        assert_eq!(buffer.assemble().as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn reset_clears_everything() {
        let mut buffer = SegmentBuffer::new();
        buffer.add_segment(&[1, 2], 0, true);
        assert!(buffer.is_complete());
        buffer.reset();
        assert!(!buffer.is_complete());
        assert_eq!(buffer.total_size(), 0);
        assert!(buffer.assemble().is_empty());
    }

    #[test]
    fn short_middle_segment_not_complete() {
        // Segment 1 is shorter than the last segment, so it must be a
        // stale placeholder, not real data.
        let mut buffer = SegmentBuffer::new();
        buffer.add_segment(&[1, 2, 3], 0, false);
        buffer.add_segment(&[4], 1, false);
        buffer.add_segment(&[5, 6], 2, true);
        assert!(!buffer.is_complete());
    }

    proptest! {
        #[test]
        fn order_independent_reassembly(
            payload in prop::collection::vec(any::<u8>(), 1..512),
            seg_size in 1usize..64,
            seed in any::<u64>(),
        ) {
            let chunks: Vec<&[u8]> = payload.chunks(seg_size).collect();
            let mut order: Vec<usize> = (0..chunks.len()).collect();
            // Cheap deterministic shuffle.
            let mut state = seed | 1;
            for i in (1..order.len()).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                order.swap(i, (state % (i as u64 + 1)) as usize);
            }

            let mut buffer = SegmentBuffer::new();
            for &i in &order {
                buffer.add_segment(chunks[i], i as u16, i == chunks.len() - 1);
            }

            prop_assert!(buffer.is_complete());
            prop_assert_eq!(buffer.total_size(), payload.len());
            let assembled = buffer.assemble();
            prop_assert_eq!(assembled.as_ref(), payload.as_slice());
        }
    }
}
