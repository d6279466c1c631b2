//! Core type definitions for the MOT decoder.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier scoping one object's segments within a carousel.
///
/// Transport ids are broadcaster-assigned and only unique within one
/// carousel; the wire carries them as 16-bit values but delivery layers
/// commonly widen them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransportId(pub u32);

impl TransportId {
    /// Creates a new transport id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl From<u16> for TransportId {
    fn from(id: u16) -> Self {
        Self(u32::from(id))
    }
}

impl fmt::Display for TransportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tid:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_id_display() {
        let id = TransportId::new(42);
        assert_eq!(format!("{id}"), "tid:42");
    }

    #[test]
    fn from_wire_width() {
        assert_eq!(TransportId::from(0xFFFFu16).as_u32(), 0xFFFF);
    }
}
