//! Decoder configuration.

/// Configuration for a [`MotDecoder`](crate::MotDecoder).
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// How many events the feed keeps for poll-style catch-up.
    pub event_history: usize,

    /// Whether `ObjectComplete` events carry the reassembled body.
    /// When false, consumers fetch bodies from the carousel on demand.
    pub bodies_in_events: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            event_history: 256,
            bodies_in_events: true,
        }
    }
}

impl DecoderConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the event history limit.
    #[must_use]
    pub const fn event_history(mut self, limit: usize) -> Self {
        self.event_history = limit;
        self
    }

    /// Sets whether completion events carry bodies.
    #[must_use]
    pub const fn bodies_in_events(mut self, value: bool) -> Self {
        self.bodies_in_events = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = DecoderConfig::default();
        assert_eq!(config.event_history, 256);
        assert!(config.bodies_in_events);
    }

    #[test]
    fn builder_pattern() {
        let config = DecoderConfig::new().event_history(8).bodies_in_events(false);
        assert_eq!(config.event_history, 8);
        assert!(!config.bodies_in_events);
    }
}
