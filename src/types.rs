//! Basic type definitions for the broadcast hub
//!
//! Provides the `PeerId` newtype: a UUID-based identity unique per live
//! connection. An id is never reused while its connection is registered.

use uuid::Uuid;

/// Unique peer identifier (newtype pattern)
///
/// Wraps a UUID v4 for type-safe peer identification.
/// Implements Hash and Eq for use as HashMap keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId(pub Uuid);

impl PeerId {
    /// Create a new random peer ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PeerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer_id_unique() {
        let id1 = PeerId::new();
        let id2 = PeerId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_peer_id_display_roundtrip() {
        let id = PeerId::new();
        assert_eq!(id.to_string(), id.0.to_string());
    }
}
