//! Peer identities and timestamps.

/// A 128-bit peer identifier.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId([u8; 16]);

impl PeerId {
    /// Wraps raw identifier bytes.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Returns the raw identifier bytes.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in self.0.iter().rev() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PeerId({self})")
    }
}

/// A sample timestamp: an NTP64 instant qualified by the peer that stamped
/// it, so timestamps from independent peers never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp {
    ntp64: u64,
    source: PeerId,
}

impl Timestamp {
    /// Builds a timestamp from an NTP64 instant and its stamping peer.
    pub const fn new(ntp64: u64, source: PeerId) -> Self {
        Self { ntp64, source }
    }

    /// Returns the NTP64 instant.
    pub const fn ntp64(&self) -> u64 {
        self.ntp64
    }

    /// Returns the stamping peer.
    pub const fn source(&self) -> PeerId {
        self.source
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.ntp64, self.source)
    }
}
