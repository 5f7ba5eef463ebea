//! The radio transport abstraction consumed by the send wrapper.

use core::fmt;

/// Result of one blocking transport send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The peer accepted the packet.
    Success,
    /// A general, presumably transient, transport error.
    Error,
    /// The send did not complete within the transport's own timeout.
    Timeout,
    /// The packet exceeds the protocol's length limit. Permanent: retrying
    /// the same bytes will not help.
    InvalidPacketLength,
    /// The packet pointer/location was rejected by the transport. Permanent
    /// for the same reason as `InvalidPacketLength`.
    InvalidPacketLocation,
    /// An unrecognized status, treated as transient.
    Unknown,
}

impl Status {
    /// Permanent statuses short-circuit the send wrapper's retry loop;
    /// anything else is treated as transient and retried.
    #[inline]
    #[must_use]
    pub const fn is_permanent_failure(self) -> bool {
        matches!(self, Self::InvalidPacketLength | Self::InvalidPacketLocation)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Error => "transport error",
            Self::Timeout => "timeout",
            Self::InvalidPacketLength => "invalid packet length",
            Self::InvalidPacketLocation => "invalid packet location",
            Self::Unknown => "unknown status",
        };
        f.write_str(s)
    }
}

/// A one-shot, blocking radio transport to the peer MCU.
///
/// Protocol constraints (packet length ≤ 200 bytes, ≥10ms between sends) are
/// enforced by the packetizer, not by implementations of this trait.
pub trait Transport {
    /// Sends `packet` and blocks until the peer has accepted it or the
    /// transport gives up on its own terms.
    fn send(&mut self, packet: &[u8]) -> Status;
}
