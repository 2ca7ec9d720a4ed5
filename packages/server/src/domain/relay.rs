//! Recipient-set computation for room broadcasts.
//!
//! Pure functions without side effects, so that relay behaviour can be
//! tested without a transport.

use super::value_object::ConnectionId;

/// WebRTC signaling message kinds forwarded by the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Offer => "offer",
            SignalKind::Answer => "answer",
            SignalKind::IceCandidate => "ice-candidate",
        }
    }
}

/// Get broadcast targets (all room members except the sender).
///
/// # Arguments
///
/// * `members` - Connections currently joined to the room
/// * `sender` - The connection that originated the message
///
/// # Returns
///
/// The members in their original order, without `sender`
pub fn broadcast_targets(members: &[ConnectionId], sender: &ConnectionId) -> Vec<ConnectionId> {
    members
        .iter()
        .filter(|member| *member != sender)
        .cloned()
        .collect()
}
