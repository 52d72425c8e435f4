use crate::packet::PacketKind;
use crate::registry::Direction;

/// Errors that can occur while encoding, decoding or routing packets.
#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    /// A packet kind was never registered for the given direction.
    ///
    /// This is a wiring bug in the registry setup, not a runtime protocol
    /// fault.
    #[error("packet kind {kind:?} not registered for direction {direction:?}")]
    UnknownPacketType {
        direction: Direction,
        kind: PacketKind,
    },

    /// A primitive value could not be read or written.
    #[error(transparent)]
    Wire(#[from] tracklink_wire::WireError),
}

pub type Result<T> = std::result::Result<T, ProtoError>;
