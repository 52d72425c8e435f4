use std::io::{Read, Write};

use crate::codes::ErrorCode;
use crate::error::Result;
use crate::state::StatePacket;

/// The distinct packet shapes of the protocol.
///
/// Several wire ids may map to the same kind (the six error ids all
/// construct an [`crate::ErrorPacket`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketKind {
    /// Playback snapshot request/response.
    State,
    /// Toggle play/pause.
    PlayPause,
    /// Skip to the next track.
    Next,
    /// Skip to the previous track.
    Previous,
    /// Structured error from the companion process.
    Error,
}

/// One protocol message.
///
/// A packet writes its payload when sent and reads it when received; the
/// id byte is the registry's business, not the packet's.
pub trait Packet: Send {
    /// The kind this packet instance belongs to.
    fn kind(&self) -> PacketKind;

    /// Command packets are fire-and-forget: the poll loop must not attempt
    /// to read a response frame after sending one.
    fn is_command(&self) -> bool {
        false
    }

    /// Encode the payload. State requests and commands have no payload.
    fn write(&self, w: &mut dyn Write) -> Result<()>;

    /// Decode the payload from the stream.
    fn read(&mut self, r: &mut dyn Read) -> Result<()>;

    /// Hand the decoded packet to the handler. Packets that are never
    /// received (commands) do nothing here.
    fn dispatch(&self, handler: &mut dyn PacketHandler);
}

/// Callback surface for received packets.
pub trait PacketHandler {
    /// A full playback snapshot arrived.
    fn on_state(&mut self, state: &StatePacket);

    /// The companion process reported a structured error.
    fn on_error(&mut self, code: ErrorCode);
}
