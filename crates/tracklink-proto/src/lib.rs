//! Packet types and packet registry for the tracklink companion protocol.
//!
//! One protocol message is a packet: a single id byte (client→server) or a
//! `u32` id (server→client, a quirk of the companion's integer reader)
//! followed by the packet's own payload. There is no overall length prefix;
//! each packet type knows its own shape.

pub mod codes;
pub mod command;
pub mod error;
pub mod packet;
pub mod registry;
pub mod state;

pub use codes::{ErrorCode, ErrorPacket};
pub use command::{NextPacket, PlayPausePacket, PreviousPacket};
pub use error::{ProtoError, Result};
pub use packet::{Packet, PacketHandler, PacketKind};
pub use registry::{Direction, PacketRegistry};
pub use state::StatePacket;
