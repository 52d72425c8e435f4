use std::io::{Read, Write};

use crate::error::Result;
use crate::packet::{Packet, PacketHandler, PacketKind};

macro_rules! command_packet {
    ($(#[$doc:meta])* $name:ident, $kind:expr) => {
        $(#[$doc])*
        ///
        /// Command packets carry no payload in either direction and expect
        /// no response frame.
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl Packet for $name {
            fn kind(&self) -> PacketKind {
                $kind
            }

            fn is_command(&self) -> bool {
                true
            }

            fn write(&self, _w: &mut dyn Write) -> Result<()> {
                Ok(())
            }

            fn read(&mut self, _r: &mut dyn Read) -> Result<()> {
                Ok(())
            }

            fn dispatch(&self, _handler: &mut dyn PacketHandler) {
                // Never received.
            }
        }
    };
}

command_packet!(
    /// Toggle play/pause on the host media player.
    PlayPausePacket,
    PacketKind::PlayPause
);
command_packet!(
    /// Skip to the next track.
    NextPacket,
    PacketKind::Next
);
command_packet!(
    /// Skip to the previous track.
    PreviousPacket,
    PacketKind::Previous
);
