use std::io::{Read, Write};

use tracklink_wire::{read_bool, read_string, read_u32, write_bool, write_string, write_u32};

use crate::error::Result;
use crate::packet::{Packet, PacketHandler, PacketKind};

/// The playback snapshot packet.
///
/// Written client→server it is an empty request signal; read server→client
/// it carries the full player state. The track id is an empty string when
/// the companion cannot resolve one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatePacket {
    pub track_id: String,
    pub progress: u32,
    pub track_length: u32,
    pub playing: bool,
    pub track_name: String,
    pub track_artist: String,
}

impl StatePacket {
    /// An empty state request.
    pub fn request() -> Self {
        Self::default()
    }

    /// The track id, `None` when the companion sent an empty string.
    pub fn track_id(&self) -> Option<&str> {
        if self.track_id.is_empty() {
            None
        } else {
            Some(&self.track_id)
        }
    }

    /// Encode the response payload. Only the companion side of the wire
    /// does this in production; the client uses it in tests.
    pub fn encode(&self, w: &mut dyn Write) -> Result<()> {
        write_string(w, &self.track_id)?;
        write_u32(w, self.progress)?;
        write_u32(w, self.track_length)?;
        write_bool(w, self.playing)?;
        write_string(w, &self.track_name)?;
        write_string(w, &self.track_artist)?;
        Ok(())
    }
}

impl Packet for StatePacket {
    fn kind(&self) -> PacketKind {
        PacketKind::State
    }

    fn write(&self, _w: &mut dyn Write) -> Result<()> {
        // Request signal: no payload.
        Ok(())
    }

    fn read(&mut self, r: &mut dyn Read) -> Result<()> {
        self.track_id = read_string(r)?;
        self.progress = read_u32(r)?;
        self.track_length = read_u32(r)?;
        self.playing = read_bool(r)?;
        self.track_name = read_string(r)?;
        self.track_artist = read_string(r)?;
        Ok(())
    }

    fn dispatch(&self, handler: &mut dyn PacketHandler) {
        handler.on_state(self);
    }
}
