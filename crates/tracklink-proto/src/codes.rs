use std::fmt;
use std::io::{Read, Write};

use crate::error::Result;
use crate::packet::{Packet, PacketHandler, PacketKind};

/// Structured errors the companion process reports when it cannot observe
/// the host media player.
///
/// Each code is carried purely by its server→client packet id; the packet
/// body is empty. The codes are non-fatal to the connector: they clear the
/// current track but leave the connection open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The media player is not running.
    PlayerNotOpen,
    /// The player process exists but is not usable.
    ProcessInvalid,
    /// An internal module of the companion is missing.
    MissingModule,
    /// The companion cannot open the player process.
    CannotOpenProcess,
    /// The companion binary no longer matches the player build.
    OutdatedBinary,
    /// The companion could not resolve the current track id.
    TrackIdNotFound,
}

impl ErrorCode {
    /// All codes, in wire order.
    pub const ALL: [ErrorCode; 6] = [
        ErrorCode::PlayerNotOpen,
        ErrorCode::ProcessInvalid,
        ErrorCode::MissingModule,
        ErrorCode::CannotOpenProcess,
        ErrorCode::OutdatedBinary,
        ErrorCode::TrackIdNotFound,
    ];

    /// The wire code (doubles as the server→client packet id).
    pub fn code(self) -> u8 {
        match self {
            ErrorCode::PlayerNotOpen => 1,
            ErrorCode::ProcessInvalid => 2,
            ErrorCode::MissingModule => 3,
            ErrorCode::CannotOpenProcess => 4,
            ErrorCode::OutdatedBinary => 5,
            ErrorCode::TrackIdNotFound => 6,
        }
    }

    /// Resolve a wire code back into an error code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// The fixed human-readable message for this code.
    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::PlayerNotOpen => "Media player is not open",
            ErrorCode::ProcessInvalid => "Invalid media player process",
            ErrorCode::MissingModule => "An internal module is missing",
            ErrorCode::CannotOpenProcess => "Can't open media player process",
            ErrorCode::OutdatedBinary => "Companion binary is outdated",
            ErrorCode::TrackIdNotFound => "Could not find track id",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Error packet sent by the companion process.
///
/// Zero-length payload; the semantic value is entirely the id it was
/// registered under, baked into the instance by the registry factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPacket {
    code: ErrorCode,
}

impl ErrorPacket {
    pub fn new(code: ErrorCode) -> Self {
        Self { code }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }
}

impl Packet for ErrorPacket {
    fn kind(&self) -> PacketKind {
        PacketKind::Error
    }

    fn write(&self, _w: &mut dyn Write) -> Result<()> {
        Ok(())
    }

    fn read(&mut self, _r: &mut dyn Read) -> Result<()> {
        Ok(())
    }

    fn dispatch(&self, handler: &mut dyn PacketHandler) {
        handler.on_error(self.code);
    }
}
