use std::collections::HashMap;

use tracing::trace;

use crate::codes::{ErrorCode, ErrorPacket};
use crate::command::{NextPacket, PlayPausePacket, PreviousPacket};
use crate::error::{ProtoError, Result};
use crate::packet::{Packet, PacketKind};
use crate::state::StatePacket;

/// Packet ids are only unique within a direction, so each direction gets
/// its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ClientToServer,
    ServerToClient,
}

type Factory = Box<dyn Fn() -> Box<dyn Packet> + Send + Sync>;

#[derive(Default)]
struct DirectionTable {
    factories: HashMap<u8, Factory>,
    // Reverse lookup kept in sync at registration time; first registration
    // of a kind wins, so the six error ids resolve deterministically.
    ids: HashMap<PacketKind, u8>,
}

/// Maps single-byte packet ids to packet constructors, per direction.
pub struct PacketRegistry {
    client_to_server: DirectionTable,
    server_to_client: DirectionTable,
}

impl PacketRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            client_to_server: DirectionTable::default(),
            server_to_client: DirectionTable::default(),
        }
    }

    /// The standard protocol wiring.
    ///
    /// Client→server: `0` state request, `1` play/pause, `2` next,
    /// `3` previous. Server→client: `0` state response, `1..=6` error,
    /// one id per [`ErrorCode`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(Direction::ClientToServer, 0, PacketKind::State, || {
            Box::new(StatePacket::request())
        });
        registry.register(Direction::ClientToServer, 1, PacketKind::PlayPause, || {
            Box::new(PlayPausePacket)
        });
        registry.register(Direction::ClientToServer, 2, PacketKind::Next, || {
            Box::new(NextPacket)
        });
        registry.register(Direction::ClientToServer, 3, PacketKind::Previous, || {
            Box::new(PreviousPacket)
        });

        registry.register(Direction::ServerToClient, 0, PacketKind::State, || {
            Box::new(StatePacket::default())
        });
        for code in ErrorCode::ALL {
            registry.register(
                Direction::ServerToClient,
                code.code(),
                PacketKind::Error,
                move || Box::new(ErrorPacket::new(code)),
            );
        }

        registry
    }

    /// Associate an id with a packet constructor for one direction.
    ///
    /// Multiple ids may map to the same kind; the reverse (kind→id)
    /// mapping keeps the first id registered.
    pub fn register<F>(&mut self, direction: Direction, id: u8, kind: PacketKind, factory: F)
    where
        F: Fn() -> Box<dyn Packet> + Send + Sync + 'static,
    {
        let table = self.table_mut(direction);
        table.factories.insert(id, Box::new(factory));
        table.ids.entry(kind).or_insert(id);
    }

    /// Reverse lookup: the wire id of a packet kind in one direction.
    ///
    /// Fails with [`ProtoError::UnknownPacketType`] when the kind was never
    /// registered there; that is a wiring bug, not a protocol fault.
    pub fn id_of(&self, direction: Direction, kind: PacketKind) -> Result<u8> {
        self.table(direction)
            .ids
            .get(&kind)
            .copied()
            .ok_or(ProtoError::UnknownPacketType { direction, kind })
    }

    /// Construct a fresh packet for a received id.
    ///
    /// Returns `None` for unrecognized ids so the poll loop can ignore
    /// packets it does not understand instead of dropping the connection.
    pub fn instantiate(&self, direction: Direction, id: u8) -> Option<Box<dyn Packet>> {
        match self.table(direction).factories.get(&id) {
            Some(factory) => Some(factory()),
            None => {
                trace!(?direction, id, "no packet registered for id");
                None
            }
        }
    }

    fn table(&self, direction: Direction) -> &DirectionTable {
        match direction {
            Direction::ClientToServer => &self.client_to_server,
            Direction::ServerToClient => &self.server_to_client,
        }
    }

    fn table_mut(&mut self, direction: Direction) -> &mut DirectionTable {
        match direction {
            Direction::ClientToServer => &mut self.client_to_server,
            Direction::ServerToClient => &mut self.server_to_client,
        }
    }
}

impl Default for PacketRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
