//! Companion process supervision, poll loop and connector facade.
//!
//! The bridge launches a companion executable that exposes live
//! media-player state over a loopback socket, polls it once a second on a
//! dedicated worker thread, and publishes a simplified snapshot (current
//! track, playback progress, connection health) that any thread can read.
//!
//! One worker per connector owns the socket, the subprocess handle and
//! the packet queue; facade calls are messages to its inbox. That keeps
//! all socket I/O strictly serialized: no two packets are ever in flight
//! at the same time.

pub mod config;
pub mod connector;
pub mod error;
pub mod link;
pub mod process;
pub mod provision;
pub mod state;
pub mod worker;

pub use config::{
    CompanionConfig, ConnectorConfig, DEFAULT_POLL_INTERVAL, DEFAULT_PORT, DEFAULT_SETTLE_DELAY,
    DEFAULT_SOCKET_TIMEOUT,
};
pub use connector::{Connector, Events};
pub use error::{BridgeError, LastError, Result};
pub use provision::{LocalExecutable, Manifest, Provisioner};
pub use state::{ConnectionState, PlaybackView, Track};
pub use worker::{DisconnectMode, MediaCommand};
