use std::fmt;
use std::path::PathBuf;

use tracklink_proto::{ErrorCode, ProtoError};
use tracklink_wire::WireError;

/// Errors that can occur inside the bridge.
///
/// Nothing here crosses the facade boundary as a propagated `Err`: the
/// worker absorbs transient failures into state transitions, and only
/// provisioning and launch failures surface through `last_error()`.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The companion binary could not be made available.
    #[error("provisioning failed: {0}")]
    Provisioning(String),

    /// The companion subprocess could not start.
    #[error("failed to launch companion {path}: {source}")]
    Launch {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A socket connect/read/write failed. Read timeouts and peer closes
    /// both land here; the worker treats them uniformly as
    /// disconnect-and-retry.
    #[error("socket failure: {0}")]
    Socket(#[from] std::io::Error),

    /// A packet could not be encoded, decoded or routed.
    #[error(transparent)]
    Protocol(#[from] ProtoError),

    /// The companion process reported a structured error frame.
    #[error("companion error: {0}")]
    Executable(ErrorCode),
}

impl From<WireError> for BridgeError {
    fn from(err: WireError) -> Self {
        match err {
            WireError::Io(io) => BridgeError::Socket(io),
            WireError::TruncatedRead => BridgeError::Socket(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "stream ended mid-packet",
            )),
            other => BridgeError::Protocol(ProtoError::Wire(other)),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

/// The escalated error surfaced through the facade's `last_error()`.
///
/// Cloneable snapshot value, distinct from [`BridgeError`] which carries
/// non-clonable `io::Error` sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastError {
    /// Provisioning failed and no previously-provisioned binary exists.
    Provisioning(String),
    /// The companion subprocess could not start.
    Launch(String),
    /// The companion reported a structured error; cleared by the next
    /// successful state packet.
    Executable(ErrorCode),
}

impl fmt::Display for LastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastError::Provisioning(msg) => write!(f, "provisioning failed: {msg}"),
            LastError::Launch(msg) => write!(f, "launch failed: {msg}"),
            LastError::Executable(code) => write!(f, "{code}"),
        }
    }
}
