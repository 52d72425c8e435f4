use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// The companion's fixed loopback port.
pub const DEFAULT_PORT: u16 = 32018;

/// Fixed timeout for socket connect and for reads/writes thereafter.
pub const DEFAULT_SOCKET_TIMEOUT: Duration = Duration::from_secs(5);

/// Period of the state poll loop.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Delay after a user command, giving the OS time to apply the simulated
/// media key before the follow-up state request.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(200);

/// How to launch the companion executable.
#[derive(Debug, Clone)]
pub struct CompanionConfig {
    /// Path to the companion binary.
    pub executable: PathBuf,
    /// Extra arguments passed to the binary.
    pub args: Vec<String>,
}

impl CompanionConfig {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            args: Vec::new(),
        }
    }
}

/// Configuration for a connector instance.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// Companion launch configuration. `None` means attach mode: connect
    /// to an already-running companion instead of spawning one.
    pub companion: Option<CompanionConfig>,
    /// Loopback address the companion listens on.
    pub address: SocketAddr,
    /// Socket connect timeout.
    pub connect_timeout: Duration,
    /// Read/write timeout once connected.
    pub io_timeout: Duration,
    /// Period of the state poll loop.
    pub poll_interval: Duration,
    /// Post-command settle delay on the flush-now path.
    pub settle_delay: Duration,
}

impl ConnectorConfig {
    /// Configuration that launches and supervises the given companion
    /// binary.
    pub fn launching(executable: impl Into<PathBuf>) -> Self {
        Self {
            companion: Some(CompanionConfig::new(executable)),
            ..Self::default()
        }
    }

    /// Attach-mode configuration: no subprocess, connect to a companion
    /// that is already running.
    pub fn attached() -> Self {
        Self::default()
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            companion: None,
            address: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
            connect_timeout: DEFAULT_SOCKET_TIMEOUT,
            io_timeout: DEFAULT_SOCKET_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}
