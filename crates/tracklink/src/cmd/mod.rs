use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use tracklink_bridge::{ConnectorConfig, MediaCommand};

use crate::exit::{CliError, CliResult, USAGE};

pub mod send;
pub mod version;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Watch now-playing state and print one line per update.
    Watch(WatchArgs),
    /// Send a single media command and print the refreshed state.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command) -> CliResult<i32> {
    match command {
        Command::Watch(args) => watch::run(args),
        Command::Send(args) => send::run(args),
        Command::Version(args) => version::run(args),
    }
}

/// How to reach the companion: launch-and-supervise or attach to one
/// already running.
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Companion executable to launch and supervise.
    #[arg(long, value_name = "PATH", conflicts_with = "attach")]
    pub companion: Option<PathBuf>,

    /// Attach to an already-running companion instead of launching one.
    #[arg(long)]
    pub attach: bool,

    /// Companion loopback port.
    #[arg(long, default_value_t = tracklink_bridge::DEFAULT_PORT)]
    pub port: u16,
}

impl ConnectionArgs {
    pub fn config(&self) -> CliResult<ConnectorConfig> {
        let mut config = if self.attach {
            ConnectorConfig::attached()
        } else if let Some(path) = &self.companion {
            ConnectorConfig::launching(path)
        } else {
            return Err(CliError::new(
                USAGE,
                "either --companion <PATH> or --attach is required",
            ));
        };
        config.address.set_port(self.port);
        Ok(config)
    }
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Exit after printing N updates.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// The media command to send.
    #[arg(value_enum)]
    pub action: MediaAction,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum MediaAction {
    PlayPause,
    Next,
    Previous,
}

impl From<MediaAction> for MediaCommand {
    fn from(action: MediaAction) -> Self {
        match action {
            MediaAction::PlayPause => MediaCommand::PlayPause,
            MediaAction::Next => MediaCommand::Next,
            MediaAction::Previous => MediaCommand::Previous,
        }
    }
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection(companion: Option<&str>, attach: bool, port: u16) -> ConnectionArgs {
        ConnectionArgs {
            companion: companion.map(PathBuf::from),
            attach,
            port,
        }
    }

    #[test]
    fn companion_path_builds_launching_config() {
        let config = connection(Some("/opt/companion/player-agent"), false, 32018)
            .config()
            .expect("config should build");
        assert!(config.companion.is_some());
        assert_eq!(config.address.port(), 32018);
    }

    #[test]
    fn attach_builds_attached_config_with_port_override() {
        let config = connection(None, true, 40000)
            .config()
            .expect("config should build");
        assert!(config.companion.is_none());
        assert_eq!(config.address.port(), 40000);
    }

    #[test]
    fn missing_target_is_a_usage_error() {
        let err = connection(None, false, 32018)
            .config()
            .expect_err("no target should fail");
        assert_eq!(err.code, USAGE);
    }
}
