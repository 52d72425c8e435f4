mod cmd;
mod exit;
mod logging;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat};

#[derive(Parser, Debug)]
#[command(name = "tracklink", version, about = "Now-playing bridge CLI")]
struct Cli {
    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Log filter for stderr (tracing directives, e.g. `debug` or
    /// `tracklink_bridge=trace`). Defaults to RUST_LOG, then `info`.
    #[arg(long, value_name = "FILTER", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level.as_deref());

    match cmd::run(cli.command) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_watch_subcommand() {
        let cli = Cli::try_parse_from([
            "tracklink",
            "watch",
            "--companion",
            "/opt/companion/player-agent",
            "--count",
            "5",
        ])
        .expect("watch args should parse");

        assert!(matches!(cli.command, Command::Watch(_)));
    }

    #[test]
    fn parses_send_subcommand_with_attach() {
        let cli = Cli::try_parse_from(["tracklink", "send", "--attach", "next"])
            .expect("send args should parse");

        assert!(matches!(cli.command, Command::Send(_)));
    }

    #[test]
    fn rejects_companion_together_with_attach() {
        let err = Cli::try_parse_from([
            "tracklink",
            "watch",
            "--companion",
            "/opt/companion/player-agent",
            "--attach",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parses_log_filter_directives() {
        let cli = Cli::try_parse_from([
            "tracklink",
            "--log-level",
            "tracklink_bridge=debug",
            "version",
        ])
        .expect("log filter should parse");

        assert_eq!(cli.log_level.as_deref(), Some("tracklink_bridge=debug"));
    }

    #[test]
    fn parses_port_override() {
        let cli = Cli::try_parse_from(["tracklink", "watch", "--attach", "--port", "40000"])
            .expect("port override should parse");

        let Command::Watch(args) = cli.command else {
            panic!("expected watch");
        };
        assert_eq!(args.connection.port, 40000);
        assert!(args.connection.attach);
    }
}
