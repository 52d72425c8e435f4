use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracklink_bridge::{ConnectionState, Connector, DisconnectMode, Events, LastError};

use crate::cmd::WatchArgs;
use crate::exit::{bridge_error, CliError, CliResult, INTERNAL, SUCCESS};

pub fn run(args: WatchArgs) -> CliResult<i32> {
    let config = args.connection.config()?;

    let events = Events::new().on_track_change(|track| {
        println!("now playing: {} - {}", track.artist, track.name);
    });
    let connector = Connector::spawn(config, events);
    connector.connect();

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut printed = 0usize;

    while running.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_secs(1));

        // A dead companion is fatal here; a transient socket drop is not,
        // the worker reconnects on its own.
        if matches!(
            connector.connection_state(),
            ConnectionState::Disconnected | ConnectionState::Failed(_)
        ) {
            if let Some(err @ (LastError::Provisioning(_) | LastError::Launch(_))) =
                connector.last_error()
            {
                connector.disconnect(DisconnectMode::Final);
                return Err(bridge_error("watch", &err));
            }
        }

        println!("{}", status_line(&connector));
        printed = printed.saturating_add(1);

        if args.count.is_some_and(|count| printed >= count) {
            break;
        }
    }

    connector.disconnect(DisconnectMode::Final);
    Ok(SUCCESS)
}

fn status_line(connector: &Connector) -> String {
    match connector.connection_state() {
        ConnectionState::Connected => match connector.current_track() {
            Some(track) => format!(
                "{} {} / {}  {} - {}",
                if connector.is_playing() {
                    "playing"
                } else {
                    "paused "
                },
                fmt_clock(connector.predicted_progress_ms()),
                fmt_clock(track.length_ms),
                track.artist,
                track.name,
            ),
            None => "connected, nothing playing".to_string(),
        },
        ConnectionState::Connecting => "connecting...".to_string(),
        ConnectionState::Disconnected => "disconnected".to_string(),
        ConnectionState::Failed(reason) => format!("failed: {reason}"),
    }
}

/// Milliseconds as m:ss, the way players render positions.
fn fmt_clock(ms: u32) -> String {
    let total_secs = ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_formatting() {
        assert_eq!(fmt_clock(0), "0:00");
        assert_eq!(fmt_clock(53_000), "0:53");
        assert_eq!(fmt_clock(200_000), "3:20");
        assert_eq!(fmt_clock(3_605_000), "60:05");
    }
}
