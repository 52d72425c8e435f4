use std::time::{Duration, Instant};

use tracklink_bridge::{ConnectionState, Connector, DisconnectMode, Events, LastError};

use crate::cmd::SendArgs;
use crate::exit::{bridge_error, CliError, CliResult, SUCCESS, TIMEOUT};

pub fn run(args: SendArgs) -> CliResult<i32> {
    let config = args.connection.config()?;
    let deadline = Instant::now() + config.connect_timeout + config.poll_interval * 2;
    let settle = config.settle_delay;

    let connector = Connector::spawn(config, Events::new());
    connector.connect();

    loop {
        match connector.connection_state() {
            ConnectionState::Connected => break,
            ConnectionState::Disconnected | ConnectionState::Failed(_) => {
                if let Some(err @ (LastError::Provisioning(_) | LastError::Launch(_))) =
                    connector.last_error()
                {
                    connector.disconnect(DisconnectMode::Final);
                    return Err(bridge_error("send", &err));
                }
            }
            _ => {}
        }
        if Instant::now() >= deadline {
            connector.disconnect(DisconnectMode::Final);
            return Err(CliError::new(TIMEOUT, "timed out connecting to companion"));
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    connector.send_command(args.action.into());

    // The worker flushes the command and re-requests state after the
    // settle delay; give it that long plus slack before reading the view.
    std::thread::sleep(settle + Duration::from_millis(300));

    match connector.current_track() {
        Some(track) => println!(
            "{}  {} - {}",
            if connector.is_playing() {
                "playing"
            } else {
                "paused"
            },
            track.artist,
            track.name,
        ),
        None => println!("nothing playing"),
    }

    connector.disconnect(DisconnectMode::Final);
    Ok(SUCCESS)
}
