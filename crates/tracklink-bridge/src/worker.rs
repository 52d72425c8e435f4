use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use tracklink_proto::{
    Direction, NextPacket, Packet, PacketRegistry, PlayPausePacket, PreviousPacket, StatePacket,
};

use crate::config::ConnectorConfig;
use crate::error::{BridgeError, LastError, Result};
use crate::link::Link;
use crate::process::Companion;
use crate::provision::Provisioner;
use crate::state::{ConnectionState, StateTracker};

/// User-facing media commands, routed through the flush-now path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCommand {
    Previous,
    PlayPause,
    Next,
}

/// Disconnect intent. One teardown routine serves both modes so cleanup
/// logic cannot diverge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectMode {
    /// Close the socket and kill the subprocess, but leave the recurring
    /// schedule armed: the next tick reconnects automatically.
    Restartable,
    /// Additionally cancel the schedule.
    Final,
}

/// Work items sent from the facade to the worker's inbox.
pub(crate) enum WorkerMsg {
    Connect,
    Disconnect(DisconnectMode),
    Command(MediaCommand),
}

/// The single worker that owns the socket, the subprocess handle and the
/// packet queue.
///
/// All socket reads and writes happen on this thread, strictly
/// serialized: no two packets are ever in flight concurrently.
pub(crate) struct Worker {
    config: ConnectorConfig,
    provisioner: Option<Box<dyn Provisioner>>,
    registry: PacketRegistry,
    inbox: Receiver<WorkerMsg>,
    tracker: StateTracker,
    queue: VecDeque<Box<dyn Packet>>,
    link: Option<Link>,
    companion: Option<Companion>,
    /// Set once provisioning succeeds; reconnects reuse it without
    /// re-provisioning.
    executable: Option<std::path::PathBuf>,
    /// Whether the recurring schedule is armed. `connect()` arms it; a
    /// final disconnect cancels it.
    armed: bool,
}

impl Worker {
    pub(crate) fn new(
        config: ConnectorConfig,
        provisioner: Option<Box<dyn Provisioner>>,
        inbox: Receiver<WorkerMsg>,
        tracker: StateTracker,
    ) -> Self {
        Self {
            config,
            provisioner,
            registry: PacketRegistry::with_defaults(),
            inbox,
            tracker,
            queue: VecDeque::new(),
            link: None,
            companion: None,
            executable: None,
            armed: false,
        }
    }

    /// Drive the inbox and the periodic tick until the facade goes away.
    pub(crate) fn run(mut self) {
        let mut next_tick = Instant::now() + self.config.poll_interval;
        loop {
            let wait = next_tick.saturating_duration_since(Instant::now());
            match self.inbox.recv_timeout(wait) {
                Ok(WorkerMsg::Connect) => self.handle_connect(),
                Ok(WorkerMsg::Disconnect(mode)) => self.teardown(mode),
                Ok(WorkerMsg::Command(command)) => self.flush_now(command),
                Err(RecvTimeoutError::Timeout) => {
                    if self.armed {
                        self.tick();
                    }
                    next_tick = Instant::now() + self.config.poll_interval;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    self.teardown(DisconnectMode::Final);
                    debug!("facade dropped, worker exiting");
                    return;
                }
            }
        }
    }

    /// Explicit connect: provision, launch, open the socket, arm the
    /// schedule. Idempotent while already connected.
    fn handle_connect(&mut self) {
        self.armed = true;
        if self.link.is_some() {
            debug!("connect requested while already connected");
            return;
        }

        if let Some(provisioner) = &self.provisioner {
            match provisioner.provide() {
                Ok(path) => self.executable = Some(path),
                Err(err) => {
                    // Non-fatal if a previously-provisioned binary exists.
                    if self.executable.is_some() {
                        warn!(%err, "provisioning failed, using existing binary");
                    } else {
                        warn!(%err, "provisioning failed, no binary available");
                        self.tracker.record_error(LastError::Provisioning(err.to_string()));
                        self.tracker
                            .set_connection(ConnectionState::Failed(err.to_string()));
                        return;
                    }
                }
            }
        }

        self.establish();
    }

    /// Launching → SocketConnecting → Connected.
    fn establish(&mut self) {
        self.tracker.set_connection(ConnectionState::Connecting);

        if let Some(companion_config) = self.config.companion.clone() {
            let path = self
                .executable
                .clone()
                .unwrap_or_else(|| companion_config.executable.clone());
            match Companion::launch(&companion_config, &path) {
                Ok(companion) => self.companion = Some(companion),
                Err(err) => {
                    warn!(%err, "companion launch failed");
                    self.tracker.record_error(LastError::Launch(err.to_string()));
                    self.tracker
                        .set_connection(ConnectionState::Failed(err.to_string()));
                    return;
                }
            }
        }

        match Link::connect(
            self.config.address,
            self.config.connect_timeout,
            self.config.io_timeout,
        ) {
            Ok(link) => {
                self.link = Some(link);
                self.tracker.set_connection(ConnectionState::Connected);
                info!(address = %self.config.address, "companion link established");
            }
            Err(err) => {
                warn!(%err, "socket connect failed");
                if let Some(mut companion) = self.companion.take() {
                    companion.stop();
                }
                self.tracker
                    .set_connection(ConnectionState::Failed(err.to_string()));
            }
        }
    }

    /// One poll period: enqueue a state request, reconnect if needed,
    /// drain the queue.
    fn tick(&mut self) {
        self.queue.push_back(Box::new(StatePacket::request()));

        if self.link.is_none() {
            self.establish();
            if self.link.is_none() {
                // Still down; drop this period's work so the queue does
                // not grow across a long outage.
                self.queue.clear();
                return;
            }
        }

        if let Err(err) = self.drain() {
            self.absorb(err);
        }
    }

    /// Out-of-band drain for user commands: send immediately, give the OS
    /// the settle delay to apply the simulated media key, then request a
    /// fresh state so consumers see the effect before the next tick.
    fn flush_now(&mut self, command: MediaCommand) {
        if !self.armed {
            warn!(?command, "command ignored, connector not started");
            return;
        }

        self.queue.push_back(packet_for(command));
        if self.link.is_none() {
            self.establish();
        }
        if self.link.is_none() {
            self.queue.clear();
            return;
        }

        if let Err(err) = self.drain() {
            self.absorb(err);
            return;
        }

        std::thread::sleep(self.config.settle_delay);

        self.queue.push_back(Box::new(StatePacket::request()));
        if let Err(err) = self.drain() {
            self.absorb(err);
        }
    }

    /// Pop and send queued packets one at a time; read one response for
    /// every non-command packet before touching the next.
    fn drain(&mut self) -> Result<()> {
        while let Some(packet) = self.queue.pop_front() {
            let id = match self.registry.id_of(Direction::ClientToServer, packet.kind()) {
                Ok(id) => id,
                Err(err) => {
                    // Registry wiring bug, not a protocol fault: skip the
                    // packet, keep the connection.
                    warn!(%err, "skipping unregistered outbound packet");
                    continue;
                }
            };

            let link = self.link.as_mut().ok_or_else(|| {
                BridgeError::Socket(std::io::Error::new(
                    std::io::ErrorKind::NotConnected,
                    "no active companion link",
                ))
            })?;

            link.send_packet(id, packet.as_ref())?;

            if packet.is_command() {
                continue;
            }

            let inbound = link.read_packet_id()?;
            let instantiated = u8::try_from(inbound)
                .ok()
                .and_then(|id| self.registry.instantiate(Direction::ServerToClient, id));
            match instantiated {
                Some(mut response) => {
                    link.receive_into(response.as_mut())?;
                    response.dispatch(&mut self.tracker);
                }
                None => {
                    // Unknown id: ignore the frame, keep the connection.
                    debug!(inbound, "ignoring unrecognized inbound packet id");
                }
            }
        }
        Ok(())
    }

    /// Fatal mid-drain failure: log, tear down restartably, and let the
    /// next tick reconnect. Nothing propagates to the caller.
    fn absorb(&mut self, err: BridgeError) {
        warn!(%err, "companion link failed, reconnecting next tick");
        self.queue.clear();
        self.teardown(DisconnectMode::Restartable);
    }

    fn teardown(&mut self, mode: DisconnectMode) {
        if let Some(link) = self.link.take() {
            link.shutdown();
        }
        if let Some(mut companion) = self.companion.take() {
            companion.stop();
        }
        if mode == DisconnectMode::Final {
            self.armed = false;
            self.queue.clear();
        }
        self.tracker.set_connection(ConnectionState::Disconnected);
        info!(?mode, "disconnected from companion");
    }
}

fn packet_for(command: MediaCommand) -> Box<dyn Packet> {
    match command {
        MediaCommand::Previous => Box::new(PreviousPacket),
        MediaCommand::PlayPause => Box::new(PlayPausePacket),
        MediaCommand::Next => Box::new(NextPacket),
    }
}
