use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Instant;

use tracing::warn;

use tracklink_proto::ErrorCode;

use crate::config::ConnectorConfig;
use crate::error::LastError;
use crate::provision::{LocalExecutable, Provisioner};
use crate::state::{ConnectionState, PlaybackView, StateTracker, Track};
use crate::worker::{DisconnectMode, MediaCommand, Worker, WorkerMsg};

/// Event callbacks invoked on the worker thread.
///
/// Keep them fast: they run inside the drain loop.
#[derive(Default)]
pub struct Events {
    pub(crate) on_track_change: Option<Box<dyn Fn(&Track) + Send>>,
    pub(crate) on_error: Option<Box<dyn Fn(ErrorCode) + Send>>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called exactly once per distinct (name, artist, length) triple
    /// while playing.
    pub fn on_track_change(mut self, callback: impl Fn(&Track) + Send + 'static) -> Self {
        self.on_track_change = Some(Box::new(callback));
        self
    }

    /// Called for every structured error frame from the companion.
    pub fn on_error(mut self, callback: impl Fn(ErrorCode) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }
}

/// The public surface of the bridge.
///
/// All methods are safe to call from any thread: mutating operations are
/// messages to the worker's inbox, accessors read the worker's published
/// snapshot. Nothing here blocks on socket I/O.
pub struct Connector {
    outbox: Sender<WorkerMsg>,
    shared: Arc<Mutex<PlaybackView>>,
    worker: Option<JoinHandle<()>>,
}

impl Connector {
    /// Spawn a connector with the default provisioner (the configured
    /// companion binary must already exist locally).
    pub fn spawn(config: ConnectorConfig, events: Events) -> Self {
        let provisioner = config
            .companion
            .as_ref()
            .map(|c| Box::new(LocalExecutable::new(c.executable.clone())) as Box<dyn Provisioner>);
        Self::spawn_with_provisioner(config, provisioner, events)
    }

    /// Spawn a connector with a custom fetch-if-stale provisioner.
    pub fn spawn_with_provisioner(
        config: ConnectorConfig,
        provisioner: Option<Box<dyn Provisioner>>,
        events: Events,
    ) -> Self {
        let shared = Arc::new(Mutex::new(PlaybackView::idle()));
        let tracker = StateTracker::new(Arc::clone(&shared), events);
        let (outbox, inbox) = mpsc::channel();

        let worker = Worker::new(config, provisioner, inbox, tracker);
        let handle = std::thread::Builder::new()
            .name("tracklink-worker".to_string())
            .spawn(move || worker.run())
            .expect("failed to spawn connector worker thread");

        Self {
            outbox,
            shared,
            worker: Some(handle),
        }
    }

    /// Provision, launch and connect. Idempotent: re-entering while
    /// already connecting or connected is a no-op on the worker.
    pub fn connect(&self) {
        self.send(WorkerMsg::Connect);
    }

    /// Tear down the socket and subprocess. `Restartable` leaves the
    /// schedule armed so the next tick reconnects; `Final` cancels it.
    pub fn disconnect(&self, mode: DisconnectMode) {
        self.send(WorkerMsg::Disconnect(mode));
    }

    /// Queue a media command and flush it immediately on the worker.
    pub fn send_command(&self, command: MediaCommand) {
        self.send(WorkerMsg::Command(command));
    }

    /// The current track, if one is playing and the link is healthy.
    pub fn current_track(&self) -> Option<Track> {
        self.view().track
    }

    /// Extrapolated playback position in milliseconds.
    pub fn predicted_progress_ms(&self) -> u32 {
        self.view().predicted_progress_ms(Instant::now())
    }

    /// Whether the player reported it is playing.
    pub fn is_playing(&self) -> bool {
        self.view().playing
    }

    /// Socket liveness. Does not imply the subprocess is still alive.
    pub fn is_connected(&self) -> bool {
        self.view().connection == ConnectionState::Connected
    }

    /// Full connection health.
    pub fn connection_state(&self) -> ConnectionState {
        self.view().connection
    }

    /// The last escalated error, if any.
    pub fn last_error(&self) -> Option<LastError> {
        self.view().last_error
    }

    fn view(&self) -> PlaybackView {
        self.shared
            .lock()
            .expect("playback view lock poisoned")
            .clone()
    }

    fn send(&self, msg: WorkerMsg) {
        if self.outbox.send(msg).is_err() {
            warn!("connector worker is gone, message dropped");
        }
    }
}

impl Drop for Connector {
    fn drop(&mut self) {
        // Closing the inbox makes the worker tear down finally and exit.
        let (stub, _) = mpsc::channel();
        drop(std::mem::replace(&mut self.outbox, stub));
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_report_idle_before_connect() {
        let connector = Connector::spawn(ConnectorConfig::attached(), Events::new());

        assert!(!connector.is_connected());
        assert!(!connector.is_playing());
        assert!(connector.current_track().is_none());
        assert_eq!(connector.predicted_progress_ms(), 0);
        assert_eq!(connector.connection_state(), ConnectionState::Disconnected);
        assert!(connector.last_error().is_none());
    }

    #[test]
    fn drop_joins_the_worker() {
        let connector = Connector::spawn(ConnectorConfig::attached(), Events::new());
        drop(connector);
        // Dropping must not hang or panic; the worker observes the closed
        // inbox and exits.
    }
}
