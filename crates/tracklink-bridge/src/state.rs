use std::sync::{Arc, Mutex, OnceLock};
use std::time::Instant;

use bytes::Bytes;
use tracing::debug;

use tracklink_proto::{ErrorCode, PacketHandler, StatePacket};

use crate::connector::Events;
use crate::error::LastError;

/// A snapshot of the current track.
///
/// Immutable once constructed, apart from the cover slot; a new instance
/// replaces the old one on change. Change detection is by (name, artist,
/// length), not id — the id is only present when the companion supports
/// cover lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    pub artist: String,
    pub length_ms: u32,
    // Shared between all snapshots of the same track, so a cover fetched
    // after the view was read still reaches later readers.
    cover: Arc<OnceLock<Bytes>>,
}

impl Track {
    pub(crate) fn from_state(state: &StatePacket) -> Self {
        Self {
            id: state.track_id().map(str::to_string),
            name: state.track_name.clone(),
            artist: state.track_artist.clone(),
            length_ms: state.track_length,
            cover: Arc::new(OnceLock::new()),
        }
    }

    /// Attach the cover image fetched for this track. The first write
    /// wins; later writes are ignored.
    pub fn set_cover(&self, image: Bytes) {
        let _ = self.cover.set(image);
    }

    /// The attached cover image, if one has been set.
    pub fn cover(&self) -> Option<&Bytes> {
        self.cover.get()
    }

    /// Whether this track is the same (name, artist, length) triple the
    /// snapshot describes.
    pub fn same_identity(&self, state: &StatePacket) -> bool {
        self.name == state.track_name
            && self.artist == state.track_artist
            && self.length_ms == state.track_length
    }
}

/// Connection health of a connector instance. Transitions happen under
/// worker control only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed(String),
}

/// The wholesale-published view read by facade accessors.
///
/// The worker replaces the whole struct behind one mutex; readers never
/// observe a half-updated pair.
#[derive(Debug, Clone)]
pub struct PlaybackView {
    pub connection: ConnectionState,
    pub track: Option<Track>,
    pub playing: bool,
    pub progress_ms: u32,
    pub sampled_at: Instant,
    pub last_error: Option<LastError>,
}

impl PlaybackView {
    pub(crate) fn idle() -> Self {
        Self {
            connection: ConnectionState::Disconnected,
            track: None,
            playing: false,
            progress_ms: 0,
            sampled_at: Instant::now(),
            last_error: None,
        }
    }

    /// Linear extrapolation of playback position at `now`.
    ///
    /// Clamped to the track length and frozen while paused; 0 without a
    /// track.
    pub fn predicted_progress_ms(&self, now: Instant) -> u32 {
        let Some(track) = &self.track else {
            return 0;
        };
        let elapsed = if self.playing {
            now.saturating_duration_since(self.sampled_at).as_millis() as u64
        } else {
            0
        };
        (u64::from(self.progress_ms) + elapsed).min(u64::from(track.length_ms)) as u32
    }
}

/// The worker's playback bookkeeping.
///
/// Sole writer of the shared view: every mutation goes through the local
/// working copy and is published as one atomic handoff.
pub(crate) struct StateTracker {
    shared: Arc<Mutex<PlaybackView>>,
    view: PlaybackView,
    events: Events,
}

impl StateTracker {
    pub(crate) fn new(shared: Arc<Mutex<PlaybackView>>, events: Events) -> Self {
        let view = PlaybackView::idle();
        *shared.lock().expect("playback view lock poisoned") = view.clone();
        Self {
            shared,
            view,
            events,
        }
    }

    /// Record a connection transition. Leaving `Connected` drops the
    /// track so readers never see stale data while reconnecting.
    pub(crate) fn set_connection(&mut self, connection: ConnectionState) {
        if self.view.connection == connection {
            return;
        }
        debug!(from = ?self.view.connection, to = ?connection, "connection state change");
        if connection != ConnectionState::Connected {
            self.view.track = None;
            self.view.playing = false;
            self.view.progress_ms = 0;
        }
        self.view.connection = connection;
        self.publish();
    }

    pub(crate) fn record_error(&mut self, error: LastError) {
        self.view.last_error = Some(error);
        self.publish();
    }

    /// Apply a received state snapshot sampled at `now`.
    pub(crate) fn apply_state(&mut self, state: &StatePacket, now: Instant) {
        self.view.playing = state.playing;

        let changed = state.playing
            && self
                .view
                .track
                .as_ref()
                .is_none_or(|track| !track.same_identity(state));
        if changed {
            let track = Track::from_state(state);
            debug!(name = %track.name, artist = %track.artist, "track changed");
            if let Some(callback) = &self.events.on_track_change {
                callback(&track);
            }
            self.view.track = Some(track);
        }

        self.view.progress_ms = state.progress;
        self.view.sampled_at = now;
        self.view.last_error = None;
        self.publish();
    }

    /// Apply a structured companion error: surfaces through the error
    /// callback and clears the track, but the connection stays open.
    pub(crate) fn apply_error(&mut self, code: ErrorCode, now: Instant) {
        debug!(%code, "companion reported error");
        self.view.track = None;
        self.view.playing = false;
        self.view.progress_ms = 0;
        self.view.sampled_at = now;
        self.view.last_error = Some(LastError::Executable(code));
        self.publish();

        if let Some(callback) = &self.events.on_error {
            callback(code);
        }
    }

    fn publish(&self) {
        *self.shared.lock().expect("playback view lock poisoned") = self.view.clone();
    }
}

impl PacketHandler for StateTracker {
    fn on_state(&mut self, state: &StatePacket) {
        self.apply_state(state, Instant::now());
    }

    fn on_error(&mut self, code: ErrorCode) {
        self.apply_error(code, Instant::now());
    }
}
