//! Session bookkeeping and the UI surface the controller reads and writes.

use crate::{PlayerId, PlayerMode};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// Created by the plugin, not yet playing.
    #[default]
    Initialized,
    /// Playback is running.
    Playing,
    /// Playback is paused.
    Paused,
    /// Stopped by a user command.
    Stopped,
    /// Playback reached the end of the media.
    Ended,
    /// The player surface was dismissed.
    Exited,
}

impl SessionState {
    /// Whether commands may be sent to the player without a new init call.
    #[must_use]
    pub const fn is_initialized(self) -> bool {
        matches!(self, Self::Initialized | Self::Playing | Self::Paused)
    }
}

/// One player instance as seen by the controller.
///
/// `muted`, `volume` and `current_time` mirror the last values read from or
/// written to the plugin.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Identifier used in plugin calls.
    pub id: PlayerId,
    /// Display context.
    pub mode: PlayerMode,
    /// Lifecycle state.
    pub state: SessionState,
    /// Last known mute state.
    pub muted: bool,
    /// Last known volume.
    pub volume: f32,
    /// Last polled playback position in seconds.
    pub current_time: f64,
}

impl Session {
    /// A freshly initialized session.
    #[must_use]
    pub const fn new(id: PlayerId, mode: PlayerMode) -> Self {
        Self {
            id,
            mode,
            state: SessionState::Initialized,
            muted: false,
            volume: 1.0,
            current_time: 0.0,
        }
    }

    /// Whether the session can take commands.
    #[must_use]
    pub const fn initialized(&self) -> bool {
        self.state.is_initialized()
    }
}

/// At most one session per [`PlayerMode`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sessions {
    embedded: Option<Session>,
    fullscreen: Option<Session>,
}

impl Sessions {
    /// Session for `mode`, initialized or not.
    #[must_use]
    pub const fn get(&self, mode: PlayerMode) -> Option<&Session> {
        match mode {
            PlayerMode::Embedded => self.embedded.as_ref(),
            PlayerMode::Fullscreen => self.fullscreen.as_ref(),
        }
    }

    pub(crate) const fn slot_mut(&mut self, mode: PlayerMode) -> &mut Option<Session> {
        match mode {
            PlayerMode::Embedded => &mut self.embedded,
            PlayerMode::Fullscreen => &mut self.fullscreen,
        }
    }

    /// Whether `mode` has a session that can take commands.
    #[must_use]
    pub fn is_initialized(&self, mode: PlayerMode) -> bool {
        self.get(mode).is_some_and(Session::initialized)
    }

    /// Whether any mode has a session that can take commands.
    #[must_use]
    pub fn any_initialized(&self) -> bool {
        self.iter().any(Session::initialized)
    }

    /// Session tracked under `id`, in any state.
    #[must_use]
    pub fn find(&self, id: &PlayerId) -> Option<&Session> {
        self.iter().find(|session| &session.id == id)
    }

    pub(crate) fn find_mut(&mut self, id: &PlayerId) -> Option<&mut Session> {
        [self.embedded.as_mut(), self.fullscreen.as_mut()]
            .into_iter()
            .flatten()
            .find(|session| &session.id == id)
    }

    /// All tracked sessions.
    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        [self.embedded.as_ref(), self.fullscreen.as_ref()]
            .into_iter()
            .flatten()
    }
}

/// Input fields of the player UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerForm {
    video_url: String,
    subtitle_url: Option<String>,
}

impl PlayerForm {
    /// Text of the video URL field.
    #[must_use]
    pub fn video_url(&self) -> &str {
        &self.video_url
    }

    /// Text of the subtitle URL field, `None` when empty.
    #[must_use]
    pub fn subtitle_url(&self) -> Option<&str> {
        self.subtitle_url.as_deref()
    }

    /// Replace the video URL field.
    pub fn set_video_url(&mut self, url: impl Into<String>) {
        self.video_url = url.into();
    }

    /// Replace the subtitle URL field. Blank input clears it.
    pub fn set_subtitle_url(&mut self, url: Option<String>) {
        self.subtitle_url = url.filter(|url| !url.trim().is_empty());
    }
}

/// The two output regions of the player UI.
///
/// Each update overwrites the previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBoard {
    status: String,
    current_time: String,
}

impl StatusBoard {
    /// Current status message.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Current playback time readout.
    #[must_use]
    pub fn current_time(&self) -> &str {
        &self.current_time
    }

    pub(crate) fn set_status(&mut self, text: String) {
        log::info!("Status: {text}");
        self.status = text;
    }

    pub(crate) fn set_current_time(&mut self, text: String) {
        self.current_time = text;
    }
}
