//! Player-session controller for a native video-player plugin.
//!
//! This crate provides:
//! - **Plugin seam**: the [`VideoPlayerPlugin`] trait a native bridge implements
//! - **Controller**: [`PlayerController`] keeps one session per [`PlayerMode`]
//!   and mirrors plugin state onto a [`StatusBoard`]
//! - **Events**: [`PlayerEvent`] decoding for the plugin's lifecycle events
//! - **Tracking**: [`PlaybackTracker`], the owned once-per-second poll timer
//! - **Simulation**: [`SimulatedPlugin`], an in-memory plugin for tests and demos
//!
//! # Usage
//!
//! ```no_run
//! use playerkit_player::{ControllerConfig, PlayerController, PlayerMode, SimulatedPlugin};
//!
//! # async fn demo() {
//! let plugin = SimulatedPlugin::new();
//! let mut controller = PlayerController::new(plugin.clone(), ControllerConfig::default());
//! plugin.connect(controller.handle());
//!
//! controller.form_mut().set_video_url("https://example.com/clip.mp4");
//! controller.play_mode(PlayerMode::Embedded).await.ok();
//! controller.drain().await;
//! println!("{}", controller.board().status());
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod controller;
mod error;
mod event;
mod plugin;
mod session;
mod sim;
mod tracker;

pub use config::{ControllerConfig, ControllerConfigBuilder};
pub use controller::{ControllerHandle, ControllerInput, PlayerController, UiCommand};
pub use error::{ControllerError, PluginError};
pub use event::{EventError, PlayerEvent, PlayerEventKind};
pub use plugin::{InitOptions, InitResponse, VideoPlayerPlugin};
pub use session::{PlayerForm, Session, SessionState, Sessions, StatusBoard};
pub use sim::{PluginCall, SimulatedPlayer, SimulatedPlugin};
pub use tracker::{PlaybackTracker, TrackerCancellation};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display context of a player instance.
///
/// Embedded and fullscreen players are separate plugin instances, so their
/// initialization is tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerMode {
    /// Rendered inside a region of the host page.
    Embedded,
    /// Rendered as a fullscreen overlay.
    Fullscreen,
}

impl PlayerMode {
    /// Both modes.
    pub const ALL: [Self; 2] = [Self::Embedded, Self::Fullscreen];

    /// Name the plugin uses for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Embedded => "embedded",
            Self::Fullscreen => "fullscreen",
        }
    }
}

impl fmt::Display for PlayerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier used to address a player instance in every plugin call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Create an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PlayerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
