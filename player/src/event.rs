//! Lifecycle events emitted by the plugin.

use crate::PlayerId;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Kind of lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerEventKind {
    /// The player finished loading and can play.
    Ready,
    /// Playback started.
    Play,
    /// Playback paused.
    Pause,
    /// Playback reached the end of the media.
    Ended,
    /// The player surface was dismissed.
    Exit,
}

impl PlayerEventKind {
    /// Map a plugin listener name to an event kind.
    ///
    /// Both the prefixed (`jeepCapVideoPlayerPlay`) and the short
    /// (`playerPlay`) names are accepted.
    #[must_use]
    pub fn from_plugin_name(name: &str) -> Option<Self> {
        let suffix = name
            .strip_prefix("jeepCapVideoPlayer")
            .or_else(|| name.strip_prefix("player"))?;
        match suffix {
            "Ready" => Some(Self::Ready),
            "Play" => Some(Self::Play),
            "Pause" => Some(Self::Pause),
            "Ended" => Some(Self::Ended),
            "Exit" => Some(Self::Exit),
            _ => None,
        }
    }
}

impl fmt::Display for PlayerEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ready => "ready",
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Ended => "ended",
            Self::Exit => "exit",
        };
        f.write_str(name)
    }
}

/// A lifecycle event for one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerEvent {
    /// What happened.
    pub kind: PlayerEventKind,
    /// Player the event is about.
    pub player_id: PlayerId,
}

/// Errors decoding a raw plugin event.
#[derive(Error, Debug)]
pub enum EventError {
    /// The listener name is not a lifecycle event.
    #[error("unknown player event: {0}")]
    UnknownEvent(String),

    /// The payload is not valid JSON or lacks a player id.
    #[error("invalid event payload: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct Payload {
    #[serde(rename = "playerId", alias = "fromPlayerId")]
    player_id: PlayerId,
}

impl PlayerEvent {
    /// Create an event.
    #[must_use]
    pub fn new(kind: PlayerEventKind, player_id: impl Into<PlayerId>) -> Self {
        Self {
            kind,
            player_id: player_id.into(),
        }
    }

    /// Decode an event as delivered by the plugin's listener bridge.
    ///
    /// `payload` is the JSON object passed to the listener, carrying either a
    /// `playerId` or a `fromPlayerId` field.
    ///
    /// # Errors
    /// Returns [`EventError::UnknownEvent`] for unknown listener names and
    /// [`EventError::Payload`] when the payload cannot be decoded.
    pub fn from_plugin(name: &str, payload: &str) -> Result<Self, EventError> {
        let kind = PlayerEventKind::from_plugin_name(name)
            .ok_or_else(|| EventError::UnknownEvent(name.to_owned()))?;
        let Payload { player_id } = serde_json::from_str(payload)?;
        Ok(Self { kind, player_id })
    }
}
