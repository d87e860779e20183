//! The seam between the controller and the native player plugin.

use crate::{PlayerId, PlayerMode, PluginError};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Options for creating a player instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitOptions {
    /// Display context of the player.
    pub mode: PlayerMode,
    /// Video URL.
    pub url: String,
    /// Subtitle URL, if any.
    #[serde(rename = "subtitle", skip_serializing_if = "Option::is_none")]
    pub subtitle_url: Option<String>,
    /// Identifier requested for the new player.
    pub player_id: PlayerId,
    /// Selector of the element the player mounts into.
    pub component_tag: String,
    /// Height of an embedded player in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// MIME type derived from the URL's extension.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<&'static str>,
}

/// Answer of the plugin to an init call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitResponse {
    /// Whether the player was created.
    pub result: bool,
    /// Identifier of the created player, when the plugin reports one.
    #[serde(default)]
    pub player_id: Option<PlayerId>,
    /// Failure detail, when the plugin reports one.
    #[serde(default)]
    pub message: Option<String>,
}

impl InitResponse {
    /// A successful response for `player_id`.
    #[must_use]
    pub const fn created(player_id: PlayerId) -> Self {
        Self {
            result: true,
            player_id: Some(player_id),
            message: None,
        }
    }

    /// A failed response.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            result: false,
            player_id: None,
            message: Some(message.into()),
        }
    }
}

/// Commands understood by a native video-player plugin.
///
/// Implementations forward each call to the platform player. Lifecycle
/// events travel the other way, through
/// [`ControllerHandle::send_event`](crate::ControllerHandle::send_event).
pub trait VideoPlayerPlugin {
    /// Create a player instance.
    fn init_player(
        &self,
        options: &InitOptions,
    ) -> impl Future<Output = Result<InitResponse, PluginError>>;

    /// Start or resume playback.
    fn play(&self, player_id: &PlayerId) -> impl Future<Output = Result<(), PluginError>>;

    /// Pause playback.
    fn pause(&self, player_id: &PlayerId) -> impl Future<Output = Result<(), PluginError>>;

    /// Stop playback.
    fn stop(&self, player_id: &PlayerId) -> impl Future<Output = Result<(), PluginError>>;

    /// Stop every player the plugin knows about.
    fn stop_all_players(&self) -> impl Future<Output = Result<(), PluginError>>;

    /// Current volume in `0.0..=1.0`.
    fn get_volume(&self, player_id: &PlayerId) -> impl Future<Output = Result<f32, PluginError>>;

    /// Set the volume, `0.0..=1.0`.
    fn set_volume(
        &self,
        player_id: &PlayerId,
        volume: f32,
    ) -> impl Future<Output = Result<(), PluginError>>;

    /// Whether the player is muted.
    fn get_muted(&self, player_id: &PlayerId) -> impl Future<Output = Result<bool, PluginError>>;

    /// Mute or unmute the player.
    fn set_muted(
        &self,
        player_id: &PlayerId,
        muted: bool,
    ) -> impl Future<Output = Result<(), PluginError>>;

    /// Playback position in seconds.
    fn get_current_time(
        &self,
        player_id: &PlayerId,
    ) -> impl Future<Output = Result<f64, PluginError>>;

    /// Whether the player is currently playing.
    fn is_playing(&self, player_id: &PlayerId) -> impl Future<Output = Result<bool, PluginError>>;
}
