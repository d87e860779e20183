use crate::{PlayerId, PlayerMode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings of a [`PlayerController`](crate::PlayerController).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControllerConfig {
    /// Period of the playback-time poll in milliseconds. Zero is read as one.
    pub poll_interval_ms: u64,
    /// Selector of the element players mount into.
    pub component_tag: String,
    /// Height of the embedded player in pixels.
    pub embedded_height: Option<u32>,
    /// Player id used for the embedded mode when no hint is given.
    pub embedded_player_id: PlayerId,
    /// Player id used for the fullscreen mode when no hint is given.
    pub fullscreen_player_id: PlayerId,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            component_tag: "#videoContainer".into(),
            embedded_height: Some(300),
            embedded_player_id: PlayerId::new("embeddedPlayer"),
            fullscreen_player_id: PlayerId::new("fullscreenPlayer"),
        }
    }
}

impl ControllerConfig {
    /// Create a config builder.
    #[must_use]
    pub fn builder() -> ControllerConfigBuilder {
        ControllerConfigBuilder::new()
    }

    /// Period of the playback-time poll.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        // tokio intervals reject a zero period
        let millis = if self.poll_interval_ms == 0 {
            1
        } else {
            self.poll_interval_ms
        };
        Duration::from_millis(millis)
    }

    /// Default player id of `mode`.
    #[must_use]
    pub const fn player_id(&self, mode: PlayerMode) -> &PlayerId {
        match mode {
            PlayerMode::Embedded => &self.embedded_player_id,
            PlayerMode::Fullscreen => &self.fullscreen_player_id,
        }
    }

    /// Mount height passed to the plugin for `mode`.
    ///
    /// Fullscreen players always cover the screen.
    #[must_use]
    pub const fn height(&self, mode: PlayerMode) -> Option<u32> {
        match mode {
            PlayerMode::Embedded => self.embedded_height,
            PlayerMode::Fullscreen => None,
        }
    }
}

/// Builder for a [`ControllerConfig`].
#[derive(Debug, Clone, Default)]
pub struct ControllerConfigBuilder {
    config: ControllerConfig,
}

impl ControllerConfigBuilder {
    /// Create a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the playback-time poll period. Sub-millisecond parts are dropped
    /// and the period never goes below one millisecond.
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        let millis = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self.config.poll_interval_ms = millis.max(1);
        self
    }

    /// Set the element selector players mount into.
    #[must_use]
    pub fn component_tag(mut self, tag: impl Into<String>) -> Self {
        self.config.component_tag = tag.into();
        self
    }

    /// Set the embedded player height, `None` to let the plugin decide.
    #[must_use]
    pub const fn embedded_height(mut self, height: Option<u32>) -> Self {
        self.config.embedded_height = height;
        self
    }

    /// Set the default player id of `mode`.
    #[must_use]
    pub fn player_id(mut self, mode: PlayerMode, id: impl Into<PlayerId>) -> Self {
        match mode {
            PlayerMode::Embedded => self.config.embedded_player_id = id.into(),
            PlayerMode::Fullscreen => self.config.fullscreen_player_id = id.into(),
        }
        self
    }

    /// Build the config.
    #[must_use]
    pub fn build(self) -> ControllerConfig {
        self.config
    }
}
