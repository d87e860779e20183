//! In-memory stand-in for the native player plugin.
//!
//! [`SimulatedPlugin`] keeps per-player state, logs every call and emits
//! lifecycle events to a connected controller the way the native bridge does.

use crate::{
    ControllerHandle, InitOptions, InitResponse, PlayerEvent, PlayerEventKind, PlayerId,
    PlayerMode, PluginError, VideoPlayerPlugin,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// A call received by a [`SimulatedPlugin`].
#[derive(Debug, Clone, PartialEq)]
pub enum PluginCall {
    /// `init_player` for the requested id.
    InitPlayer(PlayerId),
    /// `play`.
    Play(PlayerId),
    /// `pause`.
    Pause(PlayerId),
    /// `stop`.
    Stop(PlayerId),
    /// `stop_all_players`.
    StopAllPlayers,
    /// `get_volume`.
    GetVolume(PlayerId),
    /// `set_volume`.
    SetVolume(PlayerId, f32),
    /// `get_muted`.
    GetMuted(PlayerId),
    /// `set_muted`.
    SetMuted(PlayerId, bool),
    /// `get_current_time`.
    GetCurrentTime(PlayerId),
    /// `is_playing`.
    IsPlaying(PlayerId),
}

/// State of one simulated player.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedPlayer {
    /// Mode the player was created in.
    pub mode: PlayerMode,
    /// Video URL it was created with.
    pub url: String,
    /// Whether it is playing.
    pub playing: bool,
    /// Whether it is muted.
    pub muted: bool,
    /// Volume in `0.0..=1.0`.
    pub volume: f32,
    /// Playback position in seconds.
    pub position: f64,
}

#[derive(Debug, Default)]
struct SimState {
    players: HashMap<PlayerId, SimulatedPlayer>,
    calls: Vec<PluginCall>,
    fail_next_init: bool,
    reject_next: Option<String>,
    events: Option<ControllerHandle>,
}

impl SimState {
    fn begin(&mut self, call: PluginCall) -> Result<(), PluginError> {
        self.calls.push(call);
        self.reject_next.take().map_or(Ok(()), |msg| Err(PluginError::Rejected(msg)))
    }

    fn player_mut(&mut self, id: &PlayerId) -> Result<&mut SimulatedPlayer, PluginError> {
        self.players
            .get_mut(id)
            .ok_or_else(|| PluginError::PlayerNotFound(id.clone()))
    }

    fn emit(&self, kind: PlayerEventKind, id: &PlayerId) {
        if let Some(events) = &self.events {
            events.send_event(PlayerEvent::new(kind, id.clone()));
        }
    }
}

/// In-memory video player plugin.
///
/// Clones share state, so a test can keep one clone to drive and inspect
/// the plugin while a controller owns another.
#[derive(Debug, Clone, Default)]
pub struct SimulatedPlugin {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedPlugin {
    /// Create a plugin with no players.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().expect("simulated plugin mutex poisoned")
    }

    /// Deliver lifecycle events to `handle` from now on.
    pub fn connect(&self, handle: ControllerHandle) {
        self.lock().events = Some(handle);
    }

    /// Answer the next `init_player` with a failed result.
    pub fn fail_next_init(&self) {
        self.lock().fail_next_init = true;
    }

    /// Reject the next call of any kind with `message`.
    pub fn reject_next(&self, message: impl Into<String>) {
        self.lock().reject_next = Some(message.into());
    }

    /// Calls received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<PluginCall> {
        self.lock().calls.clone()
    }

    /// Forget the recorded calls.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Snapshot of the player registered under `id`.
    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<SimulatedPlayer> {
        self.lock().players.get(id).cloned()
    }

    /// Move every playing player forward by `seconds`.
    pub fn advance(&self, seconds: f64) {
        for player in self.lock().players.values_mut().filter(|p| p.playing) {
            player.position += seconds;
        }
    }

    /// Change the mute state from outside the controller, as the system
    /// volume controls would.
    pub fn set_muted_externally(&self, id: &PlayerId, muted: bool) {
        if let Some(player) = self.lock().players.get_mut(id) {
            player.muted = muted;
        }
    }

    /// Let the media of `id` play to the end.
    pub fn finish(&self, id: &PlayerId) {
        let mut state = self.lock();
        if let Some(player) = state.players.get_mut(id) {
            player.playing = false;
            state.emit(PlayerEventKind::Ended, id);
        }
    }

    /// Dismiss the surface of `id`, as the user closing a fullscreen player.
    pub fn dismiss(&self, id: &PlayerId) {
        let mut state = self.lock();
        if state.players.remove(id).is_some() {
            state.emit(PlayerEventKind::Exit, id);
        }
    }
}

impl VideoPlayerPlugin for SimulatedPlugin {
    async fn init_player(&self, options: &InitOptions) -> Result<InitResponse, PluginError> {
        let mut state = self.lock();
        let id = options.player_id.clone();
        state.begin(PluginCall::InitPlayer(id.clone()))?;
        if std::mem::take(&mut state.fail_next_init) {
            return Ok(InitResponse::failed("player could not be created"));
        }
        state.players.insert(
            id.clone(),
            SimulatedPlayer {
                mode: options.mode,
                url: options.url.clone(),
                playing: false,
                muted: false,
                volume: 1.0,
                position: 0.0,
            },
        );
        state.emit(PlayerEventKind::Ready, &id);
        Ok(InitResponse::created(id))
    }

    async fn play(&self, player_id: &PlayerId) -> Result<(), PluginError> {
        let mut state = self.lock();
        state.begin(PluginCall::Play(player_id.clone()))?;
        state.player_mut(player_id)?.playing = true;
        state.emit(PlayerEventKind::Play, player_id);
        Ok(())
    }

    async fn pause(&self, player_id: &PlayerId) -> Result<(), PluginError> {
        let mut state = self.lock();
        state.begin(PluginCall::Pause(player_id.clone()))?;
        state.player_mut(player_id)?.playing = false;
        state.emit(PlayerEventKind::Pause, player_id);
        Ok(())
    }

    async fn stop(&self, player_id: &PlayerId) -> Result<(), PluginError> {
        let mut state = self.lock();
        state.begin(PluginCall::Stop(player_id.clone()))?;
        let player = state.player_mut(player_id)?;
        player.playing = false;
        player.position = 0.0;
        Ok(())
    }

    async fn stop_all_players(&self) -> Result<(), PluginError> {
        let mut state = self.lock();
        state.begin(PluginCall::StopAllPlayers)?;
        let mut stopped = Vec::new();
        for (id, player) in &mut state.players {
            if player.playing {
                player.playing = false;
                stopped.push(id.clone());
            }
        }
        for id in &stopped {
            state.emit(PlayerEventKind::Pause, id);
        }
        Ok(())
    }

    async fn get_volume(&self, player_id: &PlayerId) -> Result<f32, PluginError> {
        let mut state = self.lock();
        state.begin(PluginCall::GetVolume(player_id.clone()))?;
        Ok(state.player_mut(player_id)?.volume)
    }

    async fn set_volume(&self, player_id: &PlayerId, volume: f32) -> Result<(), PluginError> {
        let mut state = self.lock();
        state.begin(PluginCall::SetVolume(player_id.clone(), volume))?;
        state.player_mut(player_id)?.volume = volume;
        Ok(())
    }

    async fn get_muted(&self, player_id: &PlayerId) -> Result<bool, PluginError> {
        let mut state = self.lock();
        state.begin(PluginCall::GetMuted(player_id.clone()))?;
        Ok(state.player_mut(player_id)?.muted)
    }

    async fn set_muted(&self, player_id: &PlayerId, muted: bool) -> Result<(), PluginError> {
        let mut state = self.lock();
        state.begin(PluginCall::SetMuted(player_id.clone(), muted))?;
        state.player_mut(player_id)?.muted = muted;
        Ok(())
    }

    async fn get_current_time(&self, player_id: &PlayerId) -> Result<f64, PluginError> {
        let mut state = self.lock();
        state.begin(PluginCall::GetCurrentTime(player_id.clone()))?;
        Ok(state.player_mut(player_id)?.position)
    }

    async fn is_playing(&self, player_id: &PlayerId) -> Result<bool, PluginError> {
        let mut state = self.lock();
        state.begin(PluginCall::IsPlaying(player_id.clone()))?;
        Ok(state.player_mut(player_id)?.playing)
    }
}
