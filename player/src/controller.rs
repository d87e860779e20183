//! Player-session controller.
//!
//! The controller owns the UI surface ([`PlayerForm`] and [`StatusBoard`]),
//! the per-mode [`Sessions`] and the poll timer. Commands from the UI, plugin
//! lifecycle events and timer ticks all arrive through one inbox and are
//! handled one at a time, so no two handlers ever interleave.

use crate::{
    ControllerConfig, ControllerError, InitOptions, PlaybackTracker, PlayerEvent,
    PlayerEventKind, PlayerForm, PlayerId, PlayerMode, Session, SessionState, Sessions,
    StatusBoard, VideoPlayerPlugin,
};
use async_channel::{Receiver, Sender};
use log::{debug, warn};
use playerkit_video::VideoExtension;

/// A button press or input change on the player UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    /// The video URL field changed.
    SetVideoUrl(String),
    /// The subtitle URL field changed.
    SetSubtitleUrl(Option<String>),
    /// Play in the given mode, initializing it first if needed.
    PlayMode(PlayerMode),
    /// Pause the current player.
    Pause,
    /// Stop the current player.
    Stop,
    /// Show the volume of the current player.
    GetVolume,
    /// Set the volume of the current player.
    SetVolume(f32),
    /// Show the mute state of the current player.
    GetMuted,
    /// Flip the mute state of the current player.
    ToggleMuted,
}

/// Anything the controller loop processes.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerInput {
    /// Input from the UI.
    Command(UiCommand),
    /// Lifecycle event from the plugin.
    Event(PlayerEvent),
    /// Poll timer tick.
    Tick,
}

/// Cloneable sender side of a controller's inbox.
///
/// UI bindings and plugin event bridges hold one of these.
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    inbox: Sender<ControllerInput>,
}

impl ControllerHandle {
    /// Queue an input. Returns `false` if the controller has shut down.
    pub fn send(&self, input: ControllerInput) -> bool {
        match self.inbox.try_send(input) {
            Ok(()) => true,
            Err(err) => {
                debug!("dropping controller input: {err}");
                false
            }
        }
    }

    /// Queue a UI command.
    pub fn send_command(&self, command: UiCommand) -> bool {
        self.send(ControllerInput::Command(command))
    }

    /// Queue a plugin lifecycle event.
    pub fn send_event(&self, event: PlayerEvent) -> bool {
        self.send(ControllerInput::Event(event))
    }

    /// Shut the inbox. [`PlayerController::run`] returns once the inputs
    /// already queued are handled.
    pub fn close(&self) {
        self.inbox.close();
    }

    /// Whether the inbox was shut.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inbox.is_closed()
    }
}

#[derive(Debug, Clone, Copy)]
enum Transport {
    Play,
    Pause,
    Stop,
}

impl Transport {
    const fn status(self) -> &'static str {
        match self {
            Self::Play => "Video is playing",
            Self::Pause => "Video is paused",
            Self::Stop => "Video is stopped",
        }
    }
}

/// Keeps player sessions and the status display in sync with a plugin.
///
/// # Example
///
/// ```no_run
/// use playerkit_player::{
///     ControllerConfig, PlayerController, PlayerMode, SimulatedPlugin, UiCommand,
/// };
///
/// # async fn demo() {
/// let plugin = SimulatedPlugin::new();
/// let mut controller = PlayerController::new(plugin.clone(), ControllerConfig::default());
/// let handle = controller.handle();
/// plugin.connect(handle.clone());
///
/// handle.send_command(UiCommand::SetVideoUrl("https://example.com/a.mp4".into()));
/// handle.send_command(UiCommand::PlayMode(PlayerMode::Fullscreen));
/// handle.close();
/// controller.run().await;
/// # }
/// ```
pub struct PlayerController<P> {
    plugin: P,
    config: ControllerConfig,
    form: PlayerForm,
    sessions: Sessions,
    active: Option<PlayerMode>,
    board: StatusBoard,
    tracker: Option<PlaybackTracker>,
    inbox: Sender<ControllerInput>,
    inputs: Receiver<ControllerInput>,
}

impl<P> std::fmt::Debug for PlayerController<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerController")
            .field("config", &self.config)
            .field("sessions", &self.sessions)
            .field("active", &self.active)
            .field("board", &self.board)
            .field("tracking", &self.tracker.is_some())
            .finish_non_exhaustive()
    }
}

impl<P: VideoPlayerPlugin> PlayerController<P> {
    /// Create a controller driving `plugin`.
    pub fn new(plugin: P, config: ControllerConfig) -> Self {
        let (inbox, inputs) = async_channel::unbounded();
        Self {
            plugin,
            config,
            form: PlayerForm::default(),
            sessions: Sessions::default(),
            active: None,
            board: StatusBoard::default(),
            tracker: None,
            inbox,
            inputs,
        }
    }

    /// A sender for this controller's inbox.
    #[must_use]
    pub fn handle(&self) -> ControllerHandle {
        ControllerHandle {
            inbox: self.inbox.clone(),
        }
    }

    /// The driven plugin.
    pub const fn plugin(&self) -> &P {
        &self.plugin
    }

    /// Controller settings.
    pub const fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// UI input fields.
    pub const fn form(&self) -> &PlayerForm {
        &self.form
    }

    /// UI input fields, for bindings that write them directly.
    pub const fn form_mut(&mut self) -> &mut PlayerForm {
        &mut self.form
    }

    /// UI output regions.
    pub const fn board(&self) -> &StatusBoard {
        &self.board
    }

    /// Tracked sessions.
    pub const fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    /// The running poll timer, if any.
    pub const fn tracker(&self) -> Option<&PlaybackTracker> {
        self.tracker.as_ref()
    }

    /// Whether the poll timer is running.
    pub const fn is_tracking(&self) -> bool {
        self.tracker.is_some()
    }

    /// Id of the most recently played session, if it is still initialized.
    pub fn active_player(&self) -> Option<&PlayerId> {
        self.active
            .and_then(|mode| self.sessions.get(mode))
            .filter(|session| session.initialized())
            .map(|session| &session.id)
    }

    /// Player that mode-less UI commands address: the active one, else any
    /// initialized one.
    fn current_player(&self) -> Option<PlayerId> {
        self.active_player()
            .or_else(|| {
                self.sessions
                    .iter()
                    .find(|session| session.initialized())
                    .map(|session| &session.id)
            })
            .cloned()
    }

    fn live_mode(&self, id: &PlayerId) -> Option<PlayerMode> {
        self.sessions
            .find(id)
            .filter(|session| session.initialized())
            .map(|session| session.mode)
    }

    fn set_status(&mut self, text: impl Into<String>) {
        self.board.set_status(text.into());
    }

    fn set_state(&mut self, mode: PlayerMode, state: SessionState) {
        if let Some(session) = self.sessions.slot_mut(mode) {
            session.state = state;
        }
    }

    /// Create a player for `mode`.
    ///
    /// Without a hint the player id comes from the config. The session is
    /// recorded only once the plugin reports success.
    ///
    /// # Errors
    /// [`ControllerError::MissingUrl`] for a blank `url` (nothing is sent to
    /// the plugin), [`ControllerError::InitFailed`] when the plugin reports
    /// failure and [`ControllerError::Plugin`] when it rejects the call.
    pub async fn initialize(
        &mut self,
        mode: PlayerMode,
        url: &str,
        subtitle_url: Option<&str>,
        player_id_hint: Option<PlayerId>,
    ) -> Result<PlayerId, ControllerError> {
        let url = url.trim();
        if url.is_empty() {
            let err = ControllerError::MissingUrl;
            self.set_status(err.to_string());
            return Err(err);
        }

        let player_id = player_id_hint.unwrap_or_else(|| self.config.player_id(mode).clone());
        let mime_type = VideoExtension::from_url(url).map(VideoExtension::mime_type);
        if mime_type.is_none() {
            debug!("no known video extension in {url}");
        }
        let options = InitOptions {
            mode,
            url: url.to_owned(),
            subtitle_url: subtitle_url
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
            player_id: player_id.clone(),
            component_tag: self.config.component_tag.clone(),
            height: self.config.height(mode),
            mime_type,
        };

        self.set_status("Initializing player...");
        match self.plugin.init_player(&options).await {
            Ok(response) if response.result => {
                let id = response.player_id.unwrap_or(player_id);
                *self.sessions.slot_mut(mode) = Some(Session::new(id.clone(), mode));
                self.set_status(format!("Player initialized. Player ID: {id}"));
                Ok(id)
            }
            Ok(response) => {
                if let Some(message) = response.message {
                    debug!("init of {player_id} failed: {message}");
                }
                let err = ControllerError::InitFailed;
                self.set_status(err.to_string());
                Err(err)
            }
            Err(err) => {
                self.set_status(format!("Error: {err}"));
                Err(err.into())
            }
        }
    }

    /// Play in `mode`, initializing it from the form first if needed.
    ///
    /// Every other player is stopped first so at most one plays at a time.
    ///
    /// # Errors
    /// Any error of [`initialize`](Self::initialize), or
    /// [`ControllerError::Plugin`] when stopping or playing is rejected.
    pub async fn play_mode(&mut self, mode: PlayerMode) -> Result<(), ControllerError> {
        let player_id = match self.sessions.get(mode).filter(|s| s.initialized()) {
            Some(session) => session.id.clone(),
            None => {
                let url = self.form.video_url().to_owned();
                let subtitle_url = self.form.subtitle_url().map(str::to_owned);
                self.initialize(mode, &url, subtitle_url.as_deref(), None)
                    .await?
            }
        };

        let played = match self.plugin.stop_all_players().await {
            Ok(()) => self.plugin.play(&player_id).await,
            Err(err) => Err(err),
        };
        if let Err(err) = played {
            self.set_status(format!("Playback error: {err}"));
            return Err(err.into());
        }
        self.active = Some(mode);
        self.set_status(Transport::Play.status());
        Ok(())
    }

    async fn transport(&mut self, id: &PlayerId, action: Transport) -> Result<(), ControllerError> {
        let Some(mode) = self.live_mode(id) else {
            debug!("ignoring {action:?} for {id}: player not initialized");
            return Ok(());
        };

        let result = match action {
            Transport::Play => self.plugin.play(id).await,
            Transport::Pause => self.plugin.pause(id).await,
            Transport::Stop => self.plugin.stop(id).await,
        };
        if let Err(err) = result {
            self.set_status(format!("Playback error: {err}"));
            return Err(err.into());
        }

        match action {
            Transport::Play => self.active = Some(mode),
            Transport::Pause => {}
            Transport::Stop => {
                self.set_state(mode, SessionState::Stopped);
                self.release_tracking_if_idle();
            }
        }
        self.set_status(action.status());
        Ok(())
    }

    /// Resume or start playback of an initialized player.
    ///
    /// Ignored when `id` is not an initialized session.
    ///
    /// # Errors
    /// [`ControllerError::Plugin`] when the plugin rejects the call.
    pub async fn play(&mut self, id: &PlayerId) -> Result<(), ControllerError> {
        self.transport(id, Transport::Play).await
    }

    /// Pause an initialized player.
    ///
    /// Ignored when `id` is not an initialized session.
    ///
    /// # Errors
    /// [`ControllerError::Plugin`] when the plugin rejects the call.
    pub async fn pause(&mut self, id: &PlayerId) -> Result<(), ControllerError> {
        self.transport(id, Transport::Pause).await
    }

    /// Stop an initialized player. The session must be initialized again
    /// before it can play.
    ///
    /// Ignored when `id` is not an initialized session.
    ///
    /// # Errors
    /// [`ControllerError::Plugin`] when the plugin rejects the call.
    pub async fn stop(&mut self, id: &PlayerId) -> Result<(), ControllerError> {
        self.transport(id, Transport::Stop).await
    }

    /// Read the volume of a player. `None` when `id` is not initialized.
    ///
    /// # Errors
    /// [`ControllerError::Plugin`] when the plugin rejects the call.
    pub async fn get_volume(&mut self, id: &PlayerId) -> Result<Option<f32>, ControllerError> {
        if self.live_mode(id).is_none() {
            debug!("ignoring volume read for {id}: player not initialized");
            return Ok(None);
        }
        match self.plugin.get_volume(id).await {
            Ok(volume) => {
                if let Some(session) = self.sessions.find_mut(id) {
                    session.volume = volume;
                }
                self.set_status(format!("Current volume: {volume}"));
                Ok(Some(volume))
            }
            Err(err) => {
                self.set_status(format!("Error: {err}"));
                Err(err.into())
            }
        }
    }

    /// Set the volume of a player. The written value is not read back.
    ///
    /// # Errors
    /// [`ControllerError::VolumeOutOfRange`] unless `level` is within
    /// `0.0..=1.0` (nothing is sent to the plugin), [`ControllerError::Plugin`]
    /// when the plugin rejects the call.
    pub async fn set_volume(&mut self, id: &PlayerId, level: f32) -> Result<(), ControllerError> {
        if !(0.0..=1.0).contains(&level) {
            let err = ControllerError::VolumeOutOfRange(level);
            self.set_status(err.to_string());
            return Err(err);
        }
        if self.live_mode(id).is_none() {
            debug!("ignoring volume change for {id}: player not initialized");
            return Ok(());
        }
        if let Err(err) = self.plugin.set_volume(id, level).await {
            self.set_status(format!("Error: {err}"));
            return Err(err.into());
        }
        if let Some(session) = self.sessions.find_mut(id) {
            session.volume = level;
        }
        self.set_status(format!("Volume set to {level}"));
        Ok(())
    }

    /// Read the mute state of a player. `None` when `id` is not initialized.
    ///
    /// # Errors
    /// [`ControllerError::Plugin`] when the plugin rejects the call.
    pub async fn get_muted(&mut self, id: &PlayerId) -> Result<Option<bool>, ControllerError> {
        if self.live_mode(id).is_none() {
            debug!("ignoring mute read for {id}: player not initialized");
            return Ok(None);
        }
        match self.plugin.get_muted(id).await {
            Ok(muted) => {
                if let Some(session) = self.sessions.find_mut(id) {
                    session.muted = muted;
                }
                self.set_status(format!("Muted: {muted}"));
                Ok(Some(muted))
            }
            Err(err) => {
                self.set_status(format!("Error: {err}"));
                Err(err.into())
            }
        }
    }

    /// Flip the mute state of a player and return the new state. `None` when
    /// `id` is not initialized.
    ///
    /// One read, then one write of its negation. A mute change made by
    /// someone else between the two is overwritten.
    ///
    /// # Errors
    /// [`ControllerError::Plugin`] when either call is rejected.
    pub async fn toggle_muted(&mut self, id: &PlayerId) -> Result<Option<bool>, ControllerError> {
        if self.live_mode(id).is_none() {
            debug!("ignoring mute toggle for {id}: player not initialized");
            return Ok(None);
        }
        let toggled = match self.plugin.get_muted(id).await {
            Ok(muted) => self.plugin.set_muted(id, !muted).await.map(|()| !muted),
            Err(err) => Err(err),
        };
        match toggled {
            Ok(muted) => {
                if let Some(session) = self.sessions.find_mut(id) {
                    session.muted = muted;
                }
                self.set_status(format!("Muted: {muted}"));
                Ok(Some(muted))
            }
            Err(err) => {
                self.set_status(format!("Error: {err}"));
                Err(err.into())
            }
        }
    }

    /// Apply a lifecycle event from the plugin.
    ///
    /// Events for players that are not initialized sessions are ignored.
    pub fn handle_event(&mut self, event: PlayerEvent) {
        let PlayerEvent { kind, player_id } = event;
        let Some(mode) = self.live_mode(&player_id) else {
            debug!("ignoring {kind} event for untracked player {player_id}");
            return;
        };
        let is_active = self.active.is_none_or(|active| active == mode);

        match kind {
            PlayerEventKind::Ready => {
                self.set_status(format!("Player {player_id} is ready"));
            }
            PlayerEventKind::Play => {
                self.set_state(mode, SessionState::Playing);
                self.active = Some(mode);
                self.set_status(format!("Player {player_id} is playing"));
                self.start_tracking();
            }
            PlayerEventKind::Pause => {
                self.set_state(mode, SessionState::Paused);
                self.set_status(format!("Player {player_id} is paused"));
                if is_active {
                    self.stop_tracking();
                }
            }
            PlayerEventKind::Ended => {
                self.set_state(mode, SessionState::Ended);
                self.set_status(format!("Player {player_id} has ended"));
                if is_active {
                    self.stop_tracking();
                }
                self.release_tracking_if_idle();
            }
            PlayerEventKind::Exit => {
                self.set_state(mode, SessionState::Exited);
                self.set_status("Player has been dismissed");
                if is_active {
                    self.stop_tracking();
                }
                self.release_tracking_if_idle();
            }
        }
    }

    /// Refresh the time readout from the active player.
    ///
    /// Does nothing when no session is active or the player is not playing.
    /// Returns the position read, if any.
    pub async fn poll_current_time(&mut self) -> Option<f64> {
        let id = self.active_player()?.clone();
        match self.plugin.is_playing(&id).await {
            Ok(true) => {}
            Ok(false) => return None,
            Err(err) => {
                warn!("could not poll {id}: {err}");
                return None;
            }
        }
        let seconds = match self.plugin.get_current_time(&id).await {
            Ok(seconds) => seconds,
            Err(err) => {
                warn!("could not read current time of {id}: {err}");
                return None;
            }
        };
        if let Some(session) = self.sessions.find_mut(&id) {
            session.current_time = seconds;
        }
        self.board
            .set_current_time(format!("{}", seconds.max(0.0).round()));
        Some(seconds)
    }

    /// Start the poll timer, replacing any running one.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start_tracking(&mut self) {
        self.stop_tracking();
        self.tracker = Some(PlaybackTracker::spawn(
            self.config.poll_interval(),
            self.inbox.clone(),
        ));
    }

    /// Stop the poll timer if it runs.
    pub fn stop_tracking(&mut self) {
        if let Some(tracker) = self.tracker.take() {
            tracker.cancel();
        }
    }

    fn release_tracking_if_idle(&mut self) {
        if !self.sessions.any_initialized() {
            self.stop_tracking();
        }
    }

    /// Apply a UI command to the form or the current player.
    ///
    /// Failures have already been reported on the status board and are only
    /// logged here.
    pub async fn handle_command(&mut self, command: UiCommand) {
        let result = match command {
            UiCommand::SetVideoUrl(url) => {
                self.form.set_video_url(url);
                return;
            }
            UiCommand::SetSubtitleUrl(url) => {
                self.form.set_subtitle_url(url);
                return;
            }
            UiCommand::PlayMode(mode) => self.play_mode(mode).await,
            command => self.player_command(command).await,
        };
        if let Err(err) = result {
            debug!("command failed: {err}");
        }
    }

    async fn player_command(&mut self, command: UiCommand) -> Result<(), ControllerError> {
        let Some(id) = self.current_player() else {
            debug!("ignoring {command:?}: no player initialized");
            return Ok(());
        };
        match command {
            UiCommand::Pause => self.pause(&id).await,
            UiCommand::Stop => self.stop(&id).await,
            UiCommand::GetVolume => self.get_volume(&id).await.map(drop),
            UiCommand::SetVolume(level) => self.set_volume(&id, level).await,
            UiCommand::GetMuted => self.get_muted(&id).await.map(drop),
            UiCommand::ToggleMuted => self.toggle_muted(&id).await.map(drop),
            UiCommand::SetVideoUrl(_) | UiCommand::SetSubtitleUrl(_) | UiCommand::PlayMode(_) => {
                Ok(())
            }
        }
    }

    /// Handle one input.
    pub async fn dispatch(&mut self, input: ControllerInput) {
        match input {
            ControllerInput::Command(command) => self.handle_command(command).await,
            ControllerInput::Event(event) => self.handle_event(event),
            ControllerInput::Tick => {
                self.poll_current_time().await;
            }
        }
    }

    /// Handle every input already queued, without waiting for new ones.
    /// Returns how many were handled.
    pub async fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(input) = self.inputs.try_recv() {
            self.dispatch(input).await;
            handled += 1;
        }
        handled
    }

    /// Handle inputs until the inbox is closed, then stop the poll timer.
    pub async fn run(&mut self) {
        while let Ok(input) = self.inputs.recv().await {
            self.dispatch(input).await;
        }
        self.stop_tracking();
    }
}
