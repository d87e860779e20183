use playerkit_player::{
    ControllerConfig, ControllerError, PlayerController, PlayerEvent, PlayerEventKind, PlayerId,
    PlayerMode, PluginCall, SessionState, SimulatedPlugin, UiCommand,
};
use std::time::Duration;

const URL: &str = "https://example.com/media/clip.mp4";

fn setup() -> (PlayerController<SimulatedPlugin>, SimulatedPlugin) {
    setup_with(ControllerConfig::default())
}

fn setup_with(config: ControllerConfig) -> (PlayerController<SimulatedPlugin>, SimulatedPlugin) {
    let plugin = SimulatedPlugin::new();
    let mut controller = PlayerController::new(plugin.clone(), config);
    plugin.connect(controller.handle());
    controller.form_mut().set_video_url(URL);
    (controller, plugin)
}

fn embedded() -> PlayerId {
    PlayerId::new("embeddedPlayer")
}

fn fullscreen() -> PlayerId {
    PlayerId::new("fullscreenPlayer")
}

#[tokio::test]
async fn empty_url_is_rejected_before_the_plugin() {
    let (mut controller, plugin) = setup();
    controller.form_mut().set_video_url("   ");

    let result = controller.play_mode(PlayerMode::Embedded).await;

    assert_eq!(result, Err(ControllerError::MissingUrl));
    assert_eq!(controller.board().status(), "Please enter a video URL");
    assert!(plugin.calls().is_empty());
    assert!(!controller.sessions().is_initialized(PlayerMode::Embedded));
}

#[tokio::test]
async fn first_play_initializes_exactly_once() {
    let (mut controller, plugin) = setup();

    controller.play_mode(PlayerMode::Embedded).await.unwrap();

    assert_eq!(
        plugin.calls(),
        vec![
            PluginCall::InitPlayer(embedded()),
            PluginCall::StopAllPlayers,
            PluginCall::Play(embedded()),
        ]
    );
    assert_eq!(controller.board().status(), "Video is playing");
    assert_eq!(controller.active_player(), Some(&embedded()));
    let player = plugin.player(&embedded()).unwrap();
    assert_eq!(player.url, URL);
    assert!(player.playing);
}

#[tokio::test]
async fn second_play_skips_initialization() {
    let (mut controller, plugin) = setup();
    controller.play_mode(PlayerMode::Embedded).await.unwrap();
    controller.drain().await;
    plugin.clear_calls();

    controller.play_mode(PlayerMode::Embedded).await.unwrap();

    assert_eq!(
        plugin.calls(),
        vec![PluginCall::StopAllPlayers, PluginCall::Play(embedded())]
    );
}

#[tokio::test]
async fn modes_are_initialized_separately() {
    let (mut controller, plugin) = setup();
    controller.play_mode(PlayerMode::Embedded).await.unwrap();
    controller.drain().await;
    plugin.clear_calls();

    controller.play_mode(PlayerMode::Fullscreen).await.unwrap();
    controller.drain().await;

    assert_eq!(plugin.calls()[0], PluginCall::InitPlayer(fullscreen()));
    assert!(!plugin.player(&embedded()).unwrap().playing);
    assert!(plugin.player(&fullscreen()).unwrap().playing);
    assert_eq!(controller.active_player(), Some(&fullscreen()));
    assert_eq!(controller.board().status(), "Player fullscreenPlayer is playing");
}

#[tokio::test]
async fn exit_event_forces_reinitialization() {
    let (mut controller, plugin) = setup();
    controller.play_mode(PlayerMode::Fullscreen).await.unwrap();
    controller.drain().await;

    plugin.dismiss(&fullscreen());
    controller.drain().await;

    assert_eq!(controller.board().status(), "Player has been dismissed");
    assert!(!controller.sessions().is_initialized(PlayerMode::Fullscreen));
    assert_eq!(
        controller.sessions().get(PlayerMode::Fullscreen).unwrap().state,
        SessionState::Exited
    );
    assert!(!controller.is_tracking());

    plugin.clear_calls();
    controller.play_mode(PlayerMode::Fullscreen).await.unwrap();
    assert_eq!(plugin.calls()[0], PluginCall::InitPlayer(fullscreen()));
}

#[tokio::test]
async fn toggle_muted_reads_once_and_writes_the_negation() {
    let (mut controller, plugin) = setup();
    controller.play_mode(PlayerMode::Embedded).await.unwrap();
    plugin.clear_calls();

    let muted = controller.toggle_muted(&embedded()).await.unwrap();

    assert_eq!(muted, Some(true));
    assert_eq!(
        plugin.calls(),
        vec![
            PluginCall::GetMuted(embedded()),
            PluginCall::SetMuted(embedded(), true),
        ]
    );
    assert_eq!(controller.board().status(), "Muted: true");

    plugin.set_muted_externally(&embedded(), false);
    assert_eq!(controller.toggle_muted(&embedded()).await.unwrap(), Some(true));
    assert!(plugin.player(&embedded()).unwrap().muted);
}

#[tokio::test]
async fn starting_tracking_twice_keeps_one_timer() {
    let (mut controller, _plugin) = setup();

    controller.start_tracking();
    let first = controller.tracker().unwrap().cancellation();
    controller.start_tracking();
    let second = controller.tracker().unwrap().cancellation();

    assert!(first.is_cancelled());
    assert!(!second.is_cancelled());

    controller.stop_tracking();
    assert!(second.is_cancelled());
    assert!(!controller.is_tracking());
}

#[tokio::test]
async fn failed_init_leaves_mode_uninitialized() {
    let (mut controller, plugin) = setup();
    plugin.fail_next_init();

    let result = controller.play_mode(PlayerMode::Embedded).await;

    assert_eq!(result, Err(ControllerError::InitFailed));
    assert_eq!(controller.board().status(), "Failed to initialize player");
    assert!(controller.sessions().get(PlayerMode::Embedded).is_none());
    assert_eq!(plugin.calls(), vec![PluginCall::InitPlayer(embedded())]);
}

#[tokio::test]
async fn rejected_init_reports_the_message() {
    let (mut controller, plugin) = setup();
    plugin.reject_next("no surface available");

    let result = controller
        .initialize(PlayerMode::Fullscreen, URL, None, Some(PlayerId::new("test-player")))
        .await;

    assert!(matches!(result, Err(ControllerError::Plugin(_))));
    assert_eq!(controller.board().status(), "Error: no surface available");
    assert!(controller.sessions().get(PlayerMode::Fullscreen).is_none());
}

#[tokio::test]
async fn initialize_uses_hint_and_reports_the_id() {
    let (mut controller, plugin) = setup();

    let id = controller
        .initialize(
            PlayerMode::Fullscreen,
            URL,
            Some("https://example.com/subs.vtt"),
            Some(PlayerId::new("test-player")),
        )
        .await
        .unwrap();

    assert_eq!(id.as_str(), "test-player");
    assert_eq!(
        controller.board().status(),
        "Player initialized. Player ID: test-player"
    );
    assert!(plugin.player(&id).is_some());

    controller.drain().await;
    assert_eq!(controller.board().status(), "Player test-player is ready");
}

#[tokio::test]
async fn ended_event_stops_tracking() {
    let (mut controller, plugin) = setup();
    controller.play_mode(PlayerMode::Embedded).await.unwrap();
    controller.drain().await;
    assert!(controller.is_tracking());

    plugin.finish(&embedded());
    controller.drain().await;

    assert_eq!(controller.board().status(), "Player embeddedPlayer has ended");
    assert!(!controller.is_tracking());
    assert!(!controller.sessions().is_initialized(PlayerMode::Embedded));
}

#[tokio::test]
async fn pause_event_stops_and_play_event_restarts_tracking() {
    let (mut controller, _plugin) = setup();
    controller.play_mode(PlayerMode::Embedded).await.unwrap();
    controller.drain().await;

    controller.pause(&embedded()).await.unwrap();
    assert_eq!(controller.board().status(), "Video is paused");
    controller.drain().await;
    assert_eq!(controller.board().status(), "Player embeddedPlayer is paused");
    assert!(!controller.is_tracking());

    controller.play(&embedded()).await.unwrap();
    controller.drain().await;
    assert!(controller.is_tracking());
    assert_eq!(
        controller.sessions().get(PlayerMode::Embedded).unwrap().state,
        SessionState::Playing
    );
}

#[tokio::test]
async fn commands_for_uninitialized_players_are_ignored() {
    let (mut controller, plugin) = setup();
    let ghost = PlayerId::new("ghost");

    controller.play(&ghost).await.unwrap();
    controller.pause(&ghost).await.unwrap();
    controller.stop(&ghost).await.unwrap();
    assert_eq!(controller.get_volume(&ghost).await.unwrap(), None);
    assert_eq!(controller.toggle_muted(&ghost).await.unwrap(), None);
    controller.handle_command(UiCommand::Pause).await;

    assert!(plugin.calls().is_empty());
    assert_eq!(controller.board().status(), "");
}

#[tokio::test]
async fn events_for_untracked_players_are_ignored() {
    let (mut controller, _plugin) = setup();
    controller.play_mode(PlayerMode::Embedded).await.unwrap();
    controller.drain().await;
    let before = controller.board().clone();

    controller.handle_event(PlayerEvent::new(PlayerEventKind::Exit, "somebody-else"));
    controller.handle_event(PlayerEvent::new(PlayerEventKind::Ended, "somebody-else"));

    assert_eq!(controller.board(), &before);
    assert!(controller.sessions().is_initialized(PlayerMode::Embedded));
    assert!(controller.is_tracking());
}

#[tokio::test]
async fn rejected_playback_is_reported_without_retry() {
    let (mut controller, plugin) = setup();
    controller
        .initialize(PlayerMode::Embedded, URL, None, None)
        .await
        .unwrap();
    plugin.clear_calls();
    plugin.reject_next("decoder crashed");

    let result = controller.play_mode(PlayerMode::Embedded).await;

    assert!(result.is_err());
    assert_eq!(controller.board().status(), "Playback error: decoder crashed");
    assert_eq!(plugin.calls(), vec![PluginCall::StopAllPlayers]);
    assert!(controller.sessions().is_initialized(PlayerMode::Embedded));
}

#[tokio::test]
async fn stop_requires_reinitialization() {
    let (mut controller, plugin) = setup();
    controller.play_mode(PlayerMode::Embedded).await.unwrap();
    controller.drain().await;

    controller.stop(&embedded()).await.unwrap();

    assert_eq!(controller.board().status(), "Video is stopped");
    assert!(!controller.is_tracking());
    plugin.clear_calls();
    controller.play(&embedded()).await.unwrap();
    assert!(plugin.calls().is_empty());
}

#[tokio::test]
async fn volume_is_validated_and_mirrored() {
    let (mut controller, plugin) = setup();
    controller.play_mode(PlayerMode::Embedded).await.unwrap();
    plugin.clear_calls();

    for level in [1.5, -0.1, f32::NAN] {
        let result = controller.set_volume(&embedded(), level).await;
        assert!(matches!(result, Err(ControllerError::VolumeOutOfRange(_))));
    }
    assert_eq!(
        controller.board().status(),
        "Volume must be between 0.0 and 1.0"
    );
    assert!(plugin.calls().is_empty());

    controller.set_volume(&embedded(), 0.5).await.unwrap();
    assert_eq!(plugin.calls(), vec![PluginCall::SetVolume(embedded(), 0.5)]);
    assert_eq!(controller.get_volume(&embedded()).await.unwrap(), Some(0.5));
    assert_eq!(controller.board().status(), "Current volume: 0.5");
    let session = controller.sessions().get(PlayerMode::Embedded).unwrap();
    assert!((session.volume - 0.5).abs() < f32::EPSILON);
}

#[tokio::test]
async fn poll_updates_time_only_while_playing() {
    let (mut controller, plugin) = setup();
    assert_eq!(controller.poll_current_time().await, None);
    assert!(plugin.calls().is_empty());

    controller.play_mode(PlayerMode::Embedded).await.unwrap();
    controller.drain().await;
    plugin.advance(12.6);

    assert_eq!(controller.poll_current_time().await, Some(12.6));
    assert_eq!(controller.board().current_time(), "13");

    controller.pause(&embedded()).await.unwrap();
    controller.drain().await;
    plugin.clear_calls();
    assert_eq!(controller.poll_current_time().await, None);
    assert_eq!(plugin.calls(), vec![PluginCall::IsPlaying(embedded())]);
    assert_eq!(controller.board().current_time(), "13");
}

#[tokio::test]
async fn tracker_ticks_refresh_the_time_readout() {
    let config = ControllerConfig::builder()
        .poll_interval(Duration::from_millis(10))
        .build();
    let (mut controller, plugin) = setup_with(config);
    controller.play_mode(PlayerMode::Embedded).await.unwrap();
    controller.drain().await;
    plugin.advance(3.2);

    tokio::time::timeout(Duration::from_secs(2), async {
        while controller.board().current_time() != "3" {
            controller.drain().await;
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("a tick refreshed the readout");
}

#[tokio::test]
async fn run_processes_queued_commands_until_closed() {
    let (mut controller, plugin) = setup();
    controller.form_mut().set_video_url("");
    let handle = controller.handle();

    handle.send_command(UiCommand::SetVideoUrl(URL.into()));
    handle.send_command(UiCommand::PlayMode(PlayerMode::Fullscreen));
    handle.send_command(UiCommand::SetVolume(0.25));
    handle.close();
    controller.run().await;

    assert!(handle.is_closed());
    assert!(!handle.send_command(UiCommand::Pause));
    assert_eq!(controller.board().status(), "Volume set to 0.25");
    assert!(!controller.is_tracking());
    assert_eq!(plugin.player(&fullscreen()).unwrap().volume, 0.25);
}

#[tokio::test]
async fn zero_poll_interval_from_json_still_ticks() {
    let config: ControllerConfig = serde_json::from_str(r#"{"pollIntervalMs":0}"#).unwrap();
    let (mut controller, plugin) = setup_with(config);
    controller.play_mode(PlayerMode::Embedded).await.unwrap();
    controller.drain().await;
    assert!(controller.is_tracking());
    plugin.advance(5.0);

    tokio::time::timeout(Duration::from_secs(2), async {
        while controller.board().current_time() != "5" {
            controller.drain().await;
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("a tick refreshed the readout");
}

#[tokio::test]
async fn events_for_the_previous_mode_keep_the_new_timer() {
    let (mut controller, _plugin) = setup();
    controller.play_mode(PlayerMode::Embedded).await.unwrap();
    controller.drain().await;
    controller.play_mode(PlayerMode::Fullscreen).await.unwrap();
    controller.drain().await;
    assert_eq!(controller.active_player(), Some(&fullscreen()));
    assert!(controller.is_tracking());

    controller.handle_event(PlayerEvent::new(PlayerEventKind::Pause, embedded()));
    assert!(controller.is_tracking());
    assert_eq!(
        controller.sessions().get(PlayerMode::Embedded).unwrap().state,
        SessionState::Paused
    );

    controller.handle_event(PlayerEvent::new(PlayerEventKind::Ended, embedded()));
    assert!(controller.is_tracking());
    assert!(!controller.sessions().is_initialized(PlayerMode::Embedded));
    assert_eq!(controller.active_player(), Some(&fullscreen()));
}

#[tokio::test]
async fn exit_of_the_active_mode_stops_tracking() {
    let (mut controller, plugin) = setup();
    controller.play_mode(PlayerMode::Embedded).await.unwrap();
    controller.drain().await;
    controller.play_mode(PlayerMode::Fullscreen).await.unwrap();
    controller.drain().await;
    assert!(controller.is_tracking());

    plugin.dismiss(&fullscreen());
    controller.drain().await;

    assert_eq!(controller.board().status(), "Player has been dismissed");
    assert!(controller.sessions().is_initialized(PlayerMode::Embedded));
    assert_eq!(controller.active_player(), None);
    assert!(!controller.is_tracking());
}
