use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use playerkit_player::{
    ControllerConfig, PlayerController, PlayerMode, SimulatedPlugin, UiCommand,
};
use playerkit_video::mime_type_for;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

type Controller = PlayerController<SimulatedPlugin>;

const HELP: &str = "\
buttons:
  url <url>          set the video URL field
  subtitle [url]     set or clear the subtitle URL field
  play-embedded      play in the embedded player
  play-fullscreen    play in the fullscreen player
  pause | stop
  get-volume | set-volume <0.0-1.0>
  get-muted | toggle-muted
  end                let the current video reach its end
  exit               dismiss the current player
  help | quit";

#[derive(Parser)]
#[command(name = "playerkit-demo")]
#[command(about = "Drive a simulated video player through the session controller", long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Settings {
    /// JSON file with controller settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Playback-time poll period in milliseconds
    #[arg(long, global = true)]
    poll_ms: Option<u64>,

    /// Selector of the element players mount into
    #[arg(long, global = true)]
    component_tag: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the demo page's button sequence against a simulated plugin
    Script {
        /// Video URL to play
        #[arg(long)]
        url: String,
        /// Subtitle URL
        #[arg(long)]
        subtitle: Option<String>,
    },
    /// Read button presses from stdin
    Interactive,
    /// Print the MIME type of video file extensions
    Mime {
        /// Extensions without the leading dot
        #[arg(required = true)]
        extensions: Vec<String>,
    },
}

enum Action {
    Command(UiCommand),
    End,
    Exit,
    Help,
    Quit,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Script { url, subtitle } => {
            let config = load_config(&cli.settings)?;
            run_script(config, url, subtitle).await;
            Ok(())
        }
        Commands::Interactive => {
            let config = load_config(&cli.settings)?;
            run_interactive(config).await;
            Ok(())
        }
        Commands::Mime { extensions } => {
            print_mime_types(&extensions);
            Ok(())
        }
    }
}

fn load_config(settings: &Settings) -> Result<ControllerConfig> {
    let mut config = match &settings.config {
        Some(path) => read_config(path)?,
        None => ControllerConfig::default(),
    };
    if let Some(ms) = settings.poll_ms {
        config.poll_interval_ms = ms.max(1);
    }
    if let Some(tag) = &settings.component_tag {
        config.component_tag.clone_from(tag);
    }
    Ok(config)
}

fn read_config(path: &Path) -> Result<ControllerConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse config {}", path.display()))
}

fn new_controller(config: ControllerConfig) -> (Controller, SimulatedPlugin) {
    let plugin = SimulatedPlugin::new();
    let controller = PlayerController::new(plugin.clone(), config);
    plugin.connect(controller.handle());
    (controller, plugin)
}

fn show(controller: &Controller, label: &str) {
    println!(
        "{} {}",
        format!("[{label}]").cyan().bold(),
        controller.board().status()
    );
}

fn show_time(controller: &Controller) {
    println!(
        "{} {}s",
        "[time]".magenta().bold(),
        controller.board().current_time()
    );
}

async fn press(controller: &mut Controller, label: &str, command: UiCommand) {
    controller.handle_command(command).await;
    controller.drain().await;
    show(controller, label);
}

async fn run_script(config: ControllerConfig, url: String, subtitle: Option<String>) {
    println!("{}", "Video player demo".green().bold());
    let fullscreen = config.player_id(PlayerMode::Fullscreen).clone();
    let (mut controller, plugin) = new_controller(config);

    press(&mut controller, "video url", UiCommand::SetVideoUrl(url)).await;
    press(&mut controller, "subtitle", UiCommand::SetSubtitleUrl(subtitle)).await;
    press(&mut controller, "play embedded", UiCommand::PlayMode(PlayerMode::Embedded)).await;

    plugin.advance(4.2);
    controller.poll_current_time().await;
    show_time(&controller);

    press(&mut controller, "toggle mute", UiCommand::ToggleMuted).await;
    press(&mut controller, "set volume", UiCommand::SetVolume(0.5)).await;
    press(&mut controller, "get volume", UiCommand::GetVolume).await;
    press(&mut controller, "pause", UiCommand::Pause).await;
    press(&mut controller, "play fullscreen", UiCommand::PlayMode(PlayerMode::Fullscreen)).await;

    plugin.advance(2.5);
    controller.poll_current_time().await;
    show_time(&controller);

    plugin.dismiss(&fullscreen);
    controller.drain().await;
    show(&controller, "dismissed");

    press(&mut controller, "play fullscreen", UiCommand::PlayMode(PlayerMode::Fullscreen)).await;
    plugin.finish(&fullscreen);
    controller.drain().await;
    show(&controller, "ended");

    controller.stop_tracking();
}

async fn run_interactive(config: ControllerConfig) {
    println!("{}", "Video player demo (type `help` for buttons)".green().bold());
    let (mut controller, plugin) = new_controller(config);

    let (line_sender, lines) = async_channel::unbounded::<String>();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if line_sender.send_blocking(line).is_err() {
                break;
            }
        }
    });

    let mut last_advance = Instant::now();
    let mut shown_time = String::new();
    loop {
        plugin.advance(last_advance.elapsed().as_secs_f64());
        last_advance = Instant::now();

        tokio::select! {
            line = lines.recv() => {
                let Ok(line) = line else { break };
                match parse_line(&line) {
                    Ok(Action::Quit) => break,
                    Ok(Action::Help) => println!("{HELP}"),
                    Ok(Action::Command(command)) => press(&mut controller, line.trim(), command).await,
                    Ok(Action::End) => match controller.active_player().cloned() {
                        Some(id) => {
                            plugin.finish(&id);
                            controller.drain().await;
                            show(&controller, "end");
                        }
                        None => eprintln!("{}", "no active player".yellow()),
                    },
                    Ok(Action::Exit) => match controller.active_player().cloned() {
                        Some(id) => {
                            plugin.dismiss(&id);
                            controller.drain().await;
                            show(&controller, "exit");
                        }
                        None => eprintln!("{}", "no active player".yellow()),
                    },
                    Err(message) => eprintln!("{}", message.red()),
                }
            }
            () = tokio::time::sleep(Duration::from_millis(100)) => {
                controller.drain().await;
                if controller.board().current_time() != shown_time {
                    shown_time = controller.board().current_time().to_owned();
                    show_time(&controller);
                }
            }
        }
    }

    controller.stop_tracking();
    println!("{}", "Bye".green());
}

fn parse_line(line: &str) -> Result<Action, String> {
    let mut words = line.split_whitespace();
    let Some(button) = words.next() else {
        return Ok(Action::Help);
    };
    let arg = words.next();

    let command = match button {
        "url" => UiCommand::SetVideoUrl(arg.unwrap_or_default().to_owned()),
        "subtitle" => UiCommand::SetSubtitleUrl(arg.map(str::to_owned)),
        "play-embedded" => UiCommand::PlayMode(PlayerMode::Embedded),
        "play-fullscreen" => UiCommand::PlayMode(PlayerMode::Fullscreen),
        "pause" => UiCommand::Pause,
        "stop" => UiCommand::Stop,
        "get-volume" => UiCommand::GetVolume,
        "set-volume" => {
            let level = arg
                .ok_or("set-volume needs a level")?
                .parse::<f32>()
                .map_err(|err| format!("invalid volume: {err}"))?;
            UiCommand::SetVolume(level)
        }
        "get-muted" => UiCommand::GetMuted,
        "toggle-muted" => UiCommand::ToggleMuted,
        "end" => return Ok(Action::End),
        "exit" => return Ok(Action::Exit),
        "help" => return Ok(Action::Help),
        "quit" => return Ok(Action::Quit),
        other => return Err(format!("unknown button `{other}`")),
    };
    Ok(Action::Command(command))
}

fn print_mime_types(extensions: &[String]) {
    for ext in extensions {
        let ext = ext.trim_start_matches('.');
        match mime_type_for(ext) {
            Ok(mime) => println!("{} {}", format!("{ext}:").bold(), mime.green()),
            Err(err) => println!("{} {}", format!("{ext}:").bold(), err.to_string().red()),
        }
    }
}
