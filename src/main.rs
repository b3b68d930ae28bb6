//! Head gesture music player: control playback with head movements.

use anyhow::{bail, Context, Result};
use clap::Parser;
use head_gesture_player::{
    app::{AppConfig, GestureApp},
    cli::{Args, SourceKind},
    config::{Config, EXAMPLE_CONFIG},
    constants::DEFAULT_DEMO_INTERVAL,
    playback::{AudioBackend, NullBackend, PlaybackController},
    pose::{DemoPoseSource, PoseSource, ScriptedPoseSource},
    presentation::spawn_stdin_commands,
};
use log::{info, warn};

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();
    if let Err(e) = args.check_source_options() {
        e.exit();
    }

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.dump_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    info!("Head Gesture Player");

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };
    args.apply_to(&mut config);
    config.validate().context("Invalid configuration")?;

    let source = open_source(&args, &config)?;
    let controller = PlaybackController::new(&config.playback.music_dir, open_audio(), config.playback.volume)
        .with_log_capacity(config.playback.log_capacity);

    let mut app_config = AppConfig::from_config(&config);
    app_config.max_ticks = args.ticks;
    app_config.realtime = !args.no_realtime;

    let mut app = GestureApp::new(app_config, source, controller)?.with_display(Box::new(std::io::stdout()));
    if args.interactive {
        app = app.with_commands(spawn_stdin_commands());
    }

    let stats = app.run()?;
    info!(
        "Done: {} ticks ({} without a face), {} gestures",
        stats.ticks,
        stats.faceless_ticks,
        stats.total_gestures()
    );

    Ok(())
}

fn open_source(args: &Args, config: &Config) -> Result<Box<dyn PoseSource>> {
    match args.source {
        SourceKind::Demo => {
            info!("Using demo pose source (no camera)");
            Ok(Box::new(
                DemoPoseSource::new(DEFAULT_DEMO_INTERVAL).with_nod_hold(config.classifier.cooldown_ticks),
            ))
        }
        SourceKind::Script => {
            let Some(path) = &args.script else {
                bail!("--source script needs --script PATH");
            };
            let source = ScriptedPoseSource::from_file(path)
                .with_context(|| format!("Failed to load pose script {}", path.display()))?;
            info!("Replaying {} pose samples from {}", source.remaining(), path.display());
            Ok(Box::new(source))
        }
        SourceKind::Camera => open_camera(args),
    }
}

#[cfg(feature = "camera")]
fn open_camera(args: &Args) -> Result<Box<dyn PoseSource>> {
    use head_gesture_player::camera::{CascadePoseSource, VideoSource};

    let video = match &args.video {
        Some(path) => VideoSource::File(path.clone()),
        None => VideoSource::Camera(args.camera_index()),
    };
    let cascade = args.cascade_path();
    let source = CascadePoseSource::open(&video, &cascade)
        .with_context(|| format!("Failed to open camera pose source with cascade {}", cascade.display()))?;
    Ok(Box::new(source))
}

#[cfg(not(feature = "camera"))]
fn open_camera(_args: &Args) -> Result<Box<dyn PoseSource>> {
    bail!("Camera support is not compiled in; rebuild with `--features camera`")
}

#[cfg(feature = "audio")]
fn open_audio() -> Box<dyn AudioBackend> {
    match head_gesture_player::playback::audio::RodioBackend::open() {
        Ok(backend) => Box::new(backend),
        Err(e) => {
            warn!("{}. Playing silently.", e);
            Box::new(NullBackend::new())
        }
    }
}

#[cfg(not(feature = "audio"))]
fn open_audio() -> Box<dyn AudioBackend> {
    warn!("Audio support is not compiled in; playing silently (rebuild with `--features audio`)");
    Box::new(NullBackend::new())
}
