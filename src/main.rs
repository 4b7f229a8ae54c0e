//! hero-avatar - headless frame driver
//!
//! Simulates the host render loop against an in-process clip mixer and
//! prints what the controller hands to the renderer each frame.

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hero_avatar::{
    avatar::{ControllerSnapshot, EntryController},
    clips::ClipMixer,
    config::Config,
};

/// hero-avatar - simulate the avatar entry/override controller
#[derive(Parser, Debug)]
#[command(name = "hero-avatar", version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Viewport width in logical pixels (overrides config)
    #[arg(short, long)]
    width: Option<u32>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 300)]
    frames: usize,

    /// Frame delta in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Clip names on the simulated asset, in listing order
    #[arg(long, value_delimiter = ',', default_value = "Idle,Falling,Walk")]
    clips: Vec<String>,

    /// Duration of every simulated clip in seconds
    #[arg(long, default_value_t = 1.0)]
    clip_duration: f32,

    /// Clip selected before mount
    #[arg(long)]
    initial: Option<String>,

    /// Clip to request during the run
    #[arg(long)]
    request: Option<String>,

    /// Frame at which `--request` is issued
    #[arg(long, default_value_t = 0)]
    request_frame: usize,

    /// Viewport width to switch to during the run
    #[arg(long)]
    resize_width: Option<u32>,

    /// Frame at which `--resize-width` is applied
    #[arg(long, default_value_t = 0)]
    resize_frame: usize,

    /// Frame at which the entry motion is replayed
    #[arg(long)]
    restart_frame: Option<usize>,

    /// Print every Nth frame in text mode
    #[arg(long, default_value_t = 30)]
    every: usize,

    /// Emit one JSON object per frame
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// One line of `--json` output
#[derive(Serialize)]
struct FrameReport<'a> {
    frame: usize,
    #[serde(flatten)]
    snapshot: ControllerSnapshot,
    weights: Vec<(&'a str, f32)>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    info!("Starting {} v{}", hero_avatar::NAME, hero_avatar::VERSION);

    let config = if let Some(ref path) = args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };
    config.validate()?;

    let width = args.width.unwrap_or(config.viewport.initial_width);
    let names: Vec<&str> = args
        .clips
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    let mut mixer =
        ClipMixer::from_names(&names, args.clip_duration).with_easing(config.playback.easing());
    let mut controller = EntryController::new(&config, width);
    controller.mount(&mut mixer, args.initial.as_deref());

    for frame in 0..args.frames {
        if args.restart_frame == Some(frame) {
            controller.restart_entry(&mut mixer);
        }
        if let Some(resize) = args.resize_width {
            if frame == args.resize_frame {
                controller.on_viewport_resize(resize);
            }
        }
        if let Some(ref name) = args.request {
            if frame == args.request_frame {
                if let Err(e) = controller.request_animation(&mut mixer, name) {
                    warn!("Request ignored: {}", e);
                }
            }
        }

        let transform = controller.on_frame(args.dt);
        mixer.advance(args.dt);

        if args.json {
            let report = FrameReport {
                frame,
                snapshot: controller.snapshot(),
                weights: mixer
                    .playing()
                    .into_iter()
                    .map(|name| (name, mixer.weight(name)))
                    .collect(),
            };
            println!("{}", serde_json::to_string(&report)?);
        } else if frame % args.every.max(1) == 0 || frame + 1 == args.frames {
            println!(
                "frame {:>5}  {:<22} y={:>8.4} rot={:>8.4} scale={:.2}  clip={}",
                frame,
                controller.state().to_string(),
                transform.position.y,
                transform.rotation_y,
                transform.scale,
                controller.state().active_clip().unwrap_or("-"),
            );
        }
    }

    info!(
        "Finished {} frames in state {}",
        args.frames,
        controller.state()
    );
    Ok(())
}
