//! Panel pet demo entry point.
//!
//! Drives a pet against the in-memory host: two side-by-side panels, a
//! background image loader, and a simulated 60 Hz display. Lifecycle events
//! and periodic frame snapshots are logged.
//!
//! # Main Loop
//!
//! 1. Load settings from the INI file (defaults when missing)
//! 2. Build the host and the controller, restore or toggle the pet on
//! 3. Forward image requests to the loader thread and completions back
//! 4. Fire frame callbacks every 16.67 ms of simulated time, optionally
//!    carrying the pet into the second panel halfway through
//! 5. Tear down, stop the loader and save the settings
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --frames 600 --drag --seed 7
//! ```

use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;
use log::{error, info, warn};

use panelpet::controller::PetController;
use panelpet::geometry::Rect;
use panelpet::host::loader::ImageLoader;
use panelpet::host::{PanelIdentity, Workspace};
use panelpet::host::memory::MemoryHost;
use panelpet::resources::cliprng::ClipRng;
use panelpet::resources::settings::PetSettings;
use panelpet::resources::spriteconfig::SpriteConfig;

const FRAME_MS: f64 = 1000.0 / 60.0;
const DRAG_STEPS: u32 = 30;

/// Panel pet
#[derive(Parser)]
#[command(version, about = "Runs a panel pet against an in-memory host and logs what it does.")]
struct Cli {
    /// Settings file. Read at startup and written on exit.
    #[arg(long, value_name = "PATH", default_value = "panelpet.ini")]
    config: PathBuf,

    /// Number of frame callbacks to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Seed for clip selection.
    #[arg(long)]
    seed: Option<u64>,

    /// Carry the pet into the right-hand panel halfway through.
    #[arg(long)]
    drag: bool,

    /// Directory that sprite image paths are resolved against.
    #[arg(long, value_name = "DIR", default_value = "assets")]
    assets: PathBuf,
}

type Controller = PetController<MemoryHost>;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let settings = if cli.config.is_file() {
        match PetSettings::load_from_file(&cli.config) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Using default settings: {}", e);
                PetSettings::default()
            }
        }
    } else {
        info!("{:?} not found, using default settings", cli.config);
        PetSettings::default()
    };

    let mut host = MemoryHost::new();
    host.add_panel("left", Rect::new(0.0, 40.0, 500.0, 400.0));
    let right = host.add_panel("right", Rect::new(510.0, 40.0, 400.0, 400.0));
    host.focus("left");

    let rng = cli.seed.map(ClipRng::with_seed).unwrap_or_default();
    let mut controller = PetController::with_rng(host, settings, rng);

    let embedded = SpriteConfig::builtins().into_iter().map(|c| c.name).collect();
    let mut loader = ImageLoader::spawn(cli.assets.clone(), embedded);

    controller.initialize_from_save();
    if !controller.settings().enabled {
        controller.toggle();
    }
    forward_loads(&mut controller, &loader);
    if controller.is_loading() {
        if let Some(outcome) = loader.wait() {
            controller.image_loaded(outcome.ticket, outcome.result);
        }
    }

    let drag_at = cli.drag.then_some(cli.frames / 2);
    let mut now = 0.0;
    for i in 0..cli.frames {
        now += FRAME_MS;
        forward_loads(&mut controller, &loader);
        for outcome in loader.poll() {
            controller.image_loaded(outcome.ticket, outcome.result);
        }

        if drag_at == Some(i) {
            let target = controller
                .host()
                .panel_bounds(&right)
                .map(|r| r.origin + r.size * 0.5);
            if let Some(target) = target {
                carry_to(&mut controller, target);
            }
        }

        if let Some(request) = controller.host_mut().take_frame() {
            controller.on_frame(request, now);
        }

        if i % 60 == 0 {
            log_snapshot(&controller, i);
        }
    }
    log_snapshot(&controller, cli.frames);

    controller.deactivate();
    loader.shutdown();

    if let Err(e) = controller.settings().save_to_file(&cli.config) {
        error!("Could not save settings: {}", e);
        std::process::exit(1);
    }
}

/// Hand the controller's image requests to the loader thread.
fn forward_loads(controller: &mut Controller, loader: &ImageLoader) {
    for request in controller.host_mut().take_load_requests() {
        if let Some(outcome) = loader.submit(request) {
            controller.image_loaded(outcome.ticket, outcome.result);
        }
    }
}

/// Press on the sprite, move the pointer to `target` in steps and release.
fn carry_to(controller: &mut Controller, target: Vec2) {
    let (Some(container), Some(placement), Some(sheet)) = (
        controller.container(),
        controller.placement(),
        controller.sprite_sheet(),
    ) else {
        warn!("Pet is not attached, nothing to drag");
        return;
    };
    let (w, h) = sheet.display_size();
    let start = placement.screen_position(&container.rect, h) + Vec2::new(w, h) * 0.5;

    info!("Dragging pet from {:?} to {:?}", start, target);
    controller.pointer_down(start.x, start.y);
    for step in 1..=DRAG_STEPS {
        let point = start.lerp(target, step as f32 / DRAG_STEPS as f32);
        controller.pointer_move(point.x, point.y);
    }
    controller.pointer_up();
}

fn log_snapshot(controller: &Controller, frame: u32) {
    let (Some(placement), Some(playback)) = (controller.placement(), controller.playback()) else {
        return;
    };
    let clip = playback
        .active_clip
        .and_then(|i| controller.sprite_sheet().and_then(|s| s.clip(i)))
        .map(|c| c.display_name.clone().unwrap_or_else(|| c.id.clone()))
        .unwrap_or_else(|| "-".to_string());
    info!(
        "frame {:>5} ({} run): panel={} clip={} frame_index={} x={:.1} facing={}",
        frame,
        controller.frames_run(),
        controller
            .target()
            .map(|p| p.id().to_string())
            .unwrap_or_else(|| "-".to_string()),
        clip,
        playback.frame_index,
        placement.x,
        if placement.moving_right { "right" } else { "left" }
    );
}
