//! Grim's Adventure: a tile-based side-scrolling action platformer
//!
//! The player runs, double-jumps and throws short-lived attacks through a
//! campaign of tile levels, clearing every patrolling enemy before the
//! next level opens. Everything is simulated at a fixed 60 frames per
//! second on a 320x240 canvas that is scaled up to the window.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod assets;
mod config;
mod game;
mod input;
mod world;

use macroquad::prelude::*;
use ::rand::SeedableRng;
use ::rand::rngs::StdRng;
use assets::{SoundBank, SpriteBank, IMAGES_DIR, MUSIC_PATH, SFX_DIR};
use config::{load_config_or_default, CONFIG_PATH};
use game::{renderer, Clouds, Session, StepOutcome, VIEW_SIZE};
use input::{GameAction, InputState};
use world::LEVELS_DIR;

/// Fixed simulation rate
const TARGET_FPS: f64 = 60.0;
/// Background clouds on screen
const CLOUD_COUNT: usize = 8;
const MUSIC_VOLUME: f32 = 0.05;

/// Cloud layout RNG, a separate stream from the gameplay one
fn cloud_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed.wrapping_add(1))
}

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Grim's Adventure v{}", VERSION),
        window_width: 960,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("=== Grim's Adventure v{} ===", VERSION);

    let mut config = load_config_or_default(CONFIG_PATH);

    // Clip lengths follow the frames actually on disk
    let sprites = SpriteBank::load(IMAGES_DIR, &config.animations).await;
    let keys: Vec<String> = config.animations.keys().map(str::to_string).collect();
    for key in keys {
        let frames = sprites.frame_count(&key);
        if frames > 0 {
            config.animations.set_frame_count(&key, frames as u32);
        }
    }

    let sounds = SoundBank::load(SFX_DIR, MUSIC_PATH).await;
    sounds.start_music(MUSIC_VOLUME);

    let mut clouds = Clouds::new(CLOUD_COUNT, sprites.cloud_count(), &mut cloud_rng(config.rng_seed));

    #[cfg(not(target_arch = "wasm32"))]
    let levels = world::load_levels_or_builtin(LEVELS_DIR);
    #[cfg(target_arch = "wasm32")]
    let levels = world::fetch_levels_or_builtin(LEVELS_DIR).await;
    let mut session = Session::new(config, levels);
    let mut input = InputState::new();

    // Everything is drawn at 320x240 and scaled up at the end
    let canvas = render_target(VIEW_SIZE.x as u32, VIEW_SIZE.y as u32);
    canvas.texture.set_filter(FilterMode::Nearest);
    let canvas_camera = Camera2D {
        zoom: vec2(2.0 / VIEW_SIZE.x, 2.0 / VIEW_SIZE.y),
        target: VIEW_SIZE / 2.0,
        render_target: Some(canvas.clone()),
        ..Default::default()
    };

    let mut paused = false;
    let mut victory = false;

    loop {
        // Track frame start time for FPS limiting
        let frame_start = get_time();

        input.poll();

        if victory {
            if input.action_pressed(GameAction::Pause) || input.action_pressed(GameAction::Quit) {
                break;
            }
        } else if input.action_pressed(GameAction::Pause) {
            paused = !paused;
            log::debug!("Paused: {}", paused);
        } else if paused && input.action_pressed(GameAction::Restart) {
            session.restart_level();
            paused = false;
        } else if paused && input.action_pressed(GameAction::Quit) {
            break;
        }

        if !paused && !victory {
            match session.step(&input.frame_input()) {
                StepOutcome::Victory => {
                    log::info!("Campaign complete ({} levels)", session.level_count());
                    victory = true;
                }
                StepOutcome::LevelCleared(index) => log::info!("Entering level {}", index),
                StepOutcome::PlayerDied | StepOutcome::Running => {}
            }

            let events = session.events_mut();
            for sfx in events.sounds.drain() {
                sounds.play(sfx);
            }
            clouds.update();
        }

        set_camera(&canvas_camera);
        renderer::draw_world(&session, &sprites, &clouds);
        if victory {
            renderer::draw_victory_banner(session.level_count());
        } else if paused {
            renderer::draw_pause_overlay();
        }

        set_default_camera();
        let shake = if paused { Vec2::ZERO } else { renderer::shake_offset(session.screenshake()) };
        renderer::present(&canvas.texture, shake);

        // FPS limiting
        let target_frame_time = 1.0 / TARGET_FPS;
        let elapsed = get_time() - frame_start;
        if elapsed < target_frame_time {
            // Native: use sleep for bulk, then spin-wait for precision
            #[cfg(not(target_arch = "wasm32"))]
            {
                let spin_margin = 0.002; // 2ms
                while get_time() - frame_start + spin_margin < target_frame_time {
                    std::thread::sleep(std::time::Duration::from_millis(1));
                }
                while get_time() - frame_start < target_frame_time {
                    std::hint::spin_loop();
                }
            }
            // WASM: the browser paces frames
        }

        next_frame().await;
    }

    sounds.stop_music();
    log::info!("Bye");
}
