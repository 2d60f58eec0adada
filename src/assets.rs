//! Sprite and sound banks
//!
//! Images and sounds are loaded once at start-up from `data/`. Nothing here
//! is required to play: a missing image is drawn as a flat colored shape and
//! a missing sound is silent. Loading problems are logged, never fatal.
//!
//! Layout:
//! - `data/images/entities/<kind>/<action>/00.png, 01.png, ...`
//! - `data/images/tiles/<tile kind>/00.png, 01.png, ...` (index = variant)
//! - `data/images/clouds/00.png, ...`
//! - `data/images/background.png`, `projectile.png`, `attack.png`
//! - `data/sfx/<name>.wav`, `data/music.wav`

use std::collections::HashMap;
use macroquad::audio::{load_sound, play_sound, stop_sound, PlaySoundParams, Sound};
use macroquad::prelude::*;
use crate::game::{AnimationLibrary, Sfx};
use crate::world::TileKind;

/// Root folder for images
pub const IMAGES_DIR: &str = "data/images";
/// Root folder for sound effects
pub const SFX_DIR: &str = "data/sfx";
/// Background music file
pub const MUSIC_PATH: &str = "data/music.wav";

/// Upper bound on numbered images probed per folder
const MAX_SEQUENCE: usize = 64;

/// Background clear color when no background image is present
pub const SKY: Color = Color::new(0.55, 0.75, 0.9, 1.0);

// ============================================================================
// Sprites
// ============================================================================

/// All loaded images
#[derive(Default)]
pub struct SpriteBank {
    /// Animation frames keyed like animation clips ("player/run")
    frames: HashMap<String, Vec<Texture2D>>,
    /// Tile images, indexed by variant
    tiles: HashMap<TileKind, Vec<Texture2D>>,
    /// Single images ("background", "projectile", "attack")
    images: HashMap<String, Texture2D>,
    clouds: Vec<Texture2D>,
}

/// Load `00.png`, `01.png`, ... from a folder until one is missing
async fn load_sequence(dir: &str) -> Vec<Texture2D> {
    let mut textures = Vec::new();
    for i in 0..MAX_SEQUENCE {
        match load_texture(&format!("{}/{:02}.png", dir, i)).await {
            Ok(tex) => {
                tex.set_filter(FilterMode::Nearest);
                textures.push(tex);
            }
            Err(_) => break,
        }
    }
    textures
}

impl SpriteBank {
    /// Bank with no images (everything draws as placeholders)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every image the game uses. Animation folders are taken from the
    /// clip library keys.
    pub async fn load(root: &str, clips: &AnimationLibrary) -> Self {
        let mut bank = Self::empty();

        for key in clips.keys() {
            let frames = load_sequence(&format!("{}/entities/{}", root, key)).await;
            if frames.is_empty() {
                log::warn!("No frames for animation '{}', drawing a placeholder", key);
            } else {
                bank.frames.insert(key.to_string(), frames);
            }
        }

        for kind in TileKind::ALL {
            let variants = load_sequence(&format!("{}/tiles/{}", root, kind.asset_dir())).await;
            if !variants.is_empty() {
                bank.tiles.insert(kind, variants);
            }
        }

        for name in ["background", "projectile", "attack"] {
            match load_texture(&format!("{}/{}.png", root, name)).await {
                Ok(tex) => {
                    tex.set_filter(FilterMode::Nearest);
                    bank.images.insert(name.to_string(), tex);
                }
                Err(e) => log::warn!("Image '{}' not loaded: {}", name, e),
            }
        }

        bank.clouds = load_sequence(&format!("{}/clouds", root)).await;

        log::info!(
            "Loaded sprites: {} animations, {} tile sets, {} images, {} clouds",
            bank.frames.len(),
            bank.tiles.len(),
            bank.images.len(),
            bank.clouds.len()
        );
        bank
    }

    /// Number of frames loaded for an animation key (0 if none)
    pub fn frame_count(&self, key: &str) -> usize {
        self.frames.get(key).map(Vec::len).unwrap_or(0)
    }

    pub fn cloud_count(&self) -> usize {
        self.clouds.len()
    }

    /// Draw one animation frame with its top-left at `pos`
    pub fn draw_frame(&self, key: &str, index: usize, pos: Vec2, size: (i32, i32), flip_x: bool) {
        let pos = vec2(pos.x.trunc(), pos.y.trunc());
        match self.frames.get(key) {
            Some(frames) if !frames.is_empty() => {
                let tex = &frames[index % frames.len()];
                draw_texture_ex(tex, pos.x, pos.y, WHITE, DrawTextureParams {
                    flip_x,
                    ..Default::default()
                });
            }
            _ => {
                let (w, h) = (size.0 as f32, size.1 as f32);
                let color = if key.starts_with("player") {
                    Color::from_rgba(90, 200, 120, 255)
                } else {
                    Color::from_rgba(210, 80, 80, 255)
                };
                draw_rectangle(pos.x, pos.y, w, h, color);
                // Eye on the facing side
                let eye_x = if flip_x { pos.x + 3.0 } else { pos.x + w - 5.0 };
                draw_rectangle(eye_x, pos.y + 4.0, 2.0, 2.0, BLACK);
            }
        }
    }

    /// Draw a tile with its top-left at `pos`
    pub fn draw_tile(&self, kind: TileKind, variant: u32, pos: Vec2, size: f32) {
        let pos = vec2(pos.x.trunc(), pos.y.trunc());
        if let Some(variants) = self.tiles.get(&kind).filter(|v| !v.is_empty()) {
            let tex = &variants[variant as usize % variants.len()];
            draw_texture(tex, pos.x, pos.y, WHITE);
            return;
        }
        match kind {
            TileKind::Grass => {
                draw_rectangle(pos.x, pos.y, size, size, Color::from_rgba(120, 85, 55, 255));
                draw_rectangle(pos.x, pos.y, size, 4.0, Color::from_rgba(80, 170, 70, 255));
            }
            TileKind::Stone => {
                draw_rectangle(pos.x, pos.y, size, size, Color::from_rgba(110, 110, 120, 255));
                draw_rectangle_lines(pos.x, pos.y, size, size, 1.0, Color::from_rgba(80, 80, 90, 255));
            }
            TileKind::Decor => {
                draw_circle(pos.x + size / 2.0, pos.y + size - 4.0, 3.0, Color::from_rgba(230, 200, 80, 255));
            }
            TileKind::LargeDecor => {
                draw_rectangle(pos.x + size / 2.0 - 2.0, pos.y - size, 4.0, size * 2.0, Color::from_rgba(100, 70, 40, 255));
                draw_circle(pos.x + size / 2.0, pos.y - size, size * 0.75, Color::from_rgba(60, 140, 60, 255));
            }
        }
    }

    /// Draw a single image centered on `center`, or a small dot if missing
    pub fn draw_centered(&self, name: &str, center: Vec2, fallback: Color) {
        match self.images.get(name) {
            Some(tex) => {
                let x = (center.x - tex.width() / 2.0).trunc();
                let y = (center.y - tex.height() / 2.0).trunc();
                draw_texture(tex, x, y, WHITE);
            }
            None => draw_circle(center.x, center.y, 2.0, fallback),
        }
    }

    /// Fill the view with the background image or sky color
    pub fn draw_background(&self, view: Vec2) {
        match self.images.get("background") {
            Some(tex) => draw_texture_ex(tex, 0.0, 0.0, WHITE, DrawTextureParams {
                dest_size: Some(view),
                ..Default::default()
            }),
            None => clear_background(SKY),
        }
    }

    /// Size of cloud image `index`
    pub fn cloud_size(&self, index: usize) -> Option<Vec2> {
        if self.clouds.is_empty() {
            return None;
        }
        let tex = &self.clouds[index % self.clouds.len()];
        Some(vec2(tex.width(), tex.height()))
    }

    /// Draw cloud image `index` with its top-left at `pos`
    pub fn draw_cloud(&self, index: usize, pos: Vec2) {
        if self.clouds.is_empty() {
            return;
        }
        let tex = &self.clouds[index % self.clouds.len()];
        draw_texture(tex, pos.x.trunc(), pos.y.trunc(), WHITE);
    }
}

// ============================================================================
// Sounds
// ============================================================================

/// Sound effects and music
#[derive(Default)]
pub struct SoundBank {
    effects: HashMap<Sfx, Sound>,
    music: Option<Sound>,
}

impl SoundBank {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every sound effect from `dir` and the music track
    pub async fn load(dir: &str, music_path: &str) -> Self {
        let mut bank = Self::empty();
        for sfx in Sfx::ALL {
            let path = format!("{}/{}.wav", dir, sfx.file_stem());
            match load_sound(&path).await {
                Ok(sound) => {
                    bank.effects.insert(sfx, sound);
                }
                Err(e) => log::warn!("Sound {} not loaded: {}", path, e),
            }
        }
        match load_sound(music_path).await {
            Ok(sound) => bank.music = Some(sound),
            Err(e) => log::warn!("Music {} not loaded: {}", music_path, e),
        }
        log::info!("Loaded {} of {} sounds", bank.effects.len(), Sfx::ALL.len());
        bank
    }

    /// Play an effect at its configured volume
    pub fn play(&self, sfx: Sfx) {
        if let Some(sound) = self.effects.get(&sfx) {
            play_sound(sound, PlaySoundParams {
                looped: false,
                volume: sfx.volume(),
            });
        }
    }

    /// Start the looping background track
    pub fn start_music(&self, volume: f32) {
        if let Some(music) = &self.music {
            play_sound(music, PlaySoundParams { looped: true, volume });
        }
    }

    pub fn stop_music(&self) {
        if let Some(music) = &self.music {
            stop_sound(music);
        }
    }
}
