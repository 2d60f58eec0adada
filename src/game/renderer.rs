//! Game Renderer
//!
//! Draws a session into the 320x240 logical canvas: background, clouds,
//! tiles, enemies, the player, then hazards. The canvas is later scaled to
//! the window with letterbox bars, and screen shake is applied at that step.

use macroquad::prelude::*;
use crate::assets::SpriteBank;
use crate::world::Tilemap;
use super::clouds::Clouds;
use super::session::{Session, TRANSITION_FRAMES, VIEW_SIZE};

/// Segments used to approximate the transition circle
const TRANSITION_SEGMENTS: usize = 48;

/// Draw the whole scene for the current camera position
pub fn draw_world(session: &Session, sprites: &SpriteBank, clouds: &Clouds) {
    let offset = session.render_scroll();

    sprites.draw_background(VIEW_SIZE);
    draw_clouds(clouds, sprites, offset);
    draw_tiles(session.tilemap(), sprites, offset);

    for enemy in session.enemies() {
        enemy.body.render(sprites, offset);
    }
    session.player().body.render(sprites, offset);

    for projectile in session.projectiles() {
        sprites.draw_centered("projectile", projectile.position - offset, Color::from_rgba(255, 220, 90, 255));
    }
    for attack in session.attacks() {
        sprites.draw_centered("attack", attack.position - offset, WHITE);
    }

    if session.transition() != 0 {
        draw_transition(session.transition());
    }
}

fn draw_clouds(clouds: &Clouds, sprites: &SpriteBank, offset: Vec2) {
    for cloud in clouds.iter() {
        if let Some(size) = sprites.cloud_size(cloud.image) {
            sprites.draw_cloud(cloud.image, cloud.screen_position(offset, VIEW_SIZE, size));
        }
    }
}

/// Off-grid decorations first, then the grid tiles that are on screen
fn draw_tiles(tilemap: &Tilemap, sprites: &SpriteBank, offset: Vec2) {
    let size = tilemap.tile_size() as f32;

    for decor in tilemap.decor() {
        sprites.draw_tile(decor.kind, decor.variant, vec2(decor.x, decor.y) - offset, size);
    }

    let (x0, y0) = tilemap.tile_coord(offset);
    let (x1, y1) = tilemap.tile_coord(offset + VIEW_SIZE);
    for x in x0..=x1 {
        for y in y0..=y1 {
            if let Some(tile) = tilemap.get(x, y) {
                let pos = vec2(x as f32 * size, y as f32 * size) - offset;
                sprites.draw_tile(tile.kind, tile.variant, pos, size);
            }
        }
    }
}

/// Radius of the visible circle for a transition value (0 when fully closed)
pub fn transition_radius(transition: i32) -> f32 {
    ((TRANSITION_FRAMES - transition.abs()).max(0) * 8) as f32
}

/// Black out everything outside a circle centered on the view
fn draw_transition(transition: i32) {
    let radius = transition_radius(transition);
    let center = VIEW_SIZE / 2.0;
    let outer = VIEW_SIZE.length();

    let mut vertices = Vec::with_capacity(TRANSITION_SEGMENTS * 2);
    let mut indices = Vec::with_capacity(TRANSITION_SEGMENTS * 6);
    for i in 0..TRANSITION_SEGMENTS {
        let angle = i as f32 / TRANSITION_SEGMENTS as f32 * std::f32::consts::TAU;
        let dir = vec2(angle.cos(), angle.sin());
        for r in [radius, outer] {
            let p = center + dir * r;
            vertices.push(Vertex::new(p.x, p.y, 0.0, 0.0, 0.0, BLACK));
        }

        let inner = (i * 2) as u16;
        let next = ((i + 1) % TRANSITION_SEGMENTS * 2) as u16;
        indices.extend_from_slice(&[inner, inner + 1, next, inner + 1, next + 1, next]);
    }

    draw_mesh(&Mesh { vertices, indices, texture: None });
}

/// Random screen offset for a shake strength (uniform in +-strength/2)
pub fn shake_offset(strength: u32) -> Vec2 {
    if strength == 0 {
        return Vec2::ZERO;
    }
    let s = strength as f32;
    vec2(
        macroquad::rand::gen_range(0.0, 1.0) * s - s / 2.0,
        macroquad::rand::gen_range(0.0, 1.0) * s - s / 2.0,
    )
}

/// Placement of a canvas scaled into a screen while keeping its aspect
/// ratio: `(x, y, w, h)` with bars on the short sides
pub fn letterbox(canvas: Vec2, screen: Vec2) -> (f32, f32, f32, f32) {
    let scale = (screen.x / canvas.x).min(screen.y / canvas.y);
    let w = (canvas.x * scale).floor();
    let h = (canvas.y * scale).floor();
    ((screen.x - w) * 0.5, (screen.y - h) * 0.5, w, h)
}

/// Scale the canvas onto the window with letterbox bars
pub fn present(canvas: &Texture2D, shake: Vec2) {
    let screen = vec2(screen_width(), screen_height());
    let (x, y, w, h) = letterbox(VIEW_SIZE, screen);
    let scale = w / VIEW_SIZE.x;

    clear_background(BLACK);
    draw_texture_ex(
        canvas,
        x + shake.x * scale,
        y + shake.y * scale,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(w, h)),
            ..Default::default()
        },
    );
}

/// Centered text line on the canvas
fn draw_centered_text(text: &str, y: f32, size: u16, color: Color) {
    let dims = measure_text(text, None, size, 1.0);
    draw_text(text, (VIEW_SIZE.x - dims.width) / 2.0, y, size as f32, color);
}

/// Dim the canvas and show the pause hint
pub fn draw_pause_overlay() {
    draw_rectangle(0.0, 0.0, VIEW_SIZE.x, VIEW_SIZE.y, Color::from_rgba(0, 0, 0, 140));
    draw_centered_text("PAUSED", 100.0, 24, WHITE);
    draw_centered_text("Esc: Resume | R: Restart | Q: Quit", 130.0, 14, Color::from_rgba(200, 200, 200, 255));
}

/// Final screen after the last level
pub fn draw_victory_banner(levels: usize) {
    draw_rectangle(0.0, 0.0, VIEW_SIZE.x, VIEW_SIZE.y, Color::from_rgba(0, 0, 0, 120));
    draw_centered_text("VICTORY!", 100.0, 32, Color::from_rgba(255, 220, 90, 255));
    draw_centered_text(&format!("{} levels cleared", levels), 130.0, 16, WHITE);
    draw_centered_text("Esc: Quit", 160.0, 14, Color::from_rgba(200, 200, 200, 255));
}
