//! Moving Body
//!
//! Shared physics and collision state under the player and every enemy.
//! Movement is integrated one axis at a time (horizontal, then vertical)
//! against the solid rectangles reported by a `TileQuery`. A body that
//! overlaps a solid after moving along an axis is snapped flush against it
//! and the matching collision flag is raised for the rest of the frame.

use std::rc::Rc;
use macroquad::math::Vec2;
use serde::{Serialize, Deserialize};
use crate::assets::SpriteBank;
use crate::world::{Rect, TileQuery};
use super::animation::{Animation, AnimationLibrary};

// ============================================================================
// Kinds, actions and flags
// ============================================================================

/// What kind of character a body belongs to (selects its animation set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Player,
    Enemy,
}

impl BodyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BodyKind::Player => "player",
            BodyKind::Enemy => "enemy",
        }
    }
}

/// Named animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Action {
    #[default]
    Idle,
    Run,
    Jump,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::Idle => "idle",
            Action::Run => "run",
            Action::Jump => "jump",
        }
    }
}

/// Which sides touched a solid during the last update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl CollisionFlags {
    /// Blocked by a wall on either side
    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }

    /// Landed or bumped a ceiling
    pub fn vertical(&self) -> bool {
        self.up || self.down
    }
}

// ============================================================================
// Tuning
// ============================================================================

/// Physics constants shared by all bodies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Added to vertical velocity every frame
    pub gravity: f32,
    /// Maximum downward velocity
    pub terminal_velocity: f32,
    /// Sprite draw offset relative to the collision box
    pub sprite_offset: (f32, f32),
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: 0.1,
            terminal_velocity: 5.0,
            sprite_offset: (-1.0, -1.0),
        }
    }
}

// ============================================================================
// MovingBody
// ============================================================================

/// A character's physical presence in the level
#[derive(Debug, Clone)]
pub struct MovingBody {
    kind: BodyKind,
    /// Top-left of the collision box
    pub position: Vec2,
    size: (i32, i32),
    /// Per-frame velocity. Only the vertical part accumulates (gravity).
    pub velocity: Vec2,
    collisions: CollisionFlags,
    action: Action,
    /// Facing negative X
    flip: bool,
    animation: Animation,
    tuning: PhysicsTuning,
    clips: Rc<AnimationLibrary>,
}

impl MovingBody {
    /// Create a body standing still, facing right, playing its idle clip
    pub fn new(
        kind: BodyKind,
        position: Vec2,
        size: (i32, i32),
        tuning: PhysicsTuning,
        clips: Rc<AnimationLibrary>,
    ) -> Self {
        let animation = Animation::new(clips.clip_or_still(&clip_key(kind, Action::Idle)));
        Self {
            kind,
            position,
            size,
            velocity: Vec2::ZERO,
            collisions: CollisionFlags::default(),
            action: Action::Idle,
            flip: false,
            animation,
            tuning,
            clips,
        }
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    pub fn size(&self) -> (i32, i32) {
        self.size
    }

    /// Collision box on the integer pixel grid
    pub fn rect(&self) -> Rect {
        Rect::at(self.position, self.size.0, self.size.1)
    }

    pub fn collisions(&self) -> CollisionFlags {
        self.collisions
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    /// True when facing negative X (sprite is mirrored)
    pub fn facing_left(&self) -> bool {
        self.flip
    }

    /// Reverse horizontal facing
    pub fn turn_around(&mut self) {
        self.flip = !self.flip;
    }

    /// Switch animation state. Re-selecting the current action does nothing;
    /// a new action restarts playback from its first frame.
    pub fn set_action(&mut self, action: Action) {
        if action == self.action {
            return;
        }
        self.action = action;
        self.animation = Animation::new(self.clips.clip_or_still(&self.clip_key()));
    }

    /// Library key of the clip for the current action
    pub fn clip_key(&self) -> String {
        clip_key(self.kind, self.action)
    }

    /// Integrate one frame of movement and resolve tile collisions
    pub fn update(&mut self, tiles: &dyn TileQuery, movement: Vec2) {
        self.collisions = CollisionFlags::default();

        let frame_movement = movement + self.velocity;

        // Horizontal
        self.position.x += frame_movement.x;
        let mut rect = self.rect();
        for solid in tiles.physics_rects_around(self.position, self.size) {
            if rect.overlaps(&solid) {
                if frame_movement.x > 0.0 {
                    rect.set_right(solid.left());
                    self.collisions.right = true;
                }
                if frame_movement.x < 0.0 {
                    rect.set_left(solid.right());
                    self.collisions.left = true;
                }
                self.position.x = rect.x as f32;
            }
        }

        // Vertical
        self.position.y += frame_movement.y;
        let mut rect = self.rect();
        for solid in tiles.physics_rects_around(self.position, self.size) {
            if rect.overlaps(&solid) {
                if frame_movement.y > 0.0 {
                    rect.set_bottom(solid.top());
                    self.collisions.down = true;
                }
                if frame_movement.y < 0.0 {
                    rect.set_top(solid.bottom());
                    self.collisions.up = true;
                }
                self.position.y = rect.y as f32;
            }
        }

        if movement.x > 0.0 {
            self.flip = false;
        }
        if movement.x < 0.0 {
            self.flip = true;
        }

        self.velocity.y = (self.velocity.y + self.tuning.gravity).min(self.tuning.terminal_velocity);
        if self.collisions.vertical() {
            self.velocity.y = 0.0;
        }

        self.animation.update();
    }

    /// Screen position of the sprite's top-left for a camera offset
    pub fn sprite_position(&self, offset: Vec2) -> Vec2 {
        let (ox, oy) = self.tuning.sprite_offset;
        self.position - offset + Vec2::new(ox, oy)
    }

    /// Draw the current animation frame
    pub fn render(&self, sprites: &SpriteBank, offset: Vec2) {
        sprites.draw_frame(
            &self.clip_key(),
            self.animation.frame_index(),
            self.sprite_position(offset),
            self.size,
            self.flip,
        );
    }
}

fn clip_key(kind: BodyKind, action: Action) -> String {
    format!("{}/{}", kind.as_str(), action.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Level, TileKind, Tilemap};

    struct Empty;

    impl TileQuery for Empty {
        fn physics_rects_around(&self, _position: Vec2, _size: (i32, i32)) -> Vec<Rect> {
            Vec::new()
        }

        fn solid_check(&self, _point: Vec2) -> bool {
            false
        }
    }

    fn body_at(x: f32, y: f32) -> MovingBody {
        MovingBody::new(
            BodyKind::Player,
            Vec2::new(x, y),
            (16, 16),
            PhysicsTuning::default(),
            Rc::new(AnimationLibrary::default()),
        )
    }

    /// Floor along tile row 5 (pixel top 80), walls at columns 0 and 9
    fn room() -> Tilemap {
        Tilemap::from_level(
            &Level::new()
                .with_row(TileKind::Stone, 0, 9, 5)
                .with_tile(TileKind::Stone, 0, 4)
                .with_tile(TileKind::Stone, 9, 4),
        )
    }

    #[test]
    fn test_gravity_accumulates_and_clamps() {
        let mut body = body_at(0.0, 0.0);
        body.update(&Empty, Vec2::ZERO);
        assert!((body.velocity.y - 0.1).abs() < 1e-6);
        body.update(&Empty, Vec2::ZERO);
        assert!((body.velocity.y - 0.2).abs() < 1e-6);

        for _ in 0..200 {
            body.update(&Empty, Vec2::ZERO);
            assert!(body.velocity.y <= 5.0);
        }
        assert_eq!(body.velocity.y, 5.0);
        assert_eq!(body.collisions(), CollisionFlags::default());
    }

    #[test]
    fn test_landing_zeroes_velocity_and_rests_on_floor() {
        let map = room();
        let mut body = body_at(40.0, 50.0);
        let mut landed = false;
        for _ in 0..200 {
            body.update(&map, Vec2::ZERO);
            if body.collisions().down {
                landed = true;
                assert_eq!(body.velocity.y, 0.0);
                assert_eq!(body.rect().bottom(), 80);
                break;
            }
        }
        assert!(landed);
    }

    #[test]
    fn test_wall_stops_horizontal_motion() {
        let map = room();
        // Resting on the floor next to the right wall (x = 144)
        let mut body = body_at(126.0, 64.0);
        for _ in 0..5 {
            body.update(&map, Vec2::new(1.0, 0.0));
        }
        assert!(body.collisions().right);
        assert_eq!(body.rect().right(), 144);
        assert_eq!(body.position.x, 128.0);

        body.update(&map, Vec2::new(-1.0, 0.0));
        assert!(!body.collisions().right);
        assert!(!body.collisions().left);

        let mut body = body_at(18.0, 64.0);
        for _ in 0..5 {
            body.update(&map, Vec2::new(-1.0, 0.0));
        }
        assert!(body.collisions().left);
        assert_eq!(body.rect().left(), 16);
    }

    #[test]
    fn test_ceiling_bump() {
        let map = Tilemap::from_level(&Level::new().with_tile(TileKind::Grass, 2, 0));
        let mut body = body_at(32.0, 18.0);
        body.velocity.y = -3.0;
        body.update(&map, Vec2::ZERO);
        assert!(body.collisions().up);
        assert_eq!(body.rect().top(), 16);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_facing_is_sticky() {
        let mut body = body_at(0.0, 0.0);
        assert!(!body.facing_left());
        body.update(&Empty, Vec2::new(-0.5, 0.0));
        assert!(body.facing_left());
        body.update(&Empty, Vec2::ZERO);
        assert!(body.facing_left());
        body.update(&Empty, Vec2::new(2.0, 0.0));
        assert!(!body.facing_left());
    }

    #[test]
    fn test_set_action_resets_only_on_change() {
        let mut body = body_at(0.0, 0.0);
        for _ in 0..7 {
            body.update(&Empty, Vec2::ZERO);
        }
        assert_eq!(body.animation().tick(), 7);

        body.set_action(Action::Idle);
        assert_eq!(body.animation().tick(), 7);

        body.set_action(Action::Run);
        assert_eq!(body.action(), Action::Run);
        assert_eq!(body.animation().tick(), 0);
        assert_eq!(body.clip_key(), "player/run");
    }

    #[test]
    fn test_sprite_position_applies_offsets() {
        let body = body_at(100.0, 50.0);
        assert_eq!(body.sprite_position(Vec2::new(20.0, 10.0)), Vec2::new(79.0, 39.0));
    }

    /// Drop a body onto a floor whose top is at y 80, then check every
    /// resting frame stays on top of it
    fn assert_rests_on_floor(map: &Tilemap, mut body: MovingBody) {
        for _ in 0..120 {
            body.update(map, Vec2::ZERO);
            if body.collisions().down {
                break;
            }
        }
        assert!(body.collisions().down, "never landed");

        let mut since_down = 0;
        for frame in 0..200 {
            body.update(map, Vec2::ZERO);
            assert!(body.rect().bottom() <= 80, "frame {}: bottom {}", frame, body.rect().bottom());
            since_down = if body.collisions().down { 0 } else { since_down + 1 };
            // Sub-pixel settling re-touches the floor every few frames
            assert!(since_down <= 5, "frame {}: airborne for {} frames", frame, since_down);
        }
    }

    #[test]
    fn test_rests_on_tiles_smaller_than_body() {
        let map = Tilemap::from_level(&Level {
            tile_size: 8,
            ..Level::new().with_row(TileKind::Stone, 0, 19, 10)
        });
        assert_rests_on_floor(&map, body_at(40.0, 40.0));
    }

    #[test]
    fn test_large_body_rests_on_floor() {
        let map = room();
        let body = MovingBody::new(
            BodyKind::Enemy,
            Vec2::new(50.0, 20.0),
            (32, 32),
            PhysicsTuning::default(),
            Rc::new(AnimationLibrary::default()),
        );
        assert_rests_on_floor(&map, body);
    }

    #[test]
    fn test_small_tile_wall_stops_body() {
        // 8 px tiles: floor at y 80, a wall two tiles tall at x 96
        let map = Tilemap::from_level(&Level {
            tile_size: 8,
            ..Level::new()
                .with_row(TileKind::Stone, 0, 19, 10)
                .with_tile(TileKind::Stone, 12, 8)
                .with_tile(TileKind::Stone, 12, 9)
        });
        let mut body = body_at(70.0, 64.0);
        for _ in 0..30 {
            body.update(&map, Vec2::new(1.0, 0.0));
            assert!(body.rect().right() <= 96);
        }
        assert!(body.collisions().right);
        assert_eq!(body.rect().right(), 96);
    }
}
