//! Player controller
//!
//! Adds air time, a double jump and a cooldown-limited melee attack on top
//! of the shared body. The player has no death state of its own: the
//! session watches `air_time` and treats a long fall as death.

use std::rc::Rc;
use macroquad::math::Vec2;
use serde::{Serialize, Deserialize};
use super::actor::{Actor, Behavior, StepContext};
use super::animation::AnimationLibrary;
use super::body::{Action, BodyKind, MovingBody, PhysicsTuning};
use super::event::{GameEvents, Sfx};
use super::hazard::Hazard;

/// Player constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Vertical velocity set by a jump (negative is up)
    pub jump_velocity: f32,
    /// Jumps available after touching the ground
    pub max_jumps: u32,
    /// Airborne frames tolerated before switching to the jump animation
    pub airborne_grace: u32,
    /// Air time set by a jump, so the jump animation starts at once
    pub jump_air_time: u32,
    /// Frames between attacks
    pub attack_cooldown: u32,
    /// Horizontal distance from the body center where an attack spawns
    pub attack_offset: f32,
    /// Attack speed (pixels per frame)
    pub attack_speed: f32,
    /// Air time beyond which the player counts as fallen
    pub fall_death_frames: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            jump_velocity: -3.0,
            max_jumps: 2,
            airborne_grace: 4,
            jump_air_time: 5,
            attack_cooldown: 60,
            attack_offset: 7.0,
            attack_speed: 1.5,
            fall_death_frames: 180,
        }
    }
}

/// Player-specific state
#[derive(Debug, Clone)]
pub struct PlayerBehavior {
    tuning: PlayerTuning,
    /// Frames since last grounded
    air_time: u32,
    jumps: u32,
    /// Frames until the next attack is allowed (0 = ready)
    attack_cooldown: u32,
}

impl PlayerBehavior {
    pub fn new(tuning: PlayerTuning) -> Self {
        Self {
            tuning,
            air_time: 0,
            jumps: tuning.max_jumps,
            attack_cooldown: 0,
        }
    }
}

impl Behavior for PlayerBehavior {
    fn decide_movement(&mut self, _body: &mut MovingBody, input: Vec2, _ctx: &mut StepContext) -> Vec2 {
        input
    }

    fn after_step(&mut self, body: &mut MovingBody, movement: Vec2) {
        self.air_time += 1;

        if body.collisions().down {
            self.air_time = 0;
            self.jumps = self.tuning.max_jumps;
        }

        self.attack_cooldown = self.attack_cooldown.saturating_sub(1);

        if self.air_time > self.tuning.airborne_grace {
            body.set_action(Action::Jump);
        } else if movement.x != 0.0 {
            body.set_action(Action::Run);
        } else {
            body.set_action(Action::Idle);
        }
    }
}

/// The player character
pub type Player = Actor<PlayerBehavior>;

impl Player {
    /// Create the player at a spawn point
    pub fn spawn(
        position: Vec2,
        size: (i32, i32),
        physics: PhysicsTuning,
        tuning: PlayerTuning,
        clips: Rc<AnimationLibrary>,
    ) -> Self {
        let body = MovingBody::new(BodyKind::Player, position, size, physics, clips);
        Actor::new(body, PlayerBehavior::new(tuning))
    }

    /// Jump if any jumps are left. Returns whether the jump happened.
    pub fn jump(&mut self) -> bool {
        let b = &mut self.behavior;
        if b.jumps == 0 {
            return false;
        }
        self.body.velocity.y = b.tuning.jump_velocity;
        b.jumps -= 1;
        b.air_time = b.tuning.jump_air_time;
        true
    }

    /// Launch an attack in the facing direction unless cooling down.
    /// Returns whether an attack was launched.
    pub fn attack(&mut self, events: &mut GameEvents) -> bool {
        let b = &mut self.behavior;
        if b.attack_cooldown > 0 {
            return false;
        }
        events.attacks.send(Hazard::launched_from(
            self.body.rect(),
            self.body.facing_left(),
            b.tuning.attack_offset,
            b.tuning.attack_speed,
        ));
        events.sounds.send(Sfx::Attack);
        b.attack_cooldown = b.tuning.attack_cooldown;
        true
    }

    pub fn air_time(&self) -> u32 {
        self.behavior.air_time
    }

    pub fn jumps_remaining(&self) -> u32 {
        self.behavior.jumps
    }

    pub fn attack_cooldown(&self) -> u32 {
        self.behavior.attack_cooldown
    }

    /// Airborne long enough to count as a fatal fall
    pub fn has_fallen(&self) -> bool {
        self.behavior.air_time > self.behavior.tuning.fall_death_frames
    }

    /// Place at a spawn point after a level load. Velocity and jumps carry over.
    pub fn place_at(&mut self, position: Vec2) {
        self.body.position = position;
    }

    /// Forget the current fall (used on restart)
    pub fn reset_air_time(&mut self) {
        self.behavior.air_time = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use crate::world::{Level, TileKind, Tilemap};

    fn floor() -> Tilemap {
        Tilemap::from_level(&Level::new().with_row(TileKind::Grass, 0, 20, 5))
    }

    fn player_at(x: f32, y: f32) -> Player {
        Player::spawn(
            Vec2::new(x, y),
            (16, 16),
            PhysicsTuning::default(),
            PlayerTuning::default(),
            Rc::new(AnimationLibrary::default()),
        )
    }

    fn step(player: &mut Player, tiles: &Tilemap, dx: f32, events: &mut GameEvents) {
        let mut rng = StepRng::new(0, 0);
        let mut ctx = StepContext { tiles, rng: &mut rng, target: None, events };
        player.update(Vec2::new(dx, 0.0), &mut ctx);
    }

    /// Settle on the floor so the body is grounded
    fn grounded(tiles: &Tilemap, events: &mut GameEvents) -> Player {
        let mut player = player_at(40.0, 60.0);
        for _ in 0..60 {
            step(&mut player, tiles, 0.0, events);
            if player.body.collisions().down {
                break;
            }
        }
        assert!(player.body.collisions().down);
        assert_eq!(player.air_time(), 0);
        player
    }

    #[test]
    fn test_jump_budget() {
        let tiles = floor();
        let mut events = GameEvents::new();
        let mut player = grounded(&tiles, &mut events);

        assert!(player.jump());
        step(&mut player, &tiles, 0.0, &mut events);
        assert!(player.jump());
        step(&mut player, &tiles, 0.0, &mut events);
        assert!(!player.jump());
        assert_eq!(player.jumps_remaining(), 0);

        // Falls back down and lands, refilling jumps
        for _ in 0..200 {
            step(&mut player, &tiles, 0.0, &mut events);
            if player.body.collisions().down {
                break;
            }
        }
        assert!(player.body.collisions().down);
        assert_eq!(player.jumps_remaining(), 2);
        assert!(player.jump());
    }

    #[test]
    fn test_jump_then_airborne_update() {
        let tiles = floor();
        let mut events = GameEvents::new();
        let mut player = grounded(&tiles, &mut events);

        assert!(player.jump());
        assert_eq!(player.body.velocity.y, -3.0);
        assert_eq!(player.air_time(), 5);
        assert_eq!(player.jumps_remaining(), 1);

        step(&mut player, &tiles, 0.0, &mut events);
        assert!(!player.body.collisions().down);
        assert_eq!(player.air_time(), 6);
        assert_eq!(player.body.action(), Action::Jump);
    }

    #[test]
    fn test_attack_cooldown() {
        let tiles = floor();
        let mut events = GameEvents::new();
        let mut player = grounded(&tiles, &mut events);
        events.sounds.clear();

        assert!(player.attack(&mut events));
        assert_eq!(player.attack_cooldown(), 60);
        for _ in 0..59 {
            step(&mut player, &tiles, 0.0, &mut events);
            assert!(!player.attack(&mut events));
        }
        assert_eq!(events.attacks.len(), 1);
        assert_eq!(events.sounds.iter().filter(|s| **s == Sfx::Attack).count(), 1);

        step(&mut player, &tiles, 0.0, &mut events);
        assert_eq!(player.attack_cooldown(), 0);
        assert!(player.attack(&mut events));
        assert_eq!(events.attacks.len(), 2);
    }

    #[test]
    fn test_attack_direction_follows_facing() {
        let tiles = floor();
        let mut events = GameEvents::new();
        let mut player = grounded(&tiles, &mut events);
        let center = player.body.rect().center();

        player.attack(&mut events);
        let right = events.attacks.drain().next().unwrap();
        assert_eq!(right.position, Vec2::new(center.x + 7.0, center.y));
        assert_eq!(right.speed, 1.5);

        // Turn left and wait out the cooldown
        for _ in 0..60 {
            step(&mut player, &tiles, -0.001, &mut events);
        }
        assert!(player.body.facing_left());
        let center = player.body.rect().center();
        player.attack(&mut events);
        let left = events.attacks.drain().next().unwrap();
        assert_eq!(left.position, Vec2::new(center.x - 7.0, center.y));
        assert_eq!(left.speed, -1.5);
    }

    #[test]
    fn test_run_and_idle_actions() {
        let tiles = floor();
        let mut events = GameEvents::new();
        let mut player = grounded(&tiles, &mut events);

        step(&mut player, &tiles, 1.0, &mut events);
        assert_eq!(player.body.action(), Action::Run);
        step(&mut player, &tiles, 0.0, &mut events);
        assert_eq!(player.body.action(), Action::Idle);
    }

    #[test]
    fn test_fall_threshold() {
        let tiles = Tilemap::new(16);
        let mut events = GameEvents::new();
        let mut player = player_at(0.0, 0.0);
        for _ in 0..180 {
            step(&mut player, &tiles, 0.0, &mut events);
        }
        assert!(!player.has_fallen());
        step(&mut player, &tiles, 0.0, &mut events);
        assert!(player.has_fallen());

        player.reset_air_time();
        assert!(!player.has_fallen());
    }

    #[test]
    fn test_stays_grounded_on_small_tiles() {
        let tiles = Tilemap::from_level(&Level {
            tile_size: 8,
            ..Level::new().with_row(TileKind::Grass, 0, 39, 10)
        });
        let mut events = GameEvents::new();
        let mut player = player_at(40.0, 60.0);
        for _ in 0..60 {
            step(&mut player, &tiles, 0.0, &mut events);
        }

        for _ in 0..200 {
            step(&mut player, &tiles, 0.0, &mut events);
            assert!(player.body.rect().bottom() <= 80);
            assert!(player.air_time() <= 4);
            assert_eq!(player.body.action(), Action::Idle);
        }
        assert_eq!(player.jumps_remaining(), 2);
    }
}
