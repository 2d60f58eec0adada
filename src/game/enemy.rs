//! Enemy controller
//!
//! Enemies idle until a random roll starts a walk burst. While walking they
//! turn around at walls and ledges; when a burst ends they fire a projectile
//! if the player is roughly level with them and in front.

use std::rc::Rc;
use macroquad::math::Vec2;
use rand::Rng;
use serde::{Serialize, Deserialize};
use super::actor::{Actor, Behavior, StepContext};
use super::animation::AnimationLibrary;
use super::body::{Action, BodyKind, MovingBody, PhysicsTuning};
use super::event::Sfx;
use super::hazard::Hazard;

/// Enemy constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Chance per idle frame of starting a walk burst
    pub walk_chance: f32,
    /// Shortest walk burst (frames)
    pub walk_min_frames: u32,
    /// Longest walk burst (frames)
    pub walk_max_frames: u32,
    /// Walking speed (pixels per frame)
    pub walk_speed: f32,
    /// Ground probe distance ahead of the body center
    pub probe_ahead: f32,
    /// Ground probe depth below the body's top edge
    pub probe_depth: f32,
    /// Vertical distance within which the player can be shot
    pub sight_band: f32,
    /// Horizontal distance from the body center where a projectile spawns
    pub projectile_offset: f32,
    /// Projectile speed (pixels per frame)
    pub projectile_speed: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            walk_chance: 0.01,
            walk_min_frames: 30,
            walk_max_frames: 120,
            walk_speed: 0.5,
            probe_ahead: 7.0,
            probe_depth: 23.0,
            sight_band: 16.0,
            projectile_offset: 7.0,
            projectile_speed: 1.5,
        }
    }
}

/// Enemy-specific state
#[derive(Debug, Clone)]
pub struct EnemyBehavior {
    tuning: EnemyTuning,
    /// Frames left in the current walk burst (0 = idle)
    walk_timer: u32,
}

impl EnemyBehavior {
    pub fn new(tuning: EnemyTuning) -> Self {
        Self { tuning, walk_timer: 0 }
    }

    /// One walking frame: probe the ground ahead and pick a direction
    fn walk(&mut self, body: &mut MovingBody, input: Vec2, ctx: &mut StepContext) -> Vec2 {
        let t = &self.tuning;
        let mut movement = input;
        let dir = if body.facing_left() { -1.0 } else { 1.0 };
        let probe = Vec2::new(
            body.rect().center_x() as f32 + t.probe_ahead * dir,
            body.position.y + t.probe_depth,
        );

        if ctx.tiles.solid_check(probe) {
            // Flags are from the previous physics step
            if body.collisions().horizontal() {
                body.turn_around();
            } else {
                movement.x += t.walk_speed * dir;
            }
        } else {
            body.turn_around();
        }

        self.walk_timer -= 1;
        if self.walk_timer == 0 {
            self.shoot_if_facing_target(body, ctx);
        }
        movement
    }

    fn shoot_if_facing_target(&self, body: &MovingBody, ctx: &mut StepContext) {
        let Some(target) = ctx.target else {
            return;
        };
        let t = &self.tuning;
        let d = target - body.position;
        if d.y.abs() >= t.sight_band {
            return;
        }

        let facing_target = (body.facing_left() && d.x < 0.0) || (!body.facing_left() && d.x > 0.0);
        if facing_target {
            ctx.events.projectiles.send(Hazard::launched_from(
                body.rect(),
                body.facing_left(),
                t.projectile_offset,
                t.projectile_speed,
            ));
            ctx.events.sounds.send(Sfx::EnemyAttack);
            log::trace!("Enemy at {:?} fired", body.position);
        }
    }
}

impl Behavior for EnemyBehavior {
    fn decide_movement(&mut self, body: &mut MovingBody, input: Vec2, ctx: &mut StepContext) -> Vec2 {
        if self.walk_timer > 0 {
            return self.walk(body, input, ctx);
        }

        if ctx.rng.gen::<f32>() < self.tuning.walk_chance {
            let (lo, hi) = (self.tuning.walk_min_frames, self.tuning.walk_max_frames);
            self.walk_timer = ctx.rng.gen_range(lo.min(hi)..=hi.max(lo));
        }
        input
    }

    fn after_step(&mut self, body: &mut MovingBody, movement: Vec2) {
        if movement.x != 0.0 {
            body.set_action(Action::Run);
        } else {
            body.set_action(Action::Idle);
        }
    }
}

/// A patrolling enemy
pub type Enemy = Actor<EnemyBehavior>;

impl Enemy {
    /// Create an enemy at a spawner
    pub fn spawn(
        position: Vec2,
        size: (i32, i32),
        physics: PhysicsTuning,
        tuning: EnemyTuning,
        clips: Rc<AnimationLibrary>,
    ) -> Self {
        let body = MovingBody::new(BodyKind::Enemy, position, size, physics, clips);
        Actor::new(body, EnemyBehavior::new(tuning))
    }

    /// Frames left in the current walk burst
    pub fn walk_timer(&self) -> u32 {
        self.behavior.walk_timer
    }

    pub fn is_walking(&self) -> bool {
        self.behavior.walk_timer > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;
    use rand::rngs::mock::StepRng;
    use crate::game::event::GameEvents;
    use crate::world::{Level, TileKind, Tilemap};

    /// Floor on tile row 5 (top 80) from column 0 to 5, wall at (6, 4)
    fn yard() -> Tilemap {
        Tilemap::from_level(
            &Level::new()
                .with_row(TileKind::Stone, 0, 5, 5)
                .with_tile(TileKind::Stone, 6, 4),
        )
    }

    fn enemy_at(x: f32) -> Enemy {
        Enemy::spawn(
            Vec2::new(x, 64.0),
            (16, 16),
            PhysicsTuning::default(),
            EnemyTuning::default(),
            Rc::new(AnimationLibrary::default()),
        )
    }

    fn step_with(
        enemy: &mut Enemy,
        tiles: &Tilemap,
        rng: &mut dyn RngCore,
        target: Option<Vec2>,
        events: &mut GameEvents,
    ) {
        let mut ctx = StepContext { tiles, rng, target, events };
        enemy.update(Vec2::ZERO, &mut ctx);
    }

    /// Step with an rng that never starts a walk
    fn step(enemy: &mut Enemy, tiles: &Tilemap, target: Option<Vec2>, events: &mut GameEvents) {
        let mut rng = StepRng::new(u64::MAX, 0);
        step_with(enemy, tiles, &mut rng, target, events);
    }

    #[test]
    fn test_idle_roll_starts_walk() {
        let tiles = yard();
        let mut events = GameEvents::new();

        let mut enemy = enemy_at(32.0);
        step(&mut enemy, &tiles, None, &mut events);
        assert!(!enemy.is_walking());
        assert_eq!(enemy.body.action(), Action::Idle);

        let mut always = StepRng::new(0, 0);
        step_with(&mut enemy, &tiles, &mut always, None, &mut events);
        assert_eq!(enemy.walk_timer(), 30);
        // The roll frame itself does not move
        assert_eq!(enemy.body.position.x, 32.0);
    }

    #[test]
    fn test_walks_forward_on_solid_ground() {
        let tiles = yard();
        let mut events = GameEvents::new();
        let mut enemy = enemy_at(32.0);
        enemy.behavior.walk_timer = 10;

        step(&mut enemy, &tiles, None, &mut events);
        assert_eq!(enemy.body.position.x, 32.5);
        assert_eq!(enemy.walk_timer(), 9);
        assert_eq!(enemy.body.action(), Action::Run);
    }

    #[test]
    fn test_ledge_reversal() {
        let tiles = Tilemap::from_level(&Level::new().with_row(TileKind::Stone, 2, 4, 5));
        let mut events = GameEvents::new();
        // Center 78, probe at x 85 is past the platform's right edge (80)
        let mut enemy = enemy_at(70.0);
        enemy.behavior.walk_timer = 10;

        step(&mut enemy, &tiles, None, &mut events);
        assert_eq!(enemy.body.position.x, 70.0);
        assert!(enemy.body.facing_left());
        assert_eq!(enemy.body.action(), Action::Idle);
        assert_eq!(enemy.walk_timer(), 9);
    }

    #[test]
    fn test_wall_reversal_uses_previous_flags() {
        let tiles = yard();
        let mut events = GameEvents::new();
        let mut enemy = enemy_at(80.5);
        enemy.behavior.walk_timer = 10;

        // Walks into the wall at x 96 and is pushed back flush
        step(&mut enemy, &tiles, None, &mut events);
        assert!(enemy.body.collisions().right);
        assert_eq!(enemy.body.position.x, 80.0);
        assert!(!enemy.body.facing_left());

        // Next frame sees the flag and turns around in place
        step(&mut enemy, &tiles, None, &mut events);
        assert!(enemy.body.facing_left());
        assert_eq!(enemy.body.position.x, 80.0);
    }

    #[test]
    fn test_fires_at_burst_end_when_facing_player() {
        let tiles = yard();
        let mut events = GameEvents::new();
        let mut enemy = enemy_at(32.0);
        enemy.behavior.walk_timer = 1;

        step(&mut enemy, &tiles, Some(Vec2::new(64.0, 70.0)), &mut events);
        assert_eq!(enemy.walk_timer(), 0);
        assert_eq!(events.projectiles.len(), 1);
        assert_eq!(events.sounds.iter().copied().collect::<Vec<_>>(), vec![Sfx::EnemyAttack]);

        let shot = events.projectiles.drain().next().unwrap();
        assert_eq!(shot.position, Vec2::new(47.0, 72.0));
        assert_eq!(shot.speed, 1.5);
    }

    #[test]
    fn test_holds_fire_behind_or_out_of_band() {
        let tiles = yard();
        let mut events = GameEvents::new();

        // Player behind
        let mut enemy = enemy_at(32.0);
        enemy.behavior.walk_timer = 1;
        step(&mut enemy, &tiles, Some(Vec2::new(0.0, 64.0)), &mut events);
        assert!(events.projectiles.is_empty());

        // Player in front but 16 pixels higher
        let mut enemy = enemy_at(32.0);
        enemy.behavior.walk_timer = 1;
        step(&mut enemy, &tiles, Some(Vec2::new(64.0, 48.0)), &mut events);
        assert!(events.projectiles.is_empty());

        // Mid-burst never fires
        let mut enemy = enemy_at(32.0);
        enemy.behavior.walk_timer = 5;
        step(&mut enemy, &tiles, Some(Vec2::new(64.0, 64.0)), &mut events);
        assert!(events.projectiles.is_empty());
        assert!(events.sounds.is_empty());
    }
}
