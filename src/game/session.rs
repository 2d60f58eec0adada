//! Game Session
//!
//! Owns everything that lives for one play-through: the campaign's levels,
//! the loaded tile grid, the player, the enemies and both hazard lists.
//! `step` advances the whole game by one fixed frame in a fixed order:
//! camera, enemies, player, projectiles, attacks, then button presses.

use std::rc::Rc;
use macroquad::math::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use crate::config::GameConfig;
use crate::world::{builtin_levels, Level, Rect, Tilemap};
use super::actor::StepContext;
use super::animation::AnimationLibrary;
use super::enemy::Enemy;
use super::event::{DeathCause, DeathEvent, GameEvents, KillEvent, Sfx};
use super::hazard::{sweep_attacks, sweep_projectiles, Hazard};
use super::player::Player;

/// Logical screen size the camera centers on
pub const VIEW_SIZE: Vec2 = Vec2::new(320.0, 240.0);

/// Frames for the level transition to close (and to open)
pub const TRANSITION_FRAMES: i32 = 30;

/// Screen shake set on hits and deaths
const IMPACT_SHAKE: u32 = 16;

/// Camera covers 1/SCROLL_EASE of the remaining distance each frame
const SCROLL_EASE: f32 = 30.0;

/// Player intent for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Move left held
    pub left: bool,
    /// Move right held
    pub right: bool,
    /// Jump pressed this frame
    pub jump: bool,
    /// Attack pressed this frame
    pub attack: bool,
}

impl FrameInput {
    /// Horizontal movement request (-1, 0 or 1)
    pub fn horizontal(&self) -> f32 {
        (self.right as i32 - self.left as i32) as f32
    }
}

/// What happened during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Running,
    /// The player fell or was shot; the level was restarted
    PlayerDied,
    /// All enemies were cleared and this level index was loaded
    LevelCleared(usize),
    /// The last level was cleared
    Victory,
}

/// One play-through of the campaign
pub struct Session {
    config: GameConfig,
    clips: Rc<AnimationLibrary>,
    levels: Vec<Level>,
    level_index: usize,
    tilemap: Tilemap,
    player: Player,
    enemies: Vec<Enemy>,
    projectiles: Vec<Hazard>,
    attacks: Vec<Hazard>,
    events: GameEvents,
    rng: StdRng,
    scroll: Vec2,
    screenshake: u32,
    transition: i32,
}

impl Session {
    /// Start a session on the first level. An empty campaign falls back to
    /// the built-in levels.
    pub fn new(config: GameConfig, levels: Vec<Level>) -> Self {
        let levels = if levels.is_empty() {
            log::warn!("Session started without levels, using built-in levels");
            builtin_levels()
        } else {
            levels
        };

        let clips = Rc::new(config.animations.clone());
        let start = levels.first().and_then(Level::player_spawn).unwrap_or(Vec2::ZERO);
        let player = Player::spawn(start, config.body_size, config.physics, config.player, clips.clone());
        let rng = StdRng::seed_from_u64(config.rng_seed);

        let mut session = Self {
            config,
            clips,
            levels,
            level_index: 0,
            tilemap: Tilemap::new(crate::world::DEFAULT_TILE_SIZE),
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            attacks: Vec::new(),
            events: GameEvents::new(),
            rng,
            scroll: Vec2::ZERO,
            screenshake: 0,
            transition: 0,
        };
        session.load_level(0);
        session
    }

    // ========================================================================
    // Level loading
    // ========================================================================

    /// Load a level of the campaign: rebuild the grid, move the player to the
    /// spawn point and respawn every enemy
    pub fn load_level(&mut self, index: usize) {
        let Some(level) = self.levels.get(index) else {
            log::warn!("No level {} (campaign has {})", index, self.levels.len());
            return;
        };

        self.level_index = index;
        self.tilemap = Tilemap::from_level(level);

        match level.player_spawn() {
            Some(spawn) => self.player.place_at(spawn),
            None => log::warn!("Level {} has no player spawner, player stays put", index),
        }

        let config = &self.config;
        self.enemies = level
            .enemy_spawns()
            .map(|pos| Enemy::spawn(pos, config.body_size, config.physics, config.enemy, self.clips.clone()))
            .collect();

        self.projectiles.clear();
        self.attacks.clear();
        self.events.projectiles.clear();
        self.events.attacks.clear();
        self.scroll = Vec2::ZERO;
        self.transition = -TRANSITION_FRAMES;

        log::info!(
            "Loaded level {} ({} solid tiles, {} enemies)",
            index,
            self.tilemap.solid_count(),
            self.enemies.len()
        );
    }

    /// Reload the current level after a death
    pub fn restart_level(&mut self) {
        self.load_level(self.level_index);
        self.player.reset_air_time();
    }

    // ========================================================================
    // Frame step
    // ========================================================================

    /// Advance the game by one frame
    pub fn step(&mut self, input: &FrameInput) -> StepOutcome {
        // Whatever the front end did not drain last frame is stale now
        self.events.sounds.clear();
        self.events.deaths.clear();
        self.events.kills.clear();

        self.screenshake = self.screenshake.saturating_sub(1);

        let mut outcome = StepOutcome::Running;
        if self.enemies.is_empty() {
            self.transition += 1;
            if self.transition > TRANSITION_FRAMES {
                if self.level_index + 1 >= self.levels.len() {
                    log::info!("Final level cleared");
                    return StepOutcome::Victory;
                }
                log::info!("Level {} cleared", self.level_index);
                self.load_level(self.level_index + 1);
                outcome = StepOutcome::LevelCleared(self.level_index);
            }
        }
        if self.transition < 0 {
            self.transition += 1;
        }

        let center = self.player.body.rect().center();
        self.scroll += (center - VIEW_SIZE / 2.0 - self.scroll) / SCROLL_EASE;

        self.update_actors(input);
        if self.player.has_fallen() {
            self.kill_player(DeathCause::Fell);
            return StepOutcome::PlayerDied;
        }

        if self.update_projectiles() {
            self.kill_player(DeathCause::Shot);
            return StepOutcome::PlayerDied;
        }
        self.update_attacks();

        if input.jump && self.player.jump() {
            self.events.sounds.send(Sfx::Jump);
        }
        if input.attack {
            self.player.attack(&mut self.events);
        }

        outcome
    }

    /// Enemies first (watching the player), then the player
    fn update_actors(&mut self, input: &FrameInput) {
        let target = self.player.body.position;
        for enemy in &mut self.enemies {
            let mut ctx = StepContext {
                tiles: &self.tilemap,
                rng: &mut self.rng,
                target: Some(target),
                events: &mut self.events,
            };
            enemy.update(Vec2::ZERO, &mut ctx);
        }

        let mut ctx = StepContext {
            tiles: &self.tilemap,
            rng: &mut self.rng,
            target: None,
            events: &mut self.events,
        };
        self.player.update(Vec2::new(input.horizontal(), 0.0), &mut ctx);
    }

    /// Take in newly fired projectiles and sweep them. Returns true if the
    /// player was hit.
    fn update_projectiles(&mut self) -> bool {
        self.projectiles.extend(self.events.projectiles.drain());
        let sweep = sweep_projectiles(
            std::mem::take(&mut self.projectiles),
            &self.tilemap,
            self.player.body.rect(),
            self.config.hazards.projectile_lifetime,
        );
        self.projectiles = sweep.survivors;
        sweep.player_hit.is_some()
    }

    /// Take in new attacks, sweep them and remove the enemies they destroyed
    fn update_attacks(&mut self) {
        self.attacks.extend(self.events.attacks.drain());
        let targets: Vec<Rect> = self.enemies.iter().map(|e| e.body.rect()).collect();
        let sweep = sweep_attacks(
            std::mem::take(&mut self.attacks),
            &self.tilemap,
            &targets,
            self.config.hazards.attack_lifetime,
        );
        self.attacks = sweep.survivors;

        if sweep.killed.is_empty() {
            return;
        }
        for &position in &sweep.hits {
            self.events.sounds.send(Sfx::Hit);
            self.events.kills.send(KillEvent { position });
            self.screenshake = self.screenshake.max(IMPACT_SHAKE);
        }

        let mut index = 0;
        self.enemies.retain(|_| {
            let keep = !sweep.killed.contains(&index);
            index += 1;
            keep
        });
        log::debug!("{} enemies left", self.enemies.len());
    }

    fn kill_player(&mut self, cause: DeathCause) {
        let position = self.player.body.position;
        log::info!("Player died ({:?}) at ({:.0}, {:.0})", cause, position.x, position.y);
        self.events.sounds.send(Sfx::Death);
        self.events.deaths.send(DeathEvent { cause, position });
        self.screenshake = self.screenshake.max(IMPACT_SHAKE);
        self.restart_level();
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn projectiles(&self) -> &[Hazard] {
        &self.projectiles
    }

    pub fn attacks(&self) -> &[Hazard] {
        &self.attacks
    }

    pub fn tilemap(&self) -> &Tilemap {
        &self.tilemap
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Level transition counter: negative while opening, positive while closing
    pub fn transition(&self) -> i32 {
        self.transition
    }

    pub fn screenshake(&self) -> u32 {
        self.screenshake
    }

    /// Smoothed camera position
    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    /// Camera position snapped to whole pixels for drawing
    pub fn render_scroll(&self) -> Vec2 {
        Vec2::new(self.scroll.x.trunc(), self.scroll.y.trunc())
    }

    /// Sounds, deaths and kills raised by the last step
    pub fn events_mut(&mut self) -> &mut GameEvents {
        &mut self.events
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
