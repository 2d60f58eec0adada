//! Hazards: player attacks and enemy projectiles
//!
//! A hazard is a point moving horizontally at constant speed. Controllers
//! only create them; the frame loop owns the live lists and sweeps them
//! once per frame. Sweeps consume the current generation and return the
//! next one, so nothing is removed from a list while it is being iterated.

use macroquad::math::Vec2;
use serde::{Serialize, Deserialize};
use crate::world::{Rect, TileQuery};

/// A moving hazard point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hazard {
    pub position: Vec2,
    /// Horizontal displacement per frame (sign is direction)
    pub speed: f32,
    /// Frames since spawn
    pub age: u32,
}

impl Hazard {
    pub fn new(position: Vec2, speed: f32) -> Self {
        Self { position, speed, age: 0 }
    }

    /// Launch from a body's center, `offset` pixels ahead in its facing direction
    pub fn launched_from(rect: Rect, facing_left: bool, offset: f32, speed: f32) -> Self {
        let dir = if facing_left { -1.0 } else { 1.0 };
        let origin = rect.center();
        Self::new(Vec2::new(origin.x + offset * dir, origin.y), speed * dir)
    }

    /// Move one frame and grow older
    pub fn advance(&mut self) {
        self.position.x += self.speed;
        self.age += 1;
    }
}

/// Hazard lifetimes in frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    /// Enemy projectiles vanish once older than this
    pub projectile_lifetime: u32,
    /// Player attacks vanish once older than this
    pub attack_lifetime: u32,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            projectile_lifetime: 90,
            attack_lifetime: 60,
        }
    }
}

/// Outcome of one projectile sweep
#[derive(Debug, Default)]
pub struct ProjectileSweep {
    /// Projectiles still flying
    pub survivors: Vec<Hazard>,
    /// Where a projectile struck the player, if one did
    pub player_hit: Option<Vec2>,
}

/// Advance enemy projectiles and test them against tiles and the player.
///
/// A projectile dies in a solid tile, past its lifetime, or on the player.
/// The sweep stops at the first player hit: the level restarts anyway.
pub fn sweep_projectiles(
    projectiles: Vec<Hazard>,
    tiles: &dyn TileQuery,
    player: Rect,
    lifetime: u32,
) -> ProjectileSweep {
    let mut sweep = ProjectileSweep::default();

    for mut projectile in projectiles {
        projectile.advance();
        if tiles.solid_check(projectile.position) || projectile.age > lifetime {
            continue;
        }
        if player.contains(projectile.position) {
            sweep.player_hit = Some(projectile.position);
            break;
        }
        sweep.survivors.push(projectile);
    }

    sweep
}

/// Outcome of one attack sweep
#[derive(Debug, Default)]
pub struct AttackSweep {
    /// Attacks still flying
    pub survivors: Vec<Hazard>,
    /// Indices (into the enemy rect slice) of destroyed enemies, in hit order
    pub killed: Vec<usize>,
    /// Hit positions, parallel to `killed`
    pub hits: Vec<Vec2>,
}

/// Advance player attacks and test them against tiles and enemies.
///
/// An attack dies in a solid tile or past its lifetime. Otherwise it
/// destroys the first still-living enemy whose rect contains it, and is
/// consumed by the hit.
pub fn sweep_attacks(
    attacks: Vec<Hazard>,
    tiles: &dyn TileQuery,
    enemies: &[Rect],
    lifetime: u32,
) -> AttackSweep {
    let mut sweep = AttackSweep::default();
    let mut alive = vec![true; enemies.len()];

    for mut attack in attacks {
        attack.advance();
        if tiles.solid_check(attack.position) || attack.age > lifetime {
            continue;
        }

        let target = enemies
            .iter()
            .enumerate()
            .find(|(i, rect)| alive[*i] && rect.contains(attack.position))
            .map(|(i, _)| i);

        match target {
            Some(i) => {
                alive[i] = false;
                sweep.killed.push(i);
                sweep.hits.push(attack.position);
            }
            None => sweep.survivors.push(attack),
        }
    }

    sweep
}
