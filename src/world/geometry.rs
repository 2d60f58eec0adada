//! Level data
//!
//! The serialized description of a level: grid tiles, off-grid decorations
//! and spawner markers. This is pure data; `Tilemap` builds the runtime
//! lookup structure from it.

use macroquad::math::Vec2;
use serde::{Serialize, Deserialize};

/// Default tile edge length in pixels
pub const DEFAULT_TILE_SIZE: i32 = 16;

fn default_tile_size() -> i32 {
    DEFAULT_TILE_SIZE
}

// ============================================================================
// Tiles
// ============================================================================

/// Tile families. Only grass and stone take part in collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Grass,
    Stone,
    Decor,
    LargeDecor,
}

impl TileKind {
    /// Solid tiles block bodies and consume hazards
    pub fn is_solid(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Stone)
    }

    /// Image folder under `data/images/tiles/`
    pub fn asset_dir(self) -> &'static str {
        match self {
            TileKind::Grass => "grass",
            TileKind::Stone => "stone",
            TileKind::Decor => "decor",
            TileKind::LargeDecor => "large_decor",
        }
    }

    pub const ALL: [TileKind; 4] = [
        TileKind::Grass,
        TileKind::Stone,
        TileKind::Decor,
        TileKind::LargeDecor,
    ];
}

/// A tile placed on the grid (coordinates in tiles)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDef {
    pub kind: TileKind,
    #[serde(default)]
    pub variant: u32,
    pub x: i32,
    pub y: i32,
}

/// A decoration placed off the grid (coordinates in pixels, never solid)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecorDef {
    pub kind: TileKind,
    #[serde(default)]
    pub variant: u32,
    pub x: f32,
    pub y: f32,
}

// ============================================================================
// Spawners
// ============================================================================

/// What a spawner marker creates when the level loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnerKind {
    /// Player start (exactly one per level)
    Player,
    /// One enemy
    Enemy,
}

/// Spawner marker (coordinates in pixels, top-left of the spawned body)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    pub kind: SpawnerKind,
    pub x: f32,
    pub y: f32,
}

impl Spawner {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

// ============================================================================
// Level
// ============================================================================

/// A complete level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    #[serde(default = "default_tile_size")]
    pub tile_size: i32,
    pub tiles: Vec<TileDef>,
    #[serde(default)]
    pub decor: Vec<DecorDef>,
    pub spawners: Vec<Spawner>,
}

impl Level {
    pub fn new() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            tiles: Vec::new(),
            decor: Vec::new(),
            spawners: Vec::new(),
        }
    }

    /// Place a single grid tile
    pub fn with_tile(mut self, kind: TileKind, x: i32, y: i32) -> Self {
        self.tiles.push(TileDef { kind, variant: 0, x, y });
        self
    }

    /// Place a horizontal run of tiles from `x0` to `x1` inclusive
    pub fn with_row(mut self, kind: TileKind, x0: i32, x1: i32, y: i32) -> Self {
        for x in x0..=x1 {
            // Left cap 0, middle 1, right cap 2
            let variant = if x == x0 { 0 } else if x == x1 { 2 } else { 1 };
            self.tiles.push(TileDef { kind, variant, x, y });
        }
        self
    }

    /// Place a spawner marker at a pixel position
    pub fn with_spawner(mut self, kind: SpawnerKind, x: f32, y: f32) -> Self {
        self.spawners.push(Spawner { kind, x, y });
        self
    }

    /// Player start position (the first player spawner)
    pub fn player_spawn(&self) -> Option<Vec2> {
        self.spawners
            .iter()
            .find(|s| s.kind == SpawnerKind::Player)
            .map(Spawner::position)
    }

    /// Enemy start positions, in file order
    pub fn enemy_spawns(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.spawners
            .iter()
            .filter(|s| s.kind == SpawnerKind::Enemy)
            .map(Spawner::position)
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_kinds() {
        assert!(TileKind::Grass.is_solid());
        assert!(TileKind::Stone.is_solid());
        assert!(!TileKind::Decor.is_solid());
        assert!(!TileKind::LargeDecor.is_solid());
    }

    #[test]
    fn test_row_variants() {
        let level = Level::new().with_row(TileKind::Grass, 2, 5, 10);
        let variants: Vec<u32> = level.tiles.iter().map(|t| t.variant).collect();
        assert_eq!(variants, vec![0, 1, 1, 2]);
        assert!(level.tiles.iter().all(|t| t.y == 10));
    }

    #[test]
    fn test_spawner_lookup() {
        let level = Level::new()
            .with_spawner(SpawnerKind::Enemy, 100.0, 20.0)
            .with_spawner(SpawnerKind::Player, 50.0, 50.0)
            .with_spawner(SpawnerKind::Enemy, 200.0, 20.0);

        assert_eq!(level.player_spawn(), Some(Vec2::new(50.0, 50.0)));
        let enemies: Vec<Vec2> = level.enemy_spawns().collect();
        assert_eq!(enemies, vec![Vec2::new(100.0, 20.0), Vec2::new(200.0, 20.0)]);
    }
}
