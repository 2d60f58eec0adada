//! Tile Grid
//!
//! Runtime lookup structure for a loaded level. Bodies never look at tiles
//! directly; they go through the `TileQuery` trait, which answers two
//! questions: which solid rectangles a body could touch, and whether a
//! single point sits inside a solid tile.

use std::collections::HashMap;
use macroquad::math::Vec2;
use super::geometry::{DecorDef, Level, TileDef, TileKind};
use super::rect::Rect;

/// Tile neighbourhood scanned around a body that fits in one tile, relative
/// to the tile of its top-left corner. The order is the order collisions are
/// resolved in.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 9] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (0, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Level-geometry provider consumed by the physics step.
pub trait TileQuery {
    /// Every solid tile rectangle a body of `size` with its top-left at
    /// `position` could overlap, plus a ring of one tile around it.
    fn physics_rects_around(&self, position: Vec2, size: (i32, i32)) -> Vec<Rect>;

    /// True if the tile containing `point` is solid.
    fn solid_check(&self, point: Vec2) -> bool;
}

/// Grid of tiles keyed by tile coordinate, plus off-grid decorations
#[derive(Debug, Clone)]
pub struct Tilemap {
    tile_size: i32,
    grid: HashMap<(i32, i32), TileDef>,
    decor: Vec<DecorDef>,
}

impl Tilemap {
    pub fn new(tile_size: i32) -> Self {
        Self {
            tile_size,
            grid: HashMap::new(),
            decor: Vec::new(),
        }
    }

    /// Build the grid for a level. Later tiles replace earlier ones on the same cell.
    pub fn from_level(level: &Level) -> Self {
        let mut map = Self::new(level.tile_size);
        for tile in &level.tiles {
            map.insert(*tile);
        }
        map.decor = level.decor.clone();
        map
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// Place (or replace) a grid tile
    pub fn insert(&mut self, tile: TileDef) {
        self.grid.insert((tile.x, tile.y), tile);
    }

    /// Tile at a grid coordinate
    pub fn get(&self, x: i32, y: i32) -> Option<&TileDef> {
        self.grid.get(&(x, y))
    }

    /// Grid coordinate of the tile containing a pixel position (floor division)
    pub fn tile_coord(&self, position: Vec2) -> (i32, i32) {
        let size = self.tile_size as f32;
        ((position.x / size).floor() as i32, (position.y / size).floor() as i32)
    }

    /// All grid tiles (unordered)
    pub fn tiles(&self) -> impl Iterator<Item = &TileDef> {
        self.grid.values()
    }

    pub fn decor(&self) -> &[DecorDef] {
        &self.decor
    }

    /// Pixel rect of a grid cell
    fn cell_rect(&self, x: i32, y: i32) -> Rect {
        Rect::new(x * self.tile_size, y * self.tile_size, self.tile_size, self.tile_size)
    }

    fn is_solid_at(&self, x: i32, y: i32) -> bool {
        self.grid.get(&(x, y)).map(|t| t.kind.is_solid()).unwrap_or(false)
    }

    /// Number of solid grid tiles
    pub fn solid_count(&self) -> usize {
        self.grid.values().filter(|t| TileKind::is_solid(t.kind)).count()
    }
}

impl TileQuery for Tilemap {
    fn physics_rects_around(&self, position: Vec2, size: (i32, i32)) -> Vec<Rect> {
        let (tx, ty) = self.tile_coord(position);

        if size.0 <= self.tile_size && size.1 <= self.tile_size {
            return NEIGHBOR_OFFSETS
                .iter()
                .map(|(dx, dy)| (tx + dx, ty + dy))
                .filter(|&(x, y)| self.is_solid_at(x, y))
                .map(|(x, y)| self.cell_rect(x, y))
                .collect();
        }

        // Body spans several tiles: scan its whole extent, row by row
        let (ex, ey) = self.tile_coord(position + Vec2::new(size.0 as f32, size.1 as f32));
        (ty - 1..=ey + 1)
            .flat_map(|y| (tx - 1..=ex + 1).map(move |x| (x, y)))
            .filter(|&(x, y)| self.is_solid_at(x, y))
            .map(|(x, y)| self.cell_rect(x, y))
            .collect()
    }

    fn solid_check(&self, point: Vec2) -> bool {
        let (x, y) = self.tile_coord(point);
        self.is_solid_at(x, y)
    }
}
