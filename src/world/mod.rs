//! World module - tile-based level geometry
//!
//! - Level data (tiles, decorations, spawners) and its RON file format
//! - The runtime tile grid answering collision queries
//! - Built-in levels used when no level files are shipped

mod geometry;
mod level;
mod rect;
mod sample_levels;
mod tilemap;

pub use geometry::*;
pub use level::*;
pub use rect::Rect;
pub use sample_levels::*;
pub use tilemap::{Tilemap, TileQuery, NEIGHBOR_OFFSETS};
