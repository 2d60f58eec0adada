//! Level discovery and built-in levels
//!
//! Levels ship as `data/maps/<n>.ron` and are played in numeric order.
//! When that folder is missing or nothing in it loads, the game falls back
//! to a small built-in campaign so it is always playable.

#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};
use super::{Level, TileKind, SpawnerKind};

#[cfg(not(target_arch = "wasm32"))]
use super::load_level;
#[cfg(target_arch = "wasm32")]
use super::parse_level_data;

/// Default folder for level files
pub const LEVELS_DIR: &str = "data/maps";

/// Sort key: numeric stems first (0, 1, 2, 10), then everything else by name
#[cfg(not(target_arch = "wasm32"))]
fn level_sort_key(path: &Path) -> (u32, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    (stem.parse::<u32>().unwrap_or(u32::MAX), stem)
}

/// Find all level files in a folder, in play order (native)
#[cfg(not(target_arch = "wasm32"))]
pub fn discover_levels<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    let mut levels = Vec::new();

    if let Ok(entries) = std::fs::read_dir(dir.as_ref()) {
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            // Only include .ron files, skip directories
            if path.is_file() && path.extension().map(|e| e == "ron").unwrap_or(false) {
                levels.push(path);
            }
        }
    }

    levels.sort_by_key(|p| level_sort_key(p));
    levels
}

/// Load every level in a folder. Files that fail to load are skipped with a
/// warning; if none load, the built-in levels are returned.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_levels_or_builtin<P: AsRef<Path>>(dir: P) -> Vec<Level> {
    let mut levels = Vec::new();
    for path in discover_levels(dir.as_ref()) {
        match load_level(&path) {
            Ok(level) => {
                log::info!("Loaded level {} ({} tiles)", path.display(), level.tiles.len());
                levels.push(level);
            }
            Err(e) => log::warn!("Skipping level {}: {}", path.display(), e),
        }
    }

    if levels.is_empty() {
        log::info!("No level files in {}, using built-in levels", dir.as_ref().display());
        return builtin_levels();
    }
    levels
}

/// Folders cannot be listed on WASM: fetch `0.ron`, `1.ron`, ... until one
/// is missing or broken. Falls back to the built-in levels if none load.
#[cfg(target_arch = "wasm32")]
pub async fn fetch_levels_or_builtin(dir: &str) -> Vec<Level> {
    let mut levels = Vec::new();
    loop {
        let path = format!("{}/{}.ron", dir, levels.len());
        let Ok(bytes) = macroquad::file::load_file(&path).await else { break };
        match parse_level_data(&bytes) {
            Ok(level) => levels.push(level),
            Err(e) => {
                log::warn!("Stopping at level {}: {}", path, e);
                break;
            }
        }
    }

    if levels.is_empty() {
        log::info!("No level files under {}, using built-in levels", dir);
        return builtin_levels();
    }
    levels
}

/// The built-in campaign
pub fn builtin_levels() -> Vec<Level> {
    vec![meadow(), ledges(), quarry()]
}

/// Flat meadow with one raised platform
fn meadow() -> Level {
    Level::new()
        .with_row(TileKind::Grass, 0, 29, 12)
        .with_row(TileKind::Stone, 0, 29, 13)
        .with_tile(TileKind::Stone, 0, 11)
        .with_tile(TileKind::Stone, 0, 10)
        .with_tile(TileKind::Stone, 29, 11)
        .with_tile(TileKind::Stone, 29, 10)
        .with_row(TileKind::Grass, 8, 12, 8)
        .with_tile(TileKind::Decor, 4, 11)
        .with_spawner(SpawnerKind::Player, 48.0, 160.0)
        .with_spawner(SpawnerKind::Enemy, 150.0, 112.0)
        .with_spawner(SpawnerKind::Enemy, 320.0, 160.0)
}

/// Stepped ledges over a pit; falling in is fatal
fn ledges() -> Level {
    Level::new()
        .with_row(TileKind::Grass, 0, 7, 12)
        .with_row(TileKind::Grass, 11, 16, 10)
        .with_row(TileKind::Grass, 20, 27, 8)
        .with_row(TileKind::Stone, 20, 27, 9)
        .with_tile(TileKind::Stone, 27, 7)
        .with_spawner(SpawnerKind::Player, 32.0, 160.0)
        .with_spawner(SpawnerKind::Enemy, 208.0, 128.0)
        .with_spawner(SpawnerKind::Enemy, 368.0, 96.0)
        .with_spawner(SpawnerKind::Enemy, 400.0, 96.0)
}

/// Stone quarry with a low ceiling
fn quarry() -> Level {
    Level::new()
        .with_row(TileKind::Stone, 0, 34, 12)
        .with_row(TileKind::Stone, 10, 20, 8)
        .with_row(TileKind::Stone, 24, 30, 9)
        .with_tile(TileKind::Stone, 34, 11)
        .with_tile(TileKind::LargeDecor, 2, 11)
        .with_spawner(SpawnerKind::Player, 24.0, 160.0)
        .with_spawner(SpawnerKind::Enemy, 176.0, 160.0)
        .with_spawner(SpawnerKind::Enemy, 256.0, 160.0)
        .with_spawner(SpawnerKind::Enemy, 420.0, 160.0)
        .with_spawner(SpawnerKind::Enemy, 200.0, 112.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{validate_level, save_level};

    #[test]
    fn test_builtin_levels_are_valid() {
        for (i, level) in builtin_levels().iter().enumerate() {
            assert!(validate_level(level).is_ok(), "built-in level {} invalid", i);
            assert!(level.enemy_spawns().count() > 0);
        }
    }

    #[test]
    fn test_discover_sorts_numerically() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["10.ron", "2.ron", "0.ron", "notes.txt"] {
            std::fs::write(dir.path().join(name), "()").unwrap();
        }

        let found: Vec<String> = discover_levels(dir.path())
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(found, vec!["0.ron", "2.ron", "10.ron"]);
    }

    #[test]
    fn test_load_skips_broken_and_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("0.ron"), "(broken").unwrap();
        assert_eq!(load_levels_or_builtin(dir.path()).len(), builtin_levels().len());

        save_level(&builtin_levels()[1], dir.path().join("1.ron")).unwrap();
        let levels = load_levels_or_builtin(dir.path());
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0], builtin_levels()[1]);
    }
}
