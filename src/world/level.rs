//! Level loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable level files.
//! Supports both compressed (brotli) and uncompressed RON files.
//! - Reading: Auto-detects format by checking for valid RON start
//! - Writing: `save_level` always compresses; `level_to_ron` gives plain text

use std::fs;
use std::io::Cursor;
use std::path::Path;
use super::{Level, SpawnerKind};

/// Validation limits to prevent resource exhaustion from malicious files
pub mod limits {
    /// Maximum number of grid tiles in a level
    pub const MAX_TILES: usize = 65_536;
    /// Maximum number of decorations
    pub const MAX_DECOR: usize = 4_096;
    /// Maximum number of spawner markers
    pub const MAX_SPAWNERS: usize = 1_024;
    /// Largest allowed tile edge in pixels
    pub const MAX_TILE_SIZE: i32 = 256;
    /// Maximum coordinate value (prevents overflow issues)
    pub const MAX_COORD: f32 = 1_000_000.0;
    /// Maximum grid coordinate
    pub const MAX_GRID_COORD: i32 = 65_536;
}

/// Error type for level loading
#[derive(Debug)]
pub enum LevelError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
    ValidationError(String),
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for LevelError {
    fn from(e: ron::error::SpannedError) -> Self {
        LevelError::ParseError(e)
    }
}

impl From<ron::Error> for LevelError {
    fn from(e: ron::Error) -> Self {
        LevelError::SerializeError(e)
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::IoError(e) => write!(f, "IO error: {}", e),
            LevelError::ParseError(e) => write!(f, "Parse error: {}", e),
            LevelError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            LevelError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for LevelError {}

/// Check if a float is valid (not NaN or Inf)
fn is_valid_float(f: f32) -> bool {
    f.is_finite() && f.abs() <= limits::MAX_COORD
}

fn is_valid_grid(v: i32) -> bool {
    v.abs() <= limits::MAX_GRID_COORD
}

/// Validate a level after parsing
pub fn validate_level(level: &Level) -> Result<(), LevelError> {
    let fail = |msg: String| Err(LevelError::ValidationError(msg));

    if level.tile_size <= 0 || level.tile_size > limits::MAX_TILE_SIZE {
        return fail(format!("tile_size {} out of range 1..={}", level.tile_size, limits::MAX_TILE_SIZE));
    }
    if level.tiles.len() > limits::MAX_TILES {
        return fail(format!("too many tiles ({} > {})", level.tiles.len(), limits::MAX_TILES));
    }
    if level.decor.len() > limits::MAX_DECOR {
        return fail(format!("too many decorations ({} > {})", level.decor.len(), limits::MAX_DECOR));
    }
    if level.spawners.len() > limits::MAX_SPAWNERS {
        return fail(format!("too many spawners ({} > {})", level.spawners.len(), limits::MAX_SPAWNERS));
    }

    for (i, tile) in level.tiles.iter().enumerate() {
        if !is_valid_grid(tile.x) || !is_valid_grid(tile.y) {
            return fail(format!("tile[{}]: grid coordinate ({}, {}) out of range", i, tile.x, tile.y));
        }
    }
    for (i, decor) in level.decor.iter().enumerate() {
        if !is_valid_float(decor.x) || !is_valid_float(decor.y) {
            return fail(format!("decor[{}]: invalid position ({}, {})", i, decor.x, decor.y));
        }
    }
    for (i, spawner) in level.spawners.iter().enumerate() {
        if !is_valid_float(spawner.x) || !is_valid_float(spawner.y) {
            return fail(format!("spawner[{}]: invalid position ({}, {})", i, spawner.x, spawner.y));
        }
    }

    let players = level.spawners.iter().filter(|s| s.kind == SpawnerKind::Player).count();
    if players != 1 {
        return fail(format!("expected exactly one player spawner, found {}", players));
    }

    Ok(())
}

/// Decode raw file bytes into RON text (plain or brotli compressed)
fn decode_level_bytes(bytes: &[u8]) -> Result<String, LevelError> {
    // Detect format: RON files start with '(' or whitespace, brotli is binary
    let is_plain_ron = bytes.first().map(|&b| b == b'(' || b == b' ' || b == b'\n' || b == b'\r' || b == b'\t').unwrap_or(false);

    if is_plain_ron {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| LevelError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid UTF-8: {}", e)
            )))
    } else {
        let mut decompressed = Vec::new();
        brotli::BrotliDecompress(&mut Cursor::new(bytes), &mut decompressed)
            .map_err(|e| LevelError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("brotli decompression failed: {}", e)
            )))?;
        String::from_utf8(decompressed)
            .map_err(|e| LevelError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid UTF-8 after decompression: {}", e)
            )))
    }
}

/// Load a level from a RON file (supports both compressed and uncompressed)
pub fn load_level<P: AsRef<Path>>(path: P) -> Result<Level, LevelError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let contents = decode_level_bytes(&bytes)?;

    let level: Level = match ron::from_str(&contents) {
        Ok(l) => l,
        Err(e) => {
            let pos = e.position;
            log::warn!("RON parse error in {}: {}", path.display(), e);
            if let Some(line) = contents.lines().nth(pos.line.saturating_sub(1)) {
                log::warn!("  Line {}: {}", pos.line, line.trim());
            }
            return Err(e.into());
        }
    };

    validate_level(&level)?;
    Ok(level)
}

/// Parse level data from bytes (for async loading)
pub fn parse_level_data(bytes: &[u8]) -> Result<Level, LevelError> {
    let contents = decode_level_bytes(bytes)?;
    load_level_from_str(&contents)
}

/// Load a level from a RON string (for embedded levels or testing)
pub fn load_level_from_str(s: &str) -> Result<Level, LevelError> {
    let level: Level = ron::from_str(s)?;
    validate_level(&level)?;
    Ok(level)
}

/// Pretty RON text for a level
pub fn level_to_ron(level: &Level) -> Result<String, LevelError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(2)
        .indentor("  ".to_string());
    Ok(ron::ser::to_string_pretty(level, config)?)
}

/// Serialize a level to compressed bytes
pub fn serialize_level(level: &Level) -> Result<Vec<u8>, LevelError> {
    let ron_string = level_to_ron(level)?;

    // Compress with brotli (quality 6, window 22 - good balance of speed/ratio)
    let mut compressed = Vec::new();
    brotli::BrotliCompress(&mut Cursor::new(ron_string.as_bytes()), &mut compressed, &brotli::enc::BrotliEncoderParams {
        quality: 6,
        lgwin: 22,
        ..Default::default()
    }).map_err(|e| LevelError::IoError(std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("brotli compression failed: {}", e)
    )))?;

    Ok(compressed)
}

/// Save a level to a compressed RON file (brotli)
pub fn save_level<P: AsRef<Path>>(level: &Level, path: P) -> Result<(), LevelError> {
    validate_level(level)?;
    let compressed = serialize_level(level)?;
    fs::write(path, compressed)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{TileKind, SpawnerKind};

    fn sample() -> Level {
        Level::new()
            .with_row(TileKind::Stone, 0, 12, 8)
            .with_spawner(SpawnerKind::Player, 32.0, 96.0)
            .with_spawner(SpawnerKind::Enemy, 150.0, 96.0)
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(validate_level(&sample()).is_ok());
    }

    #[test]
    fn test_validate_requires_one_player_spawner() {
        let mut level = sample();
        level.spawners.retain(|s| s.kind != SpawnerKind::Player);
        assert!(matches!(validate_level(&level), Err(LevelError::ValidationError(_))));

        let twice = sample().with_spawner(SpawnerKind::Player, 0.0, 0.0);
        assert!(matches!(validate_level(&twice), Err(LevelError::ValidationError(_))));
    }

    #[test]
    fn test_validate_rejects_bad_tile_size_and_coords() {
        let mut level = sample();
        level.tile_size = 0;
        assert!(validate_level(&level).is_err());

        let mut level = sample();
        level.spawners[0].x = f32::NAN;
        assert!(validate_level(&level).is_err());
    }

    #[test]
    fn test_save_and_load_compressed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("0.ron");
        let level = sample();

        save_level(&level, &path).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_ne!(bytes.first(), Some(&b'('));

        let loaded = load_level(&path).unwrap();
        assert_eq!(loaded, level);
    }

    #[test]
    fn test_load_plain_ron_with_defaults() {
        let text = r#"(
            tiles: [(kind: Grass, x: 0, y: 3), (kind: Grass, variant: 1, x: 1, y: 3)],
            spawners: [(kind: Player, x: 0.0, y: 16.0)],
        )"#;
        let level = parse_level_data(text.as_bytes()).unwrap();
        assert_eq!(level.tile_size, 16);
        assert_eq!(level.tiles.len(), 2);
        assert_eq!(level.tiles[0].variant, 0);
        assert!(level.decor.is_empty());
    }

    #[test]
    fn test_parse_error_reported() {
        let result = load_level_from_str("(tiles: [oops");
        assert!(matches!(result, Err(LevelError::ParseError(_))));
    }
}
