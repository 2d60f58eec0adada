//! Build automation tasks for Grim's Adventure
//!
//! Usage:
//!   cargo run -p xtask -- package              # Release build plus data/ in dist/
//!   cargo run -p xtask -- new-level <name>     # Write a starter level to data/maps/

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for Grim's Adventure")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a native release and copy it with the game data into dist/
    Package,
    /// Write a starter level file to data/maps/<name>.ron
    NewLevel {
        /// File stem; numeric names set the play order (0, 1, 2, ...)
        name: String,
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Package => package(),
        Commands::NewLevel { name, force } => new_level(&name, force),
    }
}

/// Get the project root directory
fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask has no parent directory")
}

/// Run a command and check for success
fn run_cmd(cmd: &mut Command) -> Result<()> {
    let status = cmd.status().context("Failed to execute command")?;
    if !status.success() {
        anyhow::bail!("Command failed with status: {}", status);
    }
    Ok(())
}

/// Copy directory recursively
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Native release build with its data folder
fn package() -> Result<()> {
    let root = project_root()?;
    let dist = root.join("dist");

    println!("Building native release...");
    run_cmd(
        Command::new("cargo")
            .current_dir(&root)
            .args(["build", "--release"]),
    )?;

    // Clean and create dist folder
    if dist.exists() {
        std::fs::remove_dir_all(&dist)?;
    }
    std::fs::create_dir_all(&dist)?;

    let binary_name = if cfg!(target_os = "windows") {
        "grims-adventure.exe"
    } else {
        "grims-adventure"
    };
    std::fs::copy(
        root.join("target/release").join(binary_name),
        dist.join(binary_name),
    )
    .with_context(|| format!("Failed to copy {}", binary_name))?;

    let data = root.join("data");
    if data.exists() {
        copy_dir_recursive(&data, &dist.join("data"))?;
    } else {
        println!("No data/ folder; the build will use placeholder art and built-in levels");
    }

    println!("Package ready: dist/");
    Ok(())
}

/// A floor with a wall at each end, the player on the left and one enemy
fn level_template() -> String {
    let mut tiles = Vec::new();
    for x in 0..20 {
        tiles.push(format!("    (kind: Grass, variant: 1, x: {}, y: 10),", x));
    }
    for y in 6..10 {
        tiles.push(format!("    (kind: Stone, x: 0, y: {}),", y));
        tiles.push(format!("    (kind: Stone, x: 19, y: {}),", y));
    }

    format!(
        "(\n  tile_size: 16,\n  tiles: [\n{}\n  ],\n  decor: [],\n  spawners: [\n    (kind: Player, x: 32.0, y: 128.0),\n    (kind: Enemy, x: 240.0, y: 128.0),\n  ],\n)\n",
        tiles.join("\n")
    )
}

/// Write a starter level for hand editing
fn new_level(name: &str, force: bool) -> Result<()> {
    if name.is_empty() || name.contains(['/', '\\', '.']) {
        anyhow::bail!("Level name must be a plain file stem, got '{}'", name);
    }

    let maps = project_root()?.join("data/maps");
    std::fs::create_dir_all(&maps)?;

    let path = maps.join(format!("{}.ron", name));
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to replace it)", path.display());
    }

    std::fs::write(&path, level_template())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
