//! `svstyle init` — writes a default `svstyle.toml`.

use std::fs;
use std::path::Path;

use svstyle_config::{CONFIG_FILE_NAME, DEFAULT_CONFIG};

use crate::GlobalArgs;

/// Runs the `svstyle init` command.
///
/// Writes the default configuration into `dir` (created if missing) or the
/// current directory. An existing `svstyle.toml` is never overwritten.
pub fn run(dir: Option<&Path>, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let dir = match dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            dir.to_path_buf()
        }
        None => std::env::current_dir()?,
    };

    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(format!("{} already exists", path.display()).into());
    }
    fs::write(&path, DEFAULT_CONFIG)?;

    if !global.quiet {
        eprintln!("     Created {}", path.display());
    }
    Ok(0)
}
