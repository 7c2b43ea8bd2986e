//! Path utility functions

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

/// Get the virtdev_home directory path
pub fn virtdev_home() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .ok_or_else(|| anyhow!("no home directory found"))?
        .join("virtdev"))
}

/// Resolve path under root directory
pub fn resolve_under_root(root: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        root.join(p)
    }
}

/// Default device-set file
pub fn devices_path(root: &Path) -> PathBuf {
    root.join("devices.json")
}

/// Pick the device-set file: explicit path (relative to the virtdev home
/// when not absolute and not found as given) or the default one.
pub fn find_devices_file(explicit: Option<&Path>) -> Result<PathBuf> {
    let home = virtdev_home()?;
    let path = match explicit {
        Some(p) if p.exists() => p.to_path_buf(),
        Some(p) => resolve_under_root(&home, p),
        None => devices_path(&home),
    };

    if !path.exists() {
        return Err(anyhow!("device file '{}' not found", path.display()));
    }

    Ok(path)
}
