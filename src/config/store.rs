//! Device-set file loading and saving

use crate::config::schema::DeviceSet;
use crate::Result;
use anyhow::Context;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Save a device set as pretty JSON
pub fn save_devices(path: &Path, set: &DeviceSet) -> Result<()> {
    let f = File::create(path)
        .with_context(|| format!("cannot create device file {}", path.display()))?;
    serde_json::to_writer_pretty(f, set)?;
    Ok(())
}

/// Load a device set from a JSON file
pub fn load_devices(path: &Path) -> Result<DeviceSet> {
    let f = File::open(path)
        .with_context(|| format!("cannot open device file {}", path.display()))?;
    let set: DeviceSet = serde_json::from_reader(f)
        .with_context(|| format!("invalid device file {}", path.display()))?;
    debug!(
        path = %path.display(),
        graphics = set.graphics.len(),
        video = set.video.len(),
        "loaded device set"
    );
    Ok(set)
}
