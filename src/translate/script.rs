use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

use crate::error::Result;

/// Default translation program, shipped with the binary
pub const BUNDLED_SCRIPT: &str = include_str!("../../scripts/translate.py");

/// Write the bundled script to `path` unless a file is already there.
///
/// Returns whether the script was written. An existing file is never
/// replaced, so a custom script configured at `path` is kept.
pub async fn install_bundled(path: &Path) -> Result<bool> {
    if path.exists() {
        debug!("Translation script present at {}", path.display());
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, BUNDLED_SCRIPT).await?;
    fs::rename(&temp_path, path).await?;

    info!("Installed translation script at {}", path.display());
    Ok(true)
}
