use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

pub fn get_exe_folder() -> Result<PathBuf> {
    let path =
        std::env::current_exe().map_err(|err| anyhow!("Failed to get binary path, {err}"))?;
    path.parent()
        .ok_or_else(|| anyhow!("Failed to get binary folder"))
        .map(|v| v.to_path_buf())
}

/// Resolves `path` against the binary folder unless it is absolute.
pub fn resolve_exe_relative(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(get_exe_folder()?.join(path))
}
