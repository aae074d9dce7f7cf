use std::{fs, path::Path};

use anyhow::{Context, Result, bail};

/// Error unless the file already exists.
pub(crate) fn require_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("File does not exist: {}", path.display());
    }
    if !path.is_file() {
        bail!("Path exists but is not a file: {}", path.display());
    }
    Ok(())
}

/// Prepare `path` for writing: refuse to clobber an existing file unless `force`,
/// and create missing parent directories.
pub(crate) fn prepare_output(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("Output already exists (use --force to overwrite): {}", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}
