//! File system utilities.

use anyhow::Result;
use std::path::Path;
use tokio::fs;

/// Writes content to a file atomically using a temp file and rename.
///
/// An interrupted run can therefore never leave a half-written translation
/// behind. The temp file is created in the target's directory so the
/// rename stays on one filesystem.
///
/// # Errors
///
/// Returns an error if the temp file cannot be written or renamed.
pub async fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let temp_path = parent.join(format!(".{file_name}.tmp"));

    fs::write(&temp_path, content).await?;
    fs::rename(&temp_path, path).await?;

    Ok(())
}
