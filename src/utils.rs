//! File system helpers.

use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

const WRITE_CHECK_FILE: &str = "..__write_check__";

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a scratch file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let check_path = path.join(WRITE_CHECK_FILE);
    fs::File::create(&check_path).await?;
    if let Err(e) = fs::remove_file(&check_path).await {
        warn!(file = %check_path.display(), error = %e, "Could not remove write check file");
    }
    info!("Output directory is writable");
    Ok(())
}
