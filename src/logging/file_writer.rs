//! Log file naming and handle management
//!
//! Resolves the dated file name, opens the append-mode handle and truncates the file
//! on request.

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use chrono::Local;

use super::entry::format_timestamp;
use crate::config::LoggerOptions;
use crate::error::{Error, Result};

/// Get the file name for a logger: the explicit `filename`, or today's date plus `.log`
pub fn log_file_name(options: &LoggerOptions) -> Result<String> {
    match &options.filename {
        Some(filename) => Ok(filename.clone()),
        None => {
            let date = format_timestamp(&Local::now(), &options.filename_date_format)?;
            Ok(format!("{}.log", date))
        }
    }
}

/// Create the log directory (and any missing parents)
pub(crate) fn ensure_log_dir(log_dir: &Path) -> Result<()> {
    if !log_dir.is_dir() {
        fs::create_dir_all(log_dir).map_err(Error::io("failed to create log directory"))?;
    }
    Ok(())
}

/// Open the log file for appending, creating it if needed
pub(crate) fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(Error::io("failed to open log file"))
}

/// Truncate the log file to zero length
pub(crate) fn truncate_log_file(path: &Path) -> Result<()> {
    File::create(path)
        .map(drop)
        .map_err(Error::io("failed to clear log file"))
}

/// Apply Unix permission bits to the log file
#[cfg(unix)]
pub(crate) fn set_file_permission(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .map_err(Error::io("failed to set log file permissions"))
}

/// Permission bits are a Unix concept; other platforms keep their defaults
#[cfg(not(unix))]
pub(crate) fn set_file_permission(_path: &Path, mode: u32) -> Result<()> {
    tracing::debug!("Ignoring file permission {:o} on this platform", mode);
    Ok(())
}
