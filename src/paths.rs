//! Platform path resolution for configuration and generated output.
//!
//! The configuration lives under the platform config directory
//! (`%APPDATA%\LabSheetGenerator` on Windows, `~/.config/LabSheetGenerator`
//! on Linux) and generated sheets default to a `LabSheets` folder under the
//! user's Documents directory.

use camino::{Utf8Path, Utf8PathBuf};
use directories::{BaseDirs, UserDirs};
use std::fs;
use thiserror::Error;

/// Folder name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "LabSheetGenerator";

/// Configuration file name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Default output folder name under Documents.
pub const OUTPUT_DIR_NAME: &str = "LabSheets";

/// Errors from path resolution or directory creation
#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not determine a home directory for the current user")]
    NoHomeDirectory,

    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Path(String),

    #[error("Failed to create directory {path}: {source}")]
    Create {
        path: Utf8PathBuf,
        source: std::io::Error,
    },
}

/// Platform-specific base directory for configuration storage.
///
/// Resolution only - the directory is not created here. Use [`ensure_dir`]
/// when it is first needed.
pub fn config_dir() -> Result<Utf8PathBuf, PathError> {
    let base = BaseDirs::new().ok_or(PathError::NoHomeDirectory)?;
    let dir = to_utf8(base.config_dir())?;
    Ok(dir.join(CONFIG_DIR_NAME))
}

/// Full path of the configuration file.
pub fn config_file() -> Result<Utf8PathBuf, PathError> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Platform-specific default directory for generated sheets.
///
/// Uses the Documents directory when the platform reports one, otherwise
/// falls back to a `Documents` folder under the home directory.
pub fn default_output_dir() -> Result<Utf8PathBuf, PathError> {
    let docs = match UserDirs::new().and_then(|u| u.document_dir().map(|d| d.to_path_buf())) {
        Some(dir) => to_utf8(&dir)?,
        None => {
            let base = BaseDirs::new().ok_or(PathError::NoHomeDirectory)?;
            to_utf8(base.home_dir())?.join("Documents")
        }
    };

    Ok(docs.join(OUTPUT_DIR_NAME))
}

/// Create a directory (and parents) if it does not already exist.
pub fn ensure_dir(path: &Utf8Path) -> Result<(), PathError> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|source| PathError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Created directory: {}", path);
    }
    Ok(())
}

fn to_utf8(path: &std::path::Path) -> Result<Utf8PathBuf, PathError> {
    Utf8PathBuf::from_path_buf(path.to_path_buf())
        .map_err(|p| PathError::NonUtf8Path(p.display().to_string()))
}
