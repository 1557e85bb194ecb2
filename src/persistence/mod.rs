//! Save/load persistence
//!
//! Features:
//! - Versioned JSON envelope
//! - Atomic replace (write tmp, then rename over the target)

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current on-disk format version
pub const FORMAT_VERSION: u32 = 1;

/// Environment variable naming the directory save files live in
pub const DATA_DIR_VAR: &str = "JEZZIN_DATA_DIR";

/// Directory for save files, or `None` when persistence is switched off
pub fn data_dir() -> Option<PathBuf> {
    data_dir_from(std::env::var_os(DATA_DIR_VAR))
}

fn data_dir_from(value: Option<OsString>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    data: T,
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `value` to `path` inside a versioned envelope
pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let json = serde_json::to_string_pretty(&Envelope {
        version: FORMAT_VERSION,
        data: value,
    })?;
    let tmp = tmp_path(path);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Read a value written by [`save`]. A missing file is `Ok(None)`.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistenceError> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let envelope: Envelope<T> = serde_json::from_str(&json)?;
    if envelope.version != FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: envelope.version,
            expected: FORMAT_VERSION,
        });
    }
    Ok(Some(envelope.data))
}
