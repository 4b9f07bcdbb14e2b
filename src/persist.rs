//! Reading manifests and writing fixed output back safely.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("File is not valid UTF-8: {}", .0.display())]
    InvalidUtf8(PathBuf),

    #[error("File changed on disk since it was read: {}", .0.display())]
    ChangedOnDisk(PathBuf),
}

/// A manifest as read from disk, with the hash of its content at read time.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub content: String,
    hash: u64,
}

impl LoadedFile {
    pub fn read(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref().to_path_buf();
        let bytes = fs::read(&path).map_err(|source| PersistError::Io {
            path: path.clone(),
            source,
        })?;
        let hash = xxh3_64(&bytes);
        let content =
            String::from_utf8(bytes).map_err(|_| PersistError::InvalidUtf8(path.clone()))?;
        Ok(Self {
            path,
            content,
            hash,
        })
    }

    /// Atomically replace the file with `content`.
    ///
    /// The file is re-read first; if it no longer hashes to what was loaded,
    /// nothing is written.
    pub fn write_back(&self, content: &str) -> Result<(), PersistError> {
        let current = fs::read(&self.path).map_err(|source| PersistError::Io {
            path: self.path.clone(),
            source,
        })?;
        if xxh3_64(&current) != self.hash {
            return Err(PersistError::ChangedOnDisk(self.path.clone()));
        }

        atomic_write(&self.path, content.as_bytes()).map_err(|source| PersistError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Write via a tempfile in the same directory, fsync, then rename over `path`.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;

    // Keep the original permissions
    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file().set_permissions(metadata.permissions())?;
    }

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
