//! Cache storage trait and JSON file implementation.

use std::fs::Permissions;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::traits::{CacheDocument, Cacheable};
use crate::error::SyncError;

/// Trait for cache storage backends.
///
/// A backend holds exactly one document.
pub trait CacheStorage {
  /// Read the stored document, or an empty one if nothing is stored yet.
  fn read<T: Cacheable>(&self) -> Result<CacheDocument<T>, SyncError>;

  /// Replace the stored document.
  fn write<T: Cacheable>(&self, document: &CacheDocument<T>) -> Result<(), SyncError>;
}

impl<S: CacheStorage> CacheStorage for &S {
  fn read<T: Cacheable>(&self) -> Result<CacheDocument<T>, SyncError> {
    (**self).read()
  }

  fn write<T: Cacheable>(&self, document: &CacheDocument<T>) -> Result<(), SyncError> {
    (**self).write(document)
  }
}

/// A single JSON file on disk.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so an interrupted write leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
  path: PathBuf,
}

impl JsonFileStorage {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Mode for the replacement file: that of the file being replaced, or the
  /// usual world-readable mode for a new one. Temp files start out 0600.
  fn target_permissions(&self) -> Option<Permissions> {
    match std::fs::metadata(&self.path) {
      Ok(meta) => Some(meta.permissions()),
      Err(_) => new_file_permissions(),
    }
  }

  fn write_err(&self, source: std::io::Error) -> SyncError {
    SyncError::CacheWrite {
      path: self.path.clone(),
      source,
    }
  }
}

impl CacheStorage for JsonFileStorage {
  fn read<T: Cacheable>(&self) -> Result<CacheDocument<T>, SyncError> {
    let contents = match std::fs::read_to_string(&self.path) {
      Ok(contents) => contents,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        debug!(path = %self.path.display(), "No cache file yet");
        return Ok(CacheDocument::default());
      }
      Err(source) => {
        return Err(SyncError::CacheRead {
          path: self.path.clone(),
          source,
        })
      }
    };

    serde_json::from_str(&contents).map_err(|source| SyncError::CacheParse {
      path: self.path.clone(),
      source,
    })
  }

  fn write<T: Cacheable>(&self, document: &CacheDocument<T>) -> Result<(), SyncError> {
    let dir = match self.path.parent() {
      Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
      _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| self.write_err(e))?;

    let tmp = NamedTempFile::new_in(&dir).map_err(|e| self.write_err(e))?;
    {
      let mut writer = BufWriter::new(tmp.as_file());
      serde_json::to_writer_pretty(&mut writer, document)
        .map_err(|e| self.write_err(e.into()))?;
      writer.flush().map_err(|e| self.write_err(e))?;
    }
    if let Some(perms) = self.target_permissions() {
      tmp
        .as_file()
        .set_permissions(perms)
        .map_err(|e| self.write_err(e))?;
    }
    tmp.as_file().sync_all().map_err(|e| self.write_err(e))?;
    tmp.persist(&self.path).map_err(|e| self.write_err(e.error))?;

    debug!(
      path = %self.path.display(),
      posts = document.posts.len(),
      "Wrote cache file"
    );
    Ok(())
  }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
  use std::os::unix::fs::PermissionsExt;
  Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
  None
}
