//! Atomic file writes.
//!
//! Bytes land in a temp file next to the target and are renamed over it, so a
//! reader sees either the previous contents or the new ones. Where renaming over
//! an existing file fails (Windows), the old file is moved to `.bak` first and
//! restored if the second attempt also fails.

use std::fs;
#[cfg(unix)]
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// How hard a write tries to reach the disk before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Durability {
    /// `sync_all` the temp file before renaming.
    #[default]
    Synced,
    /// Also sync the parent directory (best-effort, unix only).
    SyncedWithParent,
    /// Skip syncing; for tests and throwaway data.
    Relaxed,
}

/// Restore `path` from `path.bak` left behind by an interrupted overwrite.
///
/// Returns true when a backup was moved back into place.
pub fn recover_backup(path: &Path) -> bool {
    let backup = path.with_extension("bak");
    if path.exists() || !backup.exists() {
        return false;
    }
    match fs::rename(&backup, path) {
        Ok(()) => {
            tracing::warn!(path = %path.display(), "Recovered file from interrupted write");
            true
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "Failed to recover backup: {e}");
            false
        }
    }
}

pub fn atomic_write(path: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
    atomic_write_with(path, bytes, Durability::default())
}

/// Write `bytes` to `path`, creating missing parent directories.
pub fn atomic_write_with(
    path: impl AsRef<Path>,
    bytes: &[u8],
    durability: Durability,
) -> io::Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    if durability != Durability::Relaxed {
        tmp.as_file().sync_all()?;
    }

    if let Err(err) = tmp.persist(path) {
        if !path.exists() {
            return Err(err.error);
        }
        let backup = path.with_extension("bak");
        let _ = fs::remove_file(&backup);
        fs::rename(path, &backup)?;
        if let Err(retry) = err.file.persist(path) {
            let _ = fs::rename(&backup, path);
            return Err(retry.error);
        }
        if let Err(e) = fs::remove_file(&backup) {
            tracing::warn!(path = %backup.display(), "Failed to remove backup after write: {e}");
        }
    }

    if durability == Durability::SyncedWithParent {
        sync_dir(parent);
    }
    Ok(())
}

#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
        tracing::debug!(path = %dir.display(), "Directory sync failed (best-effort): {e}");
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}
