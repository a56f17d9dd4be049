//! Atomic file write helpers.
//!
//! Uses a temp file + rename pattern so a concurrent reader sees either the
//! old contents or the new contents, never a partial write. On Windows,
//! rename-over-existing can fail, so we fall back to backup-and-restore.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Permission policy for a written file. Ignored on non-Unix platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistMode {
    /// Owner-only read/write (0o600).
    #[default]
    OwnerOnly,
    /// Keep the mode of a previously-materialized file.
    Preserve(u32),
}

impl PersistMode {
    /// Mode to carry over from an existing file, falling back to owner-only.
    ///
    /// Symlinks are followed, so this is the mode of the link's target.
    pub fn preserving(path: &Path) -> Self {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Ok(meta) = fs::metadata(path) {
                return Self::Preserve(meta.permissions().mode() & 0o7777);
            }
        }
        #[cfg(not(unix))]
        let _ = path;
        Self::OwnerOnly
    }

    #[cfg(unix)]
    fn mode(self) -> u32 {
        match self {
            Self::OwnerOnly => crate::config::SETTINGS_FILE_MODE,
            Self::Preserve(mode) => mode,
        }
    }
}

/// Where a write to `path` must land: a symlink is followed to its target,
/// so the rename replaces the real file and the link stays intact.
fn write_target(path: &Path) -> io::Result<PathBuf> {
    let is_link = match fs::symlink_metadata(path) {
        Ok(meta) => meta.file_type().is_symlink(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => return Err(e),
    };
    if !is_link {
        return Ok(path.to_path_buf());
    }
    match fs::canonicalize(path) {
        Ok(target) => Ok(target),
        // Dangling link: create the file it points at
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let link = fs::read_link(path)?;
            Ok(match path.parent() {
                Some(parent) if link.is_relative() => parent.join(link),
                _ => link,
            })
        }
        Err(e) => Err(e),
    }
}

/// Write `bytes` to `path` atomically, creating parent directories.
///
/// If `path` is a symlink the link's target is replaced, not the link.
pub fn atomic_write(path: &Path, bytes: &[u8], mode: PersistMode) -> io::Result<()> {
    let target = write_target(path)?;
    let path = target.as_path();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(mode.mode()))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    if let Err(err) = tmp.persist(path) {
        if !path.exists() {
            return Err(err.error);
        }
        let backup_path = path.with_extension("bak");
        let _ = fs::remove_file(&backup_path);
        fs::rename(path, &backup_path)?;

        if let Err(rename_err) = err.file.persist(path) {
            let _ = fs::rename(&backup_path, path);
            return Err(rename_err.error);
        }
        if let Err(e) = fs::remove_file(&backup_path) {
            tracing::warn!(
                path = %backup_path.display(),
                "Failed to remove .bak after atomic write: {e}"
            );
        }
    }

    Ok(())
}
