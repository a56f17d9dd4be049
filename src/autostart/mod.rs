//! Launch-at-login registration.
//!
//! Each platform registers the binary through a descriptor file in a
//! well-known directory:
//! - `LinuxAutostart` - XDG `.desktop` entry in `~/.config/autostart/`
//! - `MacosAutostart` - LaunchAgent plist in `~/Library/LaunchAgents/`
//! - `WindowsAutostart` - `.cmd` launcher in the Startup folder
//!
//! All three compile everywhere since they only write files; exactly one is
//! picked for the running platform by [`for_current_platform`].

mod linux;
mod macos;
mod windows;

pub use linux::LinuxAutostart;
pub use macos::MacosAutostart;
pub use windows::WindowsAutostart;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::storage::{PersistMode, atomic_write};
use crate::{Error, Result};

/// OS-level launch-at-login registration.
pub trait Autostart: Send + Sync {
    /// Whether the registration currently exists.
    fn is_enabled(&self) -> Result<bool>;

    /// Create or refresh the registration.
    fn enable(&self) -> Result<()>;

    /// Remove the registration. Already absent is success.
    fn disable(&self) -> Result<()>;

    /// Where the registration lives (for display).
    fn location(&self) -> PathBuf;
}

/// Build the autostart implementation for the platform this binary targets.
pub fn for_current_platform(dir: &Path, app_name: &str, exe: &Path) -> Result<Box<dyn Autostart>> {
    #[cfg(target_os = "macos")]
    return Ok(Box::new(MacosAutostart::new(dir, app_name, exe)));

    #[cfg(windows)]
    return Ok(Box::new(WindowsAutostart::new(dir, app_name, exe)));

    #[cfg(all(unix, not(target_os = "macos")))]
    return Ok(Box::new(LinuxAutostart::new(dir, app_name, exe)));

    #[cfg(not(any(unix, windows)))]
    {
        let _ = (dir, app_name, exe);
        Err(Error::Other(format!(
            "autostart is not supported on {}",
            std::env::consts::OS
        )))
    }
}

/// Resolved path of the running executable.
pub fn current_executable() -> Result<PathBuf> {
    let exe = std::env::current_exe()
        .map_err(|e| Error::Other(format!("Could not determine executable path: {}", e)))?;
    Ok(exe.canonicalize().unwrap_or(exe))
}

/// Whether a descriptor file exists.
fn descriptor_exists(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::file("check", path, e)),
    }
}

/// Write a descriptor file, creating its directory.
fn write_descriptor(path: &Path, contents: &str) -> Result<()> {
    atomic_write(path, contents.as_bytes(), PersistMode::Preserve(0o644))
        .map_err(|e| Error::file("write", path, e))?;
    tracing::info!(path = %path.display(), "Registered autostart");
    Ok(())
}

/// Remove a descriptor file; a missing file is fine.
fn remove_descriptor(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "Removed autostart registration");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::file("remove", path, e)),
    }
}
