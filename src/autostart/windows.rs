//! Startup-folder launcher.
//!
//! Windows runs everything in the per-user Startup folder at login. A small
//! `.cmd` that detaches the executable does the job without COM shell-link
//! plumbing.

use std::path::{Path, PathBuf};

use super::{Autostart, descriptor_exists, remove_descriptor, write_descriptor};
use crate::Result;

/// Autostart via `<startup dir>\<app>.cmd`.
#[derive(Debug, Clone)]
pub struct WindowsAutostart {
    executable: PathBuf,
    launcher_path: PathBuf,
}

impl WindowsAutostart {
    pub fn new(dir: &Path, app_name: &str, executable: &Path) -> Self {
        Self {
            executable: executable.to_path_buf(),
            launcher_path: dir.join(format!("{}.cmd", app_name)),
        }
    }

    fn launcher(&self) -> String {
        let exe = self.executable.to_string_lossy();
        let workdir = self
            .executable
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!(
            "@echo off\r\nstart \"\" /D \"{}\" \"{}\"\r\n",
            cmd_escape(&workdir),
            cmd_escape(&exe)
        )
    }
}

impl Autostart for WindowsAutostart {
    fn is_enabled(&self) -> Result<bool> {
        descriptor_exists(&self.launcher_path)
    }

    fn enable(&self) -> Result<()> {
        write_descriptor(&self.launcher_path, &self.launcher())
    }

    fn disable(&self) -> Result<()> {
        remove_descriptor(&self.launcher_path)
    }

    fn location(&self) -> PathBuf {
        self.launcher_path.clone()
    }
}

/// Escape characters cmd.exe expands even inside double quotes.
fn cmd_escape(value: &str) -> String {
    value.replace('%', "%%").replace('"', "")
}
