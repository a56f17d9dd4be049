//! Filesystem layout for cc-quick-profile.
//!
//! This module defines WHERE data lives and nothing else: no I/O beyond
//! reading environment variables.

use std::env;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Application name, used for the config folder and autostart entries.
pub const APP_NAME: &str = "cc-quick-profile";

/// File name of the settings file inside the config folder.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Overrides the application config folder.
pub const CONFIG_DIR_ENV: &str = "CCQP_CONFIG_DIR";

/// Overrides the Claude Code directory (normally `~/.claude`).
pub const CLAUDE_DIR_ENV: &str = "CCQP_CLAUDE_DIR";

/// Overrides the directory holding the autostart descriptor.
pub const AUTOSTART_DIR_ENV: &str = "CCQP_AUTOSTART_DIR";

/// Resolved locations of every file this tool reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// Folder holding `settings.json`
    pub config_dir: PathBuf,
    /// Claude Code's own directory
    pub claude_dir: PathBuf,
    /// Folder holding the platform autostart descriptor
    pub autostart_dir: PathBuf,
}

impl AppPaths {
    /// Resolve paths for the current user and platform, honouring overrides.
    pub fn resolve() -> Result<Self> {
        let config_dir = match env_dir(CONFIG_DIR_ENV) {
            Some(dir) => dir,
            None => default_config_base()?.join(APP_NAME),
        };
        let claude_dir = match env_dir(CLAUDE_DIR_ENV) {
            Some(dir) => dir,
            None => home_dir()?.join(".claude"),
        };
        let autostart_dir = match env_dir(AUTOSTART_DIR_ENV) {
            Some(dir) => dir,
            None => default_autostart_dir()?,
        };

        Ok(Self {
            config_dir,
            claude_dir,
            autostart_dir,
        })
    }

    /// Lay every path out under a single root.
    pub fn with_root(root: &Path) -> Self {
        Self {
            config_dir: root.join("config").join(APP_NAME),
            claude_dir: root.join(".claude"),
            autostart_dir: root.join("autostart"),
        }
    }

    /// Settings file: `<config_dir>/settings.json`
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE_NAME)
    }

    /// Claude Code settings file: `<claude_dir>/settings.json`
    pub fn claude_settings_file(&self) -> PathBuf {
        self.claude_dir.join("settings.json")
    }
}

fn env_dir(name: &str) -> Option<PathBuf> {
    env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| Error::Other("Could not determine home directory".to_string()))
}

/// `%APPDATA%` on Windows, `~/.config` everywhere else (macOS included).
fn default_config_base() -> Result<PathBuf> {
    if cfg!(windows) {
        dirs::config_dir()
            .ok_or_else(|| Error::Other("Could not determine APPDATA directory".to_string()))
    } else {
        Ok(home_dir()?.join(".config"))
    }
}

fn default_autostart_dir() -> Result<PathBuf> {
    if cfg!(target_os = "macos") {
        Ok(home_dir()?.join("Library").join("LaunchAgents"))
    } else if cfg!(windows) {
        let appdata = dirs::config_dir()
            .ok_or_else(|| Error::Other("Could not determine APPDATA directory".to_string()))?;
        Ok(appdata
            .join("Microsoft")
            .join("Windows")
            .join("Start Menu")
            .join("Programs")
            .join("Startup"))
    } else {
        let config = match dirs::config_dir() {
            Some(dir) => dir,
            None => home_dir()?.join(".config"),
        };
        Ok(config.join("autostart"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_with_root_layout() {
        let paths = AppPaths::with_root(Path::new("/tmp/root"));
        assert_eq!(
            paths.settings_file(),
            PathBuf::from("/tmp/root/config/cc-quick-profile/settings.json")
        );
        assert_eq!(
            paths.claude_settings_file(),
            PathBuf::from("/tmp/root/.claude/settings.json")
        );
        assert_eq!(paths.autostart_dir, PathBuf::from("/tmp/root/autostart"));
    }

    #[test]
    #[serial]
    fn test_resolve_honours_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("cfg");
        let claude = dir.path().join("claude");
        let autostart = dir.path().join("auto");
        // SAFETY: serialized with every other env-touching test in this crate
        unsafe {
            env::set_var(CONFIG_DIR_ENV, &config);
            env::set_var(CLAUDE_DIR_ENV, &claude);
            env::set_var(AUTOSTART_DIR_ENV, &autostart);
        }

        let paths = AppPaths::resolve().unwrap();

        unsafe {
            env::remove_var(CONFIG_DIR_ENV);
            env::remove_var(CLAUDE_DIR_ENV);
            env::remove_var(AUTOSTART_DIR_ENV);
        }

        assert_eq!(paths.settings_file(), config.join("settings.json"));
        assert_eq!(paths.claude_settings_file(), claude.join("settings.json"));
        assert_eq!(paths.autostart_dir, autostart);
    }

    #[test]
    #[serial]
    fn test_resolve_defaults_use_app_folder() {
        // SAFETY: serialized with every other env-touching test in this crate
        unsafe {
            env::remove_var(CONFIG_DIR_ENV);
        }
        if let Ok(paths) = AppPaths::resolve() {
            assert!(paths.config_dir.ends_with(APP_NAME));
            assert!(paths.claude_dir.ends_with(".claude"));
        }
    }
}
