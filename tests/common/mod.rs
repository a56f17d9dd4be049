//! Common test utilities for ccqp integration tests.
//!
//! Provides `TestEnv` for isolated test environments that never touch the
//! user's real `~/.claude/settings.json` or autostart folder.

#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

/// A test environment with every path redirected under one temp root.
///
/// The `ccqp()` method returns a `Command` with `CCQP_CONFIG_DIR`,
/// `CCQP_CLAUDE_DIR` and `CCQP_AUTOSTART_DIR` set per-invocation, making
/// tests parallel-safe.
pub struct TestEnv {
    pub root: TempDir,
}

impl TestEnv {
    /// Create a new test environment with isolated directories.
    pub fn new() -> Self {
        Self {
            root: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the ccqp binary with isolated directories.
    pub fn ccqp(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_ccqp"));
        cmd.current_dir(self.root.path());
        cmd.env("CCQP_CONFIG_DIR", self.config_dir());
        cmd.env("CCQP_CLAUDE_DIR", self.claude_dir());
        cmd.env("CCQP_AUTOSTART_DIR", self.autostart_dir());
        cmd.env_remove("CCQP_API_KEY");
        cmd.env_remove("CCQP_LOG");
        cmd
    }

    /// Run ccqp with `args`, assert success, and parse stdout as JSON.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self.ccqp().args(args).assert().success().get_output().clone();
        serde_json::from_slice(&output.stdout).unwrap()
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root.path().join("config")
    }

    pub fn claude_dir(&self) -> PathBuf {
        self.root.path().join("claude")
    }

    pub fn autostart_dir(&self) -> PathBuf {
        self.root.path().join("autostart")
    }

    /// Path of ccqp's own settings file.
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir().join("settings.json")
    }

    /// Path of the Claude Code settings file.
    pub fn claude_settings_path(&self) -> PathBuf {
        self.claude_dir().join("settings.json")
    }

    pub fn read_settings(&self) -> Value {
        read_json(&self.settings_path())
    }

    pub fn read_claude_settings(&self) -> Value {
        read_json(&self.claude_settings_path())
    }

    /// Write ccqp's settings file directly, bypassing the binary.
    pub fn write_settings(&self, value: &Value) {
        write_json(&self.settings_path(), value);
    }

    /// Write Claude Code's settings file directly.
    pub fn write_claude_settings(&self, value: &Value) {
        write_json(&self.claude_settings_path(), value);
    }

    /// Add a profile through the CLI.
    pub fn add_profile(&self, name: &str, url: &str, key: &str, activate: bool) {
        let mut cmd = self.ccqp();
        cmd.args(["profile", "add", name, "--url", url, "--key", key]);
        if activate {
            cmd.arg("--activate");
        }
        cmd.assert().success();
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

pub fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

pub fn write_json(path: &Path, value: &Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}
