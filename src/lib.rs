//! cc-quick-profile - Switch Claude Code between named API credential profiles.
//!
//! This library provides the core functionality for the `ccqp` CLI tool:
//! profile storage, the Claude Code settings adapter, login autostart
//! registration, and the reconciliation engine that keeps them consistent.

pub mod autostart;
pub mod claude;
pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod models;
pub mod storage;

use std::path::PathBuf;


/// Library-level error type for cc-quick-profile operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to {action} {}: {source}", .path.display())]
    File {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Settings file not found: {}", .0.display())]
    SettingsNotFound(PathBuf),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Profile with name '{0}' already exists")]
    DuplicateProfile(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap an IO error with the action and path that produced it.
    pub fn file(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::File {
            action,
            path: path.into(),
            source,
        }
    }

    /// True for the recoverable "absent" cases: missing settings file or profile.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::SettingsNotFound(_) | Error::ProfileNotFound(_))
    }
}

/// Result type alias for cc-quick-profile operations.
pub type Result<T> = std::result::Result<T, Error>;
