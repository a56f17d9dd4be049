//! Configuration and path resolution for cc-quick-profile.
//!
//! ## settings.json - Profiles and toggles (contains secrets)
//!
//! Located at:
//! - Linux/macOS: `~/.config/cc-quick-profile/settings.json`
//! - Windows: `%APPDATA%\cc-quick-profile\settings.json`
//!
//! Contains `enabled`, `autoStart`, and the `profiles` list with API keys.
//!
//! ## Claude Code settings - External, not owned by this tool
//!
//! Located at `~/.claude/settings.json`. Only `env.ANTHROPIC_AUTH_TOKEN` and
//! `env.ANTHROPIC_BASE_URL` are ever touched.
//!
//! ## Security
//!
//! **CRITICAL**: `settings.json` MUST be written with 0600 permissions (owner
//! read/write only) because it contains API keys.
//!
//! ## Overrides
//!
//! Each directory can be redirected with an environment variable, which is
//! how the integration tests isolate themselves:
//! `CCQP_CONFIG_DIR`, `CCQP_CLAUDE_DIR`, `CCQP_AUTOSTART_DIR`.

pub mod paths;

pub use paths::{
    APP_NAME, AUTOSTART_DIR_ENV, AppPaths, CLAUDE_DIR_ENV, CONFIG_DIR_ENV, SETTINGS_FILE_NAME,
};

/// Required permissions for settings.json (Unix: 0600, owner read/write only).
#[cfg(unix)]
pub const SETTINGS_FILE_MODE: u32 = 0o600;

/// Environment variable holding the log filter for the binary.
pub const LOG_ENV: &str = "CCQP_LOG";
