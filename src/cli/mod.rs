//! CLI argument definitions for cc-quick-profile.

use clap::{Parser, Subcommand};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CCQP_GIT_COMMIT"),
    ", built ",
    env!("CCQP_BUILD_TIMESTAMP"),
    ")"
);

/// cc-quick-profile - Switch Claude Code between API credential profiles.
///
/// Start with `ccqp status` to see what is active, then `ccqp profile use <name>`
/// and `ccqp enable` to point Claude Code at it.
#[derive(Parser, Debug)]
#[command(name = "ccqp")]
#[command(author, version, long_version = LONG_VERSION, about = "Switch Claude Code between API credential profiles", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show declared and actual state (default)
    Status,

    /// Re-read Claude settings and autostart, correcting drifted flags
    ///
    /// The same pass runs at every startup; this prints what it changed.
    Reconcile,

    /// Write the active profile's credentials into Claude settings
    Enable,

    /// Remove the managed credentials from Claude settings
    Disable,

    /// Profile management commands
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Launch-at-login commands
    Autostart {
        #[command(subcommand)]
        command: AutostartCommands,
    },
}

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// List all profiles (keys masked)
    List,

    /// Show one profile (key masked)
    Show {
        /// Profile name
        name: String,
    },

    /// Add a new profile
    Add {
        /// Profile name (must be unique)
        name: String,

        /// API base URL (ANTHROPIC_BASE_URL)
        #[arg(short, long)]
        url: String,

        /// API key (ANTHROPIC_AUTH_TOKEN)
        #[arg(short, long, env = "CCQP_API_KEY", hide_env_values = true)]
        key: String,

        /// Make this the active profile
        #[arg(short, long)]
        activate: bool,
    },

    /// Change a profile's name, URL or key
    Update {
        /// Current profile name
        name: String,

        /// New name
        #[arg(long = "name")]
        new_name: Option<String>,

        /// New API base URL
        #[arg(short, long)]
        url: Option<String>,

        /// New API key
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Delete a profile
    #[command(alias = "rm")]
    Remove {
        /// Profile name
        name: String,
    },

    /// Make a profile active (pushes it when enabled)
    Use {
        /// Profile name
        name: String,
    },
}

/// Autostart subcommands
#[derive(Subcommand, Debug)]
pub enum AutostartCommands {
    /// Show whether launch-at-login is registered
    Status,

    /// Register launch-at-login
    On,

    /// Remove the launch-at-login registration
    Off,
}
