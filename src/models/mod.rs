//! Data models for cc-quick-profile.
//!
//! This module defines the core data structures:
//! - `Profile` - A named API endpoint + key pair that can be made active
//! - `Settings` - The master switch, autostart intent, and ordered profile list
//!
//! Everything here is pure in-memory state. Persistence and locking live in
//! [`crate::storage`]; pushing credentials out lives in [`crate::engine`].

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A named credential profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Display name, unique within a `Settings`
    pub name: String,

    /// API endpoint URL
    #[serde(rename = "apiUrl")]
    pub api_url: String,

    /// API authentication key (sensitive!)
    #[serde(rename = "apiKey")]
    pub api_key: String,

    /// Whether this is the currently selected profile
    #[serde(default)]
    pub active: bool,
}

impl Profile {
    /// Create a new inactive profile.
    pub fn new(
        name: impl Into<String>,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            api_url: api_url.into(),
            api_key: api_key.into(),
            active: false,
        }
    }

    /// Validate the profile fields.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput(
                "profile name must not be empty".to_string(),
            ));
        }
        if self.api_url.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "profile '{}' has an empty API URL",
                self.name
            )));
        }
        Ok(())
    }

    /// The API key, masked with [`mask_secret`].
    pub fn masked_key(&self) -> String {
        mask_secret(&self.api_key)
    }
}

/// Mask a secret for display.
///
/// Secrets of 8 characters or fewer are hidden entirely; up to 12 keep only
/// the first 4; longer ones keep the first 4 and last 4.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    match chars.len() {
        0..=8 => "****".to_string(),
        9..=12 => format!("{}...", chars[..4].iter().collect::<String>()),
        n => format!(
            "{}...{}",
            chars[..4].iter().collect::<String>(),
            chars[n - 4..].iter().collect::<String>()
        ),
    }
}

/// Application settings persisted in `settings.json`.
///
/// # JSON Schema
///
/// ```json
/// {
///   "enabled": true,
///   "autoStart": false,
///   "profiles": [
///     { "name": "prod", "apiUrl": "https://x", "apiKey": "k1", "active": true }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Master switch: push the active profile's credentials to Claude Code
    #[serde(default)]
    pub enabled: bool,

    /// Declared intent for launching at login
    #[serde(rename = "autoStart", default)]
    pub auto_start: bool,

    /// Configured profiles, in display order
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

impl Settings {
    /// Create settings with defaults: autostart off, no profiles.
    ///
    /// `enabled` is seeded by the caller from the observed credential state.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            auto_start: false,
            profiles: Vec::new(),
        }
    }

    /// Find a profile by exact name.
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Return the first active profile in stored order.
    pub fn active_profile(&self) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.active)
    }

    /// Append a profile, rejecting duplicate names.
    ///
    /// An incoming active profile deactivates all others.
    pub fn add_profile(&mut self, profile: Profile) -> Result<()> {
        profile.validate()?;
        if self.profile(&profile.name).is_some() {
            return Err(Error::DuplicateProfile(profile.name));
        }
        if profile.active {
            self.deactivate_all();
        }
        self.profiles.push(profile);
        Ok(())
    }

    /// Remove the profile with the given name and return it.
    pub fn remove_profile(&mut self, name: &str) -> Result<Profile> {
        let index = self
            .profiles
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| Error::ProfileNotFound(name.to_string()))?;
        Ok(self.profiles.remove(index))
    }

    /// Replace the profile currently named `name`, keeping its position.
    ///
    /// Matches on `name`, not on `updated.name`, so this also renames.
    pub fn replace_profile(&mut self, name: &str, updated: Profile) -> Result<()> {
        updated.validate()?;
        let index = self
            .profiles
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| Error::ProfileNotFound(name.to_string()))?;

        if updated.name != name && self.profile(&updated.name).is_some() {
            return Err(Error::DuplicateProfile(updated.name));
        }
        if updated.active {
            self.deactivate_all();
        }
        self.profiles[index] = updated;
        Ok(())
    }

    /// Mark `name` active and every other profile inactive.
    ///
    /// An unknown name leaves every profile inactive. Returns whether a
    /// profile matched.
    pub fn set_active_profile(&mut self, name: &str) -> bool {
        let mut matched = false;
        for profile in &mut self.profiles {
            profile.active = profile.name == name;
            matched |= profile.active;
        }
        matched
    }

    fn deactivate_all(&mut self) {
        for profile in &mut self.profiles {
            profile.active = false;
        }
    }

    /// Count profiles flagged active. Always 0 or 1 after any mutation here.
    pub fn active_count(&self) -> usize {
        self.profiles.iter().filter(|p| p.active).count()
    }
}
