//! Command implementations for the ccqp CLI.
//!
//! Each command takes the [`ProfileManager`], performs one operation, and
//! returns a result struct that renders as JSON (default) or human text.
//! API keys never leave this layer unmasked.

use std::path::PathBuf;

use serde::Serialize;

use crate::engine::{ProfileManager, Reconciliation, Status};
use crate::models::Profile;
use crate::{Error, Result};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

/// A profile as shown to the user, key masked.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub name: String,
    pub api_url: String,
    pub api_key: String,
    pub active: bool,
}

impl From<&Profile> for ProfileView {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            api_url: profile.api_url.clone(),
            api_key: profile.masked_key(),
            active: profile.active,
        }
    }
}

impl Output for ProfileView {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!("Profile: {}", self.name)];
        lines.push(format!("  URL:    {}", self.api_url));
        lines.push(format!("  Key:    {}", self.api_key));
        lines.push(format!("  Active: {}", if self.active { "yes" } else { "no" }));
        lines.join("\n")
    }
}

// === Status ===

#[derive(Debug, Serialize)]
pub struct StatusResult {
    #[serde(flatten)]
    pub status: Status,
    pub in_sync: bool,
}

impl Output for StatusResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let s = &self.status;
        let mut lines = Vec::new();
        lines.push(format!(
            "Enabled:   {} (Claude credentials {})",
            on_off(s.enabled),
            if s.credentials_present { "present" } else { "absent" }
        ));
        lines.push(format!(
            "Autostart: {} (registration {})",
            on_off(s.auto_start),
            if s.autostart_registered { "present" } else { "absent" }
        ));
        lines.push(format!(
            "Active:    {}",
            s.active_profile.as_deref().unwrap_or("(none)")
        ));
        lines.push(format!("Profiles:  {}", s.profile_count));
        lines.push(format!("Settings:  {}", s.settings_path.display()));
        if !self.in_sync {
            lines.push("Declared state differs from Claude settings; run `ccqp reconcile`.".into());
        }
        lines.join("\n")
    }
}

/// Show declared and observed state.
pub fn status(manager: &ProfileManager) -> Result<StatusResult> {
    let status = manager.status()?;
    let in_sync = status.in_sync();
    Ok(StatusResult { status, in_sync })
}

// === Reconcile ===

#[derive(Debug, Serialize)]
pub struct ReconcileResult {
    pub enabled_changed: bool,
    pub auto_start_changed: bool,
    pub enabled: bool,
    pub auto_start: bool,
}

impl Output for ReconcileResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if !self.enabled_changed && !self.auto_start_changed {
            return "Already in sync; nothing changed.".to_string();
        }
        let mut lines = Vec::new();
        if self.enabled_changed {
            lines.push(format!("Corrected enabled -> {}", on_off(self.enabled)));
        }
        if self.auto_start_changed {
            lines.push(format!("Corrected autostart -> {}", on_off(self.auto_start)));
        }
        lines.join("\n")
    }
}

/// Report the startup pull plus a fresh one.
pub fn reconcile(manager: &ProfileManager) -> Result<ReconcileResult> {
    let startup = manager.startup_reconciliation();
    let fresh = manager.reconcile()?;
    let merged = Reconciliation {
        enabled_changed: startup.enabled_changed || fresh.enabled_changed,
        auto_start_changed: startup.auto_start_changed || fresh.auto_start_changed,
    };
    let settings = manager.settings()?;
    Ok(ReconcileResult {
        enabled_changed: merged.enabled_changed,
        auto_start_changed: merged.auto_start_changed,
        enabled: settings.enabled,
        auto_start: settings.auto_start,
    })
}

// === Enable / Disable ===

#[derive(Debug, Serialize)]
pub struct ToggleResult {
    pub enabled: bool,
    pub active_profile: Option<String>,
    pub credentials_present: bool,
}

impl Output for ToggleResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        match (self.enabled, &self.active_profile) {
            (true, Some(name)) => format!("Enabled; Claude Code now uses profile '{}'", name),
            (true, None) => {
                "Enabled, but no profile is active; Claude credentials removed.".to_string()
            }
            (false, _) => "Disabled; Claude credentials removed.".to_string(),
        }
    }
}

fn toggle_result(manager: &ProfileManager) -> Result<ToggleResult> {
    let status = manager.status()?;
    Ok(ToggleResult {
        enabled: status.enabled,
        active_profile: status.active_profile,
        credentials_present: status.credentials_present,
    })
}

/// Turn the master switch on.
pub fn enable(manager: &ProfileManager) -> Result<ToggleResult> {
    manager.set_enabled(true)?;
    toggle_result(manager)
}

/// Turn the master switch off.
pub fn disable(manager: &ProfileManager) -> Result<ToggleResult> {
    manager.set_enabled(false)?;
    toggle_result(manager)
}

// === Profiles ===

#[derive(Debug, Serialize)]
pub struct ProfileList {
    pub profiles: Vec<ProfileView>,
    pub count: usize,
}

impl Output for ProfileList {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.profiles.is_empty() {
            return "No profiles. Add one with `ccqp profile add <name> --url <url> --key <key>`."
                .to_string();
        }
        let mut lines = vec![format!("{} profile(s):", self.count)];
        for p in &self.profiles {
            let marker = if p.active { "*" } else { " " };
            lines.push(format!("{} {}  {}  {}", marker, p.name, p.api_url, p.api_key));
        }
        lines.join("\n")
    }
}

/// List every profile in stored order.
pub fn profile_list(manager: &ProfileManager) -> Result<ProfileList> {
    let settings = manager.settings()?;
    let profiles: Vec<ProfileView> = settings.profiles.iter().map(ProfileView::from).collect();
    Ok(ProfileList {
        count: profiles.len(),
        profiles,
    })
}

/// Show one profile.
pub fn profile_show(manager: &ProfileManager, name: &str) -> Result<ProfileView> {
    let settings = manager.settings()?;
    settings
        .profile(name)
        .map(ProfileView::from)
        .ok_or_else(|| Error::ProfileNotFound(name.to_string()))
}

#[derive(Debug, Serialize)]
pub struct ProfileChanged {
    pub action: &'static str,
    pub profile: ProfileView,
}

impl Output for ProfileChanged {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let suffix = if self.profile.active { " (active)" } else { "" };
        format!(
            "{} profile '{}'{}",
            self.action, self.profile.name, suffix
        )
    }
}

/// Add a profile, optionally making it active.
pub fn profile_add(
    manager: &ProfileManager,
    name: &str,
    url: &str,
    key: &str,
    activate: bool,
) -> Result<ProfileChanged> {
    let mut profile = Profile::new(name.trim(), url.trim(), key);
    profile.active = activate;
    let view = ProfileView::from(&profile);
    manager.add_profile(profile)?;
    Ok(ProfileChanged {
        action: "Added",
        profile: view,
    })
}

/// Change any of a profile's name, URL or key. Its active flag is kept.
pub fn profile_update(
    manager: &ProfileManager,
    name: &str,
    new_name: Option<&str>,
    url: Option<&str>,
    key: Option<&str>,
) -> Result<ProfileChanged> {
    if new_name.is_none() && url.is_none() && key.is_none() {
        return Err(Error::InvalidInput(
            "nothing to update; pass --name, --url or --key".to_string(),
        ));
    }
    let settings = manager.settings()?;
    let mut updated = settings
        .profile(name)
        .cloned()
        .ok_or_else(|| Error::ProfileNotFound(name.to_string()))?;
    if let Some(new_name) = new_name {
        updated.name = new_name.trim().to_string();
    }
    if let Some(url) = url {
        updated.api_url = url.trim().to_string();
    }
    if let Some(key) = key {
        updated.api_key = key.to_string();
    }
    let view = ProfileView::from(&updated);
    manager.update_profile(name, updated)?;
    Ok(ProfileChanged {
        action: "Updated",
        profile: view,
    })
}

/// Delete a profile.
pub fn profile_remove(manager: &ProfileManager, name: &str) -> Result<ProfileChanged> {
    let removed = manager.delete_profile(name)?;
    Ok(ProfileChanged {
        action: "Removed",
        profile: ProfileView::from(&removed),
    })
}

/// Make a profile active. Unknown names are rejected before anything changes.
pub fn profile_use(manager: &ProfileManager, name: &str) -> Result<ProfileChanged> {
    let settings = manager.settings()?;
    let mut view = settings
        .profile(name)
        .map(ProfileView::from)
        .ok_or_else(|| Error::ProfileNotFound(name.to_string()))?;
    manager.set_active_profile(name)?;
    view.active = true;
    Ok(ProfileChanged {
        action: "Activated",
        profile: view,
    })
}

// === Autostart ===

#[derive(Debug, Serialize)]
pub struct AutostartResult {
    pub auto_start: bool,
    pub registered: bool,
    pub location: PathBuf,
}

impl Output for AutostartResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.registered {
            format!("Autostart on ({})", self.location.display())
        } else {
            "Autostart off".to_string()
        }
    }
}

fn autostart_result(manager: &ProfileManager) -> Result<AutostartResult> {
    let status = manager.status()?;
    Ok(AutostartResult {
        auto_start: status.auto_start,
        registered: status.autostart_registered,
        location: status.autostart_path,
    })
}

/// Show the autostart registration.
pub fn autostart_status(manager: &ProfileManager) -> Result<AutostartResult> {
    autostart_result(manager)
}

/// Register or remove launch-at-login.
pub fn autostart_set(manager: &ProfileManager, enabled: bool) -> Result<AutostartResult> {
    manager.set_auto_start(enabled)?;
    autostart_result(manager)
}
