//! Reconciliation engine.
//!
//! Three pieces of state have to agree: the declared flags in
//! `settings.json`, the credential fields in Claude Code's settings, and the
//! OS autostart registration. [`ProfileManager`] keeps them aligned:
//!
//! - **Pull** (startup, [`ProfileManager::reconcile`]): the observed external
//!   state wins. Drift in `enabled` or `autoStart` is written back to
//!   `settings.json` in a single save. Nothing is pushed outward.
//! - **Push** (explicit operations): the user's new intent is persisted first,
//!   then propagated. A failed propagation is reported but the persisted
//!   intent stays; the next pull brings the two back together.
//!
//! Credentials are present externally only in the `enabled` + active-profile
//! state. Every other combination removes them.

use std::path::PathBuf;

use serde::Serialize;

use crate::autostart::{self, Autostart};
use crate::claude::{ClaudeSettings, CredentialStore};
use crate::config::{APP_NAME, AppPaths};
use crate::models::{Profile, Settings};
use crate::storage::ProfileStore;
use crate::Result;

/// What a pull reconciliation changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// `enabled` was overwritten with the observed credential presence
    pub enabled_changed: bool,
    /// `autoStart` was overwritten with the observed registration
    pub auto_start_changed: bool,
}

impl Reconciliation {
    /// Whether the settings file was written.
    pub fn persisted(&self) -> bool {
        self.enabled_changed || self.auto_start_changed
    }
}

/// Declared and observed state side by side.
#[derive(Debug, Clone, Serialize)]
pub struct Status {
    pub enabled: bool,
    pub auto_start: bool,
    pub credentials_present: bool,
    pub autostart_registered: bool,
    pub active_profile: Option<String>,
    pub profile_count: usize,
    pub settings_path: PathBuf,
    pub autostart_path: PathBuf,
}

impl Status {
    /// Declared flags match what is observed.
    pub fn in_sync(&self) -> bool {
        self.enabled == self.credentials_present && self.auto_start == self.autostart_registered
    }
}

/// Owns the profile store and both external collaborators.
pub struct ProfileManager {
    store: ProfileStore,
    credentials: Box<dyn CredentialStore>,
    autostart: Box<dyn Autostart>,
    startup: Reconciliation,
}

impl std::fmt::Debug for ProfileManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileManager")
            .field("settings", &self.store.path())
            .field("autostart", &self.autostart.location())
            .finish()
    }
}

impl ProfileManager {
    /// Open with the real Claude settings file and the platform autostart.
    pub fn open(paths: &AppPaths) -> Result<Self> {
        let credentials = ClaudeSettings::open(paths.claude_settings_file())?;
        let executable = autostart::current_executable()?;
        let autostart =
            autostart::for_current_platform(&paths.autostart_dir, APP_NAME, &executable)?;
        Self::new(paths.settings_file(), Box::new(credentials), autostart)
    }

    /// Load (or create) settings, then run the startup reconciliation.
    ///
    /// A missing settings file is created with `enabled` seeded from the
    /// observed credential presence.
    pub fn new(
        settings_path: impl Into<PathBuf>,
        credentials: Box<dyn CredentialStore>,
        autostart: Box<dyn Autostart>,
    ) -> Result<Self> {
        let store = ProfileStore::open_or_create(settings_path, || {
            Ok(Settings::new(credentials.has_auth_config()?))
        })?;
        let mut manager = Self {
            store,
            credentials,
            autostart,
            startup: Reconciliation::default(),
        };
        manager.startup = manager.reconcile()?;
        Ok(manager)
    }

    /// The reconciliation performed when this manager was constructed.
    pub fn startup_reconciliation(&self) -> Reconciliation {
        self.startup
    }

    /// Direct access to the profile store.
    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    /// A copy of the current settings.
    pub fn settings(&self) -> Result<Settings> {
        self.store.snapshot()
    }

    /// Pull observed external state into the declared flags.
    ///
    /// Writes at most once, and not at all when nothing drifted.
    pub fn reconcile(&self) -> Result<Reconciliation> {
        let has_auth_config = self.credentials.has_auth_config()?;
        let autostart_enabled = self.autostart.is_enabled()?;

        let mut report = Reconciliation::default();
        self.store.update_if_changed(|settings| {
            if settings.enabled != has_auth_config {
                tracing::info!(
                    declared = settings.enabled,
                    actual = has_auth_config,
                    "Correcting enabled flag from Claude settings"
                );
                settings.enabled = has_auth_config;
                report.enabled_changed = true;
            }
            if settings.auto_start != autostart_enabled {
                tracing::info!(
                    declared = settings.auto_start,
                    actual = autostart_enabled,
                    "Correcting autoStart flag from autostart registration"
                );
                settings.auto_start = autostart_enabled;
                report.auto_start_changed = true;
            }
        })?;
        Ok(report)
    }

    /// Declared and observed state.
    pub fn status(&self) -> Result<Status> {
        let settings = self.store.snapshot()?;
        Ok(Status {
            enabled: settings.enabled,
            auto_start: settings.auto_start,
            credentials_present: self.credentials.has_auth_config()?,
            autostart_registered: self.autostart.is_enabled()?,
            active_profile: settings.active_profile().map(|p| p.name.clone()),
            profile_count: settings.profiles.len(),
            settings_path: self.store.path().to_path_buf(),
            autostart_path: self.autostart.location(),
        })
    }

    /// Turn the master switch on or off and propagate.
    pub fn set_enabled(&self, enabled: bool) -> Result<()> {
        self.store.update_then(
            |settings| {
                settings.enabled = enabled;
                Ok(())
            },
            |settings, ()| self.propagate(settings),
        )?
    }

    /// Make `name` the active profile; push it when enabled.
    ///
    /// An unknown name leaves no profile active.
    pub fn set_active_profile(&self, name: &str) -> Result<()> {
        self.store.update_then(
            |settings| Ok(settings.set_active_profile(name)),
            |settings, matched| {
                if !matched {
                    tracing::warn!(profile = name, "No such profile; all profiles deactivated");
                }
                if settings.enabled {
                    self.propagate(settings)
                } else {
                    Ok(())
                }
            },
        )?
    }

    /// Record the autostart intent and register or unregister.
    pub fn set_auto_start(&self, enabled: bool) -> Result<()> {
        self.store.update_then(
            |settings| {
                settings.auto_start = enabled;
                Ok(())
            },
            |_, ()| {
                if enabled {
                    self.autostart.enable()
                } else {
                    self.autostart.disable()
                }
            },
        )?
    }

    /// Add a profile. Pushes it if it arrives active while enabled.
    pub fn add_profile(&self, profile: Profile) -> Result<()> {
        self.mutate_profiles(|settings| settings.add_profile(profile))
    }

    /// Delete a profile. Removes credentials if it was active while enabled.
    pub fn delete_profile(&self, name: &str) -> Result<Profile> {
        self.mutate_profiles(|settings| settings.remove_profile(name))
    }

    /// Replace the profile named `name`. Re-pushes if the active profile changed.
    pub fn update_profile(&self, name: &str, profile: Profile) -> Result<()> {
        self.mutate_profiles(|settings| settings.replace_profile(name, profile))
    }

    /// Run a profile-list mutation and propagate if the active profile moved.
    fn mutate_profiles<T>(&self, f: impl FnOnce(&mut Settings) -> Result<T>) -> Result<T> {
        self.store.update_then(
            |settings| {
                let before = settings.active_profile().cloned();
                let value = f(settings)?;
                Ok((before, value))
            },
            |settings, (before, value)| {
                if settings.enabled && before.as_ref() != settings.active_profile() {
                    self.propagate(settings)?;
                }
                Ok(value)
            },
        )?
    }

    /// Make the external credentials match `settings`.
    fn propagate(&self, settings: &Settings) -> Result<()> {
        match settings.active_profile().filter(|_| settings.enabled) {
            Some(profile) => {
                self.credentials
                    .set_auth_config(&profile.api_key, &profile.api_url)?;
                tracing::info!(profile = %profile.name, "Pushed credentials to Claude settings");
            }
            None => {
                self.credentials.remove_auth_config()?;
                tracing::info!("Removed credentials from Claude settings");
            }
        }
        Ok(())
    }
}
