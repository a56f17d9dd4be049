//! Profile storage for cc-quick-profile.
//!
//! [`ProfileStore`] owns the single in-memory [`Settings`] value and the
//! `settings.json` file behind it. Every mutation runs as one locked
//! read-modify-persist unit: the change is applied to a working copy, the
//! copy is written to disk, and only then does it replace the in-memory
//! value. Two concurrent callers therefore cannot interleave and lose an
//! update.

pub mod atomic;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::models::{Profile, Settings};
use crate::{Error, Result};

pub use atomic::{PersistMode, atomic_write};

/// Read and deserialize a settings file.
///
/// Fails with [`Error::SettingsNotFound`] when the file is absent and
/// [`Error::Parse`] when it is not a valid settings document.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::SettingsNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(Error::file("read", path, e)),
    };
    serde_json::from_str(&data).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize settings with 2-space indentation and write them atomically.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    let mut json = serde_json::to_string_pretty(settings)?;
    json.push('\n');
    atomic_write(path, json.as_bytes(), PersistMode::OwnerOnly)
        .map_err(|e| Error::file("write", path, e))?;
    tracing::debug!(path = %path.display(), profiles = settings.profiles.len(), "Saved settings");
    Ok(())
}

/// The settings file plus its in-memory model.
#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
    settings: Mutex<Settings>,
    writes: AtomicUsize,
}

impl ProfileStore {
    /// Open an existing settings file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = load_settings(&path)?;
        Ok(Self {
            path,
            settings: Mutex::new(settings),
            writes: AtomicUsize::new(0),
        })
    }

    /// Create the settings file with the given initial value.
    pub fn create(path: impl Into<PathBuf>, settings: Settings) -> Result<Self> {
        let path = path.into();
        save_settings(&path, &settings)?;
        Ok(Self {
            path,
            settings: Mutex::new(settings),
            writes: AtomicUsize::new(1),
        })
    }

    /// Open the settings file, creating it from `defaults` when absent.
    ///
    /// `defaults` is only called when the file does not exist.
    pub fn open_or_create(
        path: impl Into<PathBuf>,
        defaults: impl FnOnce() -> Result<Settings>,
    ) -> Result<Self> {
        let path = path.into();
        match Self::open(&path) {
            Err(Error::SettingsNotFound(_)) => {
                tracing::info!(path = %path.display(), "Creating default settings");
                Self::create(path, defaults()?)
            }
            other => other,
        }
    }

    /// Path of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Settings>> {
        self.settings
            .lock()
            .map_err(|_| Error::Other("settings lock poisoned".to_string()))
    }

    /// A copy of the current settings.
    pub fn snapshot(&self) -> Result<Settings> {
        Ok(self.lock()?.clone())
    }

    /// Number of settings-file writes made through this store.
    #[cfg(test)]
    pub(crate) fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    fn persist(&self, settings: &Settings) -> Result<()> {
        save_settings(&self.path, settings)?;
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Run one locked read-modify-persist unit.
    ///
    /// `f` works on a copy. If it returns `Err`, nothing is written and the
    /// in-memory settings are untouched. If it returns `Ok`, the copy is
    /// saved and then committed; a failed save also leaves memory untouched.
    pub fn update<T>(&self, f: impl FnOnce(&mut Settings) -> Result<T>) -> Result<T> {
        self.update_then(f, |_, value| value)
    }

    /// Like [`update`](Self::update), then run `then` on the committed
    /// settings while still holding the lock.
    ///
    /// `then` only runs after a successful save, so whatever it does to the
    /// outside world never gets ahead of what is on disk.
    pub fn update_then<T, R>(
        &self,
        f: impl FnOnce(&mut Settings) -> Result<T>,
        then: impl FnOnce(&Settings, T) -> R,
    ) -> Result<R> {
        let mut guard = self.lock()?;
        let mut working = guard.clone();
        let value = f(&mut working)?;
        self.persist(&working)?;
        *guard = working;
        Ok(then(&guard, value))
    }

    /// Like [`update`](Self::update), but skips the write when `f` left the
    /// settings unchanged. Returns whether a write happened.
    pub fn update_if_changed(&self, f: impl FnOnce(&mut Settings)) -> Result<bool> {
        let mut guard = self.lock()?;
        let mut working = guard.clone();
        f(&mut working);
        if working == *guard {
            return Ok(false);
        }
        self.persist(&working)?;
        *guard = working;
        Ok(true)
    }

    /// Append a profile; fails on a duplicate name.
    pub fn add_profile(&self, profile: Profile) -> Result<()> {
        self.update(|settings| settings.add_profile(profile))
    }

    /// Remove the profile named `name` and return it.
    pub fn delete_profile(&self, name: &str) -> Result<Profile> {
        self.update(|settings| settings.remove_profile(name))
    }

    /// Replace the profile named `name` in place.
    pub fn update_profile(&self, name: &str, profile: Profile) -> Result<()> {
        self.update(|settings| settings.replace_profile(name, profile))
    }

    /// Activate `name` and deactivate every other profile.
    ///
    /// An unknown name deactivates all profiles. Returns whether a profile
    /// matched.
    pub fn set_active_profile(&self, name: &str) -> Result<bool> {
        self.update(|settings| Ok(settings.set_active_profile(name)))
    }

    /// The first active profile, if any.
    pub fn active_profile(&self) -> Result<Option<Profile>> {
        Ok(self.lock()?.active_profile().cloned())
    }
}
