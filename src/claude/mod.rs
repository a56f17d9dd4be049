//! Claude Code settings adapter.
//!
//! Claude Code keeps its own `~/.claude/settings.json`. This tool owns none of
//! that file: it only reads, sets, and removes two keys under `env` and
//! leaves everything else exactly as it found it (key order included).
//!
//! ```json
//! {
//!   "env": {
//!     "ANTHROPIC_AUTH_TOKEN": "sk-...",
//!     "ANTHROPIC_BASE_URL": "https://api.example.com"
//!   },
//!   "permissions": { "allow": [], "deny": [] }
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::storage::{PersistMode, atomic_write};
use crate::{Error, Result};

/// Environment variable name Claude Code reads the API key from.
pub const TOKEN_KEY: &str = "ANTHROPIC_AUTH_TOKEN";

/// Environment variable name Claude Code reads the API endpoint from.
pub const BASE_URL_KEY: &str = "ANTHROPIC_BASE_URL";

/// Dotted path of the API key inside the settings document.
pub const TOKEN_PATH: &str = "env.ANTHROPIC_AUTH_TOKEN";

/// Dotted path of the API endpoint inside the settings document.
pub const BASE_URL_PATH: &str = "env.ANTHROPIC_BASE_URL";

/// Template written when Claude Code has no settings file yet.
pub const DEFAULT_SETTINGS_TEMPLATE: &str =
    include_str!("../../assets/claude_default_settings.json");

/// Where the active credentials are published.
///
/// Implementations patch exactly the two credential fields and must
/// preserve every other piece of the underlying document.
pub trait CredentialStore: Send + Sync {
    /// Whether the dotted `key` is present.
    fn has_field(&self, key: &str) -> Result<bool>;

    /// Whether both the API key and the API URL are present.
    fn has_auth_config(&self) -> Result<bool> {
        Ok(self.has_field(TOKEN_PATH)? && self.has_field(BASE_URL_PATH)?)
    }

    /// Publish an API key and URL, overwriting any previous values.
    fn set_auth_config(&self, api_key: &str, api_url: &str) -> Result<()>;

    /// Remove both credential fields. Absent fields are not an error.
    fn remove_auth_config(&self) -> Result<()>;
}

/// [`CredentialStore`] backed by Claude Code's `settings.json`.
#[derive(Debug, Clone)]
pub struct ClaudeSettings {
    path: PathBuf,
}

impl ClaudeSettings {
    /// Open the settings file, seeding it from the template if it is absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let settings = Self { path: path.into() };
        settings.ensure_settings_file()?;
        Ok(settings)
    }

    /// Path of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the settings file from the template if it does not exist.
    ///
    /// Returns whether a file was created.
    pub fn ensure_settings_file(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        atomic_write(
            &self.path,
            DEFAULT_SETTINGS_TEMPLATE.as_bytes(),
            PersistMode::OwnerOnly,
        )
        .map_err(|e| Error::file("create", &self.path, e))?;
        tracing::info!(path = %self.path.display(), "Created Claude settings from template");
        Ok(true)
    }

    /// Read the document; a missing file reads as the template.
    fn read_document(&self) -> Result<Value> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => DEFAULT_SETTINGS_TEMPLATE.to_string(),
            Err(e) => return Err(Error::file("read", &self.path, e)),
        };
        let doc: Value = serde_json::from_str(&data).map_err(|source| Error::Parse {
            path: self.path.clone(),
            source,
        })?;
        if !doc.is_object() {
            return Err(Error::InvalidInput(format!(
                "{} is not a JSON object",
                self.path.display()
            )));
        }
        Ok(doc)
    }

    fn write_document(&self, doc: &Value) -> Result<()> {
        let mut json = serde_json::to_string_pretty(doc)?;
        json.push('\n');
        atomic_write(&self.path, json.as_bytes(), PersistMode::preserving(&self.path))
            .map_err(|e| Error::file("write", &self.path, e))?;
        tracing::debug!(path = %self.path.display(), "Wrote Claude settings");
        Ok(())
    }

    /// Apply `f` to the document and write it back only if `f` reports a change.
    fn patch(&self, f: impl FnOnce(&mut Value) -> Result<bool>) -> Result<bool> {
        let mut doc = self.read_document()?;
        let changed = f(&mut doc)?;
        if changed {
            self.write_document(&doc)?;
        }
        Ok(changed)
    }

    /// Value at a dotted `key`, if present.
    pub fn get_field(&self, key: &str) -> Result<Option<Value>> {
        let doc = self.read_document()?;
        Ok(lookup(&doc, key).cloned())
    }

    /// Set a string at a dotted `key`, creating intermediate objects.
    pub fn set_field(&self, key: &str, value: &str) -> Result<()> {
        self.patch(|doc| {
            insert(doc, key, Value::String(value.to_string()))?;
            Ok(true)
        })?;
        Ok(())
    }

    /// Remove a dotted `key`. Returns whether it was present.
    pub fn remove_field(&self, key: &str) -> Result<bool> {
        self.patch(|doc| Ok(remove(doc, key)))
    }
}

impl CredentialStore for ClaudeSettings {
    fn has_field(&self, key: &str) -> Result<bool> {
        Ok(self.get_field(key)?.is_some())
    }

    fn set_auth_config(&self, api_key: &str, api_url: &str) -> Result<()> {
        self.patch(|doc| {
            insert(doc, TOKEN_PATH, Value::String(api_key.to_string()))?;
            insert(doc, BASE_URL_PATH, Value::String(api_url.to_string()))?;
            Ok(true)
        })?;
        Ok(())
    }

    fn remove_auth_config(&self) -> Result<()> {
        self.patch(|doc| {
            let token = remove(doc, TOKEN_PATH);
            let url = remove(doc, BASE_URL_PATH);
            Ok(token || url)
        })?;
        Ok(())
    }
}

/// Follow a dotted path through nested objects.
fn lookup<'a>(doc: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.')
        .try_fold(doc, |node, segment| node.as_object()?.get(segment))
}

/// Insert `value` at a dotted path, creating missing objects on the way.
///
/// A non-object found where an object is needed is an error rather than
/// something to overwrite.
fn insert(doc: &mut Value, key: &str, value: Value) -> Result<()> {
    let segments: Vec<&str> = key.split('.').collect();
    let (last, parents) = segments
        .split_last()
        .ok_or_else(|| Error::InvalidInput("empty settings key".to_string()))?;

    let mut node = doc;
    for segment in parents {
        let object = node
            .as_object_mut()
            .ok_or_else(|| not_an_object(key, segment))?;
        node = object
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    let object = node
        .as_object_mut()
        .ok_or_else(|| not_an_object(key, last))?;
    object.insert(last.to_string(), value);
    Ok(())
}

/// Remove a dotted path. Returns whether anything was removed.
fn remove(doc: &mut Value, key: &str) -> bool {
    let (parent, last) = match key.rsplit_once('.') {
        Some((parent, last)) => (Some(parent), last),
        None => (None, key),
    };
    let container = match parent {
        Some(parent) => parent
            .split('.')
            .try_fold(doc, |node, segment| node.as_object_mut()?.get_mut(segment)),
        None => Some(doc),
    };
    container
        .and_then(Value::as_object_mut)
        // shift_remove keeps the order of the remaining keys
        .map(|object| object.shift_remove(last).is_some())
        .unwrap_or(false)
}

fn not_an_object(key: &str, segment: &str) -> Error {
    Error::InvalidInput(format!(
        "cannot set '{}': '{}' is not a JSON object",
        key, segment
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;

    fn open(env: &TestEnv) -> ClaudeSettings {
        ClaudeSettings::open(env.paths().claude_settings_file()).unwrap()
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_open_seeds_template_when_absent() {
        let env = TestEnv::new();
        let settings = open(&env);
        assert!(settings.path().exists());
        assert_eq!(
            read_json(settings.path()),
            serde_json::from_str::<Value>(DEFAULT_SETTINGS_TEMPLATE).unwrap()
        );
        assert!(!settings.has_auth_config().unwrap());
    }

    #[test]
    fn test_open_keeps_existing_file() {
        let env = TestEnv::new();
        let path = env.paths().claude_settings_file();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"model": "opus"}"#).unwrap();

        let settings = ClaudeSettings::open(&path).unwrap();
        assert!(!settings.ensure_settings_file().unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"model": "opus"}"#);
    }

    #[test]
    fn test_set_auth_config_writes_both_fields() {
        let env = TestEnv::new();
        let settings = open(&env);
        settings.set_auth_config("k1", "https://x").unwrap();

        let doc = read_json(settings.path());
        assert_eq!(doc["env"][TOKEN_KEY], "k1");
        assert_eq!(doc["env"][BASE_URL_KEY], "https://x");
        assert!(settings.has_auth_config().unwrap());
    }

    #[test]
    fn test_set_auth_config_preserves_unrelated_keys_and_order() {
        let env = TestEnv::new();
        let path = env.paths().claude_settings_file();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            r#"{"model": "opus", "env": {"DEBUG": "1"}, "hooks": {"Stop": []}}"#,
        )
        .unwrap();

        let settings = ClaudeSettings::open(&path).unwrap();
        settings.set_auth_config("k1", "https://x").unwrap();

        let doc = read_json(&path);
        assert_eq!(doc["model"], "opus");
        assert_eq!(doc["env"]["DEBUG"], "1");
        assert_eq!(doc["hooks"]["Stop"], Value::Array(vec![]));
        let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["model", "env", "hooks"]);
        let env_keys: Vec<&String> = doc["env"].as_object().unwrap().keys().collect();
        assert_eq!(env_keys, ["DEBUG", TOKEN_KEY, BASE_URL_KEY]);
    }

    #[test]
    fn test_set_auth_config_creates_env_object() {
        let env = TestEnv::new();
        let path = env.paths().claude_settings_file();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{}").unwrap();

        let settings = ClaudeSettings::open(&path).unwrap();
        settings.set_auth_config("k", "u").unwrap();
        assert!(settings.has_auth_config().unwrap());
    }

    #[test]
    fn test_set_auth_config_overwrites_previous_values() {
        let env = TestEnv::new();
        let settings = open(&env);
        settings.set_auth_config("k1", "https://one").unwrap();
        settings.set_auth_config("k2", "https://two").unwrap();

        let doc = read_json(settings.path());
        assert_eq!(doc["env"][TOKEN_KEY], "k2");
        assert_eq!(doc["env"][BASE_URL_KEY], "https://two");
    }

    #[test]
    fn test_remove_auth_config_removes_only_credentials() {
        let env = TestEnv::new();
        let path = env.paths().claude_settings_file();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            r#"{"env": {"DEBUG": "1", "ANTHROPIC_AUTH_TOKEN": "k", "ANTHROPIC_BASE_URL": "u"}}"#,
        )
        .unwrap();

        let settings = ClaudeSettings::open(&path).unwrap();
        assert!(settings.has_auth_config().unwrap());
        settings.remove_auth_config().unwrap();

        let doc = read_json(&path);
        assert!(!settings.has_field(TOKEN_PATH).unwrap());
        assert!(!settings.has_field(BASE_URL_PATH).unwrap());
        assert_eq!(doc["env"]["DEBUG"], "1");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_settings_file_is_written_through() {
        use std::os::unix::fs::symlink;

        let env = TestEnv::new();
        let real = env.path().join("dotfiles").join("claude-settings.json");
        fs::create_dir_all(real.parent().unwrap()).unwrap();
        fs::write(&real, r#"{"model": "opus"}"#).unwrap();
        let link = env.paths().claude_settings_file();
        fs::create_dir_all(link.parent().unwrap()).unwrap();
        symlink(&real, &link).unwrap();

        let settings = ClaudeSettings::open(&link).unwrap();
        settings.set_auth_config("k1", "https://x").unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        let doc = read_json(&real);
        assert_eq!(doc["model"], "opus");
        assert_eq!(doc["env"][TOKEN_KEY], "k1");
        assert_eq!(doc["env"][BASE_URL_KEY], "https://x");

        settings.remove_auth_config().unwrap();
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert!(read_json(&real)["env"].get(TOKEN_KEY).is_none());
    }

    #[test]
    fn test_remove_when_absent_does_not_rewrite() {
        let env = TestEnv::new();
        let path = env.paths().claude_settings_file();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"env":{}}"#).unwrap();

        let settings = ClaudeSettings::open(&path).unwrap();
        settings.remove_auth_config().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"env":{}}"#);
    }

    #[test]
    fn test_has_auth_config_requires_both_fields() {
        let env = TestEnv::new();
        let settings = open(&env);
        settings.set_field(TOKEN_PATH, "k").unwrap();
        assert!(settings.has_field(TOKEN_PATH).unwrap());
        assert!(!settings.has_auth_config().unwrap());

        settings.set_field(BASE_URL_PATH, "u").unwrap();
        assert!(settings.has_auth_config().unwrap());

        assert!(settings.remove_field(TOKEN_PATH).unwrap());
        assert!(!settings.remove_field(TOKEN_PATH).unwrap());
        assert!(!settings.has_auth_config().unwrap());
    }

    #[test]
    fn test_non_object_env_is_rejected() {
        let env = TestEnv::new();
        let path = env.paths().claude_settings_file();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"env": "oops"}"#).unwrap();

        let settings = ClaudeSettings::open(&path).unwrap();
        let err = settings.set_auth_config("k", "u").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"env": "oops"}"#);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let env = TestEnv::new();
        let path = env.paths().claude_settings_file();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ nope").unwrap();

        let settings = ClaudeSettings::open(&path).unwrap();
        assert!(matches!(
            settings.has_auth_config().unwrap_err(),
            Error::Parse { .. }
        ));
    }

    #[test]
    fn test_deleted_file_reads_as_template_and_is_recreated_on_write() {
        let env = TestEnv::new();
        let settings = open(&env);
        fs::remove_file(settings.path()).unwrap();

        assert!(!settings.has_auth_config().unwrap());
        settings.set_auth_config("k", "u").unwrap();
        let doc = read_json(settings.path());
        assert_eq!(doc["env"][TOKEN_KEY], "k");
        assert!(doc.get("permissions").is_some());
    }

    #[test]
    fn test_lookup_and_remove_helpers() {
        let mut doc: Value = serde_json::json!({"a": {"b": {"c": 1}}, "top": true});
        assert_eq!(lookup(&doc, "a.b.c"), Some(&Value::from(1)));
        assert_eq!(lookup(&doc, "a.x.c"), None);
        assert_eq!(lookup(&doc, "top.deeper"), None);
        assert!(remove(&mut doc, "a.b.c"));
        assert!(!remove(&mut doc, "a.b.c"));
        assert!(remove(&mut doc, "top"));
        assert_eq!(doc, serde_json::json!({"a": {"b": {}}}));
    }
}
