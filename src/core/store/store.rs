//! Idempotent reader/writer for `tempest.conf`
//!
//! Every mutation re-reads the file, applies one change to the parsed
//! document and, only when the rendered text differs, replaces the file
//! atomically through a temporary file in the same directory.

use super::document::IniDocument;
use crate::domain::errors::WriteError;
use crate::domain::ids::ConfigKey;
use crate::domain::value::{ConfigValue, REDACTED};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;

/// Whether an operation modified the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// The stored value already matched; nothing was written
    Unchanged,
    /// The file was rewritten
    Changed,
}

impl Change {
    /// Returns true if the file was rewritten
    pub fn is_changed(self) -> bool {
        self == Change::Changed
    }
}

/// Owner of one config file on disk
///
/// Writers are serialized by a whole-file lock held for the full
/// read-modify-persist cycle. Values are never logged in clear; only the
/// redacted form of old and new values reaches `tracing`.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ConfigStore {
    /// Create a store for the file at `path`
    ///
    /// The file does not need to exist yet; it is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the managed file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted value of `key`
    ///
    /// Returns `Ok(None)` when the file, the section or the option is absent.
    pub fn read(&self, key: &ConfigKey) -> Result<Option<ConfigValue>, WriteError> {
        let _guard = self.lock();
        let document = self.load(key)?;
        Ok(document
            .get(key.section(), key.option())
            .map(ConfigValue::from_raw))
    }

    /// Ensure `key` holds `value`
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::InvalidValue`] without touching the file when
    /// the rendered value spans several lines or has surrounding whitespace,
    /// since neither would read back unchanged.
    pub fn write(&self, key: &ConfigKey, value: &ConfigValue) -> Result<Change, WriteError> {
        let rendered = value.render();
        check_single_line(key, &rendered)?;

        let _guard = self.lock();
        let mut document = self.load(key)?;

        let previous = document
            .get(key.section(), key.option())
            .map(ConfigValue::from_raw);

        if !document.set(key.section(), key.option(), &rendered) {
            tracing::debug!(key = %key, value = %value, "Config value unchanged");
            return Ok(Change::Unchanged);
        }

        self.persist(key, &document)?;

        // Mirror the secrecy of the new value onto the old one
        let old = match (&previous, value.is_secret()) {
            (Some(_), true) => Some(REDACTED.to_string()),
            (Some(previous), false) => Some(previous.redacted()),
            (None, _) => None,
        };
        crate::log_key_changed!(key, old, value);

        Ok(Change::Changed)
    }

    /// Ensure `key` is absent
    pub fn remove(&self, key: &ConfigKey) -> Result<Change, WriteError> {
        let _guard = self.lock();
        let mut document = self.load(key)?;

        if !document.remove(key.section(), key.option()) {
            tracing::debug!(key = %key, "Config option already absent");
            return Ok(Change::Unchanged);
        }

        self.persist(key, &document)?;
        tracing::info!(key = %key, "Removed config option");

        Ok(Change::Changed)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // A panicked writer leaves the file either old or new, never torn
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn load(&self, key: &ConfigKey) -> Result<IniDocument, WriteError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(IniDocument::parse(&text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(IniDocument::default()),
            Err(e) => Err(WriteError::Read {
                key: key.clone(),
                path: self.path.display().to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn persist(&self, key: &ConfigKey, document: &IniDocument) -> Result<(), WriteError> {
        let persist_error = |message: String| WriteError::Persist {
            key: key.clone(),
            path: self.path.display().to_string(),
            message,
        };

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| persist_error(e.to_string()))?;

        let mut temp = NamedTempFile::new_in(&parent).map_err(|e| persist_error(e.to_string()))?;
        temp.write_all(document.render().as_bytes())
            .map_err(|e| persist_error(e.to_string()))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| persist_error(e.to_string()))?;

        if let Ok(metadata) = fs::metadata(&self.path) {
            fs::set_permissions(temp.path(), metadata.permissions())
                .map_err(|e| persist_error(e.to_string()))?;
        }

        temp.persist(&self.path)
            .map_err(|e| persist_error(e.error.to_string()))?;

        Ok(())
    }
}

fn check_single_line(key: &ConfigKey, rendered: &str) -> Result<(), WriteError> {
    let reason = if rendered.contains(['\n', '\r']) {
        "contains a line break"
    } else if rendered.trim() != rendered {
        "has leading or trailing whitespace"
    } else {
        return Ok(());
    };

    Err(WriteError::InvalidValue {
        key: key.clone(),
        reason,
    })
}
