//! A tiny persisted key-value store, the only state that survives between runs.
//!
//! Values are kept as JSON in a single file under the user's data directory. A missing file is
//! an empty store; a corrupt one is logged and treated as empty so it never blocks startup.

use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default)]
/// JSON-backed key-value pairs, written through on every change.
pub struct LocalStorage {
    path: Option<PathBuf>,
    values: BTreeMap<String, Value>,
}

impl LocalStorage {
    #[must_use]
    /// Default file location, `<data dir>/vellum/storage.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("vellum").join("storage.json"))
    }

    #[must_use]
    /// Opens the store at `path`, reading whatever it already holds.
    pub fn open(path: PathBuf) -> Self {
        let values = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt storage");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self {
            path: Some(path),
            values,
        }
    }

    #[must_use]
    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    #[must_use]
    /// Reads and decodes the value under `key`.
    ///
    /// A value that no longer decodes as `T` reads as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values.get(key)?.clone();
        serde_json::from_value(value).ok()
    }

    /// Stores `value` under `key` and writes the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be encoded or the file cannot be written.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        self.values
            .insert(key.to_string(), serde_json::to_value(value)?);
        self.flush()
    }

    fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/storage.rs"]
mod tests;
