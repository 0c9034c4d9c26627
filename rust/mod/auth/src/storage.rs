//! Session storage: where the credential survives a reload.
//!
//! Mirrors browser session storage: a flat string-to-string map owned by one
//! console instance.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use fmconsole_core::ConsoleError;

pub trait SessionStorage: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, ConsoleError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ConsoleError>;
    fn remove(&self, key: &str) -> Result<(), ConsoleError>;

    /// Remove several keys as one operation where the backend allows it.
    fn remove_all(&self, keys: &[&str]) -> Result<(), ConsoleError> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// Process-lifetime storage. Gone when the console exits.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ConsoleError> {
        Ok(self.entries.read().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConsoleError> {
        self.entries.write().unwrap().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ConsoleError> {
        self.entries.write().unwrap().remove(key);
        Ok(())
    }
}

/// JSON-file storage, so a restarted console can resume the session.
///
/// The whole map is rewritten on every change (write to `*.tmp`, then
/// rename).
pub struct FileStorage {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open or create. A missing file is an empty storage; an unreadable
    /// one is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConsoleError> {
        let path = path.into();
        let entries: BTreeMap<String, String> = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                ConsoleError::Storage(format!("{}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(ConsoleError::Storage(format!("{}: {}", path.display(), e))),
        };
        Ok(Self { path, entries: RwLock::new(entries) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), ConsoleError> {
        let storage_err = |e: std::io::Error| {
            ConsoleError::Storage(format!("{}: {}", self.path.display(), e))
        };
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(storage_err)?;
        }
        let tmp = self.path.with_extension("tmp");
        let text = serde_json::to_string_pretty(entries)?;
        fs::write(&tmp, text).map_err(storage_err)?;
        fs::rename(&tmp, &self.path).map_err(storage_err)
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ConsoleError> {
        Ok(self.entries.read().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConsoleError> {
        let mut entries = self.entries.write().unwrap();
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ConsoleError> {
        self.remove_all(&[key])
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), ConsoleError> {
        let mut entries = self.entries.write().unwrap();
        if !keys.iter().any(|k| entries.contains_key(*k)) {
            return Ok(());
        }
        let mut next = entries.clone();
        for key in keys {
            next.remove(*key);
        }
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_set_get_remove() {
        let s = MemoryStorage::new();
        assert_eq!(s.get("token").unwrap(), None);
        s.set("token", "jwt").unwrap();
        assert_eq!(s.get("token").unwrap().as_deref(), Some("jwt"));
        s.remove("token").unwrap();
        assert_eq!(s.get("token").unwrap(), None);
    }

    #[test]
    fn file_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/session.json");

        let s = FileStorage::open(&path).unwrap();
        s.set("token", "jwt").unwrap();
        s.set("permissions", "[\"dashboard.read\"]").unwrap();
        drop(s);

        let s = FileStorage::open(&path).unwrap();
        assert_eq!(s.get("token").unwrap().as_deref(), Some("jwt"));
        assert_eq!(s.get("permissions").unwrap().as_deref(), Some("[\"dashboard.read\"]"));
    }

    #[test]
    fn file_remove_all_clears_together() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let s = FileStorage::open(&path).unwrap();
        s.set("token", "jwt").unwrap();
        s.set("permissions", "[]").unwrap();
        s.set("locale", "en").unwrap();
        s.remove_all(&["token", "permissions"]).unwrap();

        let s = FileStorage::open(&path).unwrap();
        assert_eq!(s.get("token").unwrap(), None);
        assert_eq!(s.get("permissions").unwrap(), None);
        assert_eq!(s.get("locale").unwrap().as_deref(), Some("en"));
    }

    #[test]
    fn failed_write_leaves_entries_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        let s = FileStorage::open(sub.join("session.json")).unwrap();
        s.set("token", "jwt").unwrap();

        // A plain file where the directory should be makes every flush fail.
        fs::remove_dir_all(&sub).unwrap();
        fs::write(&sub, "").unwrap();

        assert!(matches!(s.set("token", "other"), Err(ConsoleError::Storage(_))));
        assert_eq!(s.get("token").unwrap().as_deref(), Some("jwt"));
        assert!(matches!(s.set("permissions", "[]"), Err(ConsoleError::Storage(_))));
        assert_eq!(s.get("permissions").unwrap(), None);

        assert!(matches!(s.remove_all(&["token"]), Err(ConsoleError::Storage(_))));
        assert_eq!(s.get("token").unwrap().as_deref(), Some("jwt"));
    }

    #[test]
    fn corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(FileStorage::open(&path), Err(ConsoleError::Storage(_))));
    }
}
