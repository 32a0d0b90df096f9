use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use log::warn;

/// Persisted key-value state, standing in for the browser's localStorage.
/// Injectable so the session logic can be tested against an in-memory map.
pub trait Storage: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// Volatile backend. State is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// File-backed backend: a flat JSON object rewritten on every mutation so
/// the session survives restarts the way localStorage survives reloads.
pub struct FileStorage {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStorage {
    /// Open the store at `path`, starting empty if the file is missing or
    /// unreadable. A corrupt file is discarded rather than made fatal.
    pub fn open(path: &Path) -> Self {
        let entries = match File::open(path) {
            Ok(mut file) => {
                let mut data = String::new();
                match file.read_to_string(&mut data) {
                    Ok(_) => serde_json::from_str(&data).unwrap_or_else(|e| {
                        warn!("Discarding unreadable session file {:?}: {}", path, e);
                        HashMap::new()
                    }),
                    Err(e) => {
                        warn!("Failed to read session file {:?}: {}", path, e);
                        HashMap::new()
                    }
                }
            }
            Err(_) => HashMap::new(),
        };

        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    fn save(&self) {
        let data = match serde_json::to_string_pretty(&self.entries) {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to serialize session state: {}", e);
                return;
            }
        };
        let result = File::create(&self.path).and_then(|mut f| f.write_all(data.as_bytes()));
        if let Err(e) = result {
            warn!("Failed to write session file {:?}: {}", self.path, e);
        }
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.save();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.save();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_storage_roundtrip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get("userId"), None);

        storage.set("userId", "u1");
        assert_eq!(storage.get("userId"), Some("u1".to_string()));

        storage.set("userId", "u2");
        assert_eq!(storage.get("userId"), Some("u2".to_string()));

        storage.remove("userId");
        assert_eq!(storage.get("userId"), None);
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        {
            let mut storage = FileStorage::open(&path);
            storage.set("userId", "u1");
            storage.set("lastActivity", "1700000000000");
        }

        let reopened = FileStorage::open(&path);
        assert_eq!(reopened.get("userId"), Some("u1".to_string()));
        assert_eq!(
            reopened.get("lastActivity"),
            Some("1700000000000".to_string())
        );
    }

    #[test]
    fn test_file_storage_remove_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        {
            let mut storage = FileStorage::open(&path);
            storage.set("passwordResetCompleted", "true");
            storage.remove("passwordResetCompleted");
        }

        let reopened = FileStorage::open(&path);
        assert_eq!(reopened.get("passwordResetCompleted"), None);
    }

    #[test]
    fn test_file_storage_recovers_from_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"not json at all").unwrap();

        let storage = FileStorage::open(&path);
        assert_eq!(storage.get("userId"), None);
    }

    #[test]
    fn test_file_storage_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(&dir.path().join("absent.json"));
        assert_eq!(storage.get("userId"), None);
    }
}
