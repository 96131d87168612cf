use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;

/// Durable key holding the bearer credential
pub const TOKEN_KEY: &str = "token";
/// Durable key holding the serialized identity
pub const USER_KEY: &str = "user";

const STORAGE_FILE: &str = "local_storage.json";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Origin-scoped key → string store that survives restarts.
///
/// Any component may read; only [`SessionState`](super::SessionState)
/// writes.
pub trait LocalStorage: Send + Sync + std::fmt::Debug {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local storage; contents vanish with the process
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self
            .items
            .read()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".to_string()))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self
            .items
            .write()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".to_string()))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self
            .items
            .write()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".to_string()))?;
        items.remove(key);
        Ok(())
    }
}

/// JSON file of key → string pairs inside a per-origin directory.
///
/// Every call goes to disk so separate processes observe each other's writes.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$HOME/.config/taskboard/client`
    pub fn default_dir() -> Result<PathBuf, StorageError> {
        let home = std::env::var("HOME")
            .map_err(|_| StorageError::Unavailable("HOME environment variable not set".to_string()))?;
        Ok(PathBuf::from(home).join(".config").join("taskboard").join("client"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file(&self) -> PathBuf {
        self.dir.join(STORAGE_FILE)
    }

    fn load(&self) -> Result<HashMap<String, String>, StorageError> {
        let file = self.file();
        if !file.exists() {
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(file)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load for a read-modify-write. An unparseable file starts over empty
    /// and the returned flag says it must be rewritten.
    fn load_for_write(&self) -> Result<(HashMap<String, String>, bool), StorageError> {
        match self.load() {
            Ok(items) => Ok((items, false)),
            Err(StorageError::Corrupt(e)) => {
                tracing::warn!(file = %self.file().display(), error = %e, "discarding corrupt storage file");
                Ok((HashMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn save(&self, items: &HashMap<String, String>) -> Result<(), StorageError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        // temp + rename so a crash never leaves a half-written file behind
        let tmp = self.dir.join(format!("{}.tmp", STORAGE_FILE));
        let content = serde_json::to_string_pretty(items)?;
        let mut file = fs::File::create(&tmp)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp, self.file())?;
        Ok(())
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let (mut items, _) = self.load_for_write()?;
        items.insert(key.to_string(), value.to_string());
        self.save(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let (mut items, corrupt) = self.load_for_write()?;
        if items.remove(key).is_some() || corrupt {
            self.save(&items)?;
        }
        Ok(())
    }
}
