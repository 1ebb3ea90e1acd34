use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use crate::errors::StoreError;

/// Durable string key value storage that outlives a single run (or page load)
///
/// Mirrors the browser's local storage, values are plain strings and a missing
/// key is not an error
pub trait SessionStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Removing a key that does not exist succeeds
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Volatile store. Clones share the same underlying map which lets tests keep
/// a handle to inspect what was persisted
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<BTreeMap<String, String>>>,
    should_reject_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a full storage quota, every `set` is rejected while enabled
    pub fn reject_writes(&self, value: bool) {
        self.should_reject_writes.store(value, Ordering::SeqCst);
    }

    /// Copy of everything currently stored
    pub fn dump(&self) -> BTreeMap<String, String> {
        self.data.lock().expect("mutex poisoned").clone()
    }

    pub fn is_empty(&self) -> bool {
        self.data.lock().expect("mutex poisoned").is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.data.lock().expect("mutex poisoned").get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.should_reject_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteRejected {
                key: key.to_string(),
            });
        }
        self.data
            .lock()
            .expect("mutex poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.data.lock().expect("mutex poisoned").remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::{
        collections::BTreeMap,
        fs,
        io::ErrorKind,
        path::PathBuf,
    };

    use tracing::warn;

    use super::SessionStore;
    use crate::errors::StoreError;

    /// Keeps the store as a single JSON object in a file
    ///
    /// A missing file is an empty store. A file that cannot be parsed is also
    /// read as empty and gets replaced on the next write
    #[derive(Debug, Clone)]
    pub struct FileStore {
        path: PathBuf,
    }

    impl FileStore {
        pub fn new<P: Into<PathBuf>>(path: P) -> Self {
            Self { path: path.into() }
        }

        fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
            let contents = match fs::read_to_string(&self.path) {
                Ok(contents) => contents,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
                Err(e) => return Err(e.into()),
            };
            match serde_json::from_str(&contents) {
                Ok(map) => Ok(map),
                Err(e) => {
                    warn!(?e, path = ?self.path, "session file is not readable, treating as empty");
                    Ok(BTreeMap::new())
                }
            }
        }

        fn save(&self, map: &BTreeMap<String, String>) -> Result<(), StoreError> {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let contents = serde_json::to_string_pretty(map)?;
            fs::write(&self.path, contents)?;
            Ok(())
        }
    }

    impl SessionStore for FileStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Ok(self.load()?.remove(key))
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            let mut map = self.load()?;
            map.insert(key.to_string(), value.to_string());
            self.save(&map)
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            let mut map = self.load()?;
            if map.remove(key).is_some() {
                self.save(&map)?;
            }
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod local_storage {
    use super::SessionStore;
    use crate::errors::StoreError;

    /// The browser's `window.localStorage`
    ///
    /// Storage handles are not `Send` so one is looked up for each operation
    #[derive(Debug, Clone, Default)]
    pub struct LocalStorageStore;

    impl LocalStorageStore {
        fn storage() -> Result<web_sys::Storage, StoreError> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok().flatten())
                .ok_or_else(|| StoreError::Unavailable("localStorage not available".into()))
        }
    }

    impl SessionStore for LocalStorageStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Self::storage()?
                .get_item(key)
                .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            Self::storage()?
                .set_item(key, value)
                .map_err(|_| StoreError::WriteRejected {
                    key: key.to_string(),
                })
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            Self::storage()?
                .remove_item(key)
                .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
        }
    }
}
