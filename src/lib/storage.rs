//! Durable key-value storage for the browser context. The session token is
//! the only value the application keeps here, under [`ACCESS_TOKEN_KEY`].
//! Access is synchronous, like browser `localStorage`, so the session can be
//! hydrated before the first route is resolved.

use super::errors::AppError;
use std::{
    collections::BTreeMap,
    fmt, fs,
    io::ErrorKind,
    path::PathBuf,
    sync::{Mutex, PoisonError},
};
use tracing::warn;

/// Storage key holding the bearer token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// String key-value store that survives reloads of the browser context.
pub trait DurableStorage: Send + Sync + fmt::Debug {
    /// # Errors
    /// Returns `AppError::Storage` if the backing store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, AppError>;

    /// # Errors
    /// Returns `AppError::Storage` if the value cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Removing a missing key is not an error.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the backing store cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), AppError>;
}

/// In-process storage, used for tests and ephemeral contexts.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), AppError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
        Ok(())
    }
}

/// What a readable storage file held.
enum Contents {
    Items(BTreeMap<String, String>),
    Malformed(serde_json::Error),
}

/// Storage persisted as a JSON object in a single file.
///
/// Each write replaces the whole file through a sibling temp file and a
/// rename, so readers never see a half-written document.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<Contents, AppError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(Contents::Items(BTreeMap::new()))
            }
            Err(err) => {
                return Err(AppError::Storage(format!(
                    "Failed to read {}: {err}",
                    self.path.display()
                )))
            }
        };

        if contents.trim().is_empty() {
            return Ok(Contents::Items(BTreeMap::new()));
        }

        Ok(serde_json::from_str(&contents).map_or_else(Contents::Malformed, Contents::Items))
    }

    fn read_items(&self) -> Result<BTreeMap<String, String>, AppError> {
        match self.load()? {
            Contents::Items(items) => Ok(items),
            Contents::Malformed(err) => Err(AppError::Storage(format!(
                "Malformed storage file {}: {err}",
                self.path.display()
            ))),
        }
    }

    /// Reads the current items for a write, starting over if the file is unreadable JSON.
    fn read_items_for_write(&self) -> Result<BTreeMap<String, String>, AppError> {
        match self.load()? {
            Contents::Items(items) => Ok(items),
            Contents::Malformed(err) => {
                warn!("Discarding malformed storage file {}: {err}", self.path.display());
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_items(&self, items: &BTreeMap<String, String>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| {
                AppError::Storage(format!("Failed to create {}: {err}", parent.display()))
            })?;
        }

        let payload = serde_json::to_string_pretty(items)
            .map_err(|err| AppError::Storage(format!("Failed to encode storage: {err}")))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, payload)
            .map_err(|err| AppError::Storage(format!("Failed to write {}: {err}", tmp.display())))?;
        fs::rename(&tmp, &self.path).map_err(|err| {
            AppError::Storage(format!("Failed to replace {}: {err}", self.path.display()))
        })
    }
}

impl DurableStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_items()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.read_items_for_write()?;
        items.insert(key.to_string(), value.to_string());
        self.write_items(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), AppError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.read_items_for_write()?;
        if items.remove(key).is_none() {
            return Ok(());
        }
        self.write_items(&items)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::env;
    use ulid::Ulid;

    /// Unique path under the system temp dir, removed on drop.
    pub(crate) struct TempPath(pub PathBuf);

    impl TempPath {
        pub(crate) fn new() -> Self {
            Self(env::temp_dir().join(format!("superimpress-{}/storage.json", Ulid::new())))
        }
    }

    impl Drop for TempPath {
        fn drop(&mut self) {
            if let Some(parent) = self.0.parent() {
                let _ = fs::remove_dir_all(parent);
            }
        }
    }

    #[test]
    fn memory_storage_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item(ACCESS_TOKEN_KEY), Ok(None));

        assert!(storage.set_item(ACCESS_TOKEN_KEY, "abc").is_ok());
        assert_eq!(storage.get_item(ACCESS_TOKEN_KEY), Ok(Some("abc".to_string())));

        assert!(storage.remove_item(ACCESS_TOKEN_KEY).is_ok());
        assert!(storage.remove_item(ACCESS_TOKEN_KEY).is_ok());
        assert_eq!(storage.get_item(ACCESS_TOKEN_KEY), Ok(None));
    }

    #[test]
    fn file_storage_survives_new_instance() {
        let temp = TempPath::new();

        let first = FileStorage::new(&temp.0);
        assert!(first.set_item(ACCESS_TOKEN_KEY, "token-1").is_ok());
        assert!(first.set_item("theme", "dark").is_ok());

        let reloaded = FileStorage::new(&temp.0);
        assert_eq!(
            reloaded.get_item(ACCESS_TOKEN_KEY),
            Ok(Some("token-1".to_string()))
        );

        assert!(reloaded.remove_item(ACCESS_TOKEN_KEY).is_ok());
        assert_eq!(first.get_item(ACCESS_TOKEN_KEY), Ok(None));
        assert_eq!(first.get_item("theme"), Ok(Some("dark".to_string())));
    }

    #[test]
    fn file_storage_missing_file_is_empty() {
        let temp = TempPath::new();
        let storage = FileStorage::new(&temp.0);

        assert_eq!(storage.get_item(ACCESS_TOKEN_KEY), Ok(None));
        assert!(storage.remove_item(ACCESS_TOKEN_KEY).is_ok());
        assert!(!temp.0.exists());
    }

    #[test]
    fn file_storage_malformed_reads_fail_and_writes_recover() {
        let temp = TempPath::new();
        if let Some(parent) = temp.0.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&temp.0, "{not json").unwrap();

        let storage = FileStorage::new(&temp.0);
        assert!(matches!(
            storage.get_item(ACCESS_TOKEN_KEY),
            Err(AppError::Storage(_))
        ));

        assert!(storage.set_item(ACCESS_TOKEN_KEY, "fresh").is_ok());
        assert_eq!(
            storage.get_item(ACCESS_TOKEN_KEY),
            Ok(Some("fresh".to_string()))
        );
    }

    #[test]
    fn file_storage_read_failures_block_writes() {
        let temp = TempPath::new();
        fs::create_dir_all(&temp.0).unwrap();

        let storage = FileStorage::new(&temp.0);
        assert!(matches!(
            storage.set_item(ACCESS_TOKEN_KEY, "fresh"),
            Err(AppError::Storage(message)) if message.starts_with("Failed to read")
        ));
        assert!(temp.0.is_dir());
    }
}
