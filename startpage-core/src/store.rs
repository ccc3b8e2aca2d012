// startpage-core/src/store.rs
use std::io::Write;
use std::path::{Path, PathBuf};

/// Name of the slot the document is persisted under
pub const DEFAULT_SLOT: &str = "landing-page-config";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config directory not found")]
    NoConfigDir,
}

/// A single named slot holding the serialised document as text
pub trait ConfigStore {
    /// `Ok(None)` when nothing has been stored yet
    fn read(&self) -> Result<Option<String>, StoreError>;

    /// Replace the stored blob wholesale
    fn write(&mut self, blob: &str) -> Result<(), StoreError>;
}

/// File-backed slot. Writes land in a sibling temp file that is renamed over
/// the slot, so a failed write leaves the previous blob in place.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.config/startpage/<slot>.json` (platform equivalent)
    pub fn named(slot: &str) -> Result<Self, StoreError> {
        let dir = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
        Ok(Self::new(dir.join("startpage").join(format!("{slot}.json"))))
    }

    pub fn default_location() -> Result<Self, StoreError> {
        Self::named(DEFAULT_SLOT)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ConfigStore for FileStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, blob: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        let result = std::fs::File::create(&temp)
            .and_then(|mut file| {
                file.write_all(blob.as_bytes())?;
                file.sync_all()
            })
            .and_then(|()| std::fs::rename(&temp, &self.path));

        if result.is_err() {
            let _ = std::fs::remove_file(&temp);
        }
        Ok(result?)
    }
}

/// In-process slot
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blob: Option<String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an already persisted blob
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
            writes: 0,
        }
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }

    /// How many successful writes the slot has seen
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ConfigStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.blob.clone())
    }

    fn write(&mut self, blob: &str) -> Result<(), StoreError> {
        self.blob = Some(blob.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_missing_slot_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested/config.json"));
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn test_file_store_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested/config.json"));

        store.write("{\"a\":1}").unwrap();
        store.write("{\"a\":2}").unwrap();

        assert_eq!(store.read().unwrap().as_deref(), Some("{\"a\":2}"));
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_file_store_failed_write_keeps_previous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut store = FileStore::new(&path);
        store.write("first").unwrap();

        // Occupy the temp path with a directory so the write cannot start
        std::fs::create_dir(store.temp_path()).unwrap();
        assert!(store.write("second").is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first");
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let mut store = MemoryStore::with_blob("x");
        assert_eq!(store.read().unwrap().as_deref(), Some("x"));
        store.write("y").unwrap();
        assert_eq!(store.blob(), Some("y"));
        assert_eq!(store.writes(), 1);
    }
}
