//! File-based AttributeStore implementation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use trait_core::{AttributeStore, AttributeValue, EntityId, StoreError};

type Attributes = BTreeMap<String, AttributeValue>;

/// Attribute bag of one entity persisted as a single bincode file.
///
/// # File Format
///
/// Attributes are stored as `attrs_{hex(entity id)}.bin`, a bincode-encoded
/// map from key to value. Every write goes to a temp file that is then
/// renamed over the original, so a crash leaves either the old or the new
/// file. Reads always go to disk; the store caches nothing.
pub struct FileAttributeStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileAttributeStore {
    /// Opens the store of `entity` under `base_dir`, creating the directory.
    pub fn open(base_dir: impl AsRef<Path>, entity: &EntityId) -> Result<Self, StoreError> {
        let base_dir = base_dir.as_ref();
        fs::create_dir_all(base_dir)?;
        let path = base_dir.join(format!("attrs_{}.bin", hex::encode(entity.as_str())));
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Attributes, StoreError> {
        if !self.path.exists() {
            return Ok(Attributes::new());
        }

        let bytes = fs::read(&self.path)?;
        bincode::deserialize(&bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn write_all(&self, attributes: &Attributes) -> Result<(), StoreError> {
        let temp_path = self.path.with_extension("bin.tmp");

        let bytes =
            bincode::serialize(attributes).map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &self.path)?;

        tracing::trace!("Saved {} attributes to {}", attributes.len(), self.path.display());
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut Attributes)) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut attributes = self.read_all()?;
        f(&mut attributes);
        self.write_all(&attributes)
    }
}

impl AttributeStore for FileAttributeStore {
    fn get(&self, key: &str) -> Result<Option<AttributeValue>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: AttributeValue) -> Result<(), StoreError> {
        self.update(|attributes| {
            attributes.insert(key.to_string(), value);
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|attributes| {
            attributes.remove(key);
        })
    }
}
