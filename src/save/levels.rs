//! Upgrade level persistence
//!
//! Stores the current level of every upgrade per island (or any other
//! entity id). A missing level reads as 0.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Save file version for compatibility checking
const LEVELS_VERSION: u32 = 1;

/// Upgrade levels of one entity, keyed by upgrade name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradesData {
    pub unique_id: String,
    #[serde(default)]
    pub levels: BTreeMap<String, i64>,
}

impl UpgradesData {
    pub fn new(unique_id: &str) -> Self {
        Self {
            unique_id: unique_id.to_string(),
            levels: BTreeMap::new(),
        }
    }

    pub fn level(&self, upgrade_name: &str) -> i64 {
        self.levels.get(upgrade_name).copied().unwrap_or(0)
    }

    pub fn set_level(&mut self, upgrade_name: &str, level: i64) {
        self.levels.insert(upgrade_name.to_string(), level);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid level data: {0}")]
    InvalidData(String),
    #[error("Level file version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Read/write access to stored upgrade levels
pub trait LevelStore {
    fn get_progress_level(&self, entity_id: &str, upgrade_name: &str) -> Result<i64, StoreError>;

    fn set_progress_level(&self, entity_id: &str, upgrade_name: &str, level: i64) -> Result<(), StoreError>;
}

/// In-process level store
#[derive(Debug, Default)]
pub struct MemoryLevelStore {
    entries: Mutex<BTreeMap<String, UpgradesData>>,
}

impl MemoryLevelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of one entity's levels
    pub fn data(&self, entity_id: &str) -> Option<UpgradesData> {
        self.entries.lock().get(entity_id).cloned()
    }
}

impl LevelStore for MemoryLevelStore {
    fn get_progress_level(&self, entity_id: &str, upgrade_name: &str) -> Result<i64, StoreError> {
        Ok(self
            .entries
            .lock()
            .get(entity_id)
            .map(|data| data.level(upgrade_name))
            .unwrap_or(0))
    }

    fn set_progress_level(&self, entity_id: &str, upgrade_name: &str, level: i64) -> Result<(), StoreError> {
        self.entries
            .lock()
            .entry(entity_id.to_string())
            .or_insert_with(|| UpgradesData::new(entity_id))
            .set_level(upgrade_name, level);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LevelsFile {
    version: u32,
    data: UpgradesData,
}

/// Level store writing one JSON file per entity
#[derive(Debug)]
pub struct JsonLevelStore {
    dir: PathBuf,
    cache: Mutex<BTreeMap<String, UpgradesData>>,
}

/// Default directory for level files
pub fn levels_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("world", "bentobox", "Upgrades") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("levels");
        path
    } else {
        PathBuf::from("./levels")
    }
}

impl JsonLevelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Mutex::new(BTreeMap::new()),
        }
    }

    /// Store under [`levels_directory`]
    pub fn open_default() -> Self {
        Self::new(levels_directory())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of one entity's level file. Bytes outside `[A-Za-z0-9_-]` are
    /// percent-encoded, so distinct ids never share a file.
    pub fn entity_path(&self, entity_id: &str) -> PathBuf {
        let mut file_name = String::with_capacity(entity_id.len());
        for byte in entity_id.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
                file_name.push(char::from(byte));
            } else {
                file_name.push_str(&format!("%{:02X}", byte));
            }
        }
        self.dir.join(format!("{}.json", file_name))
    }

    fn read(&self, entity_id: &str) -> Result<UpgradesData, StoreError> {
        let path = self.entity_path(entity_id);
        if !path.exists() {
            return Ok(UpgradesData::new(entity_id));
        }
        let text = fs::read_to_string(&path).map_err(|e| StoreError::Io(e.to_string()))?;
        let file: LevelsFile = serde_json::from_str(&text).map_err(|e| StoreError::Parse(e.to_string()))?;
        if file.version != LEVELS_VERSION {
            return Err(StoreError::VersionMismatch {
                expected: LEVELS_VERSION,
                found: file.version,
            });
        }
        if file.data.unique_id != entity_id {
            return Err(StoreError::InvalidData(format!(
                "{} holds levels of '{}', not '{}'",
                path.display(),
                file.data.unique_id,
                entity_id
            )));
        }
        Ok(file.data)
    }

    fn write(&self, data: &UpgradesData) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::Io(e.to_string()))?;
        let file = LevelsFile {
            version: LEVELS_VERSION,
            data: data.clone(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| StoreError::Parse(e.to_string()))?;
        fs::write(self.entity_path(&data.unique_id), json).map_err(|e| StoreError::Io(e.to_string()))?;
        log::debug!("Saved upgrade levels for {}", data.unique_id);
        Ok(())
    }

    /// Levels of one entity, from the cache or disk
    pub fn data(&self, entity_id: &str) -> Result<UpgradesData, StoreError> {
        let mut cache = self.cache.lock();
        if let Some(data) = cache.get(entity_id) {
            return Ok(data.clone());
        }
        let data = self.read(entity_id)?;
        cache.insert(entity_id.to_string(), data.clone());
        Ok(data)
    }

    /// Remove one entity's level file
    pub fn delete(&self, entity_id: &str) -> Result<(), StoreError> {
        self.cache.lock().remove(entity_id);
        let path = self.entity_path(entity_id);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| StoreError::Io(e.to_string()))?;
            log::info!("Deleted upgrade levels for {}", entity_id);
        }
        Ok(())
    }
}

impl LevelStore for JsonLevelStore {
    fn get_progress_level(&self, entity_id: &str, upgrade_name: &str) -> Result<i64, StoreError> {
        Ok(self.data(entity_id)?.level(upgrade_name))
    }

    fn set_progress_level(&self, entity_id: &str, upgrade_name: &str, level: i64) -> Result<(), StoreError> {
        let mut cache = self.cache.lock();
        let mut data = match cache.get(entity_id) {
            Some(data) => data.clone(),
            None => self.read(entity_id)?,
        };
        data.set_level(upgrade_name, level);
        self.write(&data)?;
        cache.insert(entity_id.to_string(), data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store(name: &str) -> JsonLevelStore {
        let dir = std::env::temp_dir().join(format!("upgrades-levels-{}-{}", std::process::id(), name));
        let _ = fs::remove_dir_all(&dir);
        JsonLevelStore::new(dir)
    }

    #[test]
    fn test_missing_level_reads_zero() {
        let store = MemoryLevelStore::new();
        assert_eq!(store.get_progress_level("island-1", "RangeUpgrade"), Ok(0));
    }

    #[test]
    fn test_memory_store_set_and_get() {
        let store = MemoryLevelStore::new();
        store.set_progress_level("island-1", "RangeUpgrade", 3).unwrap();
        store.set_progress_level("island-1", "LimitsUpgrade-HOPPER", 1).unwrap();

        assert_eq!(store.get_progress_level("island-1", "RangeUpgrade"), Ok(3));
        assert_eq!(store.get_progress_level("island-2", "RangeUpgrade"), Ok(0));
        assert_eq!(store.data("island-1").map(|d| d.levels.len()), Some(2));
    }

    #[test]
    fn test_json_store_persists() {
        let store = make_store("persist");
        store.set_progress_level("island-1", "command-fly", 2).unwrap();
        assert!(store.entity_path("island-1").exists());

        let reopened = JsonLevelStore::new(store.dir().to_path_buf());
        assert_eq!(reopened.get_progress_level("island-1", "command-fly"), Ok(2));
        assert_eq!(reopened.get_progress_level("island-1", "RangeUpgrade"), Ok(0));

        reopened.delete("island-1").unwrap();
        assert!(!reopened.entity_path("island-1").exists());
        let _ = fs::remove_dir_all(store.dir());
    }

    #[test]
    fn test_json_store_rejects_other_versions() {
        let store = make_store("version");
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(
            store.entity_path("island-1"),
            r#"{ "version": 99, "data": { "unique_id": "island-1", "levels": {} } }"#,
        )
        .unwrap();

        assert_eq!(
            store.get_progress_level("island-1", "RangeUpgrade"),
            Err(StoreError::VersionMismatch { expected: 1, found: 99 })
        );
        let _ = fs::remove_dir_all(store.dir());
    }

    #[test]
    fn test_entity_path_is_encoded() {
        let store = JsonLevelStore::new("/tmp/levels");
        assert_eq!(store.entity_path("a/b c"), PathBuf::from("/tmp/levels/a%2Fb%20c.json"));
        assert_eq!(store.entity_path("island_a-1"), PathBuf::from("/tmp/levels/island_a-1.json"));
        assert_eq!(store.entity_path("50%"), PathBuf::from("/tmp/levels/50%25.json"));
    }

    #[test]
    fn test_similar_ids_do_not_share_levels() {
        let store = make_store("similar");
        store.set_progress_level("island a", "RangeUpgrade", 7).unwrap();
        assert_ne!(store.entity_path("island a"), store.entity_path("island_a"));

        let reopened = JsonLevelStore::new(store.dir().to_path_buf());
        assert_eq!(reopened.get_progress_level("island_a", "RangeUpgrade"), Ok(0));
        assert_eq!(reopened.get_progress_level("island a", "RangeUpgrade"), Ok(7));

        reopened.set_progress_level("island_a", "RangeUpgrade", 1).unwrap();
        let again = JsonLevelStore::new(store.dir().to_path_buf());
        assert_eq!(again.get_progress_level("island a", "RangeUpgrade"), Ok(7));
        let _ = fs::remove_dir_all(store.dir());
    }

    #[test]
    fn test_file_of_another_entity_is_rejected() {
        let store = make_store("foreign");
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(
            store.entity_path("island-1"),
            r#"{ "version": 1, "data": { "unique_id": "island-2", "levels": { "RangeUpgrade": 4 } } }"#,
        )
        .unwrap();

        assert!(matches!(
            store.get_progress_level("island-1", "RangeUpgrade"),
            Err(StoreError::InvalidData(_))
        ));
        let _ = fs::remove_dir_all(store.dir());
    }
}
