use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::migration::{CURRENT_SCHEMA_VERSION, LEGACY_SCHEMA_VERSION};
use super::types::{Category, OverrideMap};

const DATA_DIR: &str = ".launchdeck";
const DATA_DIR_ENV: &str = "LAUNCHDECK_HOME";

/// Snapshot key holding the category sequence
pub const CATEGORIES_KEY: &str = "customCategories";
/// Snapshot key holding the path -> category id override map
pub const OVERRIDES_KEY: &str = "appCategoryMap";
/// Snapshot key holding launcher settings
pub const SETTINGS_KEY: &str = "launcherSettings";

/// Get the directory where snapshots are kept
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(DATA_DIR)
}

/// Minimal key-value persistence: every write replaces the whole value
pub trait KeyValueStore {
    /// Read a value; `Ok(None)` if the key was never written
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;
    /// Replace the value stored under `key`
    fn write(&mut self, key: &str, value: &[u8]) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create data directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Open the store in the default data directory
    pub fn open_default() -> Result<Self> {
        Self::open(get_data_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read snapshot '{}'", key)),
        }
    }

    fn write(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.json.tmp", key));

        fs::write(&tmp, value).with_context(|| format!("failed to write snapshot '{}'", key))?;

        // Owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))
                .with_context(|| format!("failed to set permissions on snapshot '{}'", key))?;
        }

        // Rename is atomic, so readers see either the old or the new snapshot
        fs::rename(&tmp, &path).with_context(|| format!("failed to replace snapshot '{}'", key))?;
        Ok(())
    }
}

/// In-memory store, mainly for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, Vec<u8>>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without counting it as a write
    pub fn insert(&mut self, key: &str, value: &[u8]) {
        self.values.insert(key.to_string(), value.to_vec());
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.values.get(key).map(Vec::as_slice)
    }

    /// Number of writes issued so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.writes += 1;
        self.values.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CategorySnapshotRef<'a> {
    schema_version: u32,
    categories: &'a [Category],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OverrideSnapshotRef<'a> {
    schema_version: u32,
    overrides: &'a OverrideMap,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategorySnapshot {
    schema_version: u32,
    categories: Vec<Category>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OverrideSnapshot {
    schema_version: u32,
    #[serde(default)]
    overrides: OverrideMap,
}

/// Either a tagged envelope or a bare value written before versioning
#[derive(Deserialize)]
#[serde(untagged)]
enum Stored<V, L> {
    Versioned(V),
    Legacy(L),
}

/// Decode a category snapshot, returning the sequence and its schema version
pub fn decode_categories(bytes: &[u8]) -> Result<(Vec<Category>, u32)> {
    let stored: Stored<CategorySnapshot, Vec<Category>> =
        serde_json::from_slice(bytes).context("failed to parse category snapshot")?;
    Ok(match stored {
        Stored::Versioned(s) => (s.categories, s.schema_version),
        Stored::Legacy(categories) => (categories, LEGACY_SCHEMA_VERSION),
    })
}

pub fn encode_categories(categories: &[Category]) -> Result<Vec<u8>> {
    let snapshot = CategorySnapshotRef {
        schema_version: CURRENT_SCHEMA_VERSION,
        categories,
    };
    serde_json::to_vec_pretty(&snapshot).context("failed to serialize categories")
}

/// Decode an override snapshot, returning the map and its schema version
pub fn decode_overrides(bytes: &[u8]) -> Result<(OverrideMap, u32)> {
    let stored: Stored<OverrideSnapshot, OverrideMap> =
        serde_json::from_slice(bytes).context("failed to parse override snapshot")?;
    Ok(match stored {
        Stored::Versioned(s) => (s.overrides, s.schema_version),
        Stored::Legacy(overrides) => (overrides, LEGACY_SCHEMA_VERSION),
    })
}

pub fn encode_overrides(overrides: &OverrideMap) -> Result<Vec<u8>> {
    let snapshot = OverrideSnapshotRef {
        schema_version: CURRENT_SCHEMA_VERSION,
        overrides,
    };
    serde_json::to_vec_pretty(&snapshot).context("failed to serialize category overrides")
}

#[cfg(test)]
mod tests {
    use super::super::types::CategoryId;
    use super::*;

    #[test]
    fn test_decode_legacy_category_array() {
        let json = r#"[
            {"id": "6F9619FF-8B86-D011-B42D-00C04FC964FF", "name": "開發工具",
             "icon": "hammer.fill", "appPaths": ["/Applications/Xcode.app"]}
        ]"#;
        let (categories, version) = decode_categories(json.as_bytes()).unwrap();
        assert_eq!(version, LEGACY_SCHEMA_VERSION);
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "開發工具");
    }

    #[test]
    fn test_decode_versioned_categories() {
        let categories = vec![Category::new("Mine", "star")];
        let bytes = encode_categories(&categories).unwrap();
        let (decoded, version) = decode_categories(&bytes).unwrap();
        assert_eq!(version, CURRENT_SCHEMA_VERSION);
        assert_eq!(decoded, categories);
    }

    #[test]
    fn test_decode_legacy_override_map() {
        let id = CategoryId::new();
        let json = format!(r#"{{"/Applications/Xcode.app": "{}"}}"#, id);
        let (overrides, version) = decode_overrides(json.as_bytes()).unwrap();
        assert_eq!(version, LEGACY_SCHEMA_VERSION);
        assert_eq!(overrides.get("/Applications/Xcode.app"), Some(&id));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_categories(b"not json").is_err());
        assert!(decode_overrides(b"[1, 2, 3]").is_err());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path().join("data")).unwrap();

        assert!(store.read(CATEGORIES_KEY).unwrap().is_none());
        store.write(CATEGORIES_KEY, b"first").unwrap();
        store.write(CATEGORIES_KEY, b"second").unwrap();
        assert_eq!(store.read(CATEGORIES_KEY).unwrap(), Some(b"second".to_vec()));

        // No temp files left behind
        let names: Vec<_> = fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec![format!("{}.json", CATEGORIES_KEY)]);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.write(OVERRIDES_KEY, b"{}").unwrap();
        let mode = fs::metadata(dir.path().join("appCategoryMap.json"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let mut store = MemoryStore::new();
        store.insert("a", b"seed");
        assert_eq!(store.writes(), 0);
        store.write("a", b"value").unwrap();
        assert_eq!(store.writes(), 1);
        assert_eq!(store.get("a"), Some(&b"value"[..]));
    }
}
