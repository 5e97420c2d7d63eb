use std::collections::HashSet;

use super::builtin::{OTHER, default_categories};
use super::classifier::Classifier;
use super::migration::{self, CURRENT_SCHEMA_VERSION};
use super::storage::{
    CATEGORIES_KEY, KeyValueStore, OVERRIDES_KEY, decode_categories, decode_overrides,
    encode_categories, encode_overrides,
};
use super::types::{Category, CategoryId, OverrideMap};

/// Authoritative owner of the category sequence and the per-app overrides.
///
/// Construct once with [`CategoryStore::open`] and pass it by reference to
/// whatever needs to resolve or edit categories. Every mutation persists a
/// whole snapshot before returning. Persistence failures are logged and never
/// surface to the caller; the in-memory state stays authoritative.
#[derive(Debug)]
pub struct CategoryStore<S: KeyValueStore> {
    backend: S,
    classifier: Classifier,
    categories: Vec<Category>,
    overrides: OverrideMap,
}

impl<S: KeyValueStore> CategoryStore<S> {
    /// Load, migrate and validate persisted state
    pub fn open(backend: S) -> Self {
        Self::open_with_classifier(backend, Classifier::default())
    }

    pub fn open_with_classifier(backend: S, classifier: Classifier) -> Self {
        let mut store = Self {
            backend,
            classifier,
            categories: Vec::new(),
            overrides: OverrideMap::new(),
        };
        store.load();
        store.load_overrides();
        log::info!(
            "Category store opened ({} categories, {} overrides)",
            store.categories.len(),
            store.overrides.len()
        );
        store
    }

    /// Release the store, handing back the backend
    pub fn close(self) -> S {
        log::debug!("Category store closed");
        self.backend
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn overrides(&self) -> &OverrideMap {
        &self.overrides
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Direct access to the backend; call [`CategoryStore::load`] afterwards
    /// if snapshots were replaced underneath the store
    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// First category carrying `key`
    pub fn find_by_key(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.key() == Some(key))
    }

    /// Reload the category sequence from the backend.
    ///
    /// A missing or undecodable snapshot is replaced by the defaults, which are
    /// written back immediately. Migrations run before the sequence is returned.
    /// Overrides pointing at categories that did not survive the reload are
    /// dropped.
    pub fn load(&mut self) -> &[Category] {
        let loaded = match self.backend.read(CATEGORIES_KEY) {
            Ok(Some(bytes)) => match decode_categories(&bytes) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    log::warn!("Discarding unreadable category snapshot: {:#}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::warn!("Failed to read category snapshot: {:#}", e);
                None
            }
        };

        match loaded {
            Some((mut categories, version)) => {
                if version > CURRENT_SCHEMA_VERSION {
                    log::warn!(
                        "Category snapshot has schema v{} (newer than v{}), loading as-is",
                        version,
                        CURRENT_SCHEMA_VERSION
                    );
                }

                let outcome = migration::migrate(&mut categories, version);
                self.categories = categories;
                if outcome.needs_save() {
                    log::info!(
                        "Migrated categories from schema v{} to v{}",
                        outcome.from_version,
                        outcome.to_version
                    );
                    self.persist_categories();
                }
            }
            None => {
                log::info!("No usable category snapshot, starting from defaults");
                self.categories = default_categories();
                self.persist_categories();
            }
        }

        if self.prune_dangling_overrides() {
            self.persist_overrides();
        }
        &self.categories
    }

    /// Replace the whole sequence.
    ///
    /// A repeated id keeps only its first occurrence, and a repeated key is
    /// cleared on every category after the first carrying it. Overrides
    /// pointing at categories that are no longer present are dropped in the
    /// same operation.
    pub fn save(&mut self, categories: Vec<Category>) {
        self.categories = dedup_categories(categories);
        if self.find_by_key(OTHER).is_none() {
            log::warn!("Saved categories lack '{}', it is restored on next load", OTHER);
        }
        self.persist_categories();
        if self.prune_dangling_overrides() {
            self.persist_overrides();
        }
    }

    /// Append a user category
    pub fn add(&mut self, name: &str, icon: &str) -> Category {
        let category = Category::new(name, icon);
        log::debug!("Adding category '{}' ({})", category.name, category.id);
        self.categories.push(category.clone());
        self.persist_categories();
        category
    }

    /// Replace the category with the same id.
    ///
    /// An edited built-in category loses its key and becomes a user category.
    /// Returns `false` if no category has that id.
    pub fn update(&mut self, mut category: Category) -> bool {
        let Some(slot) = self.categories.iter_mut().find(|c| c.id == category.id) else {
            log::debug!("Ignoring update for unknown category {}", category.id);
            return false;
        };

        if let Some(key) = slot.category_key.take() {
            log::debug!("Category '{}' edited, dropping key '{}'", slot.name, key);
        }
        category.category_key = None;
        *slot = category;
        self.persist_categories();
        true
    }

    /// Remove a category together with every override pointing at it.
    ///
    /// Affected applications fall back to automatic classification.
    pub fn delete(&mut self, id: CategoryId) -> Option<Category> {
        let index = self.categories.iter().position(|c| c.id == id)?;
        let removed = self.categories.remove(index);

        let before = self.overrides.len();
        self.overrides.retain(|_, target| *target != id);
        log::debug!(
            "Deleted category '{}', cleared {} override(s)",
            removed.name,
            before - self.overrides.len()
        );

        self.persist_overrides();
        self.persist_categories();
        Some(removed)
    }

    /// Category for an application: its override if one is set and still
    /// valid, otherwise the automatic classification.
    ///
    /// `None` only if the category the classifier picks has been deleted.
    pub fn resolve(&self, path: &str, name: &str) -> Option<&Category> {
        if let Some(id) = self.overrides.get(path) {
            match self.get(*id) {
                Some(category) => return Some(category),
                None => log::debug!("Override for {} points at missing category {}", path, id),
            }
        }
        self.find_by_key(self.classifier.classify(name, path))
    }

    /// Automatic category key, ignoring overrides
    pub fn classify(&self, name: &str, path: &str) -> &'static str {
        self.classifier.classify(name, path)
    }

    /// Set or clear the override for one application path.
    ///
    /// Returns `false` (and changes nothing) if `id` names no category.
    pub fn set_override(&mut self, path: &str, id: Option<CategoryId>) -> bool {
        match id {
            Some(id) => {
                if self.get(id).is_none() {
                    log::warn!("Refusing override of {} to unknown category {}", path, id);
                    return false;
                }
                self.overrides.insert(path.to_string(), id);
            }
            None => {
                self.overrides.remove(path);
            }
        }
        self.persist_overrides();
        true
    }

    /// Restore the built-in categories and drop every override
    pub fn reset_to_defaults(&mut self) {
        log::info!("Resetting categories to defaults");
        self.categories = default_categories();
        self.overrides.clear();
        self.persist_categories();
        self.persist_overrides();
    }

    fn load_overrides(&mut self) {
        self.overrides = match self.backend.read(OVERRIDES_KEY) {
            Ok(Some(bytes)) => match decode_overrides(&bytes) {
                Ok((overrides, _)) => overrides,
                Err(e) => {
                    log::warn!("Discarding unreadable override snapshot: {:#}", e);
                    OverrideMap::new()
                }
            },
            Ok(None) => OverrideMap::new(),
            Err(e) => {
                log::warn!("Failed to read override snapshot: {:#}", e);
                OverrideMap::new()
            }
        };

        if self.prune_dangling_overrides() {
            self.persist_overrides();
        }
    }

    fn prune_dangling_overrides(&mut self) -> bool {
        let ids: HashSet<CategoryId> = self.categories.iter().map(|c| c.id).collect();
        let before = self.overrides.len();
        self.overrides.retain(|_, id| ids.contains(id));
        let dropped = before - self.overrides.len();
        if dropped > 0 {
            log::info!("Dropped {} override(s) pointing at missing categories", dropped);
        }
        dropped > 0
    }

    fn persist_categories(&mut self) {
        let result = encode_categories(&self.categories)
            .and_then(|bytes| self.backend.write(CATEGORIES_KEY, &bytes));
        if let Err(e) = result {
            log::warn!("Failed to save categories: {:#}", e);
        }
    }

    fn persist_overrides(&mut self) {
        let result = encode_overrides(&self.overrides)
            .and_then(|bytes| self.backend.write(OVERRIDES_KEY, &bytes));
        if let Err(e) = result {
            log::warn!("Failed to save category overrides: {:#}", e);
        }
    }
}

fn dedup_categories(categories: Vec<Category>) -> Vec<Category> {
    let mut ids = HashSet::new();
    let mut keys = HashSet::new();

    categories
        .into_iter()
        .filter_map(|mut category| {
            if !ids.insert(category.id) {
                log::warn!("Dropping duplicate of category {} ('{}')", category.id, category.name);
                return None;
            }
            let repeated_key = category
                .key()
                .is_some_and(|k| !k.is_empty() && !keys.insert(k.to_string()));
            if repeated_key {
                log::warn!(
                    "Category '{}' repeats key '{}', clearing it",
                    category.name,
                    category.key().unwrap_or_default()
                );
                category.category_key = None;
            }
            Some(category)
        })
        .collect()
}
