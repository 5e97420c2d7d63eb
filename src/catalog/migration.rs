//! Schema migrations for the persisted category sequence.
//!
//! Both passes run on every load, in order: key backfill, then default
//! insertion. Each pass is idempotent, so an already-migrated sequence comes
//! back unchanged. The `schemaVersion` tag only describes the snapshot
//! envelope; an untagged legacy snapshot is upgraded to the current envelope
//! the first time it is saved.

use std::collections::HashSet;

use super::builtin::{BUILTIN_CATEGORIES, BuiltinCategory, OTHER, key_for_legacy_name};
use super::types::Category;

/// Untagged snapshots written before schema versions existed
pub const LEGACY_SCHEMA_VERSION: u32 = 1;
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// What a migration run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub from_version: u32,
    pub to_version: u32,
    /// Whether any category was added or modified
    pub changed: bool,
}

impl MigrationOutcome {
    /// The sequence must be written back if content or version moved
    pub fn needs_save(&self) -> bool {
        self.changed || self.from_version != self.to_version
    }
}

/// Bring a loaded sequence up to the current schema
pub fn migrate(categories: &mut Vec<Category>, from_version: u32) -> MigrationOutcome {
    let mut changed = false;

    if backfill_category_keys(categories) {
        log::info!("Backfilled keys of built-in categories");
        changed = true;
    }

    if insert_missing_defaults(categories) {
        log::info!("Inserted newly introduced default categories");
        changed = true;
    }

    MigrationOutcome {
        from_version,
        to_version: from_version.max(CURRENT_SCHEMA_VERSION),
        changed,
    }
}

/// Give key-less categories whose name is a known built-in name their key.
///
/// Renamed categories no longer match and stay user categories. A key that is
/// already taken is never assigned twice.
pub fn backfill_category_keys(categories: &mut [Category]) -> bool {
    let mut taken: HashSet<String> = categories
        .iter()
        .filter_map(|c| c.key())
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();

    let mut changed = false;
    for category in categories.iter_mut() {
        if category.key().is_some_and(|k| !k.is_empty()) {
            continue;
        }
        let Some(key) = key_for_legacy_name(&category.name) else {
            continue;
        };
        if taken.insert(key.to_string()) {
            log::debug!("Backfilled key '{}' for category '{}'", key, category.name);
            category.category_key = Some(key.to_string());
            changed = true;
        }
    }

    changed
}

/// Insert built-in categories whose key is absent, right before "other"
pub fn insert_missing_defaults(categories: &mut Vec<Category>) -> bool {
    insert_missing_from(categories, BUILTIN_CATEGORIES)
}

/// Insert each template whose key is absent, keeping the templates' relative
/// order, immediately before the first "other" category (or at the end).
pub fn insert_missing_from(categories: &mut Vec<Category>, templates: &[BuiltinCategory]) -> bool {
    let existing: HashSet<&str> = categories.iter().filter_map(|c| c.key()).collect();
    let missing: Vec<Category> = templates
        .iter()
        .filter(|t| !existing.contains(t.key))
        .map(BuiltinCategory::instantiate)
        .collect();

    if missing.is_empty() {
        return false;
    }

    match categories.iter().position(|c| c.key() == Some(OTHER)) {
        Some(other_index) => {
            categories.splice(other_index..other_index, missing);
        }
        None => categories.extend(missing),
    }

    true
}
