use std::collections::HashMap;

use super::storage::KeyValueStore;
use super::store::CategoryStore;
use super::types::{AppEntry, Category, CategoryId};

/// Number of apps shown on a folder tile
const PREVIEW_LEN: usize = 4;

/// Applications that resolved to one category
#[derive(Clone, Debug)]
pub struct CategoryGroup {
    pub category: Category,
    pub apps: Vec<AppEntry>,
}

impl CategoryGroup {
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// The first few apps, for folder previews
    pub fn preview(&self) -> &[AppEntry] {
        &self.apps[..self.apps.len().min(PREVIEW_LEN)]
    }
}

/// Case-insensitive substring match on the app name; an empty query matches all
pub fn matches_query(app: &AppEntry, query: &str) -> bool {
    query.is_empty() || app.name.to_lowercase().contains(&query.to_lowercase())
}

/// Group apps by resolved category, in category display order.
///
/// Empty groups are omitted, apps keep their input order within a group and
/// apps whose category cannot be resolved are left out.
pub fn group_by_category<S: KeyValueStore>(
    store: &CategoryStore<S>,
    apps: &[AppEntry],
    query: &str,
) -> Vec<CategoryGroup> {
    let mut grouped: HashMap<CategoryId, Vec<AppEntry>> = HashMap::new();

    for app in apps.iter().filter(|app| matches_query(app, query)) {
        match store.resolve(&app.path, &app.name) {
            Some(category) => grouped.entry(category.id).or_default().push(app.clone()),
            None => log::debug!("No category for {}", app.path),
        }
    }

    store
        .categories()
        .iter()
        .filter_map(|category| {
            let apps = grouped.remove(&category.id)?;
            Some(CategoryGroup {
                category: category.clone(),
                apps,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::storage::MemoryStore;
    use super::*;

    fn apps() -> Vec<AppEntry> {
        vec![
            AppEntry::new("Safari", "/Applications/Safari.app"),
            AppEntry::new("Xcode", "/Applications/Xcode.app"),
            AppEntry::new("Terminal", "/System/Applications/Utilities/Terminal.app"),
            AppEntry::new("Zzz", "/Applications/Zzz.app"),
        ]
    }

    fn keys(groups: &[CategoryGroup]) -> Vec<&str> {
        groups.iter().filter_map(|g| g.category.key()).collect()
    }

    #[test]
    fn test_groups_follow_category_order() {
        let store = CategoryStore::open(MemoryStore::new());
        let groups = group_by_category(&store, &apps(), "");

        // Default order: productivity, development, ..., browsers, other
        assert_eq!(keys(&groups), vec!["development", "browsers", "other"]);
        let dev = &groups[0];
        let names: Vec<_> = dev.apps.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Xcode", "Terminal"]);
    }

    #[test]
    fn test_query_filters_apps() {
        let store = CategoryStore::open(MemoryStore::new());
        let groups = group_by_category(&store, &apps(), "SAF");
        assert_eq!(keys(&groups), vec!["browsers"]);
    }

    #[test]
    fn test_overrides_move_apps() {
        let mut store = CategoryStore::open(MemoryStore::new());
        let mine = store.add("Mine", "star");
        store.set_override("/Applications/Safari.app", Some(mine.id));

        let groups = group_by_category(&store, &apps(), "");
        let last = groups.last().unwrap();
        assert_eq!(last.category.id, mine.id);
        assert_eq!(last.apps[0].name, "Safari");
    }

    #[test]
    fn test_preview_is_capped() {
        let group = CategoryGroup {
            category: Category::new("Many", "x"),
            apps: (0..6)
                .map(|i| AppEntry::new(&format!("App{}", i), &format!("/Applications/App{}.app", i)))
                .collect(),
        };
        assert_eq!(group.preview().len(), 4);
        assert_eq!(group.len(), 6);
    }
}
