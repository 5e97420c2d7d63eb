use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, never-reused identifier of a category
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CategoryId(Uuid);

impl CategoryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CategoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CategoryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// A user-visible group of applications
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Symbolic icon identifier (e.g., "hammer.fill")
    pub icon: String,
    /// Stable key of a built-in category; `None` for user categories
    #[serde(default)]
    pub category_key: Option<String>,
}

impl Category {
    /// Create a user category with a fresh id
    pub fn new(name: &str, icon: &str) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.to_string(),
            icon: icon.to_string(),
            category_key: None,
        }
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.category_key = Some(key.to_string());
        self
    }

    pub fn key(&self) -> Option<&str> {
        self.category_key.as_deref()
    }

    /// Whether the category carries a built-in key
    pub fn is_builtin(&self) -> bool {
        self.key().is_some_and(|k| !k.is_empty())
    }
}

/// Per-application category assignments, keyed by absolute application path
pub type OverrideMap = HashMap<String, CategoryId>;

/// One installed application as reported by the scanner
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub struct AppEntry {
    /// Display name (bundle name without the `.app` suffix)
    pub name: String,
    /// Absolute path of the application bundle
    pub path: String,
}

impl AppEntry {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_fields_are_ignored() {
        let json = r#"{
            "id": "6F9619FF-8B86-D011-B42D-00C04FC964FF",
            "name": "Games",
            "icon": "gamecontroller.fill",
            "appPaths": ["/Applications/Chess.app"]
        }"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.name, "Games");
        assert_eq!(category.category_key, None);
    }

    #[test]
    fn test_category_key_field_name() {
        let category = Category::new("Media", "play.circle.fill").with_key("media");
        let json = serde_json::to_string(&category).unwrap();
        assert!(json.contains("\"categoryKey\":\"media\""));
    }

    #[test]
    fn test_is_builtin() {
        assert!(Category::new("Media", "x").with_key("media").is_builtin());
        assert!(!Category::new("Mine", "x").is_builtin());
        assert!(!Category::new("Games", "x").with_key("").is_builtin());
    }

    #[test]
    fn test_category_id_parse() {
        let id = CategoryId::new();
        let parsed: CategoryId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-uuid".parse::<CategoryId>().is_err());
    }
}
