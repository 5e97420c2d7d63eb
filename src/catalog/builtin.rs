use super::types::Category;

pub const PRODUCTIVITY: &str = "productivity";
pub const DEVELOPMENT: &str = "development";
pub const MEDIA: &str = "media";
pub const UTILITIES: &str = "utilities";
pub const SOCIAL: &str = "social";
pub const GAMES: &str = "games";
pub const DESIGN: &str = "design";
pub const EDUCATION: &str = "education";
pub const BROWSERS: &str = "browsers";
pub const OTHER: &str = "other";

/// Icon given to categories created without one
pub const DEFAULT_ICON: &str = "folder.fill";

/// A built-in category template (name, icon, key), in canonical display order
pub struct BuiltinCategory {
    pub key: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
}

pub const BUILTIN_CATEGORIES: &[BuiltinCategory] = &[
    builtin(PRODUCTIVITY, "Productivity", "briefcase.fill"),
    builtin(DEVELOPMENT, "Development", "hammer.fill"),
    builtin(MEDIA, "Media", "play.circle.fill"),
    builtin(UTILITIES, "Utilities", "gearshape.2.fill"),
    builtin(SOCIAL, "Social", "message.fill"),
    builtin(GAMES, "Games", "gamecontroller.fill"),
    builtin(DESIGN, "Design", "paintbrush.fill"),
    builtin(EDUCATION, "Education", "book.fill"),
    builtin(BROWSERS, "Browsers", "globe"),
    builtin(OTHER, "Other", "square.grid.2x2.fill"),
];

/// Names the built-in categories were shipped under before categories carried
/// a key: the first-release Traditional Chinese names and the English ones.
const LEGACY_NAMES: &[(&str, &str)] = &[
    ("生產力工具", PRODUCTIVITY),
    ("開發工具", DEVELOPMENT),
    ("影音媒體", MEDIA),
    ("系統工具", UTILITIES),
    ("社交通訊", SOCIAL),
    ("遊戲", GAMES),
    ("創意設計", DESIGN),
    ("教育學習", EDUCATION),
    ("瀏覽器", BROWSERS),
    ("其他", OTHER),
    ("Productivity", PRODUCTIVITY),
    ("Development", DEVELOPMENT),
    ("Media", MEDIA),
    ("Utilities", UTILITIES),
    ("Social", SOCIAL),
    ("Games", GAMES),
    ("Design", DESIGN),
    ("Education", EDUCATION),
    ("Browsers", BROWSERS),
    ("Other", OTHER),
];

const fn builtin(key: &'static str, name: &'static str, icon: &'static str) -> BuiltinCategory {
    BuiltinCategory { key, name, icon }
}

impl BuiltinCategory {
    /// Materialize the template with a fresh id
    pub fn instantiate(&self) -> Category {
        Category::new(self.name, self.icon).with_key(self.key)
    }
}

/// The full default category sequence, each with a fresh id
pub fn default_categories() -> Vec<Category> {
    BUILTIN_CATEGORIES.iter().map(BuiltinCategory::instantiate).collect()
}

/// Map a built-in category name (current or legacy) to its key
pub fn key_for_legacy_name(name: &str) -> Option<&'static str> {
    LEGACY_NAMES
        .iter()
        .find(|(legacy, _)| *legacy == name)
        .map(|(_, key)| *key)
}
