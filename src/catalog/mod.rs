pub mod types;
pub mod builtin;
pub mod rules;
pub mod classifier;
pub mod migration;
pub mod storage;
pub mod store;
pub mod grouping;

// Re-export commonly used items
pub use types::{AppEntry, Category, CategoryId, OverrideMap};
pub use builtin::{BUILTIN_CATEGORIES, DEFAULT_ICON, default_categories};
pub use classifier::Classifier;
pub use rules::{KEYWORD_RULES, KeywordRule};
pub use migration::{CURRENT_SCHEMA_VERSION, MigrationOutcome};
pub use storage::{FileStore, KeyValueStore, MemoryStore, get_data_dir};
pub use store::CategoryStore;
pub use grouping::{CategoryGroup, group_by_category};
