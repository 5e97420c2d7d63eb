//! Application categorization core for a desktop launcher.
//!
//! [`catalog`] decides which category each installed application belongs to,
//! keeps user overrides, and persists both across restarts with schema
//! migrations. [`watcher`] reports changes to the application directories,
//! [`scanner`] enumerates installed apps and [`hotkey`] renders shortcuts.

pub mod catalog;
pub mod hotkey;
pub mod scanner;
pub mod settings;
pub mod watcher;

pub use catalog::{
    AppEntry, Category, CategoryGroup, CategoryId, CategoryStore, Classifier, FileStore,
    KeyValueStore, MemoryStore, group_by_category,
};
pub use scanner::{AppSource, DirectoryScanner};
pub use settings::LauncherSettings;
pub use watcher::DirectoryWatcher;
