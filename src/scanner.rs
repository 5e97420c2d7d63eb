//! Enumeration of installed applications.

use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::AppEntry;

const APP_SUFFIX: &str = ".app";

/// Supplies the list of installed applications
pub trait AppSource {
    fn scan_applications(&self) -> Vec<AppEntry>;
}

/// The standard macOS application directories
pub fn default_app_directories() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from("/Applications"),
        PathBuf::from("/System/Applications"),
        PathBuf::from("/System/Applications/Utilities"),
    ];
    if let Ok(home) = std::env::var("HOME") {
        dirs.push(PathBuf::from(home).join("Applications"));
    }
    dirs
}

/// Lists `*.app` bundles directly inside a set of directories
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    directories: Vec<PathBuf>,
}

impl Default for DirectoryScanner {
    fn default() -> Self {
        Self::new(default_app_directories())
    }
}

impl DirectoryScanner {
    pub fn new(directories: Vec<PathBuf>) -> Self {
        Self { directories }
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }
}

impl AppSource for DirectoryScanner {
    /// Unreadable directories are skipped. Results are sorted by name,
    /// ignoring case.
    fn scan_applications(&self) -> Vec<AppEntry> {
        let mut apps: Vec<AppEntry> = self
            .directories
            .iter()
            .flat_map(|dir| scan_directory(dir))
            .collect();

        apps.sort_by_cached_key(|app| app.name.to_lowercase());
        log::debug!("Scanned {} applications", apps.len());
        apps
    }
}

fn scan_directory(dir: &Path) -> Vec<AppEntry> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("Skipping {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let file_name = entry.file_name().to_string_lossy().to_string();
            let name = file_name.strip_suffix(APP_SUFFIX)?;
            if name.is_empty() {
                return None;
            }
            let path = entry.path();
            Some(AppEntry::new(name, &path.to_string_lossy()))
        })
        .collect()
}
