//! Item list persistence: a JSON file on disk. Failures in either
//! direction are logged and swallowed; the wheel keeps running on
//! whatever is in memory.

use std::fs;
use std::path::PathBuf;

use log::{debug, warn};

use crate::layout::Item;

pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads the saved item list, or `None` when the file is missing,
    /// unreadable, malformed or empty. Never an error for the caller.
    pub fn load(&self) -> Option<Vec<Item>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) => {
                debug!("no saved items at {:?}: {err}", self.path);
                return None;
            }
        };
        match serde_json::from_str::<Vec<Item>>(&text) {
            Ok(items) if !items.is_empty() => Some(items),
            Ok(_) => None,
            Err(err) => {
                warn!("ignoring malformed saved items at {:?}: {err}", self.path);
                None
            }
        }
    }

    /// Saves the item list; write failures are logged and swallowed.
    pub fn save(&self, items: &[Item]) {
        let json = match serde_json::to_string_pretty(items) {
            Ok(json) => json,
            Err(err) => {
                warn!("failed to serialize items: {err}");
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, json) {
            warn!("failed to save items to {:?}: {err}", self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(tag: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("spinwheel-{tag}-{}.json", std::process::id()));
        path
    }

    #[test]
    fn round_trips_items() {
        let path = temp_path("roundtrip");
        let storage = Storage::new(&path);
        let items = vec![
            Item::new("Alice", Some(2.0), "#FF6B6B"),
            Item::new("Bob", None, "teal"),
        ];
        storage.save(&items);
        assert_eq!(storage.load(), Some(items));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_loads_nothing() {
        let storage = Storage::new(temp_path("missing-never-written"));
        assert_eq!(storage.load(), None);
    }

    #[test]
    fn malformed_and_empty_files_load_nothing() {
        let path = temp_path("malformed");
        fs::write(&path, "not json at all").unwrap();
        assert_eq!(Storage::new(&path).load(), None);
        fs::write(&path, "[]").unwrap();
        assert_eq!(Storage::new(&path).load(), None);
        let _ = fs::remove_file(&path);
    }
}
