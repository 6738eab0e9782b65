//! YAML file store rooted at the plugin's configuration directory.
//!
//! Layout: shop documents under `shops/<stem>.yml`, the split menu files
//! `menu.yml`, `purchase.yml` and `sell.yml` at the root, and optionally
//! the deprecated combined `gui.yml`. All I/O is `tokio::fs`; the store
//! holds no state beyond the root path.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::EditorError;

/// Relative path of the split main-menu file.
pub const MAIN_MENU_FILE: &str = "menu.yml";
/// Relative path of the split purchase-menu file.
pub const PURCHASE_MENU_FILE: &str = "purchase.yml";
/// Relative path of the split sell-menu file.
pub const SELL_MENU_FILE: &str = "sell.yml";
/// Relative path of the deprecated combined menu file.
pub const LEGACY_GUI_FILE: &str = "gui.yml";

/// Everything the initial load pulls from disk.
#[derive(Debug, Default)]
pub struct LoadedFiles {
    /// Raw shop YAML keyed by file stem.
    pub shops: HashMap<String, String>,
    /// Raw `menu.yml`, when present.
    pub main_menu: Option<String>,
    /// Raw `purchase.yml`, when present.
    pub purchase_menu: Option<String>,
    /// Raw `sell.yml`, when present.
    pub sell_menu: Option<String>,
    /// Raw legacy `gui.yml`, when present.
    pub legacy_gui: Option<String>,
}

/// Async file store for the plugin configuration directory.
#[derive(Debug, Clone)]
pub struct ConfigFileStore {
    root: PathBuf,
}

impl ConfigFileStore {
    /// Creates a store rooted at `root`. The directory need not exist yet;
    /// it is created on the first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The configuration root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Relative path of a shop file for the given stem.
    #[must_use]
    pub fn shop_path(stem: &str) -> String {
        format!("shops/{stem}.yml")
    }

    /// Reads every known configuration file.
    ///
    /// A missing `shops/` directory yields an empty shop map (fresh
    /// install); unreadable individual files are skipped with a warning
    /// rather than failing the whole load.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PersistenceError`] only on directory-level
    /// I/O failures.
    pub async fn load_all(&self) -> Result<LoadedFiles, EditorError> {
        let mut loaded = LoadedFiles {
            shops: self.load_shops().await?,
            ..LoadedFiles::default()
        };
        loaded.main_menu = self.read_optional(MAIN_MENU_FILE).await?;
        loaded.purchase_menu = self.read_optional(PURCHASE_MENU_FILE).await?;
        loaded.sell_menu = self.read_optional(SELL_MENU_FILE).await?;
        loaded.legacy_gui = self.read_optional(LEGACY_GUI_FILE).await?;
        tracing::info!(
            shops = loaded.shops.len(),
            split_menus = loaded.main_menu.is_some(),
            legacy = loaded.legacy_gui.is_some(),
            "configuration files loaded"
        );
        Ok(loaded)
    }

    async fn load_shops(&self) -> Result<HashMap<String, String>, EditorError> {
        let dir = self.root.join("shops");
        let mut shops = HashMap::new();
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(dir = %dir.display(), "shops directory does not exist");
                return Ok(shops);
            }
            Err(e) => return Err(EditorError::PersistenceError(e.to_string())),
        };
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| EditorError::PersistenceError(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("yml") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => {
                    shops.insert(stem.to_string(), text);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable shop file");
                }
            }
        }
        Ok(shops)
    }

    async fn read_optional(&self, rel_path: &str) -> Result<Option<String>, EditorError> {
        match tokio::fs::read_to_string(self.root.join(rel_path)).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(EditorError::PersistenceError(e.to_string())),
        }
    }

    /// Writes a file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PersistenceError`] on I/O failure.
    pub async fn save(&self, rel_path: &str, text: &str) -> Result<(), EditorError> {
        let path = self.root.join(rel_path);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| EditorError::PersistenceError(e.to_string()))?;
        }
        tokio::fs::write(&path, text)
            .await
            .map_err(|e| EditorError::PersistenceError(e.to_string()))?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "file written");
        Ok(())
    }

    /// Deletes a file. Deleting a file that is already gone succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PersistenceError`] on I/O failure.
    pub async fn delete(&self, rel_path: &str) -> Result<(), EditorError> {
        match tokio::fs::remove_file(self.root.join(rel_path)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(EditorError::PersistenceError(e.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, ConfigFileStore) {
        let Ok(dir) = TempDir::new() else {
            panic!("tempdir creation failed");
        };
        let store = ConfigFileStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn load_all_on_empty_root_yields_defaults() {
        let (_dir, store) = store();
        let Ok(loaded) = store.load_all().await else {
            panic!("load failed");
        };
        assert!(loaded.shops.is_empty());
        assert!(loaded.main_menu.is_none());
        assert!(loaded.legacy_gui.is_none());
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let (_dir, store) = store();
        let Ok(()) = store
            .save(&ConfigFileStore::shop_path("blocks"), "gui-name: '&8Blocks'\n")
            .await
        else {
            panic!("save failed");
        };
        let Ok(()) = store.save(MAIN_MENU_FILE, "title: '&8Shop'\n").await else {
            panic!("save failed");
        };

        let Ok(loaded) = store.load_all().await else {
            panic!("load failed");
        };
        assert_eq!(
            loaded.shops.get("blocks").map(String::as_str),
            Some("gui-name: '&8Blocks'\n")
        );
        assert_eq!(loaded.main_menu.as_deref(), Some("title: '&8Shop'\n"));
    }

    #[tokio::test]
    async fn non_yml_files_in_shops_dir_are_ignored() {
        let (_dir, store) = store();
        let Ok(()) = store.save("shops/readme.txt", "not yaml").await else {
            panic!("save failed");
        };
        let Ok(loaded) = store.load_all().await else {
            panic!("load failed");
        };
        assert!(loaded.shops.is_empty());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (_dir, store) = store();
        let rel = ConfigFileStore::shop_path("blocks");
        let Ok(()) = store.save(&rel, "rows: 3\n").await else {
            panic!("save failed");
        };
        assert!(store.delete(&rel).await.is_ok());
        assert!(store.delete(&rel).await.is_ok());
    }
}
