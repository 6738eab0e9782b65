//! Persistence layer: YAML files on disk and the SQLite activity store.
//!
//! [`files::ConfigFileStore`] owns the plugin's configuration directory
//! (`shops/*.yml`, the menu files, the legacy `gui.yml`).
//! [`sqlite::ActivityStore`] keeps the bounded activity log durable across
//! editor restarts, independently of the documents it describes.

pub mod files;
pub mod models;
pub mod sqlite;

pub use files::{ConfigFileStore, LoadedFiles};
pub use sqlite::ActivityStore;
