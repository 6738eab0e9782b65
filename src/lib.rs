//! # guishop-editor
//!
//! Backend for a browser-based configuration editor for a Minecraft
//! server shop plugin. An authenticated admin edits YAML-backed shop
//! definitions, a main menu, and purchase/sell transaction menus; this
//! service owns the documents, the audit trail, and the save pipeline.
//! The browser UI is a thin client over the REST surface.
//!
//! The YAML layer is deliberately hand-rolled: the plugin's files use a
//! restricted, positionally parsed subset, and compatibility with the
//! files the plugin itself accepts (stray lines skipped, exact-column
//! structure) matters more than YAML-spec coverage.
//!
//! ## Architecture
//!
//! ```text
//! Browser UI (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── EditorService (service/)
//!     │     ├── ActivityLog + UnsavedChanges
//!     │     └── SaveCoordinator + AutosaveTimer
//!     │
//!     ├── EditorWorkspace (domain/)
//!     ├── YAML micro-parser/serializer (yaml/)
//!     │
//!     ├── ConfigFileStore (YAML files on disk)
//!     └── ActivityStore (SQLite)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod yaml;
