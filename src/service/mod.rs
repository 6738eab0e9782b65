//! Service layer: session orchestration and the save pipeline.
//!
//! [`EditorService`] coordinates every mutation: workspace validation,
//! activity recording, log persistence, the unsaved-change queue, and
//! the debounced auto-save through [`autosave::SaveCoordinator`].

pub mod activity_log;
pub mod autosave;
pub mod changes;
pub mod editor;

pub use activity_log::{ACTIVITY_LOG_CAPACITY, ActivityLog};
pub use autosave::{AutosaveTimer, SaveCoordinator, SaveOutcome};
pub use changes::{UnsavedChange, UnsavedChanges};
pub use editor::EditorService;
