//! Services module
//!
//! Business logic that coordinates the document store, the window registry
//! and the live note windows. Commands are thin wrappers over these.

pub mod arrange;
pub mod autosave;
pub mod groups;
pub mod layouts;
pub mod notes;
pub mod placement;
pub mod settings;

pub use arrange::ArrangeService;
pub use autosave::{Debouncer, EditorSessions};
pub use groups::GroupsService;
pub use layouts::LayoutService;
pub use notes::NotesService;
pub use settings::SettingsService;
