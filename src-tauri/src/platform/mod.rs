//! Platform abstraction for note windows
//!
//! The lifecycle services never talk to a windowing system directly. They
//! drive `NoteWindow` handles created by a `WindowFactory`, ask a `Screen`
//! for cursor and display geometry, and receive `WindowEvent`s through the
//! event pump in `events`.
//!
//! - `registry`: note id -> live window handle
//! - `events`: ordered delivery of moved / resized / closed events
//! - `recording`: in-process fake that records every call, for tests
//! - `tauri_window`: the Tauri implementation (feature `desktop`)

pub mod events;
pub mod recording;
pub mod registry;
#[cfg(feature = "desktop")]
pub mod tauri_window;

pub use events::{NoteWindowEvent, WindowEventReceiver, WindowEventSender};
pub use registry::{WindowInstance, WindowRegistry};
#[cfg(feature = "desktop")]
pub use tauri_window::{TauriNoteWindow, TauriScreen, TauriWindowFactory};

use crate::error::Result;
use crate::store::{Position, Size};
use std::sync::Arc;

/// A live note window
pub trait NoteWindow: Send + Sync {
    fn set_position(&self, position: Position) -> Result<()>;
    fn set_size(&self, size: Size) -> Result<()>;
    fn set_opacity(&self, opacity: f64) -> Result<()>;
    fn set_always_on_top(&self, always_on_top: bool) -> Result<()>;
    fn show(&self) -> Result<()>;
    fn focus(&self) -> Result<()>;
    fn minimize(&self) -> Result<()>;
    /// Request teardown. The platform reports `WindowEvent::Closed` once the
    /// window is gone.
    fn close(&self) -> Result<()>;
    /// Push the collapse state to the editor running inside the window
    fn notify_collapse_state(&self, note_id: &str, collapsed: bool) -> Result<()>;
}

/// Everything needed to build a note window
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    pub note_id: String,
    pub instance: WindowInstance,
    pub position: Position,
    /// Already reduced to the title bar height when the note is collapsed
    pub size: Size,
    pub opacity: f64,
    pub always_on_top: bool,
    pub collapsed: bool,
}

/// Builds note windows
pub trait WindowFactory: Send + Sync {
    fn create(&self, spec: &WindowSpec) -> Result<Arc<dyn NoteWindow>>;
}

/// Cursor and display geometry used to place new notes
pub trait Screen: Send + Sync {
    fn cursor_position(&self) -> Position;
    fn primary_display_size(&self) -> Size;
}

/// Events a note window reports back
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEvent {
    Moved(Position),
    Resized(Size),
    Closed,
}
