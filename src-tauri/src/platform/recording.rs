//! Recording fakes
//!
//! A windowing "platform" that builds no real windows: every call made on a
//! handle is appended to a log the tests can inspect.

use super::{NoteWindow, Screen, WindowFactory, WindowSpec};
use crate::error::Result;
use crate::store::{Position, Size};
use std::sync::{Arc, Mutex};

/// One call made on a `RecordingWindow`
#[derive(Debug, Clone, PartialEq)]
pub enum WindowCall {
    SetPosition(Position),
    SetSize(Size),
    SetOpacity(f64),
    SetAlwaysOnTop(bool),
    Show,
    Focus,
    Minimize,
    Close,
    CollapseNotified(bool),
}

#[derive(Default)]
pub struct RecordingWindow {
    spec: Option<WindowSpec>,
    calls: Mutex<Vec<WindowCall>>,
}

impl RecordingWindow {
    pub fn new(spec: WindowSpec) -> Self {
        Self {
            spec: Some(spec),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// What this window was built from
    pub fn spec(&self) -> Option<&WindowSpec> {
        self.spec.as_ref()
    }

    pub fn calls(&self) -> Vec<WindowCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Size after the most recent resize, or the creation size
    pub fn current_size(&self) -> Option<Size> {
        self.calls()
            .iter()
            .rev()
            .find_map(|call| match call {
                WindowCall::SetSize(size) => Some(*size),
                _ => None,
            })
            .or_else(|| self.spec.as_ref().map(|s| s.size))
    }

    /// Position after the most recent move, or the creation position
    pub fn current_position(&self) -> Option<Position> {
        self.calls()
            .iter()
            .rev()
            .find_map(|call| match call {
                WindowCall::SetPosition(position) => Some(*position),
                _ => None,
            })
            .or_else(|| self.spec.as_ref().map(|s| s.position))
    }

    pub fn was_closed(&self) -> bool {
        self.calls().contains(&WindowCall::Close)
    }

    fn record(&self, call: WindowCall) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        Ok(())
    }
}

impl NoteWindow for RecordingWindow {
    fn set_position(&self, position: Position) -> Result<()> {
        self.record(WindowCall::SetPosition(position))
    }

    fn set_size(&self, size: Size) -> Result<()> {
        self.record(WindowCall::SetSize(size))
    }

    fn set_opacity(&self, opacity: f64) -> Result<()> {
        self.record(WindowCall::SetOpacity(opacity))
    }

    fn set_always_on_top(&self, always_on_top: bool) -> Result<()> {
        self.record(WindowCall::SetAlwaysOnTop(always_on_top))
    }

    fn show(&self) -> Result<()> {
        self.record(WindowCall::Show)
    }

    fn focus(&self) -> Result<()> {
        self.record(WindowCall::Focus)
    }

    fn minimize(&self) -> Result<()> {
        self.record(WindowCall::Minimize)
    }

    fn close(&self) -> Result<()> {
        self.record(WindowCall::Close)
    }

    fn notify_collapse_state(&self, _note_id: &str, collapsed: bool) -> Result<()> {
        self.record(WindowCall::CollapseNotified(collapsed))
    }
}

/// Factory that hands out `RecordingWindow`s and remembers all of them
#[derive(Default)]
pub struct RecordingWindowFactory {
    created: Mutex<Vec<Arc<RecordingWindow>>>,
}

impl RecordingWindowFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> Vec<Arc<RecordingWindow>> {
        self.created.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Every window ever built for `note_id`, oldest first
    pub fn windows_for(&self, note_id: &str) -> Vec<Arc<RecordingWindow>> {
        self.created()
            .into_iter()
            .filter(|w| w.spec().is_some_and(|s| s.note_id == note_id))
            .collect()
    }

    pub fn latest(&self, note_id: &str) -> Option<Arc<RecordingWindow>> {
        self.windows_for(note_id).pop()
    }
}

impl WindowFactory for RecordingWindowFactory {
    fn create(&self, spec: &WindowSpec) -> Result<Arc<dyn NoteWindow>> {
        let window = Arc::new(RecordingWindow::new(spec.clone()));
        if let Ok(mut created) = self.created.lock() {
            created.push(window.clone());
        }
        Ok(window)
    }
}

/// Screen with a fixed cursor and display size
#[derive(Debug, Clone, Copy)]
pub struct FixedScreen {
    pub cursor: Position,
    pub display: Size,
}

impl Default for FixedScreen {
    fn default() -> Self {
        Self {
            cursor: Position::new(100.0, 100.0),
            display: Size::new(1920.0, 1080.0),
        }
    }
}

impl Screen for FixedScreen {
    fn cursor_position(&self) -> Position {
        self.cursor
    }

    fn primary_display_size(&self) -> Size {
        self.display
    }
}
