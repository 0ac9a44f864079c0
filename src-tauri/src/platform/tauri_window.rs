//! Tauri implementation of the note window platform
//!
//! Each note window is a frameless `WebviewWindow` labelled
//! `note-{instance}`. OS move / resize / destroy events are converted to
//! logical units and pushed into the window event pump. A close request is
//! held back until the note's pending edits are flushed.

use super::{
    NoteWindow, Screen, WindowEvent, WindowEventSender, WindowFactory, WindowInstance, WindowSpec,
};
use crate::app::AppState;
use crate::error::Result;
use crate::store::{Position, Size};
use serde::Serialize;
use std::sync::Arc;
use tauri::{
    AppHandle, Emitter, LogicalPosition, LogicalSize, Manager, WebviewUrl, WebviewWindow,
    WebviewWindowBuilder,
};

/// Payload of `note-collapse-state-changed`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct CollapseStateChanged<'a> {
    note_id: &'a str,
    is_collapsed: bool,
}

/// Payload of `window-opacity-changed`, addressed to one window label
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct OpacityChanged<'a> {
    window_label: &'a str,
    opacity: f64,
}

pub struct TauriNoteWindow {
    window: WebviewWindow,
}

impl TauriNoteWindow {
    pub fn new(window: WebviewWindow) -> Self {
        Self { window }
    }

    fn emit_self<S: Serialize + Clone>(&self, event: &str, payload: S) -> Result<()> {
        self.window.emit_to(self.window.label(), event, payload)?;
        Ok(())
    }
}

impl NoteWindow for TauriNoteWindow {
    fn set_position(&self, position: Position) -> Result<()> {
        self.window
            .set_position(LogicalPosition::new(position.x, position.y))?;
        Ok(())
    }

    fn set_size(&self, size: Size) -> Result<()> {
        self.window
            .set_size(LogicalSize::new(size.width, size.height))?;
        Ok(())
    }

    /// The webview has no native window alpha; the page applies it
    fn set_opacity(&self, opacity: f64) -> Result<()> {
        self.emit_self(
            "window-opacity-changed",
            OpacityChanged {
                window_label: self.window.label(),
                opacity,
            },
        )
    }

    fn set_always_on_top(&self, always_on_top: bool) -> Result<()> {
        self.window.set_always_on_top(always_on_top)?;
        Ok(())
    }

    fn show(&self) -> Result<()> {
        let _ = self.window.unminimize();
        self.window.show()?;
        Ok(())
    }

    fn focus(&self) -> Result<()> {
        self.window.set_focus()?;
        Ok(())
    }

    fn minimize(&self) -> Result<()> {
        self.window.minimize()?;
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.window.close()?;
        Ok(())
    }

    fn notify_collapse_state(&self, note_id: &str, collapsed: bool) -> Result<()> {
        self.emit_self(
            "note-collapse-state-changed",
            CollapseStateChanged {
                note_id,
                is_collapsed: collapsed,
            },
        )
    }
}

pub struct TauriWindowFactory {
    app: AppHandle,
    events: WindowEventSender,
}

impl TauriWindowFactory {
    pub fn new(app: AppHandle, events: WindowEventSender) -> Self {
        Self { app, events }
    }
}

impl WindowFactory for TauriWindowFactory {
    fn create(&self, spec: &WindowSpec) -> Result<Arc<dyn NoteWindow>> {
        let label = format!("note-{}", spec.instance);
        let url = format!("note.html?id={}", spec.note_id);
        tracing::debug!("Creating note window {} for note {}", label, spec.note_id);

        let builder = WebviewWindowBuilder::new(&self.app, &label, WebviewUrl::App(url.into()))
            .title("Markies")
            .position(spec.position.x, spec.position.y)
            .inner_size(spec.size.width, spec.size.height)
            .decorations(false)
            .resizable(true)
            .always_on_top(spec.always_on_top)
            .skip_taskbar(true);
        #[cfg(not(target_os = "macos"))]
        let builder = builder.transparent(true);

        let window = builder.build()?;
        forward_events(&window, spec.note_id.clone(), spec.instance, self.events.clone());

        Ok(Arc::new(TauriNoteWindow::new(window)))
    }
}

fn forward_events(
    window: &WebviewWindow,
    note_id: String,
    instance: WindowInstance,
    events: WindowEventSender,
) {
    let handle = window.clone();
    window.on_window_event(move |event| match event {
        tauri::WindowEvent::Moved(physical) => {
            let scale = handle.scale_factor().unwrap_or(1.0);
            let logical = physical.to_logical::<f64>(scale);
            events.send(
                &note_id,
                instance,
                WindowEvent::Moved(Position::new(logical.x, logical.y)),
            );
        }
        tauri::WindowEvent::Resized(physical) => {
            // Minimizing reports a zero size on Windows
            if physical.width == 0 || physical.height == 0 {
                return;
            }
            let scale = handle.scale_factor().unwrap_or(1.0);
            let logical = physical.to_logical::<f64>(scale);
            events.send(
                &note_id,
                instance,
                WindowEvent::Resized(Size::new(logical.width, logical.height)),
            );
        }
        tauri::WindowEvent::CloseRequested { api, .. } => {
            api.prevent_close();
            let window = handle.clone();
            let note_id = note_id.clone();
            tauri::async_runtime::spawn(async move {
                if let Some(state) = window.app_handle().try_state::<AppState>() {
                    state.notes.flush_editor(&note_id).await;
                }
                if let Err(e) = window.destroy() {
                    tracing::error!("Failed to destroy window for note {}: {}", note_id, e);
                }
            });
        }
        tauri::WindowEvent::Destroyed => {
            events.send(&note_id, instance, WindowEvent::Closed);
        }
        _ => {}
    });
}

pub struct TauriScreen {
    app: AppHandle,
}

impl TauriScreen {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }

    fn primary_scale(&self) -> f64 {
        self.app
            .primary_monitor()
            .ok()
            .flatten()
            .map(|m| m.scale_factor())
            .unwrap_or(1.0)
    }
}

impl Screen for TauriScreen {
    fn cursor_position(&self) -> Position {
        match self.app.cursor_position() {
            Ok(physical) => {
                let logical = physical.to_logical::<f64>(self.primary_scale());
                Position::new(logical.x, logical.y)
            }
            Err(e) => {
                tracing::warn!("Cursor position unavailable: {}", e);
                Position::new(0.0, 0.0)
            }
        }
    }

    fn primary_display_size(&self) -> Size {
        let monitor = self.app.primary_monitor().ok().flatten().or_else(|| {
            self.app
                .available_monitors()
                .ok()
                .and_then(|m| m.into_iter().next())
        });

        match monitor {
            Some(monitor) => {
                let logical = monitor.size().to_logical::<f64>(monitor.scale_factor());
                Size::new(logical.width, logical.height)
            }
            None => {
                tracing::warn!("No monitor found, assuming 1920x1080");
                Size::new(1920.0, 1080.0)
            }
        }
    }
}
