//! Window management commands
//!
//! Note windows by id, the dashboard, and the channel through which a note
//! window acts on itself without naming its note.

use crate::app::AppState;
use crate::error::Result;
use crate::platform::TauriNoteWindow;
use tauri::{AppHandle, Manager, State, WebviewWindow};

const DASHBOARD_LABEL: &str = "dashboard";

/// Show and focus a note's window, creating it if needed
#[tauri::command]
pub async fn open_note_window(state: State<'_, AppState>, note_id: String) -> Result<bool> {
    state.notes.open_window(&note_id).await
}

/// Collapse a note to its title bar or expand it back
#[tauri::command]
pub async fn toggle_window_collapse(
    state: State<'_, AppState>,
    note_id: String,
    is_collapsed: bool,
) -> Result<bool> {
    state.notes.toggle_collapse(&note_id, is_collapsed).await
}

/// Set the calling window's opacity. Returns the clamped value applied.
#[tauri::command]
pub fn set_window_opacity(window: WebviewWindow, state: State<'_, AppState>, opacity: f64) -> f64 {
    let handle = TauriNoteWindow::new(window);
    state.notes.set_sender_opacity(&handle, opacity)
}

#[tauri::command]
pub fn close_window(window: WebviewWindow, state: State<'_, AppState>) {
    state.notes.close_sender(&TauriNoteWindow::new(window));
}

#[tauri::command]
pub fn minimize_window(window: WebviewWindow, state: State<'_, AppState>) {
    state.notes.minimize_sender(&TauriNoteWindow::new(window));
}

#[tauri::command]
pub fn show_dashboard(app: AppHandle) -> Result<()> {
    match app.get_webview_window(DASHBOARD_LABEL) {
        Some(window) => {
            let _ = window.unminimize();
            window.show()?;
            window.set_focus()?;
        }
        None => tracing::warn!("Dashboard window not found"),
    }
    Ok(())
}

#[tauri::command]
pub fn close_dashboard(app: AppHandle) -> Result<()> {
    if let Some(window) = app.get_webview_window(DASHBOARD_LABEL) {
        window.hide()?;
    }
    Ok(())
}
