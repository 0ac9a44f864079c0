//! Tauri commands exposed to the frontend
//!
//! This module organizes commands into logical submodules:
//! - `notes`: note CRUD, collapse and bulk appearance
//! - `trash`: restore, permanent delete, empty
//! - `groups`: group CRUD
//! - `layouts`: save / restore snapshots, rearrange / reposition
//! - `settings`: application settings
//! - `windows`: note windows and the sender-scoped window channel
//! - `editor`: debounced content autosave

pub mod editor;
pub mod groups;
pub mod layouts;
pub mod notes;
pub mod settings;
pub mod trash;
pub mod windows;

use crate::app::AppState;
use crate::error::Result;
use tauri::{AppHandle, Emitter, State};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};

// Re-export all commands for convenient registration in main.rs
pub use editor::*;
pub use groups::*;
pub use layouts::*;
pub use notes::*;
pub use settings::*;
pub use trash::*;
pub use windows::*;

/// Tell every window the note list changed
pub(crate) fn notify_notes_changed(app: &AppHandle) {
    if let Err(e) = app.emit("notes-list-changed", ()) {
        tracing::warn!("Failed to emit notes-list-changed event: {}", e);
    }
}

/// Ask the user to confirm a destructive action
pub(crate) async fn confirm(app: &AppHandle, title: &str, message: &str) -> bool {
    let (tx, rx) = tokio::sync::oneshot::channel();
    app.dialog()
        .message(message)
        .title(title)
        .kind(MessageDialogKind::Warning)
        .buttons(MessageDialogButtons::OkCancel)
        .show(move |confirmed| {
            let _ = tx.send(confirmed);
        });

    rx.await.unwrap_or(false)
}

/// Get application information
#[tauri::command]
pub async fn get_app_info(state: State<'_, AppState>) -> Result<AppInfo> {
    Ok(AppInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        app_data_dir: state.app_data_dir.to_string_lossy().to_string(),
    })
}

/// Application information structure
#[derive(serde::Serialize)]
pub struct AppInfo {
    pub version: String,
    pub app_data_dir: String,
}
