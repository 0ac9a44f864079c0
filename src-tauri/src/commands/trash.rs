//! Trash commands

use super::{confirm, notify_notes_changed};
use crate::app::AppState;
use crate::error::Result;
use crate::store::TrashItem;
use tauri::{AppHandle, State};

#[tauri::command]
pub async fn list_trash(state: State<'_, AppState>) -> Result<Vec<TrashItem>> {
    Ok(state.notes.list_trash().await)
}

/// Restore a trashed note and reopen its window
#[tauri::command]
pub async fn restore_note(
    app: AppHandle,
    state: State<'_, AppState>,
    trash_id: String,
) -> Result<bool> {
    let restored = state.notes.restore_note(&trash_id).await?;
    if restored {
        notify_notes_changed(&app);
    }
    Ok(restored)
}

#[tauri::command]
pub async fn permanently_delete_note(state: State<'_, AppState>, trash_id: String) -> Result<bool> {
    state.notes.permanently_delete_note(&trash_id).await
}

/// Empty the trash after the user confirms
#[tauri::command]
pub async fn empty_trash(app: AppHandle, state: State<'_, AppState>) -> Result<bool> {
    let count = state.notes.list_trash().await.len();
    if count == 0 {
        return Ok(true);
    }

    let message = format!("Permanently delete {} notes? This cannot be undone.", count);
    if !confirm(&app, "Empty Trash", &message).await {
        tracing::info!("Empty trash cancelled");
        return Ok(false);
    }

    state.notes.empty_trash().await
}
