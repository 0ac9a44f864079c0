//! Editor autosave commands
//!
//! Content edits are debounced per note; appearance changes go through
//! `update_note` directly.

use crate::app::AppState;
use crate::error::Result;
use tauri::State;

/// Feed an edit into the note's autosave debouncer
#[tauri::command]
pub async fn note_content_changed(
    state: State<'_, AppState>,
    id: String,
    content: String,
) -> Result<()> {
    state.notes.content_changed(&id, content).await;
    Ok(())
}

/// Save the note's pending content now
#[tauri::command]
pub async fn flush_note(state: State<'_, AppState>, id: String) -> Result<bool> {
    Ok(state.notes.flush_editor(&id).await)
}
