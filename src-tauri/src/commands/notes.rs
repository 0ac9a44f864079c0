//! Note-related commands
//!
//! CRUD, collapse and bulk appearance operations for notes.

use super::notify_notes_changed;
use crate::app::AppState;
use crate::error::Result;
use crate::store::{NewNote, Note, NotePatch};
use tauri::{AppHandle, State};

/// List all live notes
#[tauri::command]
pub async fn list_notes(state: State<'_, AppState>) -> Result<Vec<Note>> {
    Ok(state.notes.list_notes().await)
}

/// Get a note by ID
#[tauri::command]
pub async fn get_note(state: State<'_, AppState>, id: String) -> Result<Option<Note>> {
    Ok(state.notes.get_note(&id).await)
}

/// Create a note at the cursor without opening it
#[tauri::command]
pub async fn create_note(
    app: AppHandle,
    state: State<'_, AppState>,
    note: Option<NewNote>,
) -> Result<Note> {
    let note = state.notes.create_note(note.unwrap_or_default()).await?;
    notify_notes_changed(&app);
    Ok(note)
}

/// Create a note and open it in a floating window
#[tauri::command]
pub async fn create_new_sticky_note(app: AppHandle, state: State<'_, AppState>) -> Result<Note> {
    tracing::info!("Creating new sticky note");
    let note = state.notes.create_and_open_note(NewNote::default()).await?;
    notify_notes_changed(&app);
    Ok(note)
}

/// Update a note
#[tauri::command]
pub async fn update_note(
    app: AppHandle,
    state: State<'_, AppState>,
    id: String,
    updates: NotePatch,
) -> Result<Option<Note>> {
    let note = state.notes.update_note(&id, updates).await?;
    if note.is_some() {
        notify_notes_changed(&app);
    }
    Ok(note)
}

/// Move a note to the trash and close its window
#[tauri::command]
pub async fn delete_note(app: AppHandle, state: State<'_, AppState>, id: String) -> Result<bool> {
    let deleted = state.notes.delete_note(&id).await?;
    if deleted {
        notify_notes_changed(&app);
    }
    Ok(deleted)
}

#[tauri::command]
pub async fn expand_all_notes(state: State<'_, AppState>) -> Result<usize> {
    state.notes.expand_all().await
}

#[tauri::command]
pub async fn collapse_all_notes(state: State<'_, AppState>) -> Result<usize> {
    state.notes.collapse_all().await
}

/// Make every note fully opaque
#[tauri::command]
pub async fn reset_all_opacity(app: AppHandle, state: State<'_, AppState>) -> Result<bool> {
    let reset = state.notes.reset_all_opacity().await?;
    notify_notes_changed(&app);
    Ok(reset)
}

#[tauri::command]
pub async fn toggle_always_on_top(
    state: State<'_, AppState>,
    id: String,
) -> Result<Option<Note>> {
    state.notes.toggle_always_on_top(&id).await
}

#[tauri::command]
pub async fn toggle_opacity(state: State<'_, AppState>, id: String) -> Result<Option<Note>> {
    state.notes.toggle_opacity(&id).await
}
