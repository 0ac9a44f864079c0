//! Group-related commands

use super::{confirm, notify_notes_changed};
use crate::app::AppState;
use crate::error::Result;
use crate::store::{Group, GroupPatch, NewGroup};
use tauri::{AppHandle, State};

#[tauri::command]
pub async fn list_groups(state: State<'_, AppState>) -> Result<Vec<Group>> {
    Ok(state.groups.list_groups().await)
}

#[tauri::command]
pub async fn create_group(state: State<'_, AppState>, group: Option<NewGroup>) -> Result<Group> {
    state.groups.create_group(group.unwrap_or_default()).await
}

#[tauri::command]
pub async fn update_group(
    state: State<'_, AppState>,
    id: String,
    updates: GroupPatch,
) -> Result<Option<Group>> {
    state.groups.update_group(&id, updates).await
}

/// Delete a group; its notes are kept and ungrouped
#[tauri::command]
pub async fn delete_group(app: AppHandle, state: State<'_, AppState>, id: String) -> Result<bool> {
    let deleted = state.groups.delete_group(&id).await?;
    if deleted {
        notify_notes_changed(&app);
    }
    Ok(deleted)
}

/// Move every note of a group to the trash after the user confirms
#[tauri::command]
pub async fn delete_all_notes_in_group(
    app: AppHandle,
    state: State<'_, AppState>,
    id: String,
) -> Result<bool> {
    let Some(group) = state.groups.list_groups().await.into_iter().find(|g| g.id == id) else {
        return Ok(false);
    };

    let message = format!("Move all notes in \"{}\" to the trash?", group.name);
    if !confirm(&app, "Delete Notes", &message).await {
        tracing::info!("Delete notes in group {} cancelled", id);
        return Ok(false);
    }

    let deleted = state.groups.delete_all_notes_in_group(&id).await?;
    notify_notes_changed(&app);
    Ok(deleted)
}
