//! Layout and arrangement commands

use super::notify_notes_changed;
use crate::app::AppState;
use crate::error::Result;
use crate::store::Layout;
use tauri::{AppHandle, State};

#[tauri::command]
pub async fn list_layouts(state: State<'_, AppState>) -> Result<Vec<Layout>> {
    Ok(state.layouts.list_layouts().await)
}

#[tauri::command]
pub async fn save_layout(state: State<'_, AppState>, name: String) -> Result<Layout> {
    tracing::info!("Saving layout: {}", name);
    state.layouts.save_layout(&name).await
}

/// Replace all notes and groups with a saved layout
#[tauri::command]
pub async fn restore_layout(app: AppHandle, state: State<'_, AppState>, id: String) -> Result<bool> {
    let restored = state.layouts.restore_layout(&id).await?;
    if restored {
        notify_notes_changed(&app);
    }
    Ok(restored)
}

#[tauri::command]
pub async fn rearrange_notes(state: State<'_, AppState>) -> Result<usize> {
    state.arrange.rearrange().await
}

#[tauri::command]
pub async fn reposition_notes(state: State<'_, AppState>) -> Result<usize> {
    state.arrange.reposition().await
}
