//! Settings commands

use crate::app::AppState;
use crate::error::Result;
use crate::store::{Settings, SettingsPatch};
use tauri::State;

#[tauri::command]
pub async fn get_settings(state: State<'_, AppState>) -> Result<Settings> {
    Ok(state.settings.get_settings().await)
}

#[tauri::command]
pub async fn update_settings(state: State<'_, AppState>, updates: SettingsPatch) -> Result<Settings> {
    state.settings.update_settings(updates).await
}
