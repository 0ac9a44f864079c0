//! Settings service
//!
//! Creation-time defaults and editor behavior, stored in the `settings`
//! entry of the document. Changes bypass the autosave debounce.

use crate::config;
use crate::error::{AppError, Result};
use crate::store::{clamp_opacity, DocumentStore, Settings, SettingsEntry, SettingsPatch};

#[derive(Clone)]
pub struct SettingsService {
    store: DocumentStore,
}

impl SettingsService {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub async fn get_settings(&self) -> Settings {
        self.store.get::<SettingsEntry>().await
    }

    /// Merge `patch`, clamping the default opacity and autosave delay into
    /// range. A new delay applies to editor sessions opened afterwards.
    pub async fn update_settings(&self, patch: SettingsPatch) -> Result<Settings> {
        if let Some(color) = &patch.default_background_color {
            if color.trim().is_empty() {
                return Err(AppError::InvalidPatch(
                    "default background color must not be empty".to_string(),
                ));
            }
        }

        let updated = self
            .store
            .update::<SettingsEntry, _, _>(|settings| {
                if let Some(color) = &patch.default_background_color {
                    settings.default_background_color = color.clone();
                }
                if let Some(opacity) = patch.default_opacity {
                    settings.default_opacity = clamp_opacity(opacity);
                }
                if let Some(on_top) = patch.default_always_on_top {
                    settings.default_always_on_top = on_top;
                }
                if let Some(delay) = patch.auto_save_delay_ms {
                    settings.auto_save_delay_ms = delay.clamp(
                        config::MIN_AUTO_SAVE_DELAY_MS,
                        config::MAX_AUTO_SAVE_DELAY_MS,
                    );
                }
                Some(settings.clone())
            })
            .await?;

        let settings = match updated {
            Some(settings) => settings,
            None => self.get_settings().await,
        };
        tracing::info!("Settings updated");
        Ok(settings)
    }
}
