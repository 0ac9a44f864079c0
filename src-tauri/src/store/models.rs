//! Store models
//!
//! Rust structs representing the persisted records.
//! All models use serde with camelCase keys and millisecond timestamps so the
//! frontend and the document on disk share one shape.

use crate::config;
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Screen coordinates of a window's top-left corner, in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Window dimensions in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(config::NOTE_DEFAULT_WIDTH, config::NOTE_DEFAULT_HEIGHT)
    }
}

/// Whether an opacity is inside the range a note window accepts
pub fn is_valid_opacity(opacity: f64) -> bool {
    (config::MIN_OPACITY..=config::MAX_OPACITY).contains(&opacity)
}

/// Clamp an opacity into the accepted range. Non-finite input becomes opaque.
pub fn clamp_opacity(opacity: f64) -> f64 {
    if opacity.is_finite() {
        opacity.clamp(config::MIN_OPACITY, config::MAX_OPACITY)
    } else {
        config::MAX_OPACITY
    }
}

/// A sticky note, persisted and shown in its own window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    /// Rich-text markup produced by the editor surface
    pub content: String,
    pub background_color: String,
    pub opacity: f64,
    /// Kept for compatibility with stored documents; never enabled.
    #[serde(default)]
    pub click_through: bool,
    pub always_on_top: bool,
    pub position: Position,
    pub size: Size,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_collapsed: bool,
    /// Tracks whether a live window exists for this note
    #[serde(default)]
    pub is_visible: bool,
}

impl Note {
    /// Size the window should have right now, honouring the collapsed state
    pub fn window_size(&self) -> Size {
        if self.is_collapsed {
            Size::new(self.size.width, config::COLLAPSED_HEIGHT)
        } else {
            self.size
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Named, colored tag that partitions notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub color: String,
    /// Informational only; membership is `Note::group_id`
    #[serde(default)]
    pub note_ids: Vec<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// Immutable snapshot of every note and group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub id: String,
    pub name: String,
    pub notes: Vec<Note>,
    pub groups: Vec<Group>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// Soft-deleted note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashItem {
    pub id: String,
    pub data: Note,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub deleted_at: DateTime<Utc>,
}

/// Creation-time defaults and editor behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_background_color")]
    pub default_background_color: String,
    #[serde(default = "default_opacity")]
    pub default_opacity: f64,
    #[serde(default = "default_always_on_top")]
    pub default_always_on_top: bool,
    /// Debounce delay for editor content saves
    #[serde(default = "default_auto_save_delay")]
    pub auto_save_delay_ms: u32,
}

fn default_background_color() -> String {
    config::DEFAULT_BACKGROUND_COLOR.to_string()
}

fn default_opacity() -> f64 {
    config::DEFAULT_OPACITY
}

fn default_always_on_top() -> bool {
    config::DEFAULT_ALWAYS_ON_TOP
}

fn default_auto_save_delay() -> u32 {
    config::DEFAULT_AUTO_SAVE_DELAY_MS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_background_color: default_background_color(),
            default_opacity: default_opacity(),
            default_always_on_top: default_always_on_top(),
            auto_save_delay_ms: default_auto_save_delay(),
        }
    }
}

/// Distinguishes an absent field from an explicit `null`.
fn double_option<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Create note request. Omitted fields fall back to settings defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewNote {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub always_on_top: Option<bool>,
    #[serde(default)]
    pub size: Option<Size>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub is_visible: Option<bool>,
}

impl NewNote {
    pub fn validate(self) -> Result<Self> {
        if let Some(size) = &self.size {
            if !size.is_valid() {
                return Err(AppError::InvalidPatch(format!(
                    "size must be positive, got {}x{}",
                    size.width, size.height
                )));
            }
        }
        Ok(self)
    }
}

/// Update note request. Only the fields listed here may change through
/// `update_note`; collapse and visibility belong to the window lifecycle.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NotePatch {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub always_on_top: Option<bool>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub size: Option<Size>,
    /// `Some(None)` moves the note out of its group
    #[serde(default, deserialize_with = "double_option")]
    pub group_id: Option<Option<String>>,
}

impl NotePatch {
    /// Reject unusable geometry and clamp opacity into range
    pub fn validate(mut self) -> Result<Self> {
        if let Some(position) = &self.position {
            if !position.is_finite() {
                return Err(AppError::InvalidPatch("position must be finite".to_string()));
            }
        }
        if let Some(size) = &self.size {
            if !size.is_valid() {
                return Err(AppError::InvalidPatch(format!(
                    "size must be positive, got {}x{}",
                    size.width, size.height
                )));
            }
        }
        self.opacity = self.opacity.map(clamp_opacity);
        Ok(self)
    }

    /// Merge into `note` and refresh `updated_at`
    pub fn apply(&self, note: &mut Note) {
        if let Some(content) = &self.content {
            note.content = content.clone();
        }
        if let Some(color) = &self.background_color {
            note.background_color = color.clone();
        }
        if let Some(opacity) = self.opacity {
            note.opacity = opacity;
        }
        if let Some(on_top) = self.always_on_top {
            note.always_on_top = on_top;
        }
        if let Some(position) = self.position {
            note.position = position;
        }
        if let Some(size) = self.size {
            note.size = size;
        }
        if let Some(group_id) = &self.group_id {
            note.group_id = group_id.clone();
        }
        note.touch();
    }
}

/// Create group request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewGroup {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub note_ids: Option<Vec<String>>,
}

/// Update group request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GroupPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub note_ids: Option<Vec<String>>,
}

impl GroupPatch {
    pub fn apply(&self, group: &mut Group) {
        if let Some(name) = &self.name {
            group.name = name.clone();
        }
        if let Some(color) = &self.color {
            group.color = color.clone();
        }
        if let Some(note_ids) = &self.note_ids {
            group.note_ids = note_ids.clone();
        }
    }
}

/// Update settings request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsPatch {
    #[serde(default)]
    pub default_background_color: Option<String>,
    #[serde(default)]
    pub default_opacity: Option<f64>,
    #[serde(default)]
    pub default_always_on_top: Option<bool>,
    #[serde(default)]
    pub auto_save_delay_ms: Option<u32>,
}
