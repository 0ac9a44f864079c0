//! The persisted document
//!
//! Every top-level field carries a serde default so a missing file or a
//! document written by an older version loads with defaults materialized.

use super::models::{Group, Layout, Note, Position, Settings, TrashItem};
use crate::config;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub layouts: Vec<Layout>,
    #[serde(default)]
    pub trash: Vec<TrashItem>,
    /// Positions saved by the last rearrange, keyed by note id
    #[serde(default)]
    pub original_positions: BTreeMap<String, Position>,
    /// Collapsed states saved by the last rearrange, keyed by note id
    #[serde(default)]
    pub original_collapsed_states: BTreeMap<String, bool>,
    #[serde(default)]
    pub settings: Settings,
}

impl Document {
    /// Bring values written by older versions up to date.
    /// Returns true when anything changed.
    pub fn migrate(&mut self) -> bool {
        let mut changed = false;

        if self.settings.default_background_color == config::LEGACY_DEFAULT_BACKGROUND_COLOR {
            tracing::info!(
                "Migrating default background color {} to {}",
                config::LEGACY_DEFAULT_BACKGROUND_COLOR,
                config::DEFAULT_BACKGROUND_COLOR
            );
            self.settings.default_background_color = config::DEFAULT_BACKGROUND_COLOR.to_string();
            changed = true;
        }

        changed
    }
}
