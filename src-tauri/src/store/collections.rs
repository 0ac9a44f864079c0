//! Typed handles for the top-level entries of the document
//!
//! `DocumentStore::get::<Notes>()` reads, `set::<Notes>(..)` replaces.

use super::document::Document;
use super::models::{Group, Layout, Note, Position, Settings, TrashItem};
use std::collections::BTreeMap;

/// A top-level entry of the document that is read and replaced as a whole
pub trait Collection {
    type Value: Clone + Send + Sync + 'static;

    /// Key used in logs
    const NAME: &'static str;

    fn read(doc: &Document) -> &Self::Value;
    fn slot(doc: &mut Document) -> &mut Self::Value;
}

macro_rules! collection {
    ($name:ident, $field:ident, $value:ty, $key:literal) => {
        pub struct $name;

        impl Collection for $name {
            type Value = $value;

            const NAME: &'static str = $key;

            fn read(doc: &Document) -> &Self::Value {
                &doc.$field
            }

            fn slot(doc: &mut Document) -> &mut Self::Value {
                &mut doc.$field
            }
        }
    };
}

collection!(Notes, notes, Vec<Note>, "notes");
collection!(Groups, groups, Vec<Group>, "groups");
collection!(Layouts, layouts, Vec<Layout>, "layouts");
collection!(Trash, trash, Vec<TrashItem>, "trash");
collection!(
    OriginalPositions,
    original_positions,
    BTreeMap<String, Position>,
    "originalPositions"
);
collection!(
    OriginalCollapsedStates,
    original_collapsed_states,
    BTreeMap<String, bool>,
    "originalCollapsedStates"
);
collection!(SettingsEntry, settings, Settings, "settings");
