//! Rearrange / reposition
//!
//! Rearrange stacks every visible note collapsed in the top-left corner,
//! remembering where each one was. Reposition puts them back. The memory is
//! a single slot: a second rearrange overwrites it.

use crate::config;
use crate::error::Result;
use crate::platform::WindowRegistry;
use crate::store::{
    DocumentStore, Note, Notes, OriginalCollapsedStates, OriginalPositions, Position,
};
use std::collections::BTreeMap;

#[derive(Clone)]
pub struct ArrangeService {
    store: DocumentStore,
    windows: WindowRegistry,
}

impl ArrangeService {
    pub fn new(store: DocumentStore, windows: WindowRegistry) -> Self {
        Self { store, windows }
    }

    /// Collapse and stack the visible notes. Returns how many moved.
    pub async fn rearrange(&self) -> Result<usize> {
        let notes = self.store.get::<Notes>().await;

        let positions: BTreeMap<String, Position> = notes
            .iter()
            .filter(|n| n.is_visible)
            .map(|n| (n.id.clone(), n.position))
            .collect();
        let collapsed: BTreeMap<String, bool> = notes
            .iter()
            .filter(|n| n.is_visible)
            .map(|n| (n.id.clone(), n.is_collapsed))
            .collect();
        self.store.set::<OriginalPositions>(positions).await?;
        self.store.set::<OriginalCollapsedStates>(collapsed).await?;

        let arranged = self
            .store
            .update::<Notes, _, _>(|notes| {
                let mut arranged = Vec::new();
                for (index, note) in notes.iter_mut().filter(|n| n.is_visible).enumerate() {
                    note.is_collapsed = true;
                    note.position = Position::new(
                        config::REARRANGE_ORIGIN_X,
                        config::REARRANGE_ORIGIN_Y + index as f64 * config::REARRANGE_SPACING,
                    );
                    note.touch();
                    arranged.push(note.clone());
                }
                (!arranged.is_empty()).then_some(arranged)
            })
            .await?
            .unwrap_or_default();

        for note in &arranged {
            self.push_to_window(note);
        }

        tracing::info!("Rearranged {} visible notes", arranged.len());
        Ok(arranged.len())
    }

    /// Put visible notes back where the last rearrange found them
    pub async fn reposition(&self) -> Result<usize> {
        let positions = self.store.get::<OriginalPositions>().await;
        let collapsed = self.store.get::<OriginalCollapsedStates>().await;

        let restored = self
            .store
            .update::<Notes, _, _>(|notes| {
                let mut restored = Vec::new();
                for note in notes.iter_mut().filter(|n| n.is_visible) {
                    let Some(position) = positions.get(&note.id) else {
                        continue;
                    };
                    note.position = *position;
                    note.is_collapsed = collapsed.get(&note.id).copied().unwrap_or(note.is_collapsed);
                    note.touch();
                    restored.push(note.clone());
                }
                (!restored.is_empty()).then_some(restored)
            })
            .await?
            .unwrap_or_default();

        for note in &restored {
            self.push_to_window(note);
        }

        tracing::info!("Repositioned {} notes", restored.len());
        Ok(restored.len())
    }

    fn push_to_window(&self, note: &Note) {
        let Some(window) = self.windows.get(&note.id) else {
            return;
        };
        let results = [
            window.set_size(note.window_size()),
            window.set_position(note.position),
            window.notify_collapse_state(&note.id, note.is_collapsed),
        ];
        for result in results {
            if let Err(e) = result {
                tracing::warn!("Window update failed for note {}: {}", note.id, e);
            }
        }
    }
}
