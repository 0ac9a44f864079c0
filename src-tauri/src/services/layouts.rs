//! Layout snapshots
//!
//! A layout is a by-value copy of every note and group. Restoring one is
//! destructive: the live collections are replaced and notes missing from
//! the snapshot are dropped.

use super::notes::repair_opacity;
use super::NotesService;
use crate::error::Result;
use crate::store::{DocumentStore, Groups, Layout, Layouts, Notes};
use chrono::Utc;
use uuid::Uuid;

#[derive(Clone)]
pub struct LayoutService {
    store: DocumentStore,
    notes: NotesService,
}

impl LayoutService {
    pub fn new(store: DocumentStore, notes: NotesService) -> Self {
        Self { store, notes }
    }

    pub async fn list_layouts(&self) -> Vec<Layout> {
        self.store.get::<Layouts>().await
    }

    pub async fn save_layout(&self, name: &str) -> Result<Layout> {
        // Unsaved typing belongs in the snapshot
        self.notes.editors().flush_all().await;

        let layout = Layout {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            notes: self.store.get::<Notes>().await,
            groups: self.store.get::<Groups>().await,
            created_at: Utc::now(),
        };

        let saved = layout.clone();
        self.store
            .update::<Layouts, _, _>(move |layouts| {
                layouts.push(saved);
                Some(())
            })
            .await?;

        tracing::info!(
            "Layout saved: {} ({} notes, {} groups)",
            layout.name,
            layout.notes.len(),
            layout.groups.len()
        );
        Ok(layout)
    }

    /// Replace notes and groups with the snapshot and reopen its windows
    pub async fn restore_layout(&self, id: &str) -> Result<bool> {
        let Some(layout) = self.list_layouts().await.into_iter().find(|l| l.id == id) else {
            tracing::warn!("Layout {} not found", id);
            return Ok(false);
        };

        let closed = self.notes.close_all_windows().await;
        tracing::debug!("Closed {} windows before restoring layout {}", closed, layout.name);

        let mut notes = layout.notes;
        for note in notes.iter_mut() {
            note.is_visible = true;
            repair_opacity(note);
        }

        self.store.set::<Groups>(layout.groups).await?;
        self.store.set::<Notes>(notes.clone()).await?;

        let opened = self.notes.spawn_windows(&notes);
        tracing::info!("Layout restored: {} ({} windows)", layout.name, opened);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::recording::{FixedScreen, RecordingWindowFactory};
    use crate::platform::WindowRegistry;
    use crate::store::{NewNote, NotePatch};
    use std::sync::Arc;

    fn create_test_services() -> (LayoutService, NotesService, Arc<RecordingWindowFactory>) {
        let store = DocumentStore::in_memory();
        let factory = Arc::new(RecordingWindowFactory::new());
        let notes = NotesService::new(
            store.clone(),
            WindowRegistry::new(),
            factory.clone(),
            Arc::new(FixedScreen::default()),
        );
        (LayoutService::new(store, notes.clone()), notes, factory)
    }

    #[tokio::test]
    async fn test_save_layout_copies_by_value() {
        let (layouts, notes, _) = create_test_services();
        let note = notes.create_note(NewNote::default()).await.unwrap();

        let layout = layouts.save_layout("L1").await.unwrap();
        let patch = NotePatch {
            content: Some("changed".to_string()),
            ..NotePatch::default()
        };
        notes.update_note(&note.id, patch).await.unwrap();

        let stored = layouts.list_layouts().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "L1");
        assert_eq!(stored[0].notes, layout.notes);
        assert_eq!(stored[0].notes[0].content, "");
    }

    #[tokio::test]
    async fn test_restore_layout_drops_newer_notes() {
        let (layouts, notes, factory) = create_test_services();
        let kept = notes.create_note(NewNote::default()).await.unwrap();
        notes.open_window(&kept.id).await.unwrap();
        let layout = layouts.save_layout("L1").await.unwrap();

        let extra = notes.create_note(NewNote::default()).await.unwrap();
        notes.open_window(&extra.id).await.unwrap();

        assert!(layouts.restore_layout(&layout.id).await.unwrap());

        let live = notes.list_notes().await;
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id, kept.id);
        assert!(factory.latest(&extra.id).unwrap().was_closed());
        assert!(!notes.windows().contains(&extra.id));
        let windows = factory.windows_for(&kept.id);
        assert_eq!(windows.len(), 2);
        assert!(windows[0].was_closed());
        assert!(notes.windows().contains(&kept.id));
    }

    #[tokio::test]
    async fn test_restore_layout_reopens_hidden_notes() {
        let (layouts, notes, factory) = create_test_services();
        let hidden = notes
            .create_note(NewNote {
                is_visible: Some(false),
                opacity: Some(0.1),
                ..NewNote::default()
            })
            .await
            .unwrap();
        let layout = layouts.save_layout("hidden").await.unwrap();

        layouts.restore_layout(&layout.id).await.unwrap();

        let restored = notes.get_note(&hidden.id).await.unwrap();
        assert!(restored.is_visible);
        assert_eq!(restored.opacity, 1.0);
        assert_eq!(factory.windows_for(&hidden.id).len(), 1);
    }

    #[tokio::test]
    async fn test_restore_layout_drops_editor_sessions() {
        let (layouts, notes, _) = create_test_services();
        let empty = layouts.save_layout("empty").await.unwrap();

        for i in 0..5 {
            let note = notes.create_and_open_note(NewNote::default()).await.unwrap();
            notes.content_changed(&note.id, format!("draft {}", i)).await;
        }
        assert_eq!(notes.editors().open_sessions(), 5);

        assert!(layouts.restore_layout(&empty.id).await.unwrap());

        assert!(notes.list_notes().await.is_empty());
        assert!(notes.windows().is_empty());
        assert_eq!(notes.editors().open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_restore_unknown_layout() {
        let (layouts, _, _) = create_test_services();

        assert!(!layouts.restore_layout("missing").await.unwrap());
    }
}
