//! Notes service
//!
//! The note lifecycle: create, update, delete to trash, restore, collapse,
//! open and close windows. Keeps the `Notes` collection and the window
//! registry consistent and pushes side effects into live window handles.
//!
//! NotFound is not an error here. Operations on unknown ids return
//! `Ok(None)` / `Ok(false)` so a surface holding a stale id degrades to a
//! no-op. A window operation that fails is logged and skipped.

use super::autosave::EditorSessions;
use super::placement;
use crate::config;
use crate::error::Result;
use crate::platform::{NoteWindow, Screen, WindowEvent, WindowFactory, WindowInstance, WindowRegistry, WindowSpec};
use crate::store::{
    clamp_opacity, is_valid_opacity, DocumentStore, NewNote, Note, NotePatch, Notes,
    SettingsEntry, Size, Trash, TrashItem,
};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Log a failed window operation without interrupting the caller
fn log_window_err(result: Result<()>, action: &str, note_id: &str) {
    if let Err(e) = result {
        tracing::warn!("Window {} failed for note {}: {}", action, note_id, e);
    }
}

/// Repair an out-of-range opacity to fully opaque. Returns true if changed.
pub(crate) fn repair_opacity(note: &mut Note) -> bool {
    if is_valid_opacity(note.opacity) {
        return false;
    }
    tracing::info!(
        "Invalid opacity {} for note {}, setting to {}",
        note.opacity,
        note.id,
        config::MAX_OPACITY
    );
    note.opacity = config::MAX_OPACITY;
    true
}

/// Service for the note lifecycle
#[derive(Clone)]
pub struct NotesService {
    store: DocumentStore,
    windows: WindowRegistry,
    factory: Arc<dyn WindowFactory>,
    screen: Arc<dyn Screen>,
    editors: EditorSessions,
}

impl NotesService {
    pub fn new(
        store: DocumentStore,
        windows: WindowRegistry,
        factory: Arc<dyn WindowFactory>,
        screen: Arc<dyn Screen>,
    ) -> Self {
        let editors = EditorSessions::new(store.clone());
        Self {
            store,
            windows,
            factory,
            screen,
            editors,
        }
    }

    pub fn windows(&self) -> &WindowRegistry {
        &self.windows
    }

    pub fn editors(&self) -> &EditorSessions {
        &self.editors
    }

    /// List all live notes
    pub async fn list_notes(&self) -> Vec<Note> {
        self.store.get::<Notes>().await
    }

    /// Get a note by ID
    pub async fn get_note(&self, id: &str) -> Option<Note> {
        self.store
            .get::<Notes>()
            .await
            .into_iter()
            .find(|n| n.id == id)
    }

    /// List soft-deleted notes
    pub async fn list_trash(&self) -> Vec<TrashItem> {
        self.store.get::<Trash>().await
    }

    /// Create a note at the cursor. No window is opened.
    pub async fn create_note(&self, req: NewNote) -> Result<Note> {
        let req = req.validate()?;
        let settings = self.store.get::<SettingsEntry>().await;

        let size = req.size.unwrap_or_default();
        let position = placement::spawn_position(
            self.screen.cursor_position(),
            self.screen.primary_display_size(),
            size,
        );

        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4().to_string(),
            content: req.content.unwrap_or_default(),
            background_color: req
                .background_color
                .unwrap_or(settings.default_background_color),
            opacity: req.opacity.unwrap_or(settings.default_opacity),
            click_through: false,
            always_on_top: req.always_on_top.unwrap_or(settings.default_always_on_top),
            position,
            size,
            group_id: req.group_id,
            created_at: now,
            updated_at: now,
            is_collapsed: false,
            is_visible: req.is_visible.unwrap_or(true),
        };

        let created = note.clone();
        self.store
            .update::<Notes, _, _>(move |notes| {
                notes.push(created);
                Some(())
            })
            .await?;

        tracing::info!(
            "Note created: {} at ({}, {}) opacity {}",
            note.id,
            note.position.x,
            note.position.y,
            note.opacity
        );
        Ok(note)
    }

    /// Create a note and open its window
    pub async fn create_and_open_note(&self, req: NewNote) -> Result<Note> {
        let note = self.create_note(req).await?;
        self.open_window(&note.id).await?;
        Ok(self.get_note(&note.id).await.unwrap_or(note))
    }

    /// Merge `patch` into the note and push window-level changes to its
    /// live window. Opacity is only persisted here; the window applies it
    /// through `set_sender_opacity`.
    pub async fn update_note(&self, id: &str, patch: NotePatch) -> Result<Option<Note>> {
        let patch = patch.validate()?;
        tracing::debug!("Updating note: {}", id);

        let updated = self
            .store
            .update::<Notes, _, _>(|notes| {
                let note = notes.iter_mut().find(|n| n.id == id)?;
                patch.apply(note);
                Some(note.clone())
            })
            .await?;

        let Some(note) = updated else {
            tracing::warn!("Note {} not found for update", id);
            return Ok(None);
        };

        match self.windows.get(id) {
            Some(window) => {
                if let Some(on_top) = patch.always_on_top {
                    log_window_err(window.set_always_on_top(on_top), "always-on-top", id);
                }
                if let Some(position) = patch.position {
                    log_window_err(window.set_position(position), "move", id);
                }
                if patch.size.is_some() {
                    log_window_err(window.set_size(note.window_size()), "resize", id);
                }
            }
            None => tracing::debug!("No window registered for note {}", id),
        }

        Ok(Some(note))
    }

    /// Move a note to the trash and close its window
    pub async fn delete_note(&self, id: &str) -> Result<bool> {
        tracing::info!("Deleting note: {}", id);

        let ids = HashSet::from([id.to_string()]);
        let trashed = self.move_to_trash(&ids).await?;
        if trashed == 0 {
            tracing::warn!("Note {} not found for delete", id);
            return Ok(false);
        }

        tracing::info!("Note moved to trash: {}", id);
        Ok(true)
    }

    /// Trash every note matching `predicate`, returning how many moved
    pub(crate) async fn trash_where<F>(&self, predicate: F) -> Result<usize>
    where
        F: Fn(&Note) -> bool,
    {
        let ids: HashSet<String> = self
            .list_notes()
            .await
            .into_iter()
            .filter(|n| predicate(n))
            .map(|n| n.id)
            .collect();

        if ids.is_empty() {
            return Ok(0);
        }
        self.move_to_trash(&ids).await
    }

    async fn move_to_trash(&self, ids: &HashSet<String>) -> Result<usize> {
        // Pending edits belong in the trashed copy
        for id in ids {
            self.editors.close(id).await;
        }

        let doomed: Vec<Note> = self
            .list_notes()
            .await
            .into_iter()
            .filter(|n| ids.contains(&n.id))
            .collect();
        if doomed.is_empty() {
            return Ok(0);
        }

        let deleted_at = Utc::now();
        let items: Vec<TrashItem> = doomed
            .iter()
            .map(|note| TrashItem {
                id: Uuid::new_v4().to_string(),
                data: note.clone(),
                deleted_at,
            })
            .collect();

        self.store
            .update::<Trash, _, _>(move |trash| {
                trash.extend(items);
                Some(())
            })
            .await?;

        self.store
            .update::<Notes, _, _>(|notes| {
                notes.retain(|n| !ids.contains(&n.id));
                Some(())
            })
            .await?;

        for note in &doomed {
            // Unregister first so the close event that follows is ignored
            if let Some(window) = self.windows.unregister(&note.id) {
                tracing::debug!("Closing window for trashed note {}", note.id);
                log_window_err(window.close(), "close", &note.id);
            }
        }

        Ok(doomed.len())
    }

    /// Bring a trashed note back and open its window
    pub async fn restore_note(&self, trash_id: &str) -> Result<bool> {
        tracing::info!("Restoring note from trash: {}", trash_id);

        let item = self
            .store
            .get::<Trash>()
            .await
            .into_iter()
            .find(|t| t.id == trash_id);
        let Some(item) = item else {
            tracing::warn!("Trash item {} not found", trash_id);
            return Ok(false);
        };

        let mut note = item.data;
        note.touch();
        note.is_visible = true;
        repair_opacity(&mut note);

        let restored = note.clone();
        self.store
            .update::<Notes, _, _>(move |notes| {
                let before = notes.len();
                notes.retain(|n| n.id != restored.id);
                if notes.len() != before {
                    tracing::warn!("Restored note {} replaces a live copy", restored.id);
                }
                notes.push(restored);
                Some(())
            })
            .await?;

        self.store
            .update::<Trash, _, _>(|trash| {
                let index = trash.iter().position(|t| t.id == trash_id)?;
                trash.remove(index);
                Some(())
            })
            .await?;

        match self.windows.get(&note.id) {
            Some(window) => {
                log_window_err(window.show(), "show", &note.id);
                log_window_err(window.focus(), "focus", &note.id);
            }
            None => self.spawn_window(&note)?,
        }

        tracing::info!("Note restored: {}", note.id);
        Ok(true)
    }

    /// Drop a trash item for good
    pub async fn permanently_delete_note(&self, trash_id: &str) -> Result<bool> {
        let removed = self
            .store
            .update::<Trash, _, _>(|trash| {
                let index = trash.iter().position(|t| t.id == trash_id)?;
                Some(trash.remove(index))
            })
            .await?;

        match removed {
            Some(item) => {
                tracing::info!("Permanently deleted note {} (trash {})", item.data.id, trash_id);
                Ok(true)
            }
            None => {
                tracing::warn!("Trash item {} not found", trash_id);
                Ok(false)
            }
        }
    }

    /// Permanently delete everything in the trash
    pub async fn empty_trash(&self) -> Result<bool> {
        let count = self.store.get::<Trash>().await.len();
        self.store.set::<Trash>(Vec::new()).await?;
        tracing::info!("Emptied trash ({} items)", count);
        Ok(true)
    }

    /// Set the collapsed state and resize the live window. Safe to call
    /// with the state the note already has.
    pub async fn toggle_collapse(&self, id: &str, collapsed: bool) -> Result<bool> {
        let Some(mut note) = self.get_note(id).await else {
            tracing::warn!("Note {} not found for collapse", id);
            return Ok(false);
        };

        if note.is_collapsed != collapsed {
            let updated = self
                .store
                .update::<Notes, _, _>(|notes| {
                    let n = notes.iter_mut().find(|n| n.id == id)?;
                    n.is_collapsed = collapsed;
                    n.touch();
                    Some(n.clone())
                })
                .await?;
            match updated {
                Some(n) => note = n,
                None => return Ok(false),
            }
        }

        if let Some(window) = self.windows.get(id) {
            log_window_err(window.set_size(note.window_size()), "resize", id);
            log_window_err(window.notify_collapse_state(id, collapsed), "notify", id);
        }

        tracing::debug!(
            "Note {} {}",
            id,
            if collapsed { "collapsed" } else { "expanded" }
        );
        Ok(true)
    }

    pub async fn expand_all(&self) -> Result<usize> {
        self.set_all_collapsed(false).await
    }

    pub async fn collapse_all(&self) -> Result<usize> {
        self.set_all_collapsed(true).await
    }

    /// Batch collapse/expand with a single write. Notes without a window
    /// are updated too so they open in the right state later.
    async fn set_all_collapsed(&self, collapsed: bool) -> Result<usize> {
        let notes = self
            .store
            .update::<Notes, _, _>(|notes| {
                if notes.is_empty() {
                    return None;
                }
                for note in notes.iter_mut() {
                    note.is_collapsed = collapsed;
                    note.touch();
                }
                Some(notes.clone())
            })
            .await?
            .unwrap_or_default();

        for note in &notes {
            let Some(window) = self.windows.get(&note.id) else {
                continue;
            };
            if !collapsed {
                log_window_err(window.show(), "show", &note.id);
            }
            log_window_err(window.set_size(note.window_size()), "resize", &note.id);
            log_window_err(
                window.notify_collapse_state(&note.id, collapsed),
                "notify",
                &note.id,
            );
        }

        tracing::info!(
            "{} {} notes",
            if collapsed { "Collapsed" } else { "Expanded" },
            notes.len()
        );
        Ok(notes.len())
    }

    /// Show and focus the note's window, creating it if none is registered
    pub async fn open_window(&self, id: &str) -> Result<bool> {
        tracing::info!("Opening note window for note: {}", id);

        let Some(mut note) = self.get_note(id).await else {
            tracing::warn!("Note {} not found, no window opened", id);
            return Ok(false);
        };

        if let Some(window) = self.windows.get(id) {
            tracing::debug!("Window already exists, showing and focusing: {}", id);
            log_window_err(window.show(), "show", id);
            log_window_err(window.focus(), "focus", id);
            return Ok(true);
        }

        repair_opacity(&mut note);
        self.spawn_window(&note)?;

        let opacity = note.opacity;
        self.store
            .update::<Notes, _, _>(|notes| {
                let n = notes.iter_mut().find(|n| n.id == id)?;
                n.opacity = opacity;
                n.is_visible = true;
                n.touch();
                Some(())
            })
            .await?;

        Ok(true)
    }

    /// Open a window for every note marked visible. Used at startup.
    pub async fn open_visible_windows(&self) -> Result<usize> {
        let notes = self
            .store
            .update::<Notes, _, _>(|notes| {
                let mut repaired = false;
                for note in notes.iter_mut().filter(|n| n.is_visible) {
                    repaired |= repair_opacity(note);
                }
                repaired.then(|| notes.clone())
            })
            .await?;
        let notes = match notes {
            Some(notes) => notes,
            None => self.list_notes().await,
        };

        let visible: Vec<Note> = notes
            .into_iter()
            .filter(|n| n.is_visible && !self.windows.contains(&n.id))
            .collect();
        let opened = self.spawn_windows(&visible);

        tracing::info!("Opened {} note windows at startup", opened);
        Ok(opened)
    }

    fn spawn_window(&self, note: &Note) -> Result<()> {
        let instance = self.windows.next_instance();
        let spec = WindowSpec {
            note_id: note.id.clone(),
            instance,
            position: note.position,
            size: note.window_size(),
            opacity: note.opacity,
            always_on_top: note.always_on_top,
            collapsed: note.is_collapsed,
        };

        let handle = self.factory.create(&spec)?;
        if let Some(replaced) = self.windows.register(&note.id, instance, handle) {
            tracing::warn!("Replaced an existing window for note {}", note.id);
            log_window_err(replaced.close(), "close", &note.id);
        }

        tracing::info!("Note window created: {} (instance {})", note.id, instance);
        Ok(())
    }

    /// Open windows for `notes`, logging and skipping failures
    pub(crate) fn spawn_windows(&self, notes: &[Note]) -> usize {
        notes
            .iter()
            .filter(|note| match self.spawn_window(note) {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!("Failed to create window for note {}: {}", note.id, e);
                    false
                }
            })
            .count()
    }

    /// Flush pending edits, then close and unregister every note window
    pub(crate) async fn close_all_windows(&self) -> usize {
        let flushed = self.editors.close_all().await;
        if flushed > 0 {
            tracing::debug!("Flushed {} pending edits before closing windows", flushed);
        }

        let windows = self.windows.drain();
        for (note_id, window) in &windows {
            log_window_err(window.close(), "close", note_id);
        }
        windows.len()
    }

    /// Apply an event reported by a note window
    pub async fn window_event(
        &self,
        note_id: &str,
        instance: WindowInstance,
        event: WindowEvent,
    ) -> Result<()> {
        if !self.windows.is_current(note_id, instance) {
            tracing::debug!(
                "Ignoring {:?} from stale window {} of note {}",
                event,
                instance,
                note_id
            );
            return Ok(());
        }

        match event {
            WindowEvent::Moved(position) => {
                self.store
                    .update::<Notes, _, _>(|notes| {
                        let n = notes.iter_mut().find(|n| n.id == note_id)?;
                        if n.position == position {
                            return None;
                        }
                        n.position = position;
                        n.touch();
                        Some(())
                    })
                    .await?;
            }
            WindowEvent::Resized(size) => {
                self.store
                    .update::<Notes, _, _>(|notes| {
                        let n = notes.iter_mut().find(|n| n.id == note_id)?;
                        // A collapsed window reports the title bar height
                        let stored = if n.is_collapsed {
                            Size::new(size.width, n.size.height)
                        } else {
                            size
                        };
                        if n.size == stored {
                            return None;
                        }
                        n.size = stored;
                        n.touch();
                        Some(())
                    })
                    .await?;
            }
            WindowEvent::Closed => {
                self.windows.unregister_instance(note_id, instance);
                self.editors.close(note_id).await;
                self.store
                    .update::<Notes, _, _>(|notes| {
                        let n = notes.iter_mut().find(|n| n.id == note_id)?;
                        n.is_visible = false;
                        n.touch();
                        Some(())
                    })
                    .await?;
                tracing::info!("Note window closed: {}", note_id);
            }
        }

        Ok(())
    }

    /// Apply an opacity requested by the window itself. Returns the value
    /// actually applied.
    pub fn set_sender_opacity(&self, window: &dyn NoteWindow, requested: f64) -> f64 {
        let opacity = clamp_opacity(requested);
        tracing::debug!("Setting window opacity: {} -> {}", requested, opacity);
        if let Err(e) = window.set_opacity(opacity) {
            tracing::warn!("Failed to set window opacity: {}", e);
        }
        opacity
    }

    pub fn close_sender(&self, window: &dyn NoteWindow) {
        if let Err(e) = window.close() {
            tracing::warn!("Failed to close window: {}", e);
        }
    }

    pub fn minimize_sender(&self, window: &dyn NoteWindow) {
        if let Err(e) = window.minimize() {
            tracing::warn!("Failed to minimize window: {}", e);
        }
    }

    /// Make every note fully opaque
    pub async fn reset_all_opacity(&self) -> Result<bool> {
        let notes = self
            .store
            .update::<Notes, _, _>(|notes| {
                for note in notes.iter_mut() {
                    note.opacity = config::MAX_OPACITY;
                    note.touch();
                }
                Some(notes.clone())
            })
            .await?
            .unwrap_or_default();

        for note in &notes {
            if let Some(window) = self.windows.get(&note.id) {
                log_window_err(window.set_opacity(config::MAX_OPACITY), "opacity", &note.id);
            }
        }

        tracing::info!("Reset opacity for {} notes", notes.len());
        Ok(true)
    }

    pub async fn toggle_always_on_top(&self, id: &str) -> Result<Option<Note>> {
        let Some(note) = self.get_note(id).await else {
            return Ok(None);
        };
        let patch = NotePatch {
            always_on_top: Some(!note.always_on_top),
            ..NotePatch::default()
        };
        self.update_note(id, patch).await
    }

    /// Switch between opaque and the translucent preset
    pub async fn toggle_opacity(&self, id: &str) -> Result<Option<Note>> {
        let Some(note) = self.get_note(id).await else {
            return Ok(None);
        };
        let opacity = if note.opacity >= config::MAX_OPACITY {
            config::TOGGLED_OPACITY
        } else {
            config::MAX_OPACITY
        };

        let patch = NotePatch {
            opacity: Some(opacity),
            ..NotePatch::default()
        };
        let updated = self.update_note(id, patch).await?;
        if updated.is_some() {
            if let Some(window) = self.windows.get(id) {
                log_window_err(window.set_opacity(opacity), "opacity", id);
            }
        }
        Ok(updated)
    }

    /// Debounced content save from the note's editor
    pub async fn content_changed(&self, id: &str, content: String) {
        self.editors.content_changed(id, content).await;
    }

    /// Persist the note's pending editor content now
    pub async fn flush_editor(&self, id: &str) -> bool {
        self.editors.flush(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::recording::{FixedScreen, RecordingWindowFactory, WindowCall};
    use crate::store::{Position, SettingsEntry};

    fn create_test_service() -> (NotesService, Arc<RecordingWindowFactory>) {
        let factory = Arc::new(RecordingWindowFactory::new());
        let service = NotesService::new(
            DocumentStore::in_memory(),
            WindowRegistry::new(),
            factory.clone(),
            Arc::new(FixedScreen::default()),
        );
        (service, factory)
    }

    #[tokio::test]
    async fn test_create_note_applies_settings_defaults() {
        let (service, factory) = create_test_service();

        let note = service.create_note(NewNote::default()).await.unwrap();

        assert_eq!(note.opacity, 0.8);
        assert!(note.always_on_top);
        assert!(note.is_visible);
        assert!(!note.is_collapsed);
        assert!(!note.click_through);
        assert_eq!(note.size, Size::new(300.0, 270.0));
        assert_eq!(note.position, Position::new(100.0, 100.0));
        assert_eq!(note.background_color, config::DEFAULT_BACKGROUND_COLOR);
        // Creating never opens a window
        assert!(factory.created().is_empty());
        assert_eq!(service.list_notes().await.len(), 1);
    }

    #[tokio::test]
    async fn test_create_note_uses_changed_settings() {
        let (service, _) = create_test_service();
        let mut settings = service.store.get::<SettingsEntry>().await;
        settings.default_opacity = 0.6;
        settings.default_always_on_top = false;
        service.store.set::<SettingsEntry>(settings).await.unwrap();

        let note = service
            .create_note(NewNote {
                is_visible: Some(false),
                ..NewNote::default()
            })
            .await
            .unwrap();

        assert_eq!(note.opacity, 0.6);
        assert!(!note.always_on_top);
        assert!(!note.is_visible);
    }

    #[tokio::test]
    async fn test_update_pushes_changes_to_window() {
        let (service, factory) = create_test_service();
        let note = service.create_note(NewNote::default()).await.unwrap();
        service.open_window(&note.id).await.unwrap();

        let patch = NotePatch {
            always_on_top: Some(false),
            position: Some(Position::new(50.0, 60.0)),
            size: Some(Size::new(400.0, 500.0)),
            opacity: Some(0.7),
            ..NotePatch::default()
        };
        let updated = service.update_note(&note.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.opacity, 0.7);
        assert!(updated.updated_at >= note.updated_at);
        let calls = factory.latest(&note.id).unwrap().calls();
        assert!(calls.contains(&WindowCall::SetAlwaysOnTop(false)));
        assert!(calls.contains(&WindowCall::SetPosition(Position::new(50.0, 60.0))));
        assert!(calls.contains(&WindowCall::SetSize(Size::new(400.0, 500.0))));
        // Opacity travels through the sender channel, not update
        assert!(!calls.iter().any(|c| matches!(c, WindowCall::SetOpacity(_))));
    }

    #[tokio::test]
    async fn test_update_unknown_note_returns_none() {
        let (service, _) = create_test_service();

        let result = service
            .update_note("missing", NotePatch::default())
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_without_window_still_persists() {
        let (service, _) = create_test_service();
        let note = service.create_note(NewNote::default()).await.unwrap();

        let patch = NotePatch {
            content: Some("<p>offline</p>".to_string()),
            ..NotePatch::default()
        };
        service.update_note(&note.id, patch).await.unwrap();

        let stored = service.get_note(&note.id).await.unwrap();
        assert_eq!(stored.content, "<p>offline</p>");
    }

    #[tokio::test]
    async fn test_open_window_is_idempotent() {
        let (service, factory) = create_test_service();
        let note = service.create_note(NewNote::default()).await.unwrap();

        assert!(service.open_window(&note.id).await.unwrap());
        assert!(service.open_window(&note.id).await.unwrap());

        let windows = factory.windows_for(&note.id);
        assert_eq!(windows.len(), 1);
        assert_eq!(service.windows().len(), 1);
        let calls = windows[0].calls();
        assert!(calls.contains(&WindowCall::Show));
        assert!(calls.contains(&WindowCall::Focus));
    }

    #[tokio::test]
    async fn test_open_window_unknown_note_returns_false() {
        let (service, factory) = create_test_service();

        assert!(!service.open_window("missing").await.unwrap());
        assert!(factory.created().is_empty());
    }

    #[tokio::test]
    async fn test_open_window_repairs_invalid_opacity() {
        let (service, factory) = create_test_service();
        let note = service
            .create_note(NewNote {
                opacity: Some(0.2),
                ..NewNote::default()
            })
            .await
            .unwrap();
        assert_eq!(note.opacity, 0.2);

        service.open_window(&note.id).await.unwrap();

        let stored = service.get_note(&note.id).await.unwrap();
        assert_eq!(stored.opacity, 1.0);
        assert!(stored.is_visible);
        assert_eq!(factory.latest(&note.id).unwrap().spec().unwrap().opacity, 1.0);
    }

    #[tokio::test]
    async fn test_collapsed_note_opens_at_collapsed_height() {
        let (service, factory) = create_test_service();
        let note = service.create_note(NewNote::default()).await.unwrap();
        service.toggle_collapse(&note.id, true).await.unwrap();

        service.open_window(&note.id).await.unwrap();

        let window = factory.latest(&note.id).unwrap();
        assert_eq!(
            window.spec().unwrap().size,
            Size::new(300.0, config::COLLAPSED_HEIGHT)
        );
        assert!(window.calls().is_empty());
    }

    #[tokio::test]
    async fn test_collapse_then_expand_restores_stored_size() {
        let (service, factory) = create_test_service();
        let note = service
            .create_note(NewNote {
                size: Some(Size::new(320.0, 410.0)),
                ..NewNote::default()
            })
            .await
            .unwrap();
        service.open_window(&note.id).await.unwrap();

        for _ in 0..3 {
            assert!(service.toggle_collapse(&note.id, true).await.unwrap());
            assert!(service.toggle_collapse(&note.id, true).await.unwrap());
            assert!(service.toggle_collapse(&note.id, false).await.unwrap());
        }

        let window = factory.latest(&note.id).unwrap();
        assert_eq!(window.current_size(), Some(Size::new(320.0, 410.0)));
        assert!(window
            .calls()
            .contains(&WindowCall::SetSize(Size::new(320.0, config::COLLAPSED_HEIGHT))));
        assert!(!service.get_note(&note.id).await.unwrap().is_collapsed);
    }

    #[tokio::test]
    async fn test_redundant_collapse_does_not_write() {
        let (service, _) = create_test_service();
        let note = service.create_note(NewNote::default()).await.unwrap();
        service.toggle_collapse(&note.id, true).await.unwrap();
        let writes = service.store.write_count();

        service.toggle_collapse(&note.id, true).await.unwrap();

        assert_eq!(service.store.write_count(), writes);
    }

    #[tokio::test]
    async fn test_collapse_all_writes_once_and_covers_closed_notes() {
        let (service, factory) = create_test_service();
        let open = service.create_note(NewNote::default()).await.unwrap();
        let closed = service.create_note(NewNote::default()).await.unwrap();
        service.open_window(&open.id).await.unwrap();
        let writes = service.store.write_count();

        let count = service.collapse_all().await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(service.store.write_count(), writes + 1);
        assert!(service.get_note(&closed.id).await.unwrap().is_collapsed);
        let calls = factory.latest(&open.id).unwrap().calls();
        assert!(calls.contains(&WindowCall::SetSize(Size::new(300.0, config::COLLAPSED_HEIGHT))));
        assert!(calls.contains(&WindowCall::CollapseNotified(true)));

        service.expand_all().await.unwrap();
        let window = factory.latest(&open.id).unwrap();
        assert_eq!(window.current_size(), Some(Size::new(300.0, 270.0)));
        assert!(window.calls().contains(&WindowCall::Show));
    }

    #[tokio::test]
    async fn test_delete_and_restore_round_trip() {
        let (service, factory) = create_test_service();
        let note = service
            .create_note(NewNote {
                content: Some("<p>keep me</p>".to_string()),
                background_color: Some("rgba(1, 2, 3, 0.5)".to_string()),
                opacity: Some(0.9),
                always_on_top: Some(false),
                ..NewNote::default()
            })
            .await
            .unwrap();
        service.open_window(&note.id).await.unwrap();

        assert!(service.delete_note(&note.id).await.unwrap());

        assert!(service.get_note(&note.id).await.is_none());
        assert!(factory.latest(&note.id).unwrap().was_closed());
        assert!(!service.windows().contains(&note.id));
        let trash = service.list_trash().await;
        assert_eq!(trash.len(), 1);
        assert_ne!(trash[0].id, note.id);
        assert_eq!(trash[0].data.id, note.id);

        assert!(service.restore_note(&trash[0].id).await.unwrap());

        let restored = service.get_note(&note.id).await.unwrap();
        assert_eq!(restored.content, "<p>keep me</p>");
        assert_eq!(restored.background_color, "rgba(1, 2, 3, 0.5)");
        assert_eq!(restored.opacity, 0.9);
        assert!(!restored.always_on_top);
        assert!(restored.updated_at >= trash[0].data.updated_at);
        assert!(service.list_trash().await.is_empty());
        assert_eq!(factory.windows_for(&note.id).len(), 2);
        assert!(service.windows().contains(&note.id));
    }

    #[tokio::test]
    async fn test_delete_unknown_note_returns_false() {
        let (service, _) = create_test_service();

        assert!(!service.delete_note("missing").await.unwrap());
        assert!(!service.restore_note("missing").await.unwrap());
        assert!(!service.permanently_delete_note("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_permanently_delete_and_empty_trash() {
        let (service, _) = create_test_service();
        let a = service.create_note(NewNote::default()).await.unwrap();
        let b = service.create_note(NewNote::default()).await.unwrap();
        let c = service.create_note(NewNote::default()).await.unwrap();
        service.delete_note(&a.id).await.unwrap();
        service.delete_note(&b.id).await.unwrap();

        let first = service.list_trash().await[0].id.clone();
        assert!(service.permanently_delete_note(&first).await.unwrap());
        assert_eq!(service.list_trash().await.len(), 1);
        assert!(service.get_note(&c.id).await.is_some());

        assert!(service.empty_trash().await.unwrap());
        assert!(service.list_trash().await.is_empty());
        assert_eq!(service.list_notes().await.len(), 1);
    }

    #[tokio::test]
    async fn test_window_events_update_geometry() {
        let (service, factory) = create_test_service();
        let note = service.create_note(NewNote::default()).await.unwrap();
        service.open_window(&note.id).await.unwrap();
        let instance = factory.latest(&note.id).unwrap().spec().unwrap().instance;

        service
            .window_event(&note.id, instance, WindowEvent::Moved(Position::new(7.0, 8.0)))
            .await
            .unwrap();
        service
            .window_event(&note.id, instance, WindowEvent::Resized(Size::new(350.0, 380.0)))
            .await
            .unwrap();

        let stored = service.get_note(&note.id).await.unwrap();
        assert_eq!(stored.position, Position::new(7.0, 8.0));
        assert_eq!(stored.size, Size::new(350.0, 380.0));
    }

    #[tokio::test]
    async fn test_collapsed_window_events_keep_expanded_height() {
        let (service, factory) = create_test_service();
        let note = service.create_note(NewNote::default()).await.unwrap();
        service.open_window(&note.id).await.unwrap();
        service.toggle_collapse(&note.id, true).await.unwrap();
        let instance = factory.latest(&note.id).unwrap().spec().unwrap().instance;

        service
            .window_event(&note.id, instance, WindowEvent::Moved(Position::new(600.0, 40.0)))
            .await
            .unwrap();
        service
            .window_event(
                &note.id,
                instance,
                WindowEvent::Resized(Size::new(360.0, config::COLLAPSED_HEIGHT)),
            )
            .await
            .unwrap();

        let stored = service.get_note(&note.id).await.unwrap();
        assert_eq!(stored.position, Position::new(600.0, 40.0));
        assert_eq!(stored.size, Size::new(360.0, 270.0));

        service.toggle_collapse(&note.id, false).await.unwrap();
        let window = factory.latest(&note.id).unwrap();
        assert_eq!(window.current_size(), Some(Size::new(360.0, 270.0)));
    }

    #[tokio::test]
    async fn test_close_event_marks_note_invisible() {
        let (service, factory) = create_test_service();
        let note = service.create_note(NewNote::default()).await.unwrap();
        service.open_window(&note.id).await.unwrap();
        let instance = factory.latest(&note.id).unwrap().spec().unwrap().instance;

        service
            .window_event(&note.id, instance, WindowEvent::Closed)
            .await
            .unwrap();

        assert!(!service.windows().contains(&note.id));
        assert!(!service.get_note(&note.id).await.unwrap().is_visible);

        // Reopening creates a fresh window
        service.open_window(&note.id).await.unwrap();
        assert_eq!(factory.windows_for(&note.id).len(), 2);
        assert!(service.get_note(&note.id).await.unwrap().is_visible);
    }

    #[tokio::test]
    async fn test_events_from_replaced_window_are_ignored() {
        let (service, factory) = create_test_service();
        let note = service.create_note(NewNote::default()).await.unwrap();
        service.open_window(&note.id).await.unwrap();
        let old = factory.latest(&note.id).unwrap().spec().unwrap().instance;

        service.close_all_windows().await;
        service.open_window(&note.id).await.unwrap();

        service
            .window_event(&note.id, old, WindowEvent::Closed)
            .await
            .unwrap();
        service
            .window_event(&note.id, old, WindowEvent::Moved(Position::new(1.0, 1.0)))
            .await
            .unwrap();

        assert!(service.windows().contains(&note.id));
        let stored = service.get_note(&note.id).await.unwrap();
        assert!(stored.is_visible);
        assert_eq!(stored.position, note.position);
    }

    #[tokio::test]
    async fn test_sender_opacity_is_clamped() {
        let (service, factory) = create_test_service();
        let note = service.create_note(NewNote::default()).await.unwrap();
        service.open_window(&note.id).await.unwrap();
        let window = factory.latest(&note.id).unwrap();

        assert_eq!(service.set_sender_opacity(&*window, 0.1), 0.5);
        assert_eq!(service.set_sender_opacity(&*window, 3.0), 1.0);
        assert_eq!(service.set_sender_opacity(&*window, 0.65), 0.65);

        let calls = window.calls();
        assert_eq!(
            calls,
            vec![
                WindowCall::SetOpacity(0.5),
                WindowCall::SetOpacity(1.0),
                WindowCall::SetOpacity(0.65),
            ]
        );
    }

    #[tokio::test]
    async fn test_toggles_and_reset_opacity() {
        let (service, factory) = create_test_service();
        let note = service.create_note(NewNote::default()).await.unwrap();
        service.open_window(&note.id).await.unwrap();

        let toggled = service.toggle_opacity(&note.id).await.unwrap().unwrap();
        assert_eq!(toggled.opacity, 1.0);
        let toggled = service.toggle_opacity(&note.id).await.unwrap().unwrap();
        assert_eq!(toggled.opacity, config::TOGGLED_OPACITY);

        let on_top = service.toggle_always_on_top(&note.id).await.unwrap().unwrap();
        assert!(!on_top.always_on_top);

        assert!(service.reset_all_opacity().await.unwrap());
        assert_eq!(service.get_note(&note.id).await.unwrap().opacity, 1.0);

        let calls = factory.latest(&note.id).unwrap().calls();
        assert!(calls.contains(&WindowCall::SetAlwaysOnTop(false)));
        assert_eq!(calls.last(), Some(&WindowCall::SetOpacity(1.0)));
    }

    #[tokio::test]
    async fn test_open_visible_windows_at_startup() {
        let (service, factory) = create_test_service();
        let shown = service.create_note(NewNote::default()).await.unwrap();
        let hidden = service
            .create_note(NewNote {
                is_visible: Some(false),
                ..NewNote::default()
            })
            .await
            .unwrap();

        let opened = service.open_visible_windows().await.unwrap();

        assert_eq!(opened, 1);
        assert_eq!(factory.windows_for(&shown.id).len(), 1);
        assert!(factory.windows_for(&hidden.id).is_empty());
    }
}
