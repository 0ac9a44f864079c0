//! Groups service
//!
//! Groups are named, colored tags. Membership lives on the note
//! (`Note::group_id`); a group's own `note_ids` is informational.

use super::NotesService;
use crate::config;
use crate::error::Result;
use crate::store::{DocumentStore, Group, GroupPatch, Groups, NewGroup, Notes};
use chrono::Utc;
use uuid::Uuid;

#[derive(Clone)]
pub struct GroupsService {
    store: DocumentStore,
    notes: NotesService,
}

impl GroupsService {
    pub fn new(store: DocumentStore, notes: NotesService) -> Self {
        Self { store, notes }
    }

    pub async fn list_groups(&self) -> Vec<Group> {
        self.store.get::<Groups>().await
    }

    pub async fn create_group(&self, req: NewGroup) -> Result<Group> {
        let group = Group {
            id: Uuid::new_v4().to_string(),
            name: req
                .name
                .unwrap_or_else(|| config::DEFAULT_GROUP_NAME.to_string()),
            color: req
                .color
                .unwrap_or_else(|| config::DEFAULT_GROUP_COLOR.to_string()),
            note_ids: req.note_ids.unwrap_or_default(),
            created_at: Utc::now(),
        };

        let created = group.clone();
        self.store
            .update::<Groups, _, _>(move |groups| {
                groups.push(created);
                Some(())
            })
            .await?;

        tracing::info!("Group created: {} ({})", group.id, group.name);
        Ok(group)
    }

    pub async fn update_group(&self, id: &str, patch: GroupPatch) -> Result<Option<Group>> {
        let updated = self
            .store
            .update::<Groups, _, _>(|groups| {
                let group = groups.iter_mut().find(|g| g.id == id)?;
                patch.apply(group);
                Some(group.clone())
            })
            .await?;

        if updated.is_none() {
            tracing::warn!("Group {} not found for update", id);
        }
        Ok(updated)
    }

    /// Remove the group. Its notes stay and lose their group id.
    pub async fn delete_group(&self, id: &str) -> Result<bool> {
        let removed = self
            .store
            .update::<Groups, _, _>(|groups| {
                let index = groups.iter().position(|g| g.id == id)?;
                Some(groups.remove(index))
            })
            .await?;

        if removed.is_none() {
            tracing::warn!("Group {} not found for delete", id);
            return Ok(false);
        }

        let cleared = self
            .store
            .update::<Notes, _, _>(|notes| {
                let mut cleared = 0;
                for note in notes
                    .iter_mut()
                    .filter(|n| n.group_id.as_deref() == Some(id))
                {
                    note.group_id = None;
                    note.touch();
                    cleared += 1;
                }
                (cleared > 0).then_some(cleared)
            })
            .await?
            .unwrap_or(0);

        tracing::info!("Group deleted: {} ({} notes ungrouped)", id, cleared);
        Ok(true)
    }

    /// Trash every note whose group id is `id`. The group itself stays.
    pub async fn delete_all_notes_in_group(&self, id: &str) -> Result<bool> {
        let exists = self.list_groups().await.iter().any(|g| g.id == id);
        if !exists {
            tracing::warn!("Group {} not found", id);
            return Ok(false);
        }

        let trashed = self
            .notes
            .trash_where(|n| n.group_id.as_deref() == Some(id))
            .await?;

        tracing::info!("Moved {} notes of group {} to trash", trashed, id);
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

    fn create_test_services() -> (GroupsService, NotesService, Arc<RecordingWindowFactory>) {
        let store = DocumentStore::in_memory();
        let factory = Arc::new(RecordingWindowFactory::new());
        let notes = NotesService::new(
            store.clone(),
            WindowRegistry::new(),
            factory.clone(),
            Arc::new(FixedScreen::default()),
        );
        (GroupsService::new(store, notes.clone()), notes, factory)
    }

    async fn note_in(notes: &NotesService, group_id: Option<&str>) -> String {
        notes
            .create_note(NewNote {
                group_id: group_id.map(str::to_string),
                ..NewNote::default()
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_create_group_defaults() {
        let (groups, _, _) = create_test_services();

        let group = groups.create_group(NewGroup::default()).await.unwrap();

        assert_eq!(group.name, "New Group");
        assert_eq!(group.color, "#2196f3");
        assert!(group.note_ids.is_empty());
        assert_eq!(groups.list_groups().await, vec![group]);
    }

    #[tokio::test]
    async fn test_update_group() {
        let (groups, _, _) = create_test_services();
        let group = groups.create_group(NewGroup::default()).await.unwrap();

        let patch = GroupPatch {
            name: Some("Work".to_string()),
            ..GroupPatch::default()
        };
        let updated = groups.update_group(&group.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.name, "Work");
        assert_eq!(updated.color, group.color);
        assert!(groups
            .update_group("missing", GroupPatch::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_group_keeps_notes() {
        let (groups, notes, _) = create_test_services();
        let group = groups.create_group(NewGroup::default()).await.unwrap();
        let member = note_in(&notes, Some(&group.id)).await;
        let other = note_in(&notes, None).await;

        assert!(groups.delete_group(&group.id).await.unwrap());

        assert!(groups.list_groups().await.is_empty());
        assert_eq!(notes.list_notes().await.len(), 2);
        assert!(notes.get_note(&member).await.unwrap().group_id.is_none());
        assert!(notes.get_note(&other).await.unwrap().group_id.is_none());
        assert!(!groups.delete_group(&group.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_all_notes_in_group_trashes_members_only() {
        let (groups, notes, factory) = create_test_services();
        let group = groups.create_group(NewGroup::default()).await.unwrap();
        let a = note_in(&notes, Some(&group.id)).await;
        let b = note_in(&notes, Some(&group.id)).await;
        let outsider = note_in(&notes, None).await;
        notes.open_window(&a).await.unwrap();

        assert!(groups.delete_all_notes_in_group(&group.id).await.unwrap());

        let live: Vec<String> = notes.list_notes().await.into_iter().map(|n| n.id).collect();
        assert_eq!(live, vec![outsider]);
        let mut trashed: Vec<String> = notes
            .list_trash()
            .await
            .into_iter()
            .map(|t| t.data.id)
            .collect();
        trashed.sort();
        let mut expected = vec![a.clone(), b];
        expected.sort();
        assert_eq!(trashed, expected);
        assert!(factory.latest(&a).unwrap().was_closed());
        assert_eq!(groups.list_groups().await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_all_notes_in_unknown_or_empty_group() {
        let (groups, notes, _) = create_test_services();
        let group = groups.create_group(NewGroup::default()).await.unwrap();
        note_in(&notes, None).await;

        assert!(!groups.delete_all_notes_in_group("missing").await.unwrap());
        assert!(groups.delete_all_notes_in_group(&group.id).await.unwrap());
        assert!(notes.list_trash().await.is_empty());
    }

    #[tokio::test]
    async fn test_moving_note_out_of_group() {
        let (groups, notes, _) = create_test_services();
        let group = groups.create_group(NewGroup::default()).await.unwrap();
        let id = note_in(&notes, Some(&group.id)).await;

        let patch = NotePatch {
            group_id: Some(None),
            ..NotePatch::default()
        };
        let updated = notes.update_note(&id, patch).await.unwrap().unwrap();

        assert!(updated.group_id.is_none());
    }
}
