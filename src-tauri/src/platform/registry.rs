//! Window registry
//!
//! Maps note ids to their live window handle. At most one handle per note
//! id is registered at a time. Every handle carries a `WindowInstance` so
//! events from a window that has since been replaced can be told apart.

use super::NoteWindow;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Process-unique number of one window, distinct across reopenings of the
/// same note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowInstance(u64);

impl fmt::Display for WindowInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone)]
struct Registered {
    instance: WindowInstance,
    handle: Arc<dyn NoteWindow>,
}

/// Live note windows keyed by note id. Cloning shares the same registry.
#[derive(Clone, Default)]
pub struct WindowRegistry {
    windows: Arc<Mutex<HashMap<String, Registered>>>,
    next_instance: Arc<AtomicU64>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Registered>> {
        self.windows.lock().unwrap_or_else(|poisoned| {
            tracing::error!("Window registry lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Reserve the instance number for a window about to be created
    pub fn next_instance(&self) -> WindowInstance {
        WindowInstance(self.next_instance.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Register `handle` for `note_id`, returning any handle it replaced
    pub fn register(
        &self,
        note_id: &str,
        instance: WindowInstance,
        handle: Arc<dyn NoteWindow>,
    ) -> Option<Arc<dyn NoteWindow>> {
        tracing::debug!("Registering window {} for note {}", instance, note_id);
        self.entries()
            .insert(note_id.to_string(), Registered { instance, handle })
            .map(|previous| previous.handle)
    }

    pub fn get(&self, note_id: &str) -> Option<Arc<dyn NoteWindow>> {
        self.entries().get(note_id).map(|r| r.handle.clone())
    }

    pub fn contains(&self, note_id: &str) -> bool {
        self.entries().contains_key(note_id)
    }

    /// Whether `instance` is the window currently registered for `note_id`
    pub fn is_current(&self, note_id: &str, instance: WindowInstance) -> bool {
        self.entries()
            .get(note_id)
            .is_some_and(|r| r.instance == instance)
    }

    pub fn unregister(&self, note_id: &str) -> Option<Arc<dyn NoteWindow>> {
        self.entries().remove(note_id).map(|r| r.handle)
    }

    /// Remove the entry for `note_id` only if it still belongs to `instance`
    pub fn unregister_instance(&self, note_id: &str, instance: WindowInstance) -> bool {
        let mut entries = self.entries();
        if entries.get(note_id).is_some_and(|r| r.instance == instance) {
            entries.remove(note_id);
            true
        } else {
            false
        }
    }

    /// Empty the registry, handing back every handle
    pub fn drain(&self) -> Vec<(String, Arc<dyn NoteWindow>)> {
        self.entries()
            .drain()
            .map(|(note_id, r)| (note_id, r.handle))
            .collect()
    }

    pub fn note_ids(&self) -> Vec<String> {
        self.entries().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
