//! Debounced auto-save for note editors
//!
//! Every content change restarts the delay; only the last value written
//! during a quiet period reaches the store. Closing a note window must call
//! `flush` before the window is torn down, otherwise the tail of the typing
//! since the last save is lost.

use crate::config;
use crate::store::{DocumentStore, Notes, SettingsEntry};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

type Sink<T> = Arc<dyn Fn(T) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Last-call-wins timer around an async sink
pub struct Debouncer<T> {
    inner: Arc<DebounceInner<T>>,
}

impl<T> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct DebounceInner<T> {
    delay: Duration,
    generation: AtomicU64,
    /// Held across the sink call so `flush` waits out an in-flight save
    pending: tokio::sync::Mutex<Option<T>>,
    sink: Sink<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F, Fut>(delay: Duration, sink: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let sink: Sink<T> = Arc::new(move |value| Box::pin(sink(value)));
        Self {
            inner: Arc::new(DebounceInner {
                delay,
                generation: AtomicU64::new(0),
                pending: tokio::sync::Mutex::new(None),
                sink,
            }),
        }
    }

    /// Replace the pending value and restart the timer
    pub async fn call(&self, value: T) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.inner.pending.lock().await = Some(value);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.delay).await;
            // A later call owns the timer now
            if inner.generation.load(Ordering::SeqCst) == generation {
                inner.fire().await;
            }
        });
    }

    /// Hand the pending value to the sink right away.
    /// Returns false when nothing was pending.
    pub async fn flush(&self) -> bool {
        self.inner.fire().await
    }

    pub async fn has_pending(&self) -> bool {
        self.inner.pending.lock().await.is_some()
    }
}

impl<T> DebounceInner<T> {
    async fn fire(&self) -> bool {
        let mut pending = self.pending.lock().await;
        match pending.take() {
            Some(value) => {
                (self.sink)(value).await;
                true
            }
            None => false,
        }
    }
}

/// One content debouncer per open note editor
#[derive(Clone)]
pub struct EditorSessions {
    store: DocumentStore,
    sessions: Arc<Mutex<HashMap<String, Debouncer<String>>>>,
}

impl EditorSessions {
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Debouncer<String>>> {
        self.sessions.lock().unwrap_or_else(|poisoned| {
            tracing::error!("Editor session lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    async fn session(&self, note_id: &str) -> Debouncer<String> {
        let existing = self.entries().get(note_id).cloned();
        if let Some(session) = existing {
            return session;
        }

        let settings = self.store.get::<SettingsEntry>().await;
        let delay_ms = settings.auto_save_delay_ms.clamp(
            config::MIN_AUTO_SAVE_DELAY_MS,
            config::MAX_AUTO_SAVE_DELAY_MS,
        );

        let store = self.store.clone();
        let id = note_id.to_string();
        let debouncer = Debouncer::new(Duration::from_millis(u64::from(delay_ms)), move |content| {
            save_content(store.clone(), id.clone(), content)
        });

        tracing::debug!("Opened editor session for note {} ({}ms)", note_id, delay_ms);
        self.entries()
            .entry(note_id.to_string())
            .or_insert(debouncer)
            .clone()
    }

    /// Record an edit; the store sees it once typing pauses
    pub async fn content_changed(&self, note_id: &str, content: String) {
        self.session(note_id).await.call(content).await;
    }

    /// Persist any pending content for `note_id` now
    pub async fn flush(&self, note_id: &str) -> bool {
        let session = self.entries().get(note_id).cloned();
        match session {
            Some(session) => session.flush().await,
            None => false,
        }
    }

    /// Flush and forget the session for `note_id`
    pub async fn close(&self, note_id: &str) -> bool {
        let session = self.entries().remove(note_id);
        match session {
            Some(session) => {
                tracing::debug!("Closing editor session for note {}", note_id);
                session.flush().await
            }
            None => false,
        }
    }

    /// Flush every session, returning how many had pending content
    pub async fn flush_all(&self) -> usize {
        let sessions: Vec<Debouncer<String>> = self.entries().values().cloned().collect();
        let mut flushed = 0;
        for session in sessions {
            if session.flush().await {
                flushed += 1;
            }
        }
        flushed
    }

    /// Flush and forget every session, returning how many had pending content
    pub async fn close_all(&self) -> usize {
        let sessions: Vec<(String, Debouncer<String>)> = self.entries().drain().collect();
        let mut flushed = 0;
        for (note_id, session) in sessions {
            tracing::debug!("Closing editor session for note {}", note_id);
            if session.flush().await {
                flushed += 1;
            }
        }
        flushed
    }

    pub fn open_sessions(&self) -> usize {
        self.entries().len()
    }
}

async fn save_content(store: DocumentStore, note_id: String, content: String) {
    let saved = store
        .update::<Notes, _, _>(|notes| {
            let note = notes.iter_mut().find(|n| n.id == note_id)?;
            if note.content == content {
                return None;
            }
            note.content = content;
            note.touch();
            Some(())
        })
        .await;

    match saved {
        Ok(Some(())) => tracing::debug!("Auto-saved note {}", note_id),
        Ok(None) => tracing::debug!("Auto-save skipped for note {}: missing or unchanged", note_id),
        Err(e) => tracing::error!("Auto-save failed for note {}: {}", note_id, e),
    }
}
