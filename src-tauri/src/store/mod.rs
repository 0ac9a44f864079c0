//! Document store
//!
//! This module provides the single persisted document holding every
//! collection the application owns:
//! - Models for notes, groups, layouts, trash items and settings
//! - Typed collection handles
//! - `DocumentStore`, the read / replace / persist contract
//!
//! Reads hand out clones of the in-memory snapshot. Writes replace one
//! top-level collection and persist the whole document with an atomic
//! temp-file-and-rename, so the file on disk is never half written.

pub mod collections;
pub mod document;
pub mod models;

pub use collections::*;
pub use document::Document;
pub use models::*;

use crate::error::{AppError, Result};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Process-wide document store. Cloning shares the same document.
#[derive(Clone)]
pub struct DocumentStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    /// `None` keeps everything in memory
    path: Option<PathBuf>,
    document: Mutex<Document>,
    writes: AtomicU64,
}

impl DocumentStore {
    /// Open the document at `path`, creating it with defaults if missing.
    ///
    /// Any failure to read or parse an existing file is reported as
    /// `StorageUnavailable`: the application cannot run without it.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        tracing::info!("Opening document store at: {:?}", path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::StorageUnavailable(format!("cannot create {:?}: {}", parent, e))
            })?;
        }

        let (document, needs_write) = if path.exists() {
            let content = fs::read_to_string(&path).await.map_err(|e| {
                AppError::StorageUnavailable(format!("cannot read {:?}: {}", path, e))
            })?;
            let mut document: Document = serde_json::from_str(&content).map_err(|e| {
                AppError::StorageUnavailable(format!("cannot parse {:?}: {}", path, e))
            })?;
            let migrated = document.migrate();
            (document, migrated)
        } else {
            tracing::info!("Store file not found, creating default document");
            (Document::default(), true)
        };

        tracing::info!(
            "Loaded {} notes, {} groups, {} layouts, {} trash items",
            document.notes.len(),
            document.groups.len(),
            document.layouts.len(),
            document.trash.len()
        );

        let store = Self::from_parts(Some(path), document);
        if needs_write {
            let document = store.inner.document.lock().await;
            store.persist(&document).await?;
        }

        Ok(store)
    }

    /// Store without a backing file
    pub fn in_memory() -> Self {
        Self::from_parts(None, Document::default())
    }

    /// In-memory store seeded with `document`
    pub fn with_document(document: Document) -> Self {
        Self::from_parts(None, document)
    }

    fn from_parts(path: Option<PathBuf>, document: Document) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                path,
                document: Mutex::new(document),
                writes: AtomicU64::new(0),
            }),
        }
    }

    /// Number of persisted writes since the store was opened
    pub fn write_count(&self) -> u64 {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Current value of one collection
    pub async fn get<C: Collection>(&self) -> C::Value {
        let document = self.inner.document.lock().await;
        C::read(&document).clone()
    }

    /// Replace one collection and persist the document
    pub async fn set<C: Collection>(&self, value: C::Value) -> Result<()> {
        let mut document = self.inner.document.lock().await;
        let mut next = document.clone();
        *C::slot(&mut next) = value;
        self.persist(&next).await?;
        *document = next;
        tracing::debug!("Replaced collection: {}", C::NAME);
        Ok(())
    }

    /// Read, mutate and write back one collection without letting another
    /// writer in between. When `f` returns `None` nothing is written.
    pub async fn update<C, R, F>(&self, f: F) -> Result<Option<R>>
    where
        C: Collection,
        F: FnOnce(&mut C::Value) -> Option<R>,
    {
        let mut document = self.inner.document.lock().await;
        let mut next = document.clone();

        let Some(outcome) = f(C::slot(&mut next)) else {
            return Ok(None);
        };

        self.persist(&next).await?;
        *document = next;
        tracing::debug!("Updated collection: {}", C::NAME);
        Ok(Some(outcome))
    }

    /// Copy of the whole document
    pub async fn snapshot(&self) -> Document {
        self.inner.document.lock().await.clone()
    }

    async fn persist(&self, document: &Document) -> Result<()> {
        let Some(path) = &self.inner.path else {
            self.inner.writes.fetch_add(1, Ordering::SeqCst);
            return Ok(());
        };

        let content = serde_json::to_vec_pretty(document)?;

        // Write to temp file first (atomic write)
        let temp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(&content).await?;
        file.sync_all().await?;

        fs::rename(&temp_path, path).await.map_err(|e| {
            tracing::error!("Failed to replace store file {:?}: {}", path, e);
            AppError::Io(e)
        })?;
        self.inner.writes.fetch_add(1, Ordering::SeqCst);

        tracing::debug!("Persisted document ({} bytes)", content.len());
        Ok(())
    }
}
