//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::config;
use crate::error::Result;
use crate::platform::{Screen, WindowFactory, WindowRegistry};
use crate::services::{ArrangeService, GroupsService, LayoutService, NotesService, SettingsService};
use crate::store::DocumentStore;
use std::path::PathBuf;
use std::sync::Arc;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub app_data_dir: PathBuf,
    pub store: DocumentStore,
    pub windows: WindowRegistry,
    pub notes: NotesService,
    pub groups: GroupsService,
    pub layouts: LayoutService,
    pub arrange: ArrangeService,
    pub settings: SettingsService,
}

impl AppState {
    /// Open the document in `app_data_dir` and build the services around it.
    /// An unreadable document is fatal.
    pub async fn initialize(
        app_data_dir: PathBuf,
        factory: Arc<dyn WindowFactory>,
        screen: Arc<dyn Screen>,
    ) -> Result<Self> {
        tokio::fs::create_dir_all(&app_data_dir).await?;

        let store_path = app_data_dir.join(config::STORE_FILE_NAME);
        tracing::info!("Opening document store at {:?}", store_path);
        let store = DocumentStore::open(store_path).await?;

        Ok(Self::from_store(app_data_dir, store, factory, screen))
    }

    pub fn from_store(
        app_data_dir: PathBuf,
        store: DocumentStore,
        factory: Arc<dyn WindowFactory>,
        screen: Arc<dyn Screen>,
    ) -> Self {
        let windows = WindowRegistry::new();
        let notes = NotesService::new(store.clone(), windows.clone(), factory, screen);

        Self {
            app_data_dir,
            groups: GroupsService::new(store.clone(), notes.clone()),
            layouts: LayoutService::new(store.clone(), notes.clone()),
            arrange: ArrangeService::new(store.clone(), windows.clone()),
            settings: SettingsService::new(store.clone()),
            notes,
            windows,
            store,
        }
    }
}

/// Application setup - called once on startup
#[cfg(feature = "desktop")]
pub fn setup(app: &mut tauri::App) -> Result<()> {
    use crate::error::AppError;
    use crate::platform::{events, TauriScreen, TauriWindowFactory};
    use tauri::Manager;

    tracing::info!("Initializing application");

    let app_data_dir = app
        .path()
        .app_data_dir()
        .map_err(|e| AppError::Generic(format!("Failed to get app data dir: {}", e)))?;

    tracing::info!("App data directory: {:?}", app_data_dir);

    let (sender, receiver) = events::channel();
    let handle = app.handle().clone();
    let factory = Arc::new(TauriWindowFactory::new(handle.clone(), sender));
    let screen = Arc::new(TauriScreen::new(handle));

    let state = tauri::async_runtime::block_on(AppState::initialize(app_data_dir, factory, screen))?;

    tauri::async_runtime::spawn(receiver.run(state.notes.clone()));
    app.manage(state.clone());

    tauri::async_runtime::spawn(async move {
        if let Err(e) = state.notes.open_visible_windows().await {
            tracing::error!("Failed to open note windows: {}", e);
        }
    });

    tracing::info!("Application initialized successfully");

    Ok(())
}
