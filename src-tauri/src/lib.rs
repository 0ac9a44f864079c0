//! Markies library
//!
//! Sticky notes as floating desktop windows. This library exposes the
//! document store, the window platform seam and the lifecycle services
//! for testing; the `desktop` feature adds the Tauri shell.

pub mod app;
#[cfg(feature = "desktop")]
pub mod commands;
pub mod config;
pub mod error;
pub mod platform;
pub mod services;
pub mod store;

/// Build and run the desktop application
#[cfg(feature = "desktop")]
pub fn run() -> anyhow::Result<()> {
    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            tracing::info!("Running app setup");
            app::setup(app)?;
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::get_app_info,
            commands::list_notes,
            commands::get_note,
            commands::create_note,
            commands::create_new_sticky_note,
            commands::update_note,
            commands::delete_note,
            commands::expand_all_notes,
            commands::collapse_all_notes,
            commands::reset_all_opacity,
            commands::toggle_always_on_top,
            commands::toggle_opacity,
            commands::list_trash,
            commands::restore_note,
            commands::permanently_delete_note,
            commands::empty_trash,
            commands::list_groups,
            commands::create_group,
            commands::update_group,
            commands::delete_group,
            commands::delete_all_notes_in_group,
            commands::list_layouts,
            commands::save_layout,
            commands::restore_layout,
            commands::rearrange_notes,
            commands::reposition_notes,
            commands::get_settings,
            commands::update_settings,
            commands::note_content_changed,
            commands::flush_note,
            commands::open_note_window,
            commands::toggle_window_collapse,
            commands::set_window_opacity,
            commands::close_window,
            commands::minimize_window,
            commands::show_dashboard,
            commands::close_dashboard,
        ])
        .run(tauri::generate_context!())?;

    Ok(())
}
