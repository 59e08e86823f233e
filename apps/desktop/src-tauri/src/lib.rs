//! MathPaste Desktop
//!
//! Tauri 2.x desktop shell around the MathPaste web app. The math editing
//! happens in the remote page; this crate adds what a browser tab lacks:
//! - Open and save text or zip files through native dialogs
//! - Remembering the last save directory and the zoom level
//! - Keeping links to other sites out of the app window

mod bridge;
mod cli;
mod controller;
mod dialogs;
mod menu;
mod navigation;
mod state;

use clap::Parser;
use tauri::RunEvent;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::state::AppState;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mathpaste_desktop=info,mathpaste_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Runs the application.
///
/// Loads settings, opens the MathPaste window and, if a file was given on
/// the command line, opens it once the page is ready. Settings are written
/// back when the application exits.
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let args = cli::Args::parse();
    init_tracing();

    tracing::info!("Starting MathPaste Desktop {}", env!("CARGO_PKG_VERSION"));

    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .plugin(tauri_plugin_dialog::init())
        .manage(AppState::load())
        .menu(menu::build_menu)
        .on_menu_event(menu::handle_menu_event)
        .setup(move |app| {
            controller::create_main_window(app.handle())?;

            if let Some(file) = &args.file {
                controller::open_path(app.handle(), file);
            }

            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app, event| {
            if let RunEvent::Exit = event {
                controller::persist_settings(app);
            }
        });
}
