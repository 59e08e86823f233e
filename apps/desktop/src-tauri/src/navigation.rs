//! Navigation policy for the MathPaste webview
//!
//! The webview may only show the MathPaste page. Links to anywhere else
//! open in the system browser, and `mathpaste-bridge://` navigations are
//! messages from the page that never actually load.

use mathpaste_core::{classify, Navigation};
use tauri::{AppHandle, Runtime};
use tauri_plugin_shell::ShellExt;
use url::Url;

use crate::bridge;

/// Decides whether the webview may load `url`
pub fn allow_navigation<R: Runtime>(app: &AppHandle<R>, url: &Url) -> bool {
    match classify(url) {
        Navigation::Allow => true,
        Navigation::Bridge(Ok(message)) => {
            bridge::handle_message(app, message);
            false
        }
        Navigation::Bridge(Err(e)) => {
            tracing::warn!("Ignoring bad bridge URL: {}", e);
            false
        }
        Navigation::OpenExternally => {
            tracing::info!("Opening external link in browser: {}", url);
            open_in_browser(app, url);
            false
        }
    }
}

#[allow(deprecated)]
fn open_in_browser<R: Runtime>(app: &AppHandle<R>, url: &Url) {
    if let Err(e) = app.shell().open(url.as_str(), None) {
        tracing::error!("Failed to open {} in browser: {}", url, e);
    }
}
