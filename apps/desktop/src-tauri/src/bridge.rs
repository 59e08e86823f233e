//! Embedded Web Surface
//!
//! Runs bridge scripts in the MathPaste webview and routes the page's
//! answers back to whoever asked. See `mathpaste_core::bridge` for the
//! protocol itself.

use mathpaste_core::bridge::{self, BridgeMessage, PendingReplies, REPLY_TIMEOUT};
use mathpaste_core::{ContentSource, ExtractResult, MathDocument};
use std::sync::Arc;
use tauri::{AppHandle, Manager, Runtime, WebviewWindow};

use crate::controller;
use crate::state::AppState;

/// The webview as a source of the user's document
pub struct WebviewContent<R: Runtime> {
    window: WebviewWindow<R>,
    pending: Arc<PendingReplies>,
}

impl<R: Runtime> WebviewContent<R> {
    pub fn new(window: WebviewWindow<R>, pending: Arc<PendingReplies>) -> Self {
        Self { window, pending }
    }
}

impl<R: Runtime> ContentSource for WebviewContent<R> {
    async fn extract_content(&self) -> ExtractResult<MathDocument> {
        bridge::request_document(&self.pending, REPLY_TIMEOUT, |script: &str| {
            self.window.eval(script)
        })
        .await
    }
}

/// Handles a message the page sent through a bridge URL
pub fn handle_message<R: Runtime>(app: &AppHandle<R>, message: BridgeMessage) {
    let state = app.state::<AppState>();

    match message {
        BridgeMessage::Changed => {
            let was_saved = {
                let mut session = state.session.lock();
                let was_saved = session.is_saved();
                session.mark_modified();
                was_saved
            };
            if was_saved {
                tracing::debug!("Document modified");
                controller::refresh_title(app);
            }
        }
        BridgeMessage::Reply { id, outcome } => {
            tracing::debug!("Reply for request {}", id);
            state.pending.resolve(id, outcome);
        }
    }
}

/// Prepares a freshly loaded page: listen for changes, show any document
/// that was opened while the page was still loading
pub fn on_page_loaded<R: Runtime>(window: &WebviewWindow<R>) {
    let state = window.state::<AppState>();
    state.set_page_loaded(true);

    if let Err(e) = window.eval(&bridge::install_change_listener_script()) {
        tracing::error!("Failed to install change listener: {}", e);
    }

    let queued = state.queued_document.lock().take();
    if let Some(document) = queued {
        show_document(window, &document);
    }
}

/// Replaces the page's document
pub fn show_document<R: Runtime>(window: &WebviewWindow<R>, document: &MathDocument) {
    if let Err(e) = window.eval(&bridge::show_document_script(document)) {
        tracing::error!("Failed to show document in page: {}", e);
    }
}
