//! Page bridge protocol
//!
//! The host talks to the embedded MathPaste page by evaluating small
//! scripts in it. The page answers by navigating to a
//! `mathpaste-bridge://` URL, which the host intercepts and cancels:
//!
//! - `mathpaste-bridge://changed` - the document was modified
//! - `mathpaste-bridge://reply?id=<n>&total=<len>&data=<json>` - answer to
//!   request `n`, one part of a JSON text `len` UTF-16 units long
//! - `mathpaste-bridge://reply?id=<n>&error=<message>` - request `n` failed
//!
//! Query values are URI-encoded by the page. Requests are matched to
//! replies through [`PendingReplies`].
//!
//! An export bigger than [`PART_SIZE`] stays in the page and is fetched
//! part by part with [`part_script`], so no single URL grows past what
//! the webview accepts. [`request_document`] drives the whole exchange.

use crate::document::MathDocument;
use crate::error::{BridgeError, ExtractError, ExtractResult};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::oneshot;
use url::Url;

/// URL scheme the page navigates to when answering
pub const BRIDGE_SCHEME: &str = "mathpaste-bridge";

/// How long the page gets to answer one request
pub const REPLY_TIMEOUT: Duration = Duration::from_secs(5);

/// Most UTF-16 units of JSON the page puts into one reply URL
///
/// URI-encoding at most triples the size, which keeps a reply well below
/// the 2 MB URL limit of WebView2.
pub const PART_SIZE: usize = 256 * 1024;

/// Error value the page sends when `window.mathpaste` does not exist yet
const NOT_LOADED: &str = "not-loaded";

/// Identifies one request to the page
pub type RequestId = u64;

/// A message from the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeMessage {
    /// The user modified the document
    Changed,
    /// Answer to an earlier request
    Reply { id: RequestId, outcome: ReplyOutcome },
}

/// What the page answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// A part of the JSON text produced by the page, and the length of the
    /// whole text in UTF-16 units
    Data { part: String, total: usize },
    /// Error text produced by the page
    Error(String),
}

impl ReplyOutcome {
    /// A reply carrying the whole JSON text at once
    pub fn complete(json: impl Into<String>) -> Self {
        let part = json.into();
        Self::Data {
            total: utf16_len(&part),
            part,
        }
    }
}

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Returns true if the page is talking to the host through `url`
pub fn is_bridge_url(url: &Url) -> bool {
    url.scheme() == BRIDGE_SCHEME
}

/// Parses a bridge URL into a message
pub fn parse_message(url: &Url) -> Result<BridgeMessage, BridgeError> {
    if !is_bridge_url(url) {
        return Err(BridgeError::NotBridgeUrl(url.to_string()));
    }

    match url.host_str().unwrap_or("") {
        "changed" => Ok(BridgeMessage::Changed),
        "reply" => parse_reply(url),
        other => Err(BridgeError::UnknownMessage(other.to_string())),
    }
}

fn parse_reply(url: &Url) -> Result<BridgeMessage, BridgeError> {
    let mut id = None;
    let mut total = None;
    let mut data = None;
    let mut error = None;

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "id" => id = value.parse::<RequestId>().ok(),
            "total" => total = value.parse::<usize>().ok(),
            "data" => data = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    let id = id.ok_or(BridgeError::InvalidId)?;
    let outcome = match (error, data) {
        (Some(message), _) => ReplyOutcome::Error(message),
        (None, Some(part)) => match total {
            Some(total) => ReplyOutcome::Data { part, total },
            None => ReplyOutcome::complete(part),
        },
        (None, None) => return Err(BridgeError::MissingPayload(id)),
    };
    Ok(BridgeMessage::Reply { id, outcome })
}

fn page_error(message: String) -> ExtractError {
    if message == NOT_LOADED {
        ExtractError::NotLoaded
    } else {
        ExtractError::Script(message)
    }
}

/// Runs `script` in the page and waits for its reply
///
/// The request is forgotten again when `eval` fails or the page stays
/// silent for `timeout`.
async fn ask<F, E>(
    pending: &PendingReplies,
    timeout: Duration,
    eval: &mut F,
    script: impl FnOnce(RequestId) -> String,
) -> ExtractResult<(RequestId, ReplyOutcome)>
where
    F: FnMut(&str) -> Result<(), E>,
    E: Display,
{
    let (id, reply) = pending.register();

    if let Err(e) = eval(&script(id)) {
        pending.cancel(id);
        return Err(ExtractError::Eval(e.to_string()));
    }

    match tokio::time::timeout(timeout, reply).await {
        Ok(Ok(outcome)) => Ok((id, outcome)),
        Ok(Err(_)) => Err(ExtractError::Closed),
        Err(_) => {
            pending.cancel(id);
            Err(ExtractError::Timeout {
                seconds: timeout.as_secs(),
            })
        }
    }
}

/// Fetches the page's document
///
/// `eval` runs a script in the page. Replies reach the returned future
/// through `pending`, so whoever sees the page's bridge URLs must pass
/// them to [`PendingReplies::resolve`]. Every request, including each
/// part of a large export, gets `timeout` to be answered.
pub async fn request_document<F, E>(
    pending: &PendingReplies,
    timeout: Duration,
    mut eval: F,
) -> ExtractResult<MathDocument>
where
    F: FnMut(&str) -> Result<(), E>,
    E: Display,
{
    let (export_id, first) = ask(pending, timeout, &mut eval, extract_script).await?;
    let (mut json, total) = match first {
        ReplyOutcome::Data { part, total } => (part, total),
        ReplyOutcome::Error(message) => return Err(page_error(message)),
    };

    let mut received = utf16_len(&json);
    while received < total {
        let offset = received;
        let (_, reply) = ask(pending, timeout, &mut eval, |id| {
            part_script(id, export_id, offset)
        })
        .await?;

        let part = match reply {
            ReplyOutcome::Data { part, .. } => part,
            ReplyOutcome::Error(message) => return Err(page_error(message)),
        };
        if part.is_empty() {
            return Err(ExtractError::Malformed(format!(
                "export ended after {} of {} characters",
                received, total
            )));
        }
        received += utf16_len(&part);
        json.push_str(&part);
    }

    tracing::debug!("Received export {} ({} characters)", export_id, received);
    serde_json::from_str(&json).map_err(|e| ExtractError::Malformed(e.to_string()))
}

/// Requests waiting for the page to answer
#[derive(Debug, Default)]
pub struct PendingReplies {
    next_id: AtomicU64,
    waiting: Mutex<HashMap<RequestId, oneshot::Sender<ReplyOutcome>>>,
}

impl PendingReplies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a request id and the receiver its answer arrives on
    pub fn register(&self) -> (RequestId, oneshot::Receiver<ReplyOutcome>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.waiting.lock().insert(id, tx);
        (id, rx)
    }

    /// Delivers an answer; returns false if nobody waits for `id`
    pub fn resolve(&self, id: RequestId, outcome: ReplyOutcome) -> bool {
        let Some(tx) = self.waiting.lock().remove(&id) else {
            tracing::warn!("Dropping reply for unknown request {}", id);
            return false;
        };
        // The receiver is gone if the request timed out meanwhile
        tx.send(outcome).is_ok()
    }

    /// Forgets a request that will never be answered
    pub fn cancel(&self, id: RequestId) {
        self.waiting.lock().remove(&id);
    }

    /// Drops every waiting request; their receivers see a closed channel
    pub fn cancel_all(&self) {
        self.waiting.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.waiting.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

const WHEN_READY: &str = r#"(function run() {
  if (!window.mathpaste) {
    setTimeout(run, 200);
    return;
  }
  __BODY__
})();"#;

const CHANGE_LISTENER_BODY: &str = r#"if (window.__mathpasteDesktopListening) {
    return;
  }
  window.__mathpasteDesktopListening = true;
  window.mathpaste.addChangeCallback(function () {
    window.location.href = __CHANGED_URL__;
  });"#;

const SEND_PART: &str = r#"function sendPart(data, start) {
    var end = Math.min(start + __PART_SIZE__, data.length);
    if (end < data.length) {
      var last = data.charCodeAt(end - 1);
      if (last >= 0xD800 && last <= 0xDBFF) {
        end -= 1;
      }
    }
    window.location.href = base + "&total=" + data.length +
      "&data=" + encodeURIComponent(data.slice(start, end));
    return end;
  }"#;

const EXTRACT: &str = r#"(function () {
  var base = __REPLY_URL__;
  __SEND_PART__
  try {
    if (!window.mathpaste) {
      window.location.href = base + "&error=__NOT_LOADED__";
      return;
    }
    var data = JSON.stringify(window.mathpaste.getMathAndImage());
    if (sendPart(data, 0) < data.length) {
      window.mathpasteDesktopExports = window.mathpasteDesktopExports || {};
      window.mathpasteDesktopExports[__EXPORT_ID__] = data;
    }
  } catch (e) {
    window.location.href = base + "&error=" + encodeURIComponent(String(e));
  }
})();"#;

const PART: &str = r#"(function () {
  var base = __REPLY_URL__;
  __SEND_PART__
  var exports = window.mathpasteDesktopExports || {};
  var data = exports[__EXPORT_ID__];
  if (data === undefined) {
    window.location.href = base + "&error=" + encodeURIComponent("export __EXPORT_ID__ is gone");
    return;
  }
  if (sendPart(data, __OFFSET__) >= data.length) {
    delete exports[__EXPORT_ID__];
  }
})();"#;

/// JSON text is a valid JavaScript literal
fn js_literal(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

/// Script that makes the page report every modification
///
/// Safe to run on every page load: it waits for the application to appear
/// and registers the callback only once per page.
pub fn install_change_listener_script() -> String {
    let changed_url = js_literal(&format!("{}://changed", BRIDGE_SCHEME));
    WHEN_READY.replace(
        "__BODY__",
        &CHANGE_LISTENER_BODY.replace("__CHANGED_URL__", &changed_url),
    )
}

fn reply_url(id: RequestId) -> String {
    js_literal(&format!("{}://reply?id={}", BRIDGE_SCHEME, id))
}

fn send_part() -> String {
    SEND_PART.replace("__PART_SIZE__", &PART_SIZE.to_string())
}

/// Script that sends the current document back as reply `id`
///
/// Only the first [`PART_SIZE`] units are sent. The rest is kept in the
/// page under export id `id` for [`part_script`].
pub fn extract_script(id: RequestId) -> String {
    EXTRACT
        .replace("__SEND_PART__", &send_part())
        .replace("__REPLY_URL__", &reply_url(id))
        .replace("__NOT_LOADED__", NOT_LOADED)
        .replace("__EXPORT_ID__", &id.to_string())
}

/// Script that sends the part of export `export_id` starting at `offset`
/// (in UTF-16 units) back as reply `id`
pub fn part_script(id: RequestId, export_id: RequestId, offset: usize) -> String {
    PART.replace("__SEND_PART__", &send_part())
        .replace("__REPLY_URL__", &reply_url(id))
        .replace("__EXPORT_ID__", &export_id.to_string())
        .replace("__OFFSET__", &offset.to_string())
}

/// Script that replaces the page's document, once the page is ready
pub fn show_document_script(document: &MathDocument) -> String {
    let body = format!(
        "window.mathpaste.setMathAndImage({}, {});",
        js_literal(&document.math),
        js_literal(&document.image_string)
    );
    WHEN_READY.replace("__BODY__", &body)
}
