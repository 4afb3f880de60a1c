//! Forwarding of navigation requests to the embedding host.
//!
//! Messages go out with no target-origin restriction (`"*"`): whatever page
//! embeds the tile wall receives them. This is a known trust weakness kept
//! for compatibility with the existing host integration.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Target origin used when posting to the parent window
pub const TARGET_ORIGIN: &str = "*";

/// Structured message sent to the embedding context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum RelayMessage {
    /// Ask the host to open an external URL
    OpenUrl { url: String },
}

impl RelayMessage {
    pub fn open_url(url: impl Into<String>) -> Self {
        RelayMessage::OpenUrl { url: url.into() }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Inline script that posts this message to the parent window, for use as
    /// an `onclick` attribute in serialised pages.
    pub fn post_message_script(&self) -> String {
        format!(
            "window.parent.postMessage({}, \"{}\")",
            self.to_json(),
            TARGET_ORIGIN
        )
    }
}

/// Fire-and-forget delivery of a message to the embedding context
pub trait Relay: Send + Sync {
    fn relay(&self, message: &RelayMessage);
}

/// Relay that only logs; used when there is no real host (CLI rendering)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRelay;

impl Relay for LogRelay {
    fn relay(&self, message: &RelayMessage) {
        log::info!("relay -> parent (origin {}): {}", TARGET_ORIGIN, message.to_json());
    }
}

/// Relay that keeps every message it receives
#[derive(Debug, Default, Clone)]
pub struct RecordingRelay {
    messages: Arc<Mutex<Vec<RelayMessage>>>,
}

impl RecordingRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<RelayMessage> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl Relay for RecordingRelay {
    fn relay(&self, message: &RelayMessage) {
        log::debug!("recorded relay message {}", message.to_json());
        if let Ok(mut lock) = self.messages.lock() {
            lock.push(message.clone());
        }
    }
}
