//! livetiles
//!
//! Renders a wall of live-stream tiles for a streamer group from a remote
//! JSON feed. When members are live, each broadcast gets a muted autoplaying
//! video tile with a tinted overlay that asks the embedding host to open the
//! watch page; when nobody is live, member icons are shown on their colors
//! together with an "under construction" banner.
//!
//! The page is built headlessly through the [`dom::Dom`] capability trait and
//! serialised to a standalone HTML document.
//!
//! # Example
//!
//! ```
//! use livetiles::feed::{FeedSnapshot, StaticFeedSource};
//! use livetiles::relay::RecordingRelay;
//! use livetiles::{PageConfig, PageController, PageState};
//! use std::sync::Arc;
//!
//! let feed = FeedSnapshot::from_json(
//!     r##"{"live": [], "member": {"a": {"icon_url": "a.png", "color": "#336699"}}}"##,
//! ).unwrap();
//! let controller = PageController::new(PageConfig::default(), Arc::new(RecordingRelay::new()));
//! let mut page = controller.new_page().unwrap();
//! let state = controller.load(&StaticFeedSource::new(feed), &mut page).unwrap();
//! assert!(matches!(state, PageState::Rendered(_)));
//! assert!(page.to_html().contains("offline-background"));
//! ```

use std::collections::HashMap;

pub mod error;
pub use error::{Error, Result};

pub mod builders;
pub mod color;
pub mod controller;
pub mod dom;
pub mod feed;
pub mod page;
pub mod relay;
pub mod snapshot;

// Async loading (fetch on a worker thread, resolve on a oneshot)
pub mod async_api;

pub use controller::{pad_count, PageController, PageState, RenderMode, RenderSummary};
pub use dom::{Document, Dom, NodeId};
pub use feed::{FeedSnapshot, LiveEntry, MemberInfo};
pub use relay::{Relay, RelayMessage};

/// Feed the page is driven by when nothing else is configured
pub const DEFAULT_FEED_URL: &str =
    "https://raw.githubusercontent.com/nyakukonyaku/charact_maintenance_asset/refs/heads/main/return.json";

/// Configuration for loading and rendering the page
///
/// # Examples
///
/// ```
/// let cfg = livetiles::PageConfig::default();
/// assert_eq!(cfg.columns, 3);
/// assert_eq!(cfg.container_id, "main");
/// ```
#[derive(Debug, Clone)]
pub struct PageConfig {
    /// Where the feed is fetched from
    pub feed_url: String,
    /// User agent string sent with the feed request
    pub user_agent: String,
    /// Timeout for the feed request in milliseconds
    pub timeout_ms: u64,
    /// Extra HTTP headers for the feed request
    pub headers: HashMap<String, String>,
    /// `id` of the grid container tiles are appended to
    pub container_id: String,
    /// Grid width used by the padding rule
    pub columns: usize,
    /// Document title of the page shell
    pub title: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            user_agent: format!("livetiles/{}", env!("CARGO_PKG_VERSION")),
            timeout_ms: 30000,
            headers: HashMap::new(),
            container_id: "main".to_string(),
            columns: 3,
            title: "LIVE".to_string(),
        }
    }
}

impl PageConfig {
    /// Check the configuration before any request is made
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.feed_url)
            .map_err(|e| Error::ConfigError(format!("invalid feed url '{}': {}", self.feed_url, e)))?;
        if self.columns == 0 {
            return Err(Error::ConfigError("columns must be at least 1".into()));
        }
        if self.container_id.trim().is_empty() {
            return Err(Error::ConfigError("container id must not be empty".into()));
        }
        Ok(())
    }
}
