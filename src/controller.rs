//! Page controller: fetch the feed, pick live or offline mode, build and
//! append tiles, pad the grid.

use crate::builders::{self, TileKind};
use crate::dom::{Document, Dom, NodeId};
use crate::feed::{FeedSnapshot, FeedSource};
use crate::page::PageShell;
use crate::relay::Relay;
use crate::{Error, PageConfig, Result};
use std::sync::{Arc, Mutex};

/// Which branch the controller took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Live,
    Offline,
}

/// What a render appended, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub mode: RenderMode,
    pub tiles: Vec<TileKind>,
}

impl RenderSummary {
    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|k| **k == kind).count()
    }
}

/// Lifecycle of one page load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    /// Shell built, feed not applied yet
    Loading,
    Rendered(RenderSummary),
    /// The feed could not be fetched or parsed; the page was left untouched
    FetchFailed(String),
}

/// Number of blank tiles appended after `count` tiles.
///
/// This is `columns - count % columns`, so an already full last row still gets
/// a whole row of blanks (3 → 3, 4 → 2, 5 → 1, 6 → 3 for three columns).
pub fn pad_count(count: usize, columns: usize) -> usize {
    if columns == 0 {
        return 0;
    }
    columns - (count % columns)
}

pub struct PageController {
    config: PageConfig,
    relay: Arc<dyn Relay>,
    state: Mutex<PageState>,
}

impl PageController {
    pub fn new(config: PageConfig, relay: Arc<dyn Relay>) -> Self {
        Self {
            config,
            relay,
            state: Mutex::new(PageState::Loading),
        }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// State of the most recent page load
    pub fn state(&self) -> PageState {
        self.state
            .lock()
            .map(|s| s.clone())
            .unwrap_or(PageState::Loading)
    }

    fn set_state(&self, state: PageState) {
        log::debug!("page state: {:?}", state);
        if let Ok(mut lock) = self.state.lock() {
            *lock = state;
        }
    }

    /// A fresh document holding only the page shell; resets the state to
    /// [`PageState::Loading`]
    pub fn new_page(&self) -> Result<Document> {
        let (doc, _) = PageShell::build(&self.config)?;
        self.set_state(PageState::Loading);
        Ok(doc)
    }

    /// Fetch the feed from `source` and render it into `doc`.
    ///
    /// Fetch and parse failures are logged and reported as
    /// [`PageState::FetchFailed`] with `doc` unchanged. Errors raised while
    /// building tiles (a live entry naming an unknown member, a DOM failure)
    /// are returned, and whatever was appended before stays in `doc`.
    pub fn load(&self, source: &dyn FeedSource, doc: &mut Document) -> Result<PageState> {
        log::debug!("fetching feed from {}", source.describe());
        let result = source.fetch();
        self.finish_load(result, doc)
    }

    /// Second half of a load, shared by the sync and async entry points.
    ///
    /// On an error return the state stays [`PageState::Loading`].
    pub fn finish_load(&self, fetched: Result<FeedSnapshot>, doc: &mut Document) -> Result<PageState> {
        let state = match fetched {
            Ok(feed) => {
                let shell = PageShell::locate(doc, &self.config)?;
                PageState::Rendered(self.render(&feed, doc, &shell)?)
            }
            Err(e) if e.is_fetch_failure() => {
                log::error!("{}", e);
                PageState::FetchFailed(e.to_string())
            }
            Err(e) => return Err(e),
        };
        self.set_state(state.clone());
        Ok(state)
    }

    /// Build every tile for `feed` and attach it: tiles and padding go into
    /// `shell.container`, the offline banner into `shell.body`.
    pub fn render<D: Dom + ?Sized>(
        &self,
        feed: &FeedSnapshot,
        dom: &mut D,
        shell: &PageShell,
    ) -> Result<RenderSummary> {
        let columns = self.config.columns;
        let mut tiles = Vec::new();

        let mode = if feed.is_live() {
            log::info!("{} live broadcast(s)", feed.live.len());
            for entry in &feed.live {
                let member = feed
                    .member
                    .get(&entry.from)
                    .ok_or_else(|| Error::MissingMember(entry.from.clone()))?;
                let tile = builders::live_tile(dom, member, entry, self.relay.clone())?;
                dom.append_child(shell.container, tile)?;
                tiles.push(TileKind::Live);
            }
            self.pad(dom, shell.container, pad_count(feed.live.len(), columns), &mut tiles)?;
            RenderMode::Live
        } else {
            log::info!("nobody live, showing {} member(s)", feed.member.len());
            for (key, member) in feed.member.iter() {
                log::debug!("idle tile for {}", key);
                let tile = builders::idle_member_tile(dom, member)?;
                dom.append_child(shell.container, tile)?;
                tiles.push(TileKind::IdleMember);
            }
            self.pad(dom, shell.container, pad_count(feed.member.len(), columns), &mut tiles)?;

            let banner = builders::offline_banner(dom)?;
            dom.append_child(shell.body, banner)?;
            tiles.push(TileKind::OfflineBanner);
            RenderMode::Offline
        };

        log::debug!("rendered {} node(s) in {:?} mode", tiles.len(), mode);
        Ok(RenderSummary { mode, tiles })
    }

    fn pad<D: Dom + ?Sized>(
        &self,
        dom: &mut D,
        container: NodeId,
        count: usize,
        tiles: &mut Vec<TileKind>,
    ) -> Result<()> {
        for _ in 0..count {
            let blank = builders::blank_tile(dom)?;
            dom.append_child(container, blank)?;
            tiles.push(TileKind::Blank);
        }
        Ok(())
    }

    /// The clickable overlay of the live tile playing `video_id`, if any
    pub fn find_live_overlay(&self, doc: &Document, video_id: &str) -> Option<NodeId> {
        let container = doc.get_element_by_id(&self.config.container_id)?;
        let src = builders::embed_url(video_id);
        doc.children(container).iter().copied().find_map(|tile| {
            let plays = doc
                .children(tile)
                .iter()
                .any(|c| doc.get(*c).and_then(|e| e.attr("src")) == Some(src.as_str()));
            if plays {
                doc.find_by_class(tile, "mouseover")
            } else {
                None
            }
        })
    }
}
