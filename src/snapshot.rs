//! Read-back of a serialised page: a text snapshot for quick inspection and a
//! content digest for golden tests.

use crate::builders::TileKind;
use crate::{Error, Result};
use scraper::{ElementRef, Html, Selector};
use sha2::{Digest, Sha256};

/// A textual snapshot of a rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSnapshot {
    /// Page title
    pub title: String,
    /// Visible text of `<body>`
    pub text: String,
    /// Kinds of the grid cells, in document order
    pub tiles: Vec<TileKind>,
    /// Whether the offline banner is present
    pub offline_banner: bool,
}

impl TextSnapshot {
    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|k| **k == kind).count()
    }
}

fn selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| Error::RenderError(format!("bad selector '{}': {:?}", s, e)))
}

/// Parse `html` and describe what the grid container `container_id` holds.
pub fn text_snapshot(html: &str, container_id: &str) -> Result<TextSnapshot> {
    let document = Html::parse_document(html);

    let title = document
        .select(&selector("title")?)
        .next()
        .map(|n| n.text().collect::<String>())
        .unwrap_or_default();

    let text = document
        .select(&selector("body")?)
        .next()
        .map(|b| b.text().collect::<String>())
        .unwrap_or_default();

    let mut tiles = Vec::new();
    if let Some(container) = document.select(&selector(&format!("#{}", container_id))?).next() {
        for cell in container.children().filter_map(ElementRef::wrap) {
            tiles.push(classify(cell));
        }
    }

    let offline_banner = document.select(&selector(".offline-background")?).next().is_some();

    Ok(TextSnapshot {
        title,
        text,
        tiles,
        offline_banner,
    })
}

fn classify(cell: ElementRef) -> TileKind {
    let is_container = cell
        .value()
        .attr("class")
        .map(|c| c.split_whitespace().any(|c| c == "video-container"))
        .unwrap_or(false);
    if !is_container {
        return TileKind::Blank;
    }
    let playing = cell
        .children()
        .filter_map(ElementRef::wrap)
        .any(|c| c.value().name() == "iframe" && c.value().attr("src").is_some());
    if playing {
        TileKind::Live
    } else {
        TileKind::IdleMember
    }
}

/// Hex SHA-256 of a serialised page
pub fn digest(html: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(html.as_bytes());
    hex::encode(hasher.finalize())
}
