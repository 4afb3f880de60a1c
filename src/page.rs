//! The hosting page shell: `html`, `head` with the stylesheet, and a `body`
//! holding the empty grid container the controller fills.

use crate::dom::{Document, Dom, NodeId};
use crate::{Error, PageConfig, Result};

/// Stylesheet for the grid and the hover reveal of the live overlay layers
pub const SHELL_CSS: &str = include_str!("shell.css");

/// Handles to the fixed parts of the page
#[derive(Debug, Clone, Copy)]
pub struct PageShell {
    pub html: NodeId,
    pub head: NodeId,
    pub body: NodeId,
    pub container: NodeId,
}

impl PageShell {
    /// Build the shell into a fresh document
    pub fn build(config: &PageConfig) -> Result<(Document, PageShell)> {
        let mut doc = Document::new();
        let html = doc.create_root("html");

        let head = doc.create_element("head");
        let meta = doc.create_element("meta");
        doc.set_attribute(meta, "charset", "utf-8")?;
        let title = doc.create_element("title");
        doc.set_text(title, &config.title)?;
        let style = doc.create_element("style");
        doc.set_text(style, SHELL_CSS)?;
        doc.append_child(head, meta)?;
        doc.append_child(head, title)?;
        doc.append_child(head, style)?;

        let body = doc.create_element("body");
        let container = doc.create_element("div");
        doc.set_attribute(container, "id", &config.container_id)?;
        doc.append_child(body, container)?;

        doc.append_child(html, head)?;
        doc.append_child(html, body)?;

        Ok((
            doc,
            PageShell {
                html,
                head,
                body,
                container,
            },
        ))
    }

    /// Recover the shell handles from a document built by [`PageShell::build`]
    pub fn locate(doc: &Document, config: &PageConfig) -> Result<PageShell> {
        let html = doc
            .root()
            .ok_or_else(|| Error::RenderError("document has no root".into()))?;
        let find = |tag: &str| {
            doc.children(html)
                .iter()
                .copied()
                .find(|n| doc.get(*n).map(|e| e.tag == tag).unwrap_or(false))
                .ok_or_else(|| Error::RenderError(format!("document has no <{}>", tag)))
        };
        let head = find("head")?;
        let body = find("body")?;
        let container = doc.get_element_by_id(&config.container_id).ok_or_else(|| {
            Error::RenderError(format!("container #{} not found", config.container_id))
        })?;
        Ok(PageShell {
            html,
            head,
            body,
            container,
        })
    }
}
