//! Tile builders. Each function builds one detached node through the [`Dom`]
//! capability and returns it; attaching is the controller's job.

use crate::color::adjust_hex_color;
use crate::dom::{Dom, NodeId, SVG_NS};
use crate::feed::{LiveEntry, MemberInfo};
use crate::relay::{Relay, RelayMessage};
use crate::Result;
use std::sync::Arc;

/// Darkening applied to a member color for the live overlay tint
pub const OVERLAY_TINT_OFFSET: i32 = -100;
/// Alpha suffix for the live overlay (50%)
pub const OVERLAY_ALPHA: &str = "80";
/// Banner text shown when nobody is live
pub const OFFLINE_TEXT: &str = "🛠️工事中...🛠️";

const EMBED_PARAMS: &str = "?autoplay=1&mute=1&controls=0&disablekb=1&modestbranding=1&";
const IFRAME_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture; web-share";

const LINK_FRAME_PATH: &str = "M6 -0.000183105L11 -5.41806e-05C11 -5.41806e-05 13 0.0930882 13 2.49982C13 4.90655 11 4.99982 11 4.99982H6C5.44771 4.99982 5 5.44753 5 5.99981V31.0106C5 31.5629 5.44771 32.0106 5.99999 32.0106H30.9877C31.54 32.0106 31.9877 31.5629 31.9877 31.0106L32 26C32 26 31.9877 24 34.4877 24C36.9877 24 36.9877 26 36.9877 26V31.0106C36.9877 34.3244 34.3014 37.0106 30.9877 37.0106H5.99999C2.68629 37.0106 0 34.3243 0 31.0106V5.99981C0 2.6861 2.68629 -0.000183105 6 -0.000183105Z";
const LINK_ARROW_PATH: &str = "M16.1336 -0.000118643L34.8782 -0.000107914C36.0209 -0.000922487 36.8858 1.0932 36.8866 2.23664L36.9877 21.069C36.9885 22.2125 36.4663 23.1875 35.3236 23.1884C34.4503 23.189 33.8845 22.5666 33.19 21.8027C32.9757 21.5669 32.7491 21.3176 32.4974 21.069L25.3827 14.0418C25.3827 14.0418 11.7823 27.7844 11.3894 28.2094C10.9964 28.6344 9.81768 29.6425 8.5 28.2887C7.18232 26.9349 8.53271 25.3878 8.53271 25.3878C8.53271 25.3878 22.1244 11.6852 22.5261 11.2203C22.5261 11.2203 17.3994 5.99994 15.8994 4.49994C14 2.5 13.495 1.99999 13.8994 0.999941C14.3037 -0.000107884 14.9895 0.000694046 16.1296 -0.000115782L16.1336 -0.000118643Z";

/// Which builder produced a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Live,
    IdleMember,
    Blank,
    OfflineBanner,
}

pub fn embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{}{}", video_id, EMBED_PARAMS)
}

pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://i.ytimg.com/vi/{}/sddefault.jpg", video_id)
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Overlay background for a live tile: the member color darkened, at 50% alpha
pub fn overlay_tint(color: &str) -> String {
    format!("{}{}", adjust_hex_color(color, OVERLAY_TINT_OFFSET), OVERLAY_ALPHA)
}

fn element<D: Dom + ?Sized>(dom: &mut D, tag: &str, attrs: &[(&str, &str)]) -> Result<NodeId> {
    let node = dom.create_element(tag);
    for (name, value) in attrs {
        dom.set_attribute(node, name, value)?;
    }
    Ok(node)
}

fn link_icon<D: Dom + ?Sized>(dom: &mut D) -> Result<NodeId> {
    let frame = dom.create_element_ns(SVG_NS, "path");
    dom.set_attribute(frame, "fill-rule", "evenodd")?;
    dom.set_attribute(frame, "clip-rule", "evenodd")?;
    dom.set_attribute(frame, "d", LINK_FRAME_PATH)?;
    dom.set_attribute(frame, "fill", "white")?;

    let arrow = dom.create_element_ns(SVG_NS, "path");
    dom.set_attribute(arrow, "d", LINK_ARROW_PATH)?;
    dom.set_attribute(arrow, "fill", "white")?;

    let svg = dom.create_element_ns(SVG_NS, "svg");
    for (name, value) in [
        ("width", "37"),
        ("height", "38"),
        ("viewBox", "0 0 37 38"),
        ("fill", "none"),
        ("xmlns", SVG_NS),
        ("class", "hyperlink"),
    ] {
        dom.set_attribute(svg, name, value)?;
    }
    dom.append_child(svg, frame)?;
    dom.append_child(svg, arrow)?;
    Ok(svg)
}

/// Playing video tile with a tinted, clickable overlay.
///
/// The overlay holds two hover layers (member icon and link icon); the page
/// stylesheet swaps them on `:hover`. Clicking the overlay relays an
/// `open_url` message for the video's watch page.
pub fn live_tile<D: Dom + ?Sized>(
    dom: &mut D,
    member: &MemberInfo,
    entry: &LiveEntry,
    relay: Arc<dyn Relay>,
) -> Result<NodeId> {
    let hyperlink_layer = element(dom, "div", &[("class", "mouseover_hyperlink")])?;
    let svg = link_icon(dom)?;
    dom.append_child(hyperlink_layer, svg)?;

    let icon = element(dom, "img", &[("src", member.icon_url.as_str()), ("class", "icon_img")])?;
    let icon_layer = element(dom, "div", &[("class", "mouseover_icon")])?;
    dom.append_child(icon_layer, icon)?;

    let message = RelayMessage::open_url(watch_url(&entry.video_id));
    let overlay = element(
        dom,
        "a",
        &[
            ("class", "mouseover"),
            ("style", format!("background-color: {};", overlay_tint(&member.color)).as_str()),
            ("onclick", message.post_message_script().as_str()),
        ],
    )?;
    dom.add_click_listener(overlay, Arc::new(move || relay.relay(&message)))?;
    dom.append_child(overlay, icon_layer)?;
    dom.append_child(overlay, hyperlink_layer)?;

    let iframe = element(
        dom,
        "iframe",
        &[
            ("credentialless", ""),
            ("crossorigin", ""),
            ("anonymous", ""),
            ("src", embed_url(&entry.video_id).as_str()),
            // attribute name kept as deployed pages have it
            ("frameboarder", "0"),
            ("allow", IFRAME_ALLOW),
            ("allowfullscreen", ""),
            ("class", "video"),
        ],
    )?;

    let container = element(
        dom,
        "div",
        &[
            ("class", "video-container"),
            (
                "style",
                format!("background-image: url(\"{}\")", thumbnail_url(&entry.video_id)).as_str(),
            ),
        ],
    )?;
    dom.append_child(container, iframe)?;
    dom.append_child(container, overlay)?;
    Ok(container)
}

/// Placeholder tile for an offline member: icon centered on the solid member color
pub fn idle_member_tile<D: Dom + ?Sized>(dom: &mut D, member: &MemberInfo) -> Result<NodeId> {
    let icon = element(
        dom,
        "img",
        &[
            ("src", member.icon_url.as_str()),
            ("class", "icon_img"),
            ("style", "margin-left: 0%; !important; width:25%;"),
        ],
    )?;
    let overlay = element(
        dom,
        "a",
        &[
            ("class", "mouseover"),
            (
                "style",
                format!(
                    "background-color: {}FF; opacity: 1; justify-content: center;",
                    member.color
                )
                .as_str(),
            ),
        ],
    )?;
    dom.append_child(overlay, icon)?;

    let iframe = element(dom, "iframe", &[("class", "video")])?;
    let container = element(dom, "div", &[("class", "video-container")])?;
    dom.append_child(container, iframe)?;
    dom.append_child(container, overlay)?;
    Ok(container)
}

/// Empty grid cell used for padding
pub fn blank_tile<D: Dom + ?Sized>(dom: &mut D) -> Result<NodeId> {
    let iframe = element(dom, "iframe", &[("class", "video")])?;
    let container = dom.create_element("div");
    dom.append_child(container, iframe)?;
    Ok(container)
}

/// Full-width "under construction" banner
pub fn offline_banner<D: Dom + ?Sized>(dom: &mut D) -> Result<NodeId> {
    let text = element(dom, "a", &[("class", "offline-string")])?;
    dom.set_text(text, OFFLINE_TEXT)?;

    let message = element(dom, "div", &[("class", "offline-message")])?;
    dom.append_child(message, text)?;

    let background = element(dom, "div", &[("class", "offline-background")])?;
    dom.append_child(background, message)?;
    Ok(background)
}
