#![cfg(feature = "http")]

//! End-to-end page loads against a local feed server

use livetiles::builders::TileKind;
use livetiles::feed::{FeedSource, HttpFeedSource};
use livetiles::relay::{RecordingRelay, RelayMessage};
use livetiles::snapshot::text_snapshot;
use livetiles::{PageConfig, PageController, PageState, RenderMode};
use scraper::{Html, Selector};
use std::sync::Arc;
use tiny_http::{Response, Server};

const LIVE_FEED: &str = r##"{
    "live": [{"from": "a", "video_id": "XYZ"}],
    "member": {"a": {"icon_url": "i.png", "color": "#336699"}}
}"##;

const OFFLINE_FEED: &str = r##"{
    "live": [],
    "member": {
        "a": {"icon_url": "a.png", "color": "#336699"},
        "b": {"icon_url": "b.png", "color": "#993366"}
    }
}"##;

/// Serve a single response on an ephemeral port and return the URL
fn serve_once(status: u16, body: &'static str) -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    std::thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let response = Response::from_string(body)
                .with_status_code(status)
                .with_header(
                    "Content-Type: application/json"
                        .parse::<tiny_http::Header>()
                        .unwrap(),
                );
            let _ = request.respond(response);
        }
    });
    format!("http://{}/return.json", addr)
}

fn setup(url: String) -> (PageController, RecordingRelay, HttpFeedSource) {
    let config = PageConfig {
        feed_url: url,
        timeout_ms: 5000,
        ..Default::default()
    };
    let relay = RecordingRelay::new();
    let source = HttpFeedSource::new(config.clone()).expect("Failed to build feed source");
    let controller = PageController::new(config, Arc::new(relay.clone()));
    (controller, relay, source)
}

#[test]
fn test_live_feed_over_http() {
    let (controller, relay, source) = setup(serve_once(200, LIVE_FEED));
    let mut doc = controller.new_page().unwrap();

    let state = controller.load(&source, &mut doc).expect("load failed");
    let summary = match state {
        PageState::Rendered(summary) => summary,
        other => panic!("unexpected state {:?}", other),
    };
    assert_eq!(summary.mode, RenderMode::Live);
    assert_eq!(summary.tiles, vec![TileKind::Live, TileKind::Blank, TileKind::Blank]);

    let html = doc.to_html();
    let parsed = Html::parse_document(&html);
    let overlay_sel = Selector::parse("#main > div.video-container > a.mouseover").unwrap();
    let overlay = parsed.select(&overlay_sel).next().expect("overlay missing");
    assert_eq!(overlay.value().attr("style"), Some("background-color: #00023580;"));
    assert!(overlay
        .value()
        .attr("onclick")
        .unwrap()
        .contains(r#""url":"https://www.youtube.com/watch?v=XYZ""#));

    let iframe_sel = Selector::parse("#main iframe[src]").unwrap();
    let srcs: Vec<_> = parsed
        .select(&iframe_sel)
        .filter_map(|n| n.value().attr("src"))
        .collect();
    assert_eq!(
        srcs,
        vec!["https://www.youtube.com/embed/XYZ?autoplay=1&mute=1&controls=0&disablekb=1&modestbranding=1&"]
    );

    let snap = text_snapshot(&html, "main").unwrap();
    assert_eq!(snap.tiles, summary.tiles);
    assert!(!snap.offline_banner);

    let node = controller.find_live_overlay(&doc, "XYZ").unwrap();
    assert_eq!(doc.click(node).unwrap(), 1);
    assert_eq!(
        relay.messages(),
        vec![RelayMessage::open_url("https://www.youtube.com/watch?v=XYZ")]
    );
}

#[test]
fn test_offline_feed_over_http() {
    let (controller, relay, source) = setup(serve_once(200, OFFLINE_FEED));
    let mut doc = controller.new_page().unwrap();

    let state = controller.load(&source, &mut doc).expect("load failed");
    assert!(matches!(state, PageState::Rendered(ref s) if s.mode == RenderMode::Offline));

    let snap = text_snapshot(&doc.to_html(), "main").unwrap();
    assert_eq!(
        snap.tiles,
        vec![TileKind::IdleMember, TileKind::IdleMember, TileKind::Blank]
    );
    assert!(snap.offline_banner);
    assert!(snap.text.contains("工事中"));

    let parsed = Html::parse_document(&doc.to_html());
    let icons = Selector::parse("#main img.icon_img").unwrap();
    let order: Vec<_> = parsed
        .select(&icons)
        .filter_map(|n| n.value().attr("src"))
        .collect();
    assert_eq!(order, vec!["a.png", "b.png"]);
    assert!(relay.messages().is_empty());
}

#[test]
fn test_http_error_is_fetch_failure() {
    let (controller, _, source) = setup(serve_once(404, "Not Found"));
    let mut doc = controller.new_page().unwrap();
    let before = doc.to_html();

    let state = controller.load(&source, &mut doc).expect("fetch failures are not errors");
    assert!(matches!(state, PageState::FetchFailed(_)));
    assert_eq!(doc.to_html(), before);
}

#[test]
fn test_non_json_is_fetch_failure() {
    let (controller, _, source) = setup(serve_once(200, "<html>maintenance</html>"));
    let mut doc = controller.new_page().unwrap();
    let before = doc.to_html();

    let state = controller.load(&source, &mut doc).unwrap();
    assert!(matches!(state, PageState::FetchFailed(_)));
    assert_eq!(doc.to_html(), before);
}

#[test]
fn test_unreachable_feed_is_fetch_failure() {
    // bind then drop to get a port nobody listens on
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let (controller, _, source) = setup(format!("http://127.0.0.1:{}/return.json", port));
    assert!(source.fetch().is_err());

    let mut doc = controller.new_page().unwrap();
    let state = controller.load(&source, &mut doc).unwrap();
    assert!(matches!(state, PageState::FetchFailed(_)));
}

#[tokio::test]
async fn test_async_load_over_http() {
    let (controller, _, source) = setup(serve_once(200, OFFLINE_FEED));
    let mut doc = controller.new_page().unwrap();
    let state = controller
        .load_async(Arc::new(source), &mut doc)
        .await
        .expect("async load failed");
    assert!(matches!(state, PageState::Rendered(_)));
}

#[tokio::test]
async fn test_async_load_builds_source_on_runtime() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = PageConfig {
        feed_url: format!("http://127.0.0.1:{}/return.json", port),
        timeout_ms: 2000,
        ..Default::default()
    };
    // constructed on a runtime thread, the way the CLI does it
    let source = HttpFeedSource::new(config.clone()).expect("Failed to build feed source");
    let controller = PageController::new(config, Arc::new(RecordingRelay::new()));
    let mut doc = controller.new_page().unwrap();
    let before = doc.to_html();

    let state = controller
        .load_async(Arc::new(source), &mut doc)
        .await
        .expect("fetch failures are not errors");
    assert!(matches!(state, PageState::FetchFailed(_)));
    assert_eq!(doc.to_html(), before);
}
