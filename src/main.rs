use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use livetiles::feed::{FeedSource, FileFeedSource};
use livetiles::relay::{LogRelay, RecordingRelay, Relay};
use livetiles::snapshot;
use livetiles::{Document, PageConfig, PageController, PageState};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "livetiles", version, about = "Render the live-stream tile wall from its JSON feed")]
struct Cli {
    /// More logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct FeedArgs {
    /// Feed URL
    #[arg(long, default_value = livetiles::DEFAULT_FEED_URL)]
    feed_url: String,

    /// Read the feed from a local JSON file instead of the network
    #[arg(long, conflicts_with = "feed_url")]
    feed_file: Option<PathBuf>,

    /// Feed request timeout in milliseconds
    #[arg(long, default_value_t = 30000)]
    timeout_ms: u64,

    /// Extra request header, `Name: value` (repeatable)
    #[arg(long = "header", value_name = "HEADER")]
    headers: Vec<String>,

    /// id of the grid container element
    #[arg(long, default_value = "main")]
    container_id: String,

    /// Page title
    #[arg(long, default_value = "LIVE")]
    title: String,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the feed and write the rendered page
    Render {
        #[command(flatten)]
        feed: FeedArgs,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Print a text snapshot instead of HTML
        #[arg(long, conflicts_with = "digest")]
        text: bool,

        /// Print the SHA-256 of the HTML instead of the HTML
        #[arg(long)]
        digest: bool,
    },
    /// Render, then click the overlay of a live tile and print relayed messages
    Click {
        #[command(flatten)]
        feed: FeedArgs,

        /// Video id of the live tile to click
        video_id: String,
    },
    /// Shift every channel of a hex color by an offset
    Adjust {
        color: String,
        #[arg(allow_hyphen_values = true)]
        offset: i32,
    },
}

impl FeedArgs {
    fn config(&self) -> anyhow::Result<PageConfig> {
        let mut headers = std::collections::HashMap::new();
        for raw in &self.headers {
            let Some((name, value)) = raw.split_once(':') else {
                bail!("header '{}' is not in `Name: value` form", raw);
            };
            headers.insert(name.trim().to_string(), value.trim().to_string());
        }
        let config = PageConfig {
            feed_url: self.feed_url.clone(),
            timeout_ms: self.timeout_ms,
            headers,
            container_id: self.container_id.clone(),
            title: self.title.clone(),
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    fn source(&self, config: &PageConfig) -> anyhow::Result<Arc<dyn FeedSource>> {
        if let Some(path) = &self.feed_file {
            return Ok(Arc::new(FileFeedSource::new(path)));
        }
        http_source(config)
    }
}

#[cfg(feature = "http")]
fn http_source(config: &PageConfig) -> anyhow::Result<Arc<dyn FeedSource>> {
    let source = livetiles::feed::HttpFeedSource::new(config.clone())
        .context("failed to set up feed client")?;
    Ok(Arc::new(source))
}

#[cfg(not(feature = "http"))]
fn http_source(_config: &PageConfig) -> anyhow::Result<Arc<dyn FeedSource>> {
    bail!("built without the `http` feature; use --feed-file")
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp_millis()
        .init();
}

async fn load_page(
    feed: &FeedArgs,
    relay: Arc<dyn Relay>,
) -> anyhow::Result<(PageController, Document, PageState)> {
    let config = feed.config()?;
    let source = feed.source(&config)?;
    let controller = PageController::new(config, relay);
    let mut doc = controller.new_page()?;
    let state = controller
        .load_async(source, &mut doc)
        .await
        .context("failed to render page")?;
    Ok((controller, doc, state))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Render {
            feed,
            out,
            text,
            digest,
        } => {
            let (controller, doc, state) = load_page(&feed, Arc::new(LogRelay)).await?;
            if let PageState::Rendered(summary) = &state {
                log::info!("rendered {} tile(s) in {:?} mode", summary.tiles.len(), summary.mode);
            }
            let html = doc.to_html();
            let output = if text {
                let snap = snapshot::text_snapshot(&html, &controller.config().container_id)?;
                format!(
                    "title: {}\ntiles: {:?}\noffline banner: {}\ntext: {}\n",
                    snap.title,
                    snap.tiles,
                    snap.offline_banner,
                    snap.text.trim()
                )
            } else if digest {
                format!("{}\n", snapshot::digest(&html))
            } else {
                html
            };
            match out {
                Some(path) => std::fs::write(&path, output)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => print!("{}", output),
            }
        }
        Command::Click { feed, video_id } => {
            let relay = RecordingRelay::new();
            let (controller, doc, _) = load_page(&feed, Arc::new(relay.clone())).await?;
            let Some(overlay) = controller.find_live_overlay(&doc, &video_id) else {
                bail!("no live tile for video '{}'", video_id);
            };
            doc.click(overlay)?;
            for message in relay.messages() {
                println!("{}", message.to_json());
            }
        }
        Command::Adjust { color, offset } => {
            println!("{}", livetiles::color::adjust_hex_color(&color, offset));
        }
    }

    Ok(())
}
