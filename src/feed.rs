//! Feed data model and the sources it can be loaded from.

use crate::{Error, Result};
#[cfg(feature = "http")]
use crate::PageConfig;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// One member of the group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInfo {
    pub icon_url: String,
    /// `#rrggbb`
    pub color: String,
}

/// A broadcast that is currently live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveEntry {
    /// Key into [`FeedSnapshot::member`]
    pub from: String,
    pub video_id: String,
}

/// Member mapping that keeps the key order of the feed document.
///
/// Every key keeps its document position, integer-like ones included. A
/// browser's `Object.keys` would list integer-like keys first in ascending
/// order, so a feed keyed `"2"`, `"1"` renders `2, 1` here and `1, 2` there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Members(Vec<(String, MemberInfo)>);

impl Members {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; a replaced key keeps its first position.
    pub fn insert(&mut self, key: impl Into<String>, info: MemberInfo) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = info,
            None => self.0.push((key, info)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&MemberInfo> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MemberInfo)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, MemberInfo)> for Members {
    fn from_iter<I: IntoIterator<Item = (K, MemberInfo)>>(iter: I) -> Self {
        let mut members = Members::new();
        for (k, v) in iter {
            members.insert(k, v);
        }
        members
    }
}

impl<'de> Deserialize<'de> for Members {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MembersVisitor;

        impl<'de> Visitor<'de> for MembersVisitor {
            type Value = Members;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of member keys to member info")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Members, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut members = Members::new();
                while let Some((key, info)) = map.next_entry::<String, MemberInfo>()? {
                    members.insert(key, info);
                }
                Ok(members)
            }
        }

        deserializer.deserialize_map(MembersVisitor)
    }
}

impl Serialize for Members {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

/// The whole feed document, read once per page load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSnapshot {
    pub live: Vec<LiveEntry>,
    pub member: Members,
}

impl FeedSnapshot {
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn is_live(&self) -> bool {
        !self.live.is_empty()
    }
}

/// Something the page controller can pull a feed from
pub trait FeedSource: Send + Sync {
    /// Human readable location, used in log lines
    fn describe(&self) -> String;

    /// Fetch and parse the feed
    fn fetch(&self) -> Result<FeedSnapshot>;
}

/// Fetches the feed over HTTP with a blocking client.
///
/// The client is built by `fetch` itself, on whichever thread runs the
/// fetch, so a source can be created from async code. `fetch` must still
/// run off the runtime (see [`crate::async_api::fetch_feed`]).
#[cfg(feature = "http")]
pub struct HttpFeedSource {
    url: String,
    config: PageConfig,
}

#[cfg(feature = "http")]
impl HttpFeedSource {
    pub fn new(config: PageConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            url: config.feed_url.clone(),
            config,
        })
    }

    fn client(&self) -> Result<reqwest::blocking::Client> {
        reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_millis(self.config.timeout_ms))
            .build()
            .map_err(|e| Error::NetworkError(format!("Failed to build HTTP client: {}", e)))
    }
}

#[cfg(feature = "http")]
impl FeedSource for HttpFeedSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<FeedSnapshot> {
        let client = self.client()?;
        let mut req = client
            .get(&self.url)
            .header("User-Agent", self.config.user_agent.clone());
        for (k, v) in &self.config.headers {
            req = req.header(k.as_str(), v.as_str());
        }

        let resp = req
            .send()
            .map_err(|e| Error::NetworkError(format!("Failed to fetch {}: {}", self.url, e)))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::NetworkError(format!(
                "Failed to fetch {}: HTTP {}",
                self.url, status
            )));
        }

        let body = resp
            .text()
            .map_err(|e| Error::NetworkError(format!("Failed to read response body: {}", e)))?;
        log::debug!("fetched {} bytes from {}", body.len(), self.url);
        FeedSnapshot::from_json(&body)
    }
}

/// Reads the feed from a local JSON file
pub struct FileFeedSource {
    path: PathBuf,
}

impl FileFeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FeedSource for FileFeedSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<FeedSnapshot> {
        let body = std::fs::read_to_string(&self.path)?;
        FeedSnapshot::from_json(&body)
    }
}

/// Serves a fixed result; used by tests and benchmarks
pub struct StaticFeedSource {
    result: std::result::Result<FeedSnapshot, String>,
}

impl StaticFeedSource {
    pub fn new(feed: FeedSnapshot) -> Self {
        Self { result: Ok(feed) }
    }

    /// A source whose fetch always fails with a network error
    pub fn failing(reason: impl Into<String>) -> Self {
        Self { result: Err(reason.into()) }
    }
}

impl FeedSource for StaticFeedSource {
    fn describe(&self) -> String {
        "static feed".to_string()
    }

    fn fetch(&self) -> Result<FeedSnapshot> {
        self.result.clone().map_err(Error::NetworkError)
    }
}
