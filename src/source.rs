// src/source.rs
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use quick_xml::de::from_str;
use quick_xml::events::Event;
use serde::Deserialize;

/// One item pulled from a feed document. Everything is optional; identity
/// derivation and the processor's skip rules decide what to do with the
/// gaps. Timestamps stay raw strings, they are only ever concatenated into
/// the identity basis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub id: Option<String>,
    pub link: Option<String>,
    pub title: Option<String>,
    pub published: Option<String>,
    pub updated: Option<String>,
}

/// Feed-document collaborator: given a feed URL, produce the document's
/// entries in document order (most feeds list newest first).
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<Entry>>;
}

// ---- RSS 2.0 ----

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
    guid: Option<TextNode>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    /// RSS 1.0 items carry their timestamp as `<dc:date>`; quick-xml
    /// strips the namespace prefix before matching field names.
    #[serde(rename = "date")]
    dc_date: Option<String>,
}

impl RssItem {
    fn into_entry(self) -> Entry {
        Entry {
            id: self.guid.and_then(TextNode::into_value),
            link: self.link.map(|l| l.trim().to_string()),
            title: self.title.map(|t| clean_text(&t)),
            published: self.pub_date.or(self.dc_date),
            updated: None,
        }
    }
}

// ---- RSS 1.0 (RDF): items are siblings of <channel>, not children ----

#[derive(Debug, Deserialize)]
struct Rdf {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

// ---- Atom ----

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    id: Option<String>,
    title: Option<TextNode>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    published: Option<String>,
    updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

/// Element whose text content we want regardless of its attributes
/// (e.g. `<guid isPermaLink="false">`, `<title type="html">`).
#[derive(Debug, Deserialize)]
struct TextNode {
    #[serde(rename = "$text")]
    value: Option<String>,
}

impl TextNode {
    fn into_value(self) -> Option<String> {
        self.value
    }
}

/// Parse an RSS 2.0, RSS 1.0 (RDF), or Atom document into entries, keyed
/// on the root tag.
pub fn parse_feed(xml: &str) -> Result<Vec<Entry>> {
    let clean = scrub_html_entities_for_xml(xml);
    match root_tag(&clean).as_deref() {
        Some("rss") => parse_rss(&clean),
        Some("RDF") => parse_rdf(&clean),
        Some("feed") => parse_atom(&clean),
        Some(tag) => Err(anyhow!("unsupported feed document (root <{tag}>)")),
        None => Err(anyhow!("no XML root element found")),
    }
}

fn parse_rss(xml: &str) -> Result<Vec<Entry>> {
    let rss: Rss = from_str(xml).context("parsing rss xml")?;
    Ok(rss.channel.items.into_iter().map(RssItem::into_entry).collect())
}

fn parse_rdf(xml: &str) -> Result<Vec<Entry>> {
    let rdf: Rdf = from_str(xml).context("parsing rdf xml")?;
    Ok(rdf.items.into_iter().map(RssItem::into_entry).collect())
}

fn parse_atom(xml: &str) -> Result<Vec<Entry>> {
    let feed: AtomFeed = from_str(xml).context("parsing atom xml")?;
    let out = feed
        .entries
        .into_iter()
        .map(|e| Entry {
            id: e.id,
            link: pick_atom_link(&e.links),
            title: e.title.and_then(TextNode::into_value).map(|t| clean_text(&t)),
            published: e.published,
            updated: e.updated,
        })
        .collect();
    Ok(out)
}

/// Prefer the `alternate` (or unmarked) link; fall back to the first one.
fn pick_atom_link(links: &[AtomLink]) -> Option<String> {
    links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| links.first())
        .and_then(|l| l.href.clone())
        .map(|h| h.trim().to_string())
}

fn root_tag(xml: &str) -> Option<String> {
    let mut reader = quick_xml::Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                return Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

/// Decode leftover HTML entities and collapse whitespace in a title.
fn clean_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Publisher feeds routinely embed HTML-only named entities that choke an
/// XML parser; rewrite the usual suspects before handing the document over.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

/// Production feed source: fetch over HTTP with a hard per-call timeout,
/// then parse. An unbounded wait on a wedged server is treated the same as
/// any other network failure.
pub struct HttpFeedSource {
    client: reqwest::Client,
}

impl HttpFeedSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("news-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<Vec<Entry>> {
        let body = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("fetching {url}"))?
            .error_for_status()
            .with_context(|| format!("fetching {url}"))?
            .text()
            .await
            .context("reading feed body")?;
        parse_feed(&body)
    }
}
