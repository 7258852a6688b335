//! RSS feed fetching and parsing.
//!
//! Only `<item>` entries matter. Each needs a title and a locator, taken from
//! `<link>` or, for torrent and NZB feeds that leave it empty, from the
//! `url` attribute of `<enclosure>`.

use crate::Result;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// A feed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    /// Release name.
    pub title: String,
    /// Download locator (URL or magnet).
    pub link: String,
}

#[derive(Default)]
struct ItemBuilder {
    title: Option<String>,
    link: Option<String>,
    enclosure: Option<String>,
}

impl ItemBuilder {
    fn build(self) -> Option<FeedItem> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        let link = self
            .link
            .filter(|l| !l.trim().is_empty())
            .or(self.enclosure)?;
        Some(FeedItem {
            title: title.trim().to_string(),
            link: link.trim().to_string(),
        })
    }
}

/// Fetch and parse a feed.
pub async fn fetch_feed(client: &reqwest::Client, url: &str) -> Result<Vec<FeedItem>> {
    tracing::info!("Fetching feed: {}", url);

    let content = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    parse_feed(&content)
}

fn enclosure_url(e: &BytesStart<'_>) -> Option<String> {
    let attr = e.try_get_attribute("url").ok().flatten()?;
    attr.unescape_value().ok().map(|v| v.to_string())
}

/// Parse feed XML into items.
///
/// Malformed XML is an error rather than a truncated item list.
pub fn parse_feed(content: &str) -> Result<Vec<FeedItem>> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut current: Option<ItemBuilder> = None;
    let mut current_tag = String::new();
    let mut depth = 0usize;
    let mut saw_element = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                saw_element = true;
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match tag.as_str() {
                    "item" => current = Some(ItemBuilder::default()),
                    "enclosure" => {
                        if let Some(ref mut item) = current {
                            item.enclosure = enclosure_url(e);
                        }
                    }
                    _ => {}
                }
                current_tag = tag;
            }
            Ok(Event::Empty(ref e)) => {
                saw_element = true;
                if e.name().as_ref() == b"enclosure" {
                    if let Some(ref mut item) = current {
                        item.enclosure = enclosure_url(e);
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                depth = depth.saturating_sub(1);
                if e.name().as_ref() == b"item" {
                    if let Some(item) = current.take().and_then(ItemBuilder::build) {
                        items.push(item);
                    }
                }
                current_tag.clear();
            }
            Ok(Event::Text(ref e)) => {
                if let Some(ref mut item) = current {
                    let text = e
                        .unescape()
                        .map_err(|err| crate::Error::Feed(err.to_string()))?
                        .to_string();
                    match current_tag.as_str() {
                        "title" => item.title = Some(text),
                        "link" => item.link = Some(text),
                        _ => {}
                    }
                }
            }
            Ok(Event::CData(ref e)) => {
                if let Some(ref mut item) = current {
                    let text = String::from_utf8_lossy(e.as_ref()).to_string();
                    match current_tag.as_str() {
                        "title" => item.title = Some(text),
                        "link" => item.link = Some(text),
                        _ => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(crate::Error::Feed(format!(
                    "at byte {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    if !saw_element {
        return Err(crate::Error::Feed("document has no elements".to_string()));
    }
    if depth != 0 {
        return Err(crate::Error::Feed("unexpected end of document".to_string()));
    }

    tracing::debug!("Parsed {} items from feed", items.len());
    Ok(items)
}
