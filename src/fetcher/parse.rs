use feed_rs::model::Entry;
use feed_rs::parser;

use crate::fetcher::errors::FetchError;
use crate::ingest::date::parse_timestamp;
use crate::ingest::types::RawEntry;

/// Parse an RSS/Atom/JSON feed body into raw entries, keeping feed order.
pub fn parse_feed(body: &str) -> Result<Vec<RawEntry>, FetchError> {
    let feed = parser::Builder::new()
        .timestamp_parser(parse_timestamp)
        .build()
        .parse(body.as_bytes())?;
    Ok(feed.entries.into_iter().map(to_raw_entry).collect())
}

fn to_raw_entry(entry: Entry) -> RawEntry {
    let link = entry
        .links
        .iter()
        .find(|l| l.rel.as_deref().is_none_or(|rel| rel == "alternate"))
        .or_else(|| entry.links.first())
        .map(|l| l.href.trim().to_string())
        .filter(|href| !href.is_empty());

    RawEntry {
        title: entry.title.map(|t| t.content).filter(|t| !t.trim().is_empty()),
        link,
        summary: entry.summary.map(|s| s.content).filter(|s| !s.trim().is_empty()),
        content: entry
            .content
            .and_then(|c| c.body)
            .filter(|b| !b.trim().is_empty()),
        published: entry.published,
        updated: entry.updated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>Vivienda</title>
    <link>https://news.example</link>
    <description>Feed</description>
    <item>
      <title>El precio de la vivienda sube</title>
      <link>https://news.example/a</link>
      <description>&lt;p&gt;Sube un 7%&lt;/p&gt;</description>
      <content:encoded><![CDATA[<p>Cuerpo completo</p>]]></content:encoded>
      <pubDate>Sat, 01 Mar 2025 10:00:00 CET</pubDate>
    </item>
    <item>
      <title>Sin fecha</title>
      <link>https://news.example/b</link>
    </item>
    <item>
      <description>Sin titular</description>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parses_rss_items_in_order() {
        let entries = parse_feed(RSS).unwrap();
        assert_eq!(entries.len(), 3);

        let first = &entries[0];
        assert_eq!(first.title.as_deref(), Some("El precio de la vivienda sube"));
        assert_eq!(first.link.as_deref(), Some("https://news.example/a"));
        assert_eq!(first.summary.as_deref(), Some("<p>Sube un 7%</p>"));
        assert_eq!(first.content.as_deref(), Some("<p>Cuerpo completo</p>"));
        assert_eq!(
            first.published,
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap())
        );

        assert_eq!(entries[1].published, None);
        assert_eq!(entries[2].title, None);
        assert_eq!(entries[2].link, None);
    }

    #[test]
    fn test_parses_atom_dates() {
        let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Tech</title>
  <id>urn:feed</id>
  <updated>2025-03-02T00:00:00Z</updated>
  <entry>
    <title>Rust release</title>
    <id>urn:1</id>
    <link rel="alternate" href="https://tech.example/rust"/>
    <updated>2025-03-02T08:00:00Z</updated>
    <summary>Nueva versión</summary>
  </entry>
</feed>"#;
        let entries = parse_feed(atom).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].link.as_deref(), Some("https://tech.example/rust"));
        assert_eq!(entries[0].published, None);
        assert_eq!(
            entries[0].updated,
            Some(Utc.with_ymd_and_hms(2025, 3, 2, 8, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        assert!(matches!(
            parse_feed("this is not a feed"),
            Err(FetchError::Parse(_))
        ));
    }
}
