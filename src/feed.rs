//! RSS 2.0 feed generator.
//!
//! Availability over completeness: an upstream failure yields a well-formed
//! feed with zero items, never an error. Every text field passing into the
//! document is XML-escaped.

use crate::config::ServeConfig;
use crate::ephemeris::ArchiveEntry;

/// Archive page size requested for the feed.
pub const FEED_ITEM_COUNT: usize = 25;

/// Escape text for placement inside XML element content or attributes.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Build the RSS 2.0 document from archive entries (possibly empty).
pub fn build_feed(config: &ServeConfig, entries: &[ArchiveEntry]) -> String {
    let mut xml = String::with_capacity(2048);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<rss version="2.0"><channel>"#);
    xml.push_str(&format!(
        "<title>{}</title><link>{}</link><description>{}</description><language>en</language>",
        escape_xml(&config.site_title),
        escape_xml(&config.site_url),
        escape_xml(&config.site_description),
    ));

    for entry in entries {
        let link = format!(
            "{}/{}",
            config.site_url.trim_end_matches('/'),
            entry.date_context
        );
        xml.push_str("<item>");
        xml.push_str(&format!("<title>{}</title>", escape_xml(&entry.title)));
        xml.push_str(&format!("<link>{}</link>", escape_xml(&link)));
        xml.push_str(&format!("<guid>{}</guid>", escape_xml(&link)));
        if let Some(body) = &entry.body {
            xml.push_str(&format!(
                "<description>{}</description>",
                escape_xml(body)
            ));
        }
        xml.push_str("</item>");
    }

    xml.push_str("</channel></rss>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServeConfig {
        ServeConfig::default()
    }

    #[test]
    fn empty_archive_yields_valid_zero_item_feed() {
        let feed = build_feed(&config(), &[]);
        assert!(feed.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(feed.contains("<channel>"));
        assert!(feed.ends_with("</channel></rss>"));
        assert!(!feed.contains("<item>"));
    }

    #[test]
    fn items_carry_escaped_titles() {
        let entries = vec![ArchiveEntry {
            date_context: "2026-02-19".to_string(),
            title: r#"Mars & Venus <conjunct> "tight""#.to_string(),
            body: Some("it's exact".to_string()),
        }];
        let feed = build_feed(&config(), &entries);
        assert!(
            feed.contains("Mars &amp; Venus &lt;conjunct&gt; &quot;tight&quot;")
        );
        assert!(feed.contains("it&apos;s exact"));
        assert_eq!(feed.matches("<item>").count(), 1);
    }

    #[test]
    fn escape_round_trips_through_unescape() {
        let original = r#"a & b < c > d "e" 'f'"#;
        let escaped = escape_xml(original);
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('>'));
        assert!(!escaped.contains('"'));
        let unescaped = escaped
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&amp;", "&");
        assert_eq!(unescaped, original);
    }
}
