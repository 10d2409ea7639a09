//! Minimal CSS crawler.
//!
//! Fetches one page and gathers its CSS: inline `<style>` bodies, `style=""`
//! attributes, and linked stylesheets fetched concurrently. No JavaScript is
//! run, so CSS injected at runtime is missed.

use std::sync::LazyLock;
use std::time::Duration;

use futures::future::join_all;
use futures::StreamExt;
use regex::Regex;
use reqwest::Url;
use tracing::{debug, info, warn};

use crate::config::CrawlConfig;
use crate::error::{ScopeError, ScopeResult};

static STYLE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>(.*?)</style>").unwrap());

static STYLE_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\sstyle\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());

static LINK_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<link\b[^>]*>").unwrap());

static REL_STYLESHEET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\brel\s*=\s*["']?[^"'>]*\bstylesheet\b"#).unwrap());

static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#).unwrap());

/// CSS gathered from one page.
#[derive(Debug, Clone, Default)]
pub struct CrawlOutput {
    pub css_text: String,
    /// Pages fetched (always 1 on success).
    pub pages: usize,
    /// Linked stylesheets fetched successfully.
    pub stylesheets: usize,
}

pub struct Crawler {
    client: reqwest::Client,
    config: CrawlConfig,
}

impl Crawler {
    pub fn new(config: &CrawlConfig) -> ScopeResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Fetch `url` and return all of its CSS, capped at `max_css_bytes`.
    pub async fn fetch_css(&self, url: &str) -> ScopeResult<CrawlOutput> {
        let page_url = Url::parse(url).map_err(|e| ScopeError::crawl(url, e.to_string()))?;
        if !matches!(page_url.scheme(), "http" | "https") {
            return Err(ScopeError::crawl(url, "only http and https URLs are supported"));
        }

        info!(url = %page_url, "Fetching page");
        let cap = self.config.max_css_bytes;
        let html = self.get_text(page_url.as_str(), cap).await?;

        let mut css_text = collect_inline_css(&html);
        let links = stylesheet_links(&html, &page_url);
        let wanted: Vec<&Url> = links.iter().take(self.config.max_stylesheets).collect();
        if links.len() > wanted.len() {
            debug!(found = links.len(), kept = wanted.len(), "Limiting linked stylesheets");
        }

        let fetched = join_all(wanted.iter().map(|href| self.get_text(href.as_str(), cap))).await;

        let mut stylesheets = 0;
        for (href, body) in wanted.iter().zip(fetched) {
            match body {
                Ok(css) => {
                    stylesheets += 1;
                    css_text.push('\n');
                    css_text.push_str(&css);
                }
                Err(e) => warn!(stylesheet = %href, error = %e, "Skipping stylesheet"),
            }
        }

        truncate_at_char_boundary(&mut css_text, cap);
        info!(bytes = css_text.len(), stylesheets, "Collected CSS");

        Ok(CrawlOutput {
            css_text,
            pages: 1,
            stylesheets,
        })
    }

    /// GET `url` and read at most `max_bytes` of its body. The rest of the
    /// stream is dropped unread.
    async fn get_text(&self, url: &str, max_bytes: usize) -> ScopeResult<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScopeError::crawl(url, format!("HTTP {}", status)));
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            if push_capped(&mut body, &chunk?, max_bytes) {
                debug!(url, max_bytes, "Body reached size cap, stopping read");
                break;
            }
        }
        Ok(utf8_prefix(body))
    }
}

/// Inline `<style>` bodies, then `style` attributes each wrapped as a block.
pub fn collect_inline_css(html: &str) -> String {
    let mut css = String::new();
    for caps in STYLE_TAG_RE.captures_iter(html) {
        css.push_str(caps[1].trim());
        css.push('\n');
    }
    for caps in STYLE_ATTR_RE.captures_iter(html) {
        let decls = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str()).unwrap_or_default();
        if !decls.trim().is_empty() {
            css.push_str("[style] { ");
            css.push_str(decls.trim());
            css.push_str(" }\n");
        }
    }
    css
}

/// Absolute URLs of `<link rel="stylesheet">` targets, deduplicated, in
/// document order.
pub fn stylesheet_links(html: &str, base: &Url) -> Vec<Url> {
    let mut links: Vec<Url> = Vec::new();
    for tag in LINK_TAG_RE.find_iter(html) {
        let tag = tag.as_str();
        if !REL_STYLESHEET_RE.is_match(tag) {
            continue;
        }
        let Some(caps) = HREF_RE.captures(tag) else {
            continue;
        };
        let href = caps
            .get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map(|m| m.as_str().trim())
            .unwrap_or_default();
        if href.is_empty() {
            continue;
        }
        match base.join(href) {
            Ok(url) if !links.contains(&url) => links.push(url),
            Ok(_) => {}
            Err(e) => debug!(href, error = %e, "Ignoring unparseable stylesheet href"),
        }
    }
    links
}

/// Append `chunk` to `buf` without exceeding `cap` bytes. Returns true once
/// the buffer is full.
pub fn push_capped(buf: &mut Vec<u8>, chunk: &[u8], cap: usize) -> bool {
    let room = cap.saturating_sub(buf.len());
    buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
    buf.len() >= cap
}

/// Decode a possibly truncated body. A multi-byte sequence cut at the end is
/// dropped; invalid bytes elsewhere are replaced.
pub fn utf8_prefix(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) if e.utf8_error().error_len().is_none() => {
            let valid = e.utf8_error().valid_up_to();
            let mut bytes = e.into_bytes();
            bytes.truncate(valid);
            String::from_utf8_lossy(&bytes).into_owned()
        }
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// Cut `text` to at most `max_bytes`, never splitting a UTF-8 sequence.
pub fn truncate_at_char_boundary(text: &mut String, max_bytes: usize) {
    if text.len() <= max_bytes {
        return;
    }
    let mut cut = max_bytes;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::parse_css;

    const PAGE: &str = r#"<!doctype html>
<html><head>
  <link rel="stylesheet" href="/css/site.css">
  <link rel="icon" href="/favicon.ico">
  <link href='https://cdn.example.net/base.css' rel='stylesheet'>
  <link rel="stylesheet" href="/css/site.css">
  <style>
    body { color: #222; font-size: 16px }
  </style>
</head>
<body style="background: #fafafa">
  <div style='padding: 8px'>hi</div>
</body></html>"#;

    #[test]
    fn test_inline_css_collected() {
        let css = collect_inline_css(PAGE);
        assert!(css.contains("body { color: #222; font-size: 16px }"));
        assert!(css.contains("[style] { background: #fafafa }"));
        assert!(css.contains("[style] { padding: 8px }"));

        let raw = parse_css(&css);
        assert_eq!(raw.colors.len(), 2);
        assert_eq!(raw.spacing.len(), 1);
    }

    #[test]
    fn test_stylesheet_links_resolved_and_deduplicated() {
        let base = Url::parse("https://example.com/about/").unwrap();
        let links: Vec<String> = stylesheet_links(PAGE, &base)
            .into_iter()
            .map(|u| u.to_string())
            .collect();
        assert_eq!(
            links,
            vec![
                "https://example.com/css/site.css",
                "https://cdn.example.net/base.css",
            ]
        );
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        let mut text = "ab\u{e9}cd".to_string(); // é is two bytes at 2..4
        truncate_at_char_boundary(&mut text, 3);
        assert_eq!(text, "ab");

        let mut short = "abc".to_string();
        truncate_at_char_boundary(&mut short, 10);
        assert_eq!(short, "abc");
    }

    #[test]
    fn test_push_capped_stops_at_cap() {
        let mut buf = Vec::new();
        assert!(!push_capped(&mut buf, b"abc", 5));
        assert!(push_capped(&mut buf, b"defgh", 5));
        assert_eq!(buf, b"abcde");
        assert!(push_capped(&mut buf, b"ij", 5));
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn test_utf8_prefix_drops_char_cut_at_cap() {
        let mut buf = Vec::new();
        push_capped(&mut buf, "ab\u{e9}cd".as_bytes(), 3);
        assert_eq!(utf8_prefix(buf), "ab");

        assert_eq!(utf8_prefix(b"a\xffb".to_vec()), "a\u{fffd}b");
        assert_eq!(utf8_prefix("\u{e9}t\u{e9}".as_bytes().to_vec()), "\u{e9}t\u{e9}");
    }

    #[tokio::test]
    async fn test_rejects_non_http_scheme() {
        let crawler = Crawler::new(&CrawlConfig::default()).unwrap();
        let err = crawler.fetch_css("file:///etc/passwd").await.unwrap_err();
        assert!(matches!(err, ScopeError::CrawlFailed { .. }));
    }
}
