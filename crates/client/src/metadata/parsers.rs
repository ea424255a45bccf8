// ABOUTME: Default metadata parsers for bookmark previews: title, description, image and favicon.
// ABOUTME: Each tries an ordered list of meta/link selectors and returns the first non-empty value.

//! Default parsers.
//!
//! Key behaviors:
//! - Selectors are tried in order; the first non-empty value wins.
//! - A matched element yields its `content` attribute, or its text when the
//!   attribute is missing or blank. Values are trimmed.
//! - Not finding anything is not an error: the result is an empty string.
//! - The favicon falls back to `/favicon.ico` at the page origin and resolves
//!   relative hrefs against that origin.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use url::Url;

use crate::error::ClientError;
use crate::metadata::MetadataParser;

fn compile(selectors: &[&str]) -> Vec<Selector> {
    selectors
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .collect()
}

static TITLE_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    compile(&[
        r#"meta[property="og:title"]"#,
        r#"meta[name="twitter:title"]"#,
        "title",
    ])
});

static DESCRIPTION_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    compile(&[
        r#"meta[property="og:description"]"#,
        r#"meta[name="twitter:description"]"#,
        r#"meta[name="description"]"#,
    ])
});

static IMAGE_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    compile(&[
        r#"meta[property="og:image"]"#,
        r#"meta[name="twitter:image"]"#,
    ])
});

static FAVICON_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    compile(&[r#"link[rel="icon"]"#, r#"link[rel="shortcut icon"]"#])
});

/// `content` attribute, else text content; trimmed, `None` when blank.
fn content_or_text(el: ElementRef<'_>) -> Option<String> {
    let value = match el.value().attr("content") {
        Some(content) if !content.trim().is_empty() => content.trim().to_string(),
        _ => el.text().collect::<String>().trim().to_string(),
    };
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn attr(el: ElementRef<'_>, name: &str) -> Option<String> {
    el.value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// First non-empty value produced by `extract` over `selectors`, in order.
fn first_match<F>(html: &str, selectors: &[Selector], extract: F) -> Option<String>
where
    F: Fn(ElementRef<'_>) -> Option<String>,
{
    let doc = Html::parse_document(html);
    selectors
        .iter()
        .flat_map(|sel| doc.select(sel))
        .find_map(extract)
}

/// Extract the page title: og:title, twitter:title, then `<title>`.
pub fn extract_title(html: &str) -> String {
    first_match(html, &TITLE_SELECTORS, content_or_text).unwrap_or_default()
}

/// Extract the page description: og:description, twitter:description, then meta description.
pub fn extract_description(html: &str) -> String {
    first_match(html, &DESCRIPTION_SELECTORS, content_or_text).unwrap_or_default()
}

/// Extract the preview image from og:image or twitter:image.
pub fn extract_image(html: &str) -> String {
    first_match(html, &IMAGE_SELECTORS, |el| attr(el, "content")).unwrap_or_default()
}

/// Extract the favicon as an absolute URL.
///
/// Hrefs starting with `http` are returned as written. Anything else is
/// resolved against the origin of `page_url`. Without an icon link the
/// result is `<origin>/favicon.ico`.
pub fn extract_favicon(html: &str, page_url: &str) -> Result<String, ClientError> {
    let origin = page_origin(page_url)?;
    let href = first_match(html, &FAVICON_SELECTORS, |el| attr(el, "href"));

    match href {
        Some(href) if href.starts_with("http") => Ok(href),
        Some(href) => resolve(&origin, &href),
        None => resolve(&origin, "/favicon.ico"),
    }
}

fn page_origin(page_url: &str) -> Result<Url, ClientError> {
    let parsed = Url::parse(page_url).map_err(|e| ClientError::invalid_url(page_url, e))?;
    let origin = parsed.origin().ascii_serialization();
    Url::parse(&origin).map_err(|_| ClientError::invalid_url(page_url, "URL has no origin"))
}

fn resolve(origin: &Url, href: &str) -> Result<String, ClientError> {
    origin
        .join(href)
        .map(|u| u.to_string())
        .map_err(|e| ClientError::invalid_url(href, e))
}

/// Title parser registered as `title`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleParser;

#[async_trait]
impl MetadataParser for TitleParser {
    async fn parse(&self, html: &str, _url: &str) -> anyhow::Result<Value> {
        Ok(Value::String(extract_title(html)))
    }
}

/// Description parser registered as `description`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptionParser;

#[async_trait]
impl MetadataParser for DescriptionParser {
    async fn parse(&self, html: &str, _url: &str) -> anyhow::Result<Value> {
        Ok(Value::String(extract_description(html)))
    }
}

/// Image parser registered as `image`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageParser;

#[async_trait]
impl MetadataParser for ImageParser {
    async fn parse(&self, html: &str, _url: &str) -> anyhow::Result<Value> {
        Ok(Value::String(extract_image(html)))
    }
}

/// Favicon parser registered as `favicon`. Fails only on an unparsable page URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaviconParser;

#[async_trait]
impl MetadataParser for FaviconParser {
    async fn parse(&self, html: &str, url: &str) -> anyhow::Result<Value> {
        Ok(Value::String(extract_favicon(html, url)?))
    }
}
