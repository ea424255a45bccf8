// ABOUTME: Metadata parser trait and the registry that runs every parser over a page's HTML.
// ABOUTME: Parsers are keyed by name; results are collected into a JSON map keyed the same way.

//! Metadata extraction for bookmark previews.
//!
//! A [`MetadataParserRegistry`] holds named parsers. Running it over a page
//! yields one JSON value per parser key. The default registry carries the
//! `title`, `description`, `image` and `favicon` parsers from [`parsers`].
//!
//! Parsers run one after another in registration order. A failing parser
//! aborts the whole run.

pub mod parsers;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};

/// Extracts one piece of metadata from a page.
///
/// Any JSON value may be returned. `Value::Null` means "nothing to report"
/// and is dropped before merging into a bookmark.
#[async_trait]
pub trait MetadataParser: Send + Sync {
    async fn parse(&self, html: &str, url: &str) -> anyhow::Result<Value>;
}

/// Adapter turning a synchronous closure into a [`MetadataParser`].
pub struct FnParser<F>(F);

/// Wrap `f` as a parser.
pub fn parser_fn<F>(f: F) -> FnParser<F>
where
    F: Fn(&str, &str) -> anyhow::Result<Value> + Send + Sync,
{
    FnParser(f)
}

#[async_trait]
impl<F> MetadataParser for FnParser<F>
where
    F: Fn(&str, &str) -> anyhow::Result<Value> + Send + Sync,
{
    async fn parse(&self, html: &str, url: &str) -> anyhow::Result<Value> {
        (self.0)(html, url)
    }
}

/// Named metadata parsers, run in registration order.
#[derive(Clone, Default)]
pub struct MetadataParserRegistry {
    parsers: Vec<(String, Arc<dyn MetadataParser>)>,
}

impl MetadataParserRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the title, description, image and favicon parsers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("title", parsers::TitleParser);
        registry.register("description", parsers::DescriptionParser);
        registry.register("image", parsers::ImageParser);
        registry.register("favicon", parsers::FaviconParser);
        registry
    }

    /// Registers `parser` under `key`, replacing any parser already there.
    /// A replaced parser keeps its original position.
    pub fn register<P>(&mut self, key: impl Into<String>, parser: P)
    where
        P: MetadataParser + 'static,
    {
        self.register_arc(key, Arc::new(parser));
    }

    /// Registers an already shared parser.
    pub fn register_arc(&mut self, key: impl Into<String>, parser: Arc<dyn MetadataParser>) {
        let key = key.into();
        match self.parsers.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = parser,
            None => self.parsers.push((key, parser)),
        }
    }

    /// Registered keys in run order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.parsers.iter().map(|(k, _)| k.as_str())
    }

    /// Returns the number of registered parsers.
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    /// Returns true if no parsers are registered.
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Runs every parser over `html` and collects the results by key.
    pub async fn parse(&self, html: &str, url: &str) -> Result<Map<String, Value>> {
        let mut result = Map::new();
        for (key, parser) in &self.parsers {
            let value = parser
                .parse(html, url)
                .await
                .map_err(|e| ClientError::parser(key.as_str(), e))?;
            result.insert(key.clone(), value);
        }
        Ok(result)
    }
}

impl fmt::Debug for MetadataParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataParserRegistry")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}
