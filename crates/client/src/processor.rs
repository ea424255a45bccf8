// ABOUTME: Bookmark enrichment: fetch the linked page, run metadata parsers and preprocessors, merge into the block.
// ABOUTME: Also walks already-fetched block trees and builds link previews.

use std::future::Future;
use std::sync::Arc;

use futures::future::{try_join_all, BoxFuture};
use futures::{stream, FutureExt, StreamExt, TryStreamExt};
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};
use crate::metadata::{MetadataParser, MetadataParserRegistry};
use crate::model::{Block, BookmarkFieldKey, Metadata, BOOKMARK_TYPE};
use crate::options::Options;
use crate::preprocessor::{Preprocessor, PreprocessorRegistry};
use crate::resource::HtmlFetcher;

/// Await `futures` together, keeping input order. With a `limit`, at most
/// that many run at once. The first error wins.
pub(crate) async fn join_ordered<I, Fut, T>(futures: I, limit: Option<usize>) -> Result<Vec<T>>
where
    I: IntoIterator<Item = Fut>,
    Fut: Future<Output = Result<T>>,
{
    match limit {
        Some(n) => stream::iter(futures).buffered(n.max(1)).try_collect().await,
        None => try_join_all(futures).await,
    }
}

/// Enriches bookmark blocks with metadata from the pages they link to.
#[derive(Clone)]
pub struct BlockProcessor {
    fetcher: Arc<dyn HtmlFetcher>,
    metadata: MetadataParserRegistry,
    preprocessors: PreprocessorRegistry,
    bookmark_type: String,
    max_concurrency: Option<usize>,
}

impl BlockProcessor {
    /// Create a processor using `fetcher` for HTML and the given options.
    pub fn new(fetcher: Arc<dyn HtmlFetcher>, opts: &Options) -> Self {
        let metadata = if opts.default_parsers {
            MetadataParserRegistry::with_defaults()
        } else {
            MetadataParserRegistry::new()
        };
        Self {
            fetcher,
            metadata,
            preprocessors: PreprocessorRegistry::new(),
            bookmark_type: opts.bookmark_type.clone(),
            max_concurrency: opts.max_concurrency,
        }
    }

    /// Add or replace a metadata parser.
    pub fn register_metadata_parser<P>(&mut self, key: impl Into<String>, parser: P)
    where
        P: MetadataParser + 'static,
    {
        self.metadata.register(key, parser);
    }

    /// Add or replace the transform for one bookmark field.
    pub fn register_preprocessor<P>(&mut self, field: BookmarkFieldKey, processor: P)
    where
        P: Preprocessor + 'static,
    {
        self.preprocessors.register(field, processor);
    }

    pub fn metadata_parsers(&self) -> &MetadataParserRegistry {
        &self.metadata
    }

    pub fn preprocessors(&self) -> &PreprocessorRegistry {
        &self.preprocessors
    }

    /// Enrich a single block.
    ///
    /// Blocks that are not bookmarks, bookmarks without a URL, and bookmarks
    /// whose page cannot be fetched come back unchanged.
    pub async fn process(&self, mut block: Block) -> Result<Block> {
        if !block.is_bookmark() {
            return Ok(block);
        }
        let Some(url) = block.bookmark_url().map(str::to_string) else {
            return Ok(block);
        };

        let Some(html) = self.fetcher.fetch_html(&url).await else {
            tracing::debug!(block_id = %block.id, %url, "bookmark left unenriched");
            return Ok(block);
        };

        let extracted = self.metadata.parse(&html, &url).await?;
        let processed = self.process_fields(extracted).await?;

        if let Some(Value::Object(bookmark)) = block.fields.get_mut(BOOKMARK_TYPE) {
            bookmark.extend(processed);
        }
        block.block_type = self.bookmark_type.clone();
        tracing::debug!(block_id = %block.id, %url, "bookmark enriched");
        Ok(block)
    }

    /// Run extracted values through the preprocessors.
    ///
    /// Null values are dropped. String values of bookmark fields go through
    /// the field's transform; everything else is kept as is.
    pub async fn process_fields(&self, fields: Map<String, Value>) -> Result<Map<String, Value>> {
        let mut processed = Map::new();
        for (key, value) in fields {
            let value = match (key.parse::<BookmarkFieldKey>(), value) {
                (_, Value::Null) => continue,
                (Ok(field), Value::String(s)) => {
                    Value::String(self.preprocessors.process(field, s).await?)
                }
                (_, other) => other,
            };
            processed.insert(key, value);
        }
        Ok(processed)
    }

    /// Fetch `url` and return its preview. An unreachable page yields an
    /// empty preview rather than an error.
    pub async fn preview(&self, url: &str) -> Result<Metadata> {
        let Some(html) = self.fetcher.fetch_html(url).await else {
            return Ok(Metadata {
                url: url.to_string(),
                ..Default::default()
            });
        };
        let extracted = self.metadata.parse(&html, url).await?;
        let processed = self.process_fields(extracted).await?;
        Ok(Metadata::from_fields(url, &processed))
    }

    /// Enrich every bookmark in an already-fetched tree, at any depth.
    /// Siblings are processed concurrently.
    pub fn enrich_tree(&self, blocks: Vec<Block>) -> BoxFuture<'_, Result<Vec<Block>>> {
        async move {
            let branches = blocks.into_iter().map(|block| async move {
                let mut block = self.process(block).await?;
                let children = std::mem::take(&mut block.blocks);
                if !children.is_empty() {
                    block.blocks = self.enrich_tree(children).await?;
                }
                Ok::<_, ClientError>(block)
            });
            join_ordered(branches, self.max_concurrency).await
        }
        .boxed()
    }
}
