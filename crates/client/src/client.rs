// ABOUTME: The Client that layers recursive pagination and bookmark enrichment over a NotionApi.
// ABOUTME: Provides fetch_blocks, fetch_full_page, fetch_page_list_from_database and link previews.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::api::NotionApi;
use crate::error::Result;
use crate::metadata::MetadataParser;
use crate::model::{Block, BookmarkFieldKey, DatabaseQuery, FullPage, Metadata, Page};
use crate::options::{ClientBuilder, Options};
use crate::preprocessor::Preprocessor;
use crate::processor::{join_ordered, BlockProcessor};
use crate::resource::{HtmlFetcher, HttpFetcher};

/// Pagination and enrichment helpers around a remote API.
pub struct Client {
    api: Arc<dyn NotionApi>,
    processor: BlockProcessor,
    opts: Options,
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder(api: Arc<dyn NotionApi>) -> ClientBuilder {
        ClientBuilder::new(api)
    }

    /// Create a new Client. Without an explicit `fetcher`, HTML is fetched
    /// over HTTP according to `opts`.
    pub fn new(
        api: Arc<dyn NotionApi>,
        fetcher: Option<Arc<dyn HtmlFetcher>>,
        opts: Options,
    ) -> Result<Self> {
        let fetcher = match fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpFetcher::new(&opts)?),
        };
        Ok(Self {
            api,
            processor: BlockProcessor::new(fetcher, &opts),
            opts,
        })
    }

    /// Add or replace a metadata parser used for bookmark enrichment.
    pub fn register_metadata_parser<P>(&mut self, key: impl Into<String>, parser: P)
    where
        P: MetadataParser + 'static,
    {
        self.processor.register_metadata_parser(key, parser);
    }

    /// Add or replace the transform for one bookmark field.
    pub fn register_preprocessor<P>(&mut self, field: BookmarkFieldKey, processor: P)
    where
        P: Preprocessor + 'static,
    {
        self.processor.register_preprocessor(field, processor);
    }

    pub fn processor(&self) -> &BlockProcessor {
        &self.processor
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Fetch every child of `parent_id`, enriched, with their descendants attached.
    ///
    /// Siblings are processed concurrently; pages of one listing are fetched
    /// one after another. Synced copies descend into their source block.
    pub fn fetch_blocks<'a>(&'a self, parent_id: &'a str) -> BoxFuture<'a, Result<Vec<Block>>> {
        async move {
            let children = self.list_children(parent_id).await?;
            let branches = children.into_iter().map(|block| self.fetch_branch(block));
            join_ordered(branches, self.opts.max_concurrency).await
        }
        .boxed()
    }

    async fn fetch_branch(&self, block: Block) -> Result<Block> {
        let mut block = self.processor.process(block).await?;
        block.blocks = if block.has_children {
            let source = block.children_source_id().to_string();
            self.fetch_blocks(&source).await?
        } else {
            Vec::new()
        };
        Ok(block)
    }

    /// All direct children of `block_id`, following cursors in order.
    async fn list_children(&self, block_id: &str) -> Result<Vec<Block>> {
        let page_size = self.opts.page_size;
        let first = self.api.list_block_children(block_id, page_size, None).await?;
        let mut cursor = first.continuation().map(str::to_string);
        let mut blocks = first.results;
        let mut pages = 1;

        while let Some(start) = cursor {
            let next = self
                .api
                .list_block_children(block_id, page_size, Some(&start))
                .await?;
            cursor = next.continuation().map(str::to_string);
            blocks.extend(next.results);
            pages += 1;
        }

        tracing::debug!(block_id, pages, count = blocks.len(), "listed block children");
        Ok(blocks)
    }

    /// Retrieve a page and its full block tree concurrently.
    pub async fn fetch_full_page(&self, page_id: &str) -> Result<FullPage> {
        let (page, blocks) =
            tokio::try_join!(self.api.retrieve_page(page_id), self.fetch_blocks(page_id))?;
        Ok(FullPage { page, blocks })
    }

    /// Run a database query and every continuation, concatenating results in page order.
    pub async fn fetch_page_list_from_database(&self, query: &DatabaseQuery) -> Result<Vec<Page>> {
        let first = self.api.query_database(query).await?;
        let mut next = first.continuation().map(|c| query.with_cursor(c));
        let mut pages = first.results;

        while let Some(query) = next {
            let response = self.api.query_database(&query).await?;
            next = response.continuation().map(|c| query.with_cursor(c));
            pages.extend(response.results);
        }

        tracing::debug!(database_id = %query.database_id, count = pages.len(), "queried database");
        Ok(pages)
    }

    /// Fetch `url` and extract its link preview.
    pub async fn preview(&self, url: &str) -> Result<Metadata> {
        self.processor.preview(url).await
    }
}
