// ABOUTME: Library entry point for the notionpresso client.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, registries, parsers, preprocessors and the data model.

//! Recursive pagination and bookmark enrichment on top of a Notion API client.
//!
//! [`Client`] flattens paginated block-children and database listings into
//! complete collections and enriches every `bookmark` block it meets with
//! the title, description, image and favicon of the page it links to.
//!
//! The remote API is supplied by the embedder through [`NotionApi`]; HTML
//! fetching goes through [`HtmlFetcher`] (by default [`HttpFetcher`]).
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use notionpresso_client::{stock, BookmarkFieldKey, Client, ClientError, NotionApi};
//!
//! async fn render(api: Arc<dyn NotionApi>) -> Result<(), ClientError> {
//!     let mut client = Client::builder(api).max_concurrency(8).build()?;
//!     client.register_preprocessor(BookmarkFieldKey::Description, stock::truncate(140));
//!
//!     let page = client.fetch_full_page("b55c9c91-384d-452b-81db-d1ef79372b75").await?;
//!     println!("{}", serde_json::to_string_pretty(&page).unwrap_or_default());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod metadata;
pub mod model;
pub mod options;
pub mod preprocessor;
pub mod processor;
pub mod resource;

pub use crate::api::NotionApi;
pub use crate::client::Client;
pub use crate::error::{ClientError, Result};
pub use crate::metadata::parsers::{
    DescriptionParser, FaviconParser, ImageParser, TitleParser,
};
pub use crate::metadata::{parser_fn, MetadataParser, MetadataParserRegistry};
pub use crate::model::{
    Block, BookmarkField, BookmarkFieldKey, DatabaseQuery, FullPage, Metadata, Page,
    PaginatedList,
};
pub use crate::options::{ClientBuilder, Options, ENRICHED_BOOKMARK_TYPE};
pub use crate::preprocessor::{preprocessor, stock, Preprocessor, PreprocessorRegistry};
pub use crate::processor::BlockProcessor;
pub use crate::resource::{HtmlFetcher, HttpFetcher};
