// ABOUTME: The remote API surface traversal is built on: pages, block children and database queries.
// ABOUTME: Implementations wrap a real Notion HTTP client; tests use in-memory fakes.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Block, DatabaseQuery, Page, PaginatedList};

/// Capability the client needs from the remote API.
///
/// Errors should be reported as `ClientError::Api`; traversal returns them
/// to the caller unchanged.
#[async_trait]
pub trait NotionApi: Send + Sync {
    /// Retrieve a page's own properties.
    async fn retrieve_page(&self, page_id: &str) -> Result<Page>;

    /// List one page of a block's direct children.
    async fn list_block_children(
        &self,
        block_id: &str,
        page_size: u32,
        start_cursor: Option<&str>,
    ) -> Result<PaginatedList<Block>>;

    /// Run one page of a database query.
    async fn query_database(&self, query: &DatabaseQuery) -> Result<PaginatedList<Page>>;
}
