// ABOUTME: Configuration options for the notionpresso client and its ClientBuilder.
// ABOUTME: ClientBuilder provides a fluent API for constructing Client instances with custom settings.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::api::NotionApi;
use crate::client::Client;
use crate::error::Result;
use crate::resource::HtmlFetcher;

/// Largest page size the children endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Type label written onto bookmark blocks after enrichment.
pub const ENRICHED_BOOKMARK_TYPE: &str = "notionpresso_bookmark";

/// Configuration options for the client.
#[derive(Debug, Clone)]
pub struct Options {
    pub timeout: Duration,
    pub user_agent: String,
    pub headers: HashMap<String, String>,
    pub http_client: Option<reqwest::Client>,
    pub page_size: u32,
    /// Upper bound on sibling blocks processed at once. `None` is unbounded.
    pub max_concurrency: Option<usize>,
    pub bookmark_type: String,
    pub default_parsers: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: format!("notionpresso/{}", env!("CARGO_PKG_VERSION")),
            headers: HashMap::new(),
            http_client: None,
            page_size: MAX_PAGE_SIZE,
            max_concurrency: None,
            bookmark_type: ENRICHED_BOOKMARK_TYPE.to_string(),
            default_parsers: true,
        }
    }
}

/// Builder for constructing Client instances with custom configuration.
pub struct ClientBuilder {
    api: Arc<dyn NotionApi>,
    fetcher: Option<Arc<dyn HtmlFetcher>>,
    opts: Options,
}

impl ClientBuilder {
    /// Create a new ClientBuilder around an API implementation.
    pub fn new(api: Arc<dyn NotionApi>) -> Self {
        Self {
            api,
            fetcher: None,
            opts: Options::default(),
        }
    }

    /// Set the HTML fetch timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header for HTML fetches.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Add a header to all HTML fetches.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Use a custom HTTP client for HTML fetches.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Replace the HTML fetcher entirely. Timeout, user agent, headers and
    /// http_client are ignored when this is set.
    pub fn fetcher(mut self, fetcher: Arc<dyn HtmlFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Page size for children listings, clamped to 1..=100.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.opts.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Cap concurrent sibling processing. Zero is treated as one.
    pub fn max_concurrency(mut self, limit: usize) -> Self {
        self.opts.max_concurrency = Some(limit.max(1));
        self
    }

    /// Type label for enriched bookmark blocks.
    pub fn bookmark_type(mut self, label: impl Into<String>) -> Self {
        self.opts.bookmark_type = label.into();
        self
    }

    /// Whether to register the title/description/image/favicon parsers.
    pub fn default_parsers(mut self, enabled: bool) -> Self {
        self.opts.default_parsers = enabled;
        self
    }

    /// Build the Client with the configured options.
    ///
    /// Fails only if the HTTP client for HTML fetches cannot be constructed.
    pub fn build(self) -> Result<Client> {
        Client::new(self.api, self.fetcher, self.opts)
    }
}
