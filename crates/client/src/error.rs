// ABOUTME: Error type for the notionpresso client: API, parser, preprocessor and URL failures.
// ABOUTME: Provides ClientError with convenience constructors and boolean helpers.

use std::fmt;

use thiserror::Error;

/// Errors surfaced by traversal and bookmark enrichment.
///
/// HTML fetch failures never reach callers; they are logged and turned into
/// an un-enriched block. Everything else propagates.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A page URL could not be parsed.
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// Fetching a bookmark's HTML failed.
    #[error("fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// The HTTP client used for HTML fetches could not be built.
    #[error("failed to build HTTP client: {source}")]
    HttpClient {
        #[source]
        source: anyhow::Error,
    },

    /// A registered metadata parser failed.
    #[error("metadata parser {key:?} failed: {source}")]
    Parser {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// A registered preprocessor failed.
    #[error("preprocessor for {field:?} failed: {source}")]
    Preprocess {
        field: String,
        #[source]
        source: anyhow::Error,
    },

    /// The remote API collaborator returned an error.
    #[error(transparent)]
    Api(anyhow::Error),
}

impl ClientError {
    /// Create an InvalidUrl error.
    pub fn invalid_url(url: impl Into<String>, source: impl fmt::Display) -> Self {
        ClientError::InvalidUrl {
            url: url.into(),
            source: anyhow::anyhow!("{}", source),
        }
    }

    /// Create a Fetch error.
    pub fn fetch(url: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        ClientError::Fetch {
            url: url.into(),
            source: source.into(),
        }
    }

    /// Create an HttpClient error.
    pub fn http_client(source: impl Into<anyhow::Error>) -> Self {
        ClientError::HttpClient {
            source: source.into(),
        }
    }

    /// Create a Parser error for the parser registered under `key`.
    pub fn parser(key: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        ClientError::Parser {
            key: key.into(),
            source: source.into(),
        }
    }

    /// Create a Preprocess error for `field`.
    pub fn preprocess(field: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        ClientError::Preprocess {
            field: field.into(),
            source: source.into(),
        }
    }

    /// Wrap an error raised by a `NotionApi` implementation.
    pub fn api(source: impl Into<anyhow::Error>) -> Self {
        ClientError::Api(source.into())
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        matches!(self, ClientError::InvalidUrl { .. })
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        matches!(self, ClientError::Fetch { .. })
    }

    /// Returns true if this is an HttpClient error.
    pub fn is_http_client(&self) -> bool {
        matches!(self, ClientError::HttpClient { .. })
    }

    /// Returns true if this is a Parser error.
    pub fn is_parser(&self) -> bool {
        matches!(self, ClientError::Parser { .. })
    }

    /// Returns true if this is a Preprocess error.
    pub fn is_preprocess(&self) -> bool {
        matches!(self, ClientError::Preprocess { .. })
    }

    /// Returns true if this is an Api error.
    pub fn is_api(&self) -> bool {
        matches!(self, ClientError::Api(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;
