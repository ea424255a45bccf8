// ABOUTME: HTML fetching for bookmark enrichment, with the HtmlFetcher seam and a reqwest implementation.
// ABOUTME: Handles content-length limits and charset decoding; failures are logged and become None.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::ClientError;
use crate::options::Options;

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Retrieves the HTML of a bookmarked page.
///
/// Implementations must not fail: any transport error or unsuccessful status
/// is reported as `None`.
#[async_trait]
pub trait HtmlFetcher: Send + Sync {
    async fn fetch_html(&self, url: &str) -> Option<String>;
}

/// Options for fetching a resource.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub headers: HashMap<String, String>,
}

/// Result of a successful fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decode the body as UTF-8 text, using charset hints from content-type header.
    pub fn text_utf8(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Decode body bytes to a String using charset from content-type header or detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(ct) = content_type {
        if let Some(charset) = extract_charset(ct) {
            if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
                let (decoded, _, _) = encoding.decode(body);
                return decoded.into_owned();
            }
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        let trimmed = part.trim();
        if let Some(charset) = trimmed.strip_prefix("charset=") {
            let charset = charset.trim_matches('"').trim_matches('\'');
            return Some(charset.to_string());
        }
    }
    None
}

/// Fetch a resource from the given URL. Any non-2xx status is an error.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    opts: &FetchOptions,
) -> Result<FetchResult, ClientError> {
    let parsed_url = url::Url::parse(url).map_err(|e| ClientError::invalid_url(url, e))?;

    let scheme = parsed_url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ClientError::invalid_url(url, "scheme must be http or https"));
    }

    let mut request = client.get(parsed_url);
    for (key, value) in &opts.headers {
        request = request.header(key, value);
    }

    let response = request
        .send()
        .await
        .map_err(|e| ClientError::fetch(url, anyhow::anyhow!("request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::fetch(
            url,
            anyhow::anyhow!("HTTP status {}", status.as_u16()),
        ));
    }

    if let Some(len) = response.content_length() {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(ClientError::fetch(url, anyhow::anyhow!("content too large")));
        }
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    let body = response
        .bytes()
        .await
        .map_err(|e| ClientError::fetch(url, anyhow::anyhow!("failed to read body: {}", e)))?;

    if body.len() > MAX_CONTENT_LENGTH {
        return Err(ClientError::fetch(url, anyhow::anyhow!("content too large")));
    }

    Ok(FetchResult {
        content_type,
        body,
    })
}

/// reqwest-backed `HtmlFetcher`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    opts: FetchOptions,
}

impl HttpFetcher {
    /// Build a fetcher from client options, reusing `opts.http_client` when given.
    pub fn new(opts: &Options) -> Result<Self, ClientError> {
        let client = match &opts.http_client {
            Some(client) => client.clone(),
            None => build_http_client(&opts.user_agent, opts.timeout)?,
        };
        Ok(Self {
            client,
            opts: FetchOptions {
                headers: opts.headers.clone(),
            },
        })
    }
}

#[async_trait]
impl HtmlFetcher for HttpFetcher {
    async fn fetch_html(&self, url: &str) -> Option<String> {
        match fetch(&self.client, url, &self.opts).await {
            Ok(result) => Some(result.text_utf8()),
            Err(err) => {
                tracing::warn!(url, error = %err, "failed to fetch bookmark HTML");
                None
            }
        }
    }
}

fn build_http_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
        .map_err(ClientError::http_client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn create_test_fetcher() -> HttpFetcher {
        HttpFetcher::new(&Options::default()).expect("client builds")
    }

    #[tokio::test]
    async fn fetch_html_returns_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/page");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body("<html><title>hi</title></html>");
        });

        let html = create_test_fetcher().fetch_html(&server.url("/page")).await;
        mock.assert();
        assert_eq!(html.as_deref(), Some("<html><title>hi</title></html>"));
    }

    #[tokio::test]
    async fn fetch_html_none_on_404() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("not found");
        });

        let html = create_test_fetcher().fetch_html(&server.url("/missing")).await;
        assert!(html.is_none());
    }

    #[tokio::test]
    async fn fetch_html_none_on_server_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/boom");
            then.status(500);
        });

        assert!(create_test_fetcher()
            .fetch_html(&server.url("/boom"))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn fetch_html_none_on_connection_error() {
        // Port 9 (discard) is closed on test hosts.
        let html = create_test_fetcher()
            .fetch_html("http://127.0.0.1:9/unreachable")
            .await;
        assert!(html.is_none());
    }

    #[tokio::test]
    async fn fetch_html_none_on_unsupported_scheme() {
        assert!(create_test_fetcher()
            .fetch_html("ftp://example.com/file")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn fetch_sends_configured_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/h")
                .header("x-preview", "1")
                .header("user-agent", "preview-bot");
            then.status(200).body("ok");
        });

        let opts = Options {
            user_agent: "preview-bot".into(),
            headers: HashMap::from([("x-preview".to_string(), "1".to_string())]),
            ..Options::default()
        };
        let fetcher = HttpFetcher::new(&opts).unwrap();
        assert_eq!(fetcher.fetch_html(&server.url("/h")).await.as_deref(), Some("ok"));
        mock.assert();
    }

    #[tokio::test]
    async fn decodes_declared_charset() {
        let server = MockServer::start();
        // "café" in ISO-8859-1
        server.mock(|when, then| {
            when.method(GET).path("/latin1");
            then.status(200)
                .header("content-type", "text/html; charset=iso-8859-1")
                .body(vec![b'c', b'a', b'f', 0xE9]);
        });

        let html = create_test_fetcher().fetch_html(&server.url("/latin1")).await;
        assert_eq!(html.as_deref(), Some("café"));
    }

    #[test]
    fn invalid_user_agent_fails_client_build() {
        let opts = Options {
            user_agent: "bad\nagent".into(),
            ..Options::default()
        };
        let err = HttpFetcher::new(&opts).unwrap_err();
        assert!(err.is_http_client());
        assert!(err.to_string().starts_with("failed to build HTTP client"));
    }

    #[test]
    fn extract_charset_handles_quotes() {
        assert_eq!(
            extract_charset("text/html; charset=\"UTF-8\""),
            Some("utf-8".to_string())
        );
        assert_eq!(extract_charset("text/html"), None);
    }
}
