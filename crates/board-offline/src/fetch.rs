//! Network fetch capability

use crate::error::{OfflineError, Result};
use crate::types::{Method, Request, Response};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// The host's network fetch primitive.
///
/// `Err` means transport failure (unreachable host, reset connection); an
/// HTTP error status still resolves to `Ok`, mirroring a fetch pipeline
/// where only a network failure rejects.
#[async_trait]
pub trait NetworkFetch: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response>;
}

/// HTTP client resolving relative request paths against a base origin.
pub struct HttpFetcher {
    client: Client,
    base: Url,
}

impl HttpFetcher {
    pub fn new(base: Url) -> Self {
        Self {
            client: Client::new(),
            base,
        }
    }

    fn resolve(&self, url: &str) -> Result<Url> {
        self.base
            .join(url)
            .map_err(|e| OfflineError::Network(format!("invalid request URL {:?}: {}", url, e)))
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Head => reqwest::Method::HEAD,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl NetworkFetch for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response> {
        let url = self.resolve(&request.url)?;
        debug!(method = request.method.as_str(), url = %url, "Fetching from network");

        let response = self
            .client
            .request(reqwest_method(request.method), url)
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = response.bytes().await?.to_vec();

        debug!(status, size = body.len(), "Network fetch complete");
        Ok(Response::new(status, content_type, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_joins_relative_path() {
        let fetcher = HttpFetcher::new(Url::parse("http://localhost:8000").unwrap());
        let url = fetcher.resolve("/static/board/trash-icon.svg").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/static/board/trash-icon.svg"
        );
    }

    #[test]
    fn test_resolve_home() {
        let fetcher = HttpFetcher::new(Url::parse("http://localhost:8000/board/").unwrap());
        let url = fetcher.resolve("/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_reqwest_method_mapping() {
        assert_eq!(reqwest_method(Method::Get), reqwest::Method::GET);
        assert_eq!(reqwest_method(Method::Head), reqwest::Method::HEAD);
        assert_eq!(reqwest_method(Method::Post), reqwest::Method::POST);
        assert_eq!(reqwest_method(Method::Put), reqwest::Method::PUT);
        assert_eq!(reqwest_method(Method::Delete), reqwest::Method::DELETE);
    }
}
