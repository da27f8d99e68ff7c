//! Request and response model for the fetch interception pipeline

use response_cache::{CachedResponse, RequestKey};
use serde::{Deserialize, Serialize};

/// HTTP method of an intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// Mode of an intercepted request, mirroring the host's request modes.
///
/// `Navigate` marks a top-level page navigation; every other mode is treated
/// as a plain resource request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestMode {
    Navigate,
    SameOrigin,
    Cors,
    NoCors,
}

impl RequestMode {
    pub fn is_navigation(&self) -> bool {
        matches!(self, RequestMode::Navigate)
    }
}

/// An outbound resource request observed by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub mode: RequestMode,
}

impl Request {
    /// A top-level page navigation.
    pub fn navigate(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            mode: RequestMode::Navigate,
        }
    }

    /// A plain GET for a static resource.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            mode: RequestMode::NoCors,
        }
    }

    /// Identity used for cache lookups.
    pub fn key(&self) -> RequestKey {
        RequestKey::new(self.method.as_str(), &self.url)
    }
}

/// A response travelling back through the interception pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, content_type: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn into_snapshot(self) -> CachedResponse {
        CachedResponse::new(self.status, self.content_type, self.body)
    }
}

impl From<CachedResponse> for Response {
    fn from(snapshot: CachedResponse) -> Self {
        Self {
            status: snapshot.status,
            content_type: snapshot.content_type,
            body: snapshot.body,
        }
    }
}

/// Which source answered an intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServedFrom {
    Network,
    Cache,
}

/// Outcome of a successful install-time pre-cache fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallReport {
    pub cache_name: String,
    pub precached: usize,
}

/// How the host should roll this filter over once installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    /// Activate immediately, pre-empting previously-active instances.
    Immediate,
    /// Wait for previously-active instances to finish.
    Staged,
}
