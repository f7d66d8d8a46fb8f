// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote uploader abstraction.
//!
//! The coordinator only needs to know whether an upload succeeded, so the
//! trait is a single async call. [`HttpUploader`] is the production
//! implementation; tests script outcomes with a mock.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};
use sk_core::{OperationKind, Payload};

/// Error type for upload attempts.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The payload could not be read.
    #[error("failed to read payload: {0}")]
    Payload(#[from] std::io::Error),

    /// The configured endpoint is not a usable URL.
    #[error("invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Result type for upload attempts.
pub type UploadResult<T> = Result<T, UploadError>;

/// Boxed future returned by [`Uploader::upload`].
pub type UploadFuture<'a> = Pin<Box<dyn Future<Output = UploadResult<()>> + Send + 'a>>;

/// Performs the network work for one operation.
///
/// Implementations must be safe to call from the coordinator's drain pass
/// while other tasks hold references to the same uploader.
pub trait Uploader: Send + Sync {
    fn upload<'a>(&'a self, kind: OperationKind, payload: Option<&'a Payload>) -> UploadFuture<'a>;
}

/// Connection settings for [`HttpUploader`].
#[derive(Debug, Clone)]
pub struct HttpUploaderConfig {
    /// Base URL; the per-kind route is appended.
    pub endpoint: String,
    /// Sent as a bearer token when present.
    pub auth_token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Uploads operations with one HTTP POST each.
#[derive(Debug, Clone)]
pub struct HttpUploader {
    client: Client,
    base: Url,
    auth_token: Option<String>,
}

impl HttpUploader {
    pub fn new(config: &HttpUploaderConfig) -> UploadResult<Self> {
        let invalid = |reason: String| UploadError::InvalidEndpoint {
            endpoint: config.endpoint.clone(),
            reason,
        };

        // A trailing slash keeps `join` from replacing the last path segment.
        let mut endpoint = config.endpoint.trim().to_string();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let base = Url::parse(&endpoint).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| UploadError::Request(e.to_string()))?;

        Ok(HttpUploader {
            client,
            base,
            auth_token: config.auth_token.clone(),
        })
    }

    /// Full URL an operation of `kind` is posted to.
    pub fn url_for(&self, kind: OperationKind) -> UploadResult<Url> {
        self.base
            .join(route(kind))
            .map_err(|e| UploadError::InvalidEndpoint {
                endpoint: self.base.to_string(),
                reason: e.to_string(),
            })
    }

    async fn post(&self, kind: OperationKind, payload: Option<&Payload>) -> UploadResult<()> {
        let body = match payload {
            None => Vec::new(),
            Some(Payload::Bytes(bytes)) => bytes.clone(),
            Some(Payload::File(path)) => tokio::fs::read(path).await?,
        };

        let url = self.url_for(kind)?;
        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header("X-Operation-Kind", kind.as_str())
            .body(body);
        if let Some(token) = &self.auth_token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| UploadError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(UploadError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl Uploader for HttpUploader {
    fn upload<'a>(&'a self, kind: OperationKind, payload: Option<&'a Payload>) -> UploadFuture<'a> {
        Box::pin(self.post(kind, payload))
    }
}

/// Path segment each operation kind is posted to.
pub fn route(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::UploadFnol => "fnol",
        OperationKind::UploadPhoto => "photos",
        OperationKind::UploadLidarScan => "lidar-scans",
        OperationKind::SyncClaim => "claims",
    }
}

#[cfg(test)]
#[path = "uploader_tests.rs"]
mod tests;
