//! Sources for skin markup

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use url::Url;

use crate::config::FetchConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            body: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Retrieves a skin asset. A missing asset is a response with a non-200
/// status; `Err` is reserved for transport failures.
#[async_trait]
pub trait SkinFetcher: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<FetchResponse>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: Option<Url>,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .map(Url::parse)
            .transpose()
            .context("Invalid fetch base URL")?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, base_url })
    }

    fn resolve(&self, path: &str) -> Result<Url> {
        match &self.base_url {
            Some(base) => base
                .join(path)
                .with_context(|| format!("Cannot resolve {} against {}", path, base)),
            None => Url::parse(path).with_context(|| format!("Not an absolute URL: {}", path)),
        }
    }
}

#[async_trait]
impl SkinFetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<FetchResponse> {
        let url = self.resolve(path)?;
        tracing::debug!(url = %url, "Fetching skin asset");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .with_context(|| format!("Reading body of {} failed", url))?;
        Ok(FetchResponse { status, body })
    }
}

/// Serves skins from a directory on disk; `path` is taken relative to `root`.
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl SkinFetcher for DirectoryFetcher {
    async fn fetch(&self, path: &str) -> Result<FetchResponse> {
        let file = self.root.join(path.trim_start_matches('/'));
        match tokio::fs::read_to_string(&file).await {
            Ok(body) => Ok(FetchResponse::ok(body)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FetchResponse::not_found()),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", file.display())),
        }
    }
}

/// Serves skins compiled into the host or built by tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryFetcher {
    files: HashMap<String, String>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.files.insert(path.into(), body.into());
        self
    }
}

#[async_trait]
impl SkinFetcher for MemoryFetcher {
    async fn fetch(&self, path: &str) -> Result<FetchResponse> {
        Ok(self
            .files
            .get(path)
            .map(|body| FetchResponse::ok(body.as_str()))
            .unwrap_or_else(FetchResponse::not_found))
    }
}
