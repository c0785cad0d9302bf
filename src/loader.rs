use std::path::PathBuf;

use tracing::debug;

use crate::{bundle::IndexBundle, error::Result};

/// Where a dialog instance gets its index bundle from.
///
/// Implementations retrieve the raw payload and parse it; the caller
/// decides when (and how often) to load. The shipped sources are
/// [`HttpIndexSource`] and [`FileIndexSource`].
pub trait IndexSource {
    fn load(&self) -> impl Future<Output = Result<IndexBundle>> + Send;
}

/// Fetches the bundle over HTTP. Non-2xx responses are load errors.
#[derive(Debug, Clone)]
pub struct HttpIndexSource {
    client: reqwest::Client,
    url: String,
}

impl HttpIndexSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Use a preconfigured client (shared pools, custom timeouts).
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl IndexSource for HttpIndexSource {
    async fn load(&self) -> Result<IndexBundle> {
        debug!(url = %self.url, "fetching index bundle");
        let payload = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        IndexBundle::from_json(&payload)
    }
}

/// Reads the bundle from a local file.
#[derive(Debug, Clone)]
pub struct FileIndexSource {
    path: PathBuf,
}

impl FileIndexSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl IndexSource for FileIndexSource {
    async fn load(&self) -> Result<IndexBundle> {
        debug!(path = %self.path.display(), "reading index bundle");
        let payload = tokio::fs::read(&self.path).await?;
        IndexBundle::from_json(&payload)
    }
}

/// An index source resolved from a location string: `http(s)` URLs go
/// over the network, anything else is a file path.
#[derive(Debug, Clone)]
pub enum AnyIndexSource {
    Http(HttpIndexSource),
    File(FileIndexSource),
}

impl AnyIndexSource {
    pub fn from_location(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Http(HttpIndexSource::new(location))
        } else {
            Self::File(FileIndexSource::new(location))
        }
    }
}

impl IndexSource for AnyIndexSource {
    async fn load(&self) -> Result<IndexBundle> {
        match self {
            Self::Http(source) => source.load().await,
            Self::File(source) => source.load().await,
        }
    }
}
