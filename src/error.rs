pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("index request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed index bundle: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "unsupported index format version {found} (this build reads up to {supported})"
    )]
    IndexFormat { found: u32, supported: u32 },

    #[error("configuration error: {0}")]
    Config(String),
}
