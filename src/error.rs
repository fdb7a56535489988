use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Catalog returned {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid command: {0}")]
    Command(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The fixed messages shown to the user when an operation fails. The
/// underlying cause is logged, never displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserMessage {
    InitialLoad,
    Search,
    Detail,
}

impl UserMessage {
    pub fn as_str(self) -> &'static str {
        match self {
            UserMessage::InitialLoad => "An error occurred while fetching initial data.",
            UserMessage::Search => "An error occurred while searching for products.",
            UserMessage::Detail => "An error occurred while fetching product details.",
        }
    }
}

impl std::fmt::Display for UserMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
