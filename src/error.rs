use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upstream API error: {message}")]
    Upstream { message: String },
}

impl SyncError {
    pub fn upstream(message: impl Into<String>) -> Self {
        SyncError::Upstream {
            message: message.into(),
        }
    }

    /// Short stable label, used for metric labels
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::Http(_) => "http",
            SyncError::Json(_) => "json",
            SyncError::Toml(_) => "toml",
            SyncError::Io(_) => "io",
            SyncError::Config(_) => "config",
            SyncError::Upstream { .. } => "upstream",
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
