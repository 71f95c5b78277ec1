use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Schemafel: {0}")]
    Schema(String),

    #[error("JSON-fel: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO-fel: {0}")]
    Io(#[from] std::io::Error),

    #[error("Konfigurationsfel: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Hittades inte: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;
