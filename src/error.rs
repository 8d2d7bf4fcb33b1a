use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Unknown source: {0}")]
    UnknownSource(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Write to destination failed: {0}")]
    Write(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
