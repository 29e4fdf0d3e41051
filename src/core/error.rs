use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Seed for table '{0}' must be an array of objects")]
    InvalidSeed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
