use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The source document has no identifiable header row. Fatal:
    /// nothing can be ingested without column labels.
    #[error("no header row in source document")]
    MissingHeader,

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
