pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("invalid cutoff datetime: {0}")]
    InvalidCutoff(String),

    #[error("server error: {0}")]
    Server(String),
}

impl Error {
    pub(crate) fn document_not_found(folder: &str, file: &str) -> Self {
        Error::NotFound {
            kind: "document",
            name: format!("{folder}/{file}"),
        }
    }
}
