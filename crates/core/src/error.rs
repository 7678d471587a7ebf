use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pdf parse error: {0}")]
    PdfParse(String),

    #[error("word document processing error: {0}")]
    WordParse(String),

    #[error("text is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("OCR processing not available - {0} not installed")]
    OcrUnavailable(String),

    #[error("OCR processing timed out after {0} seconds")]
    OcrTimeout(u64),

    #[error("OCR processing error: {0}")]
    OcrFailed(String),

    #[error("path has no file name: {0}")]
    MissingFileName(String),
}

#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("{0} endpoint is not configured")]
    NotConfigured(&'static str),

    #[error("invalid response from {backend}: {details}")]
    BackendResponse { backend: String, details: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
}
