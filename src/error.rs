//! Error types for summary extraction and fetching

use thiserror::Error;

/// Terminal conditions reported by the tokenizer other than end-of-stream
#[derive(Debug, Error)]
pub enum MarkupError {
    /// Reading the underlying byte stream failed
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
    /// The byte stream is not valid UTF-8
    #[error("invalid UTF-8 near byte {offset}")]
    InvalidUtf8 { offset: usize },
    /// Tokenizer parse error (strict mode only)
    #[error("markup error: {message}")]
    Syntax { message: String },
    /// The stream exceeded the configured byte ceiling
    #[error("document exceeds {limit} bytes")]
    TooLarge { limit: usize },
}

/// Errors that can occur while producing a page summary
#[derive(Debug, Error)]
pub enum SummaryError {
    /// The token stream failed before the head section closed
    #[error("malformed markup: {0}")]
    MalformedMarkup(#[from] MarkupError),
    /// Invalid input data
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The HTTP request itself failed
    #[error("fetch failed: {0}")]
    Fetch(String),
    /// The server answered with an error status
    #[error("upstream returned HTTP {0}")]
    HttpStatus(u16),
    /// The response is not an HTML page
    #[error("response content type was not text/html: {0}")]
    NotHtml(String),
    /// JSON encoding failed
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl SummaryError {
    /// Get numeric error code
    pub fn code(&self) -> u32 {
        match self {
            SummaryError::MalformedMarkup(_) => 1,
            SummaryError::InvalidInput(_) => 5,
            SummaryError::Fetch(_) => 10,
            SummaryError::HttpStatus(_) => 11,
            SummaryError::NotHtml(_) => 12,
            SummaryError::Serialization(_) => 20,
        }
    }
}

impl From<serde_json::Error> for SummaryError {
    fn from(err: serde_json::Error) -> Self {
        SummaryError::Serialization(err.to_string())
    }
}
