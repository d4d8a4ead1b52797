//! Configuration for tokenizing, extraction and fetching

use std::time::Duration;

/// Default number of bytes pulled from the stream per read
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Default ceiling on fetched body size (1MB)
pub const DEFAULT_FETCH_MAX_BYTES: u64 = 1024 * 1024;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Tokenizer options
#[derive(Debug, Clone)]
pub struct TokenizerOptions {
    /// Bytes read from the underlying stream per refill
    pub chunk_size: usize,
    /// Maximum bytes consumed before giving up (None means unlimited)
    pub max_bytes: Option<usize>,
    /// Treat tokenizer parse errors as fatal
    pub strict: bool,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_bytes: None,
            strict: false,
        }
    }
}

/// How the page origin used for relative-URL resolution is derived
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OriginMode {
    /// Truncate the requested URL after its first `"com"`
    #[default]
    Truncate,
    /// Parse the URL and use `scheme://host[:port]`
    Authority,
}

/// Extraction options
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Tokenizer settings
    pub tokenizer: TokenizerOptions,
    /// Origin derivation strategy
    pub origin: OriginMode,
}

/// Fetch options
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Maximum body bytes handed to the tokenizer
    pub max_bytes: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("page-summary/{}", env!("CARGO_PKG_VERSION")),
            max_bytes: DEFAULT_FETCH_MAX_BYTES,
        }
    }
}

/// Complete configuration for summarizing a remote page
#[derive(Debug, Clone, Default)]
pub struct SummaryConfig {
    pub fetch: FetchOptions,
    pub extract: ExtractOptions,
}
