//! Page Summary - Open Graph link-preview extraction
//!
//! This library fetches a web page and summarizes its head section into a
//! link-preview record: title, description, type, site name, author,
//! keywords, icon, and an ordered list of preview images.
//!
//! # Architecture
//!
//! The library is structured into several modules:
//! - `tokenizer`: lazy HTML token stream over any `Read`, built on html5ever
//! - `accumulator`: single forward pass over the head section
//! - `summary`: builds the final `PageSummary` record and its JSON encoding
//! - `origin`: page origin derivation and relative URL resolution
//! - `fetch`: blocking HTTP fetch and the end-to-end `summarize_url`
//! - `config`: tokenizer, extraction and fetch options
//! - `error`: error types
//!
//! # Examples
//!
//! ```rust
//! use page_summary::{ExtractOptions, extract_summary};
//!
//! let html = br#"<head><meta property="og:title" content="Hello"></head>"#;
//! let summary = extract_summary("https://example.com/", &html[..], &ExtractOptions::default())
//!     .unwrap();
//! assert_eq!(summary.to_json().unwrap(), r#"{"title":"Hello"}"#);
//! ```

// Module declarations
pub mod accumulator;
pub mod config;
pub mod error;
pub mod fetch;
pub mod origin;
pub mod summary;
pub mod tokenizer;

// Re-export main types for convenience
pub use config::{ExtractOptions, FetchOptions, OriginMode, SummaryConfig, TokenizerOptions};
pub use error::{MarkupError, SummaryError};
pub use fetch::summarize_url;
pub use summary::{PageSummary, PreviewImage, extract_summary};
