//! Page origin derivation and relative URL resolution
//!
//! Relative icon and image URLs are made absolute by plain string
//! concatenation onto the page origin; only hrefs starting with `/` are
//! touched.
//!
//! # Origin Modes
//!
//! - [`OriginMode::Truncate`]: the requested URL cut right after its first
//!   occurrence of `"com"`, so `https://example.com/a/b` yields
//!   `https://example.com`. When `"com"` does not occur the URL is parsed and
//!   `scheme://host[:port]` is used instead.
//! - [`OriginMode::Authority`]: always `scheme://host[:port]`.
//!
//! ```rust
//! use page_summary::config::OriginMode;
//! use page_summary::origin::{page_origin, resolve_against};
//!
//! let origin = page_origin("https://example.com/a/b", OriginMode::Truncate);
//! assert_eq!(origin, "https://example.com");
//! assert_eq!(
//!     resolve_against(&origin, "/favicon.ico"),
//!     "https://example.com/favicon.ico"
//! );
//! assert_eq!(resolve_against(&origin, "logo.png"), "logo.png");
//! ```

use url::Url;

use crate::config::OriginMode;

const ORIGIN_MARKER: &str = "com";

/// Derive the origin used for resolving `/`-prefixed URLs
pub fn page_origin(page_url: &str, mode: OriginMode) -> String {
    if mode == OriginMode::Truncate
        && let Some(pos) = page_url.find(ORIGIN_MARKER)
    {
        return page_url[..pos + ORIGIN_MARKER.len()].to_string();
    }
    authority_origin(page_url)
}

/// `scheme://host[:port]`, or the input unchanged when it does not parse
fn authority_origin(page_url: &str) -> String {
    match Url::parse(page_url) {
        Ok(url) if url.has_host() => url.origin().ascii_serialization(),
        _ => page_url.trim_end_matches('/').to_string(),
    }
}

/// Resolve `href` against `origin`
pub fn resolve_against(origin: &str, href: &str) -> String {
    if href.starts_with('/') {
        format!("{}{}", origin, href)
    } else {
        href.to_string()
    }
}
