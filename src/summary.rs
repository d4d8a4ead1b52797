//! Page summary record and the transform that builds it
//!
//! [`build_summary`] turns [`HeadFields`] into the final [`PageSummary`]:
//! keywords are split, icon and image URLs are resolved against the page
//! origin, and dimension strings are parsed. Missing or unparsable values
//! never fail the build; they leave the field empty or zero.
//!
//! [`extract_summary`] runs the whole pipeline over a byte stream.
//!
//! # Examples
//!
//! ```rust
//! use page_summary::config::ExtractOptions;
//! use page_summary::summary::extract_summary;
//!
//! let html = br#"<html><head>
//!     <title>Fallback</title>
//!     <meta property="og:title" content="Open Graph Title">
//!     <link rel="icon" href="/favicon.ico" sizes="32x16">
//! </head></html>"#;
//!
//! let summary = extract_summary(
//!     "https://example.com/a/b",
//!     &html[..],
//!     &ExtractOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(summary.title.as_deref(), Some("Open Graph Title"));
//! let icon = summary.icon.unwrap();
//! assert_eq!(icon.url, "https://example.com/favicon.ico");
//! assert_eq!((icon.height, icon.width), (32, 16));
//! ```

use std::io::Read;

use serde::Serialize;

use crate::accumulator::{HeadFields, IconLink, ImageDraft, accumulate};
use crate::config::ExtractOptions;
use crate::error::SummaryError;
use crate::origin::{page_origin, resolve_against};
use crate::tokenizer::Tokens;

fn is_zero(value: &u32) -> bool {
    *value == 0
}

/// A preview image or icon
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewImage {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(rename = "secureURL", skip_serializing_if = "Option::is_none")]
    pub secure_url: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Pixels, 0 when unknown
    #[serde(skip_serializing_if = "is_zero")]
    pub width: u32,
    /// Pixels, 0 when unknown
    #[serde(skip_serializing_if = "is_zero")]
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// Summary properties for a web page
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub page_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<PreviewImage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<PreviewImage>,
}

impl PageSummary {
    /// Compact JSON encoding
    pub fn to_json(&self) -> Result<String, SummaryError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON encoding
    pub fn to_json_pretty(&self) -> Result<String, SummaryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Drop empty strings
fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
}

/// Parse a pixel dimension, 0 on failure
fn parse_dimension(value: &str) -> u32 {
    value.parse().unwrap_or(0)
}

/// Split a comma-separated keyword list after removing every space
pub fn split_keywords(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.replace(' ', "")
        .split(',')
        .map(str::to_string)
        .collect()
}

/// Parse a `sizes` attribute of the form `<height>x<width>`
///
/// Returns `(height, width)`; either side is 0 when missing or unparsable.
pub fn parse_sizes(sizes: &str) -> (u32, u32) {
    match sizes.split_once('x') {
        Some((height, width)) => (parse_dimension(height), parse_dimension(width)),
        None => (0, 0),
    }
}

fn build_icon(link: &IconLink, origin: &str) -> Option<PreviewImage> {
    link.rel.as_deref().filter(|rel| !rel.is_empty())?;

    let (height, width) = link.sizes.as_deref().map(parse_sizes).unwrap_or((0, 0));
    Some(PreviewImage {
        url: resolve_against(origin, link.href.as_deref().unwrap_or_default()),
        mime_type: non_empty(&link.link_type),
        width,
        height,
        ..PreviewImage::default()
    })
}

fn build_image(draft: &ImageDraft, origin: &str) -> PreviewImage {
    PreviewImage {
        url: resolve_against(origin, draft.url.as_deref().unwrap_or_default()),
        secure_url: non_empty(&draft.secure_url),
        mime_type: non_empty(&draft.mime_type),
        width: draft.width.as_deref().map(parse_dimension).unwrap_or(0),
        height: draft.height.as_deref().map(parse_dimension).unwrap_or(0),
        alt: non_empty(&draft.alt),
    }
}

/// Build the summary record from accumulated head fields
///
/// `origin` is prepended to icon and image URLs that start with `/`.
pub fn build_summary(fields: &HeadFields, origin: &str) -> PageSummary {
    PageSummary {
        page_type: non_empty(&fields.og_type),
        url: non_empty(&fields.url),
        title: non_empty(&fields.title).or_else(|| non_empty(&fields.main_title)),
        site_name: non_empty(&fields.site_name),
        description: non_empty(&fields.description),
        author: non_empty(&fields.author),
        keywords: fields.keywords.as_deref().map(split_keywords).unwrap_or_default(),
        icon: build_icon(&fields.icon, origin),
        images: fields
            .images()
            .iter()
            .map(|draft| build_image(draft, origin))
            .collect(),
    }
}

/// Tokenize `html`, scan its head section and build the summary
///
/// # Arguments
///
/// * `page_url` - The URL the document was requested from
/// * `html` - Byte stream positioned at the start of the document
/// * `options` - Tokenizer and origin settings
///
/// # Errors
///
/// Returns `SummaryError::MalformedMarkup` if the stream fails before the
/// head section closes. No partial summary is returned in that case.
pub fn extract_summary<R: Read>(
    page_url: &str,
    html: R,
    options: &ExtractOptions,
) -> Result<PageSummary, SummaryError> {
    let origin = page_origin(page_url, options.origin);
    let fields = accumulate(Tokens::new(html, &options.tokenizer))?;
    Ok(build_summary(&fields, &origin))
}
