//! Single-pass metadata accumulation over a head-section token stream
//!
//! [`accumulate`] walks the tokens once, stopping at `</head>` or at the end
//! of the stream, and records what it finds into [`HeadFields`]:
//!
//! - `<meta property="og:*" content>` and `<meta name content>` fields
//! - the text of `<title>` as a fallback title
//! - the attributes of `<link rel="icon">`
//!
//! Every slot is claimed by the first tag that fills it; later duplicates are
//! ignored.
//!
//! # Image Grouping
//!
//! Each `og:image` opens a new image. Any other field whose name contains
//! `image` (`og:image:width`, `og:image:alt`, ...) attaches to the most
//! recently opened image, so sub-properties must follow their image tag.
//! Sub-properties seen before the first `og:image` land in an orphan bucket
//! that never reaches the summary.

use std::iter::Peekable;

use crate::error::SummaryError;
use crate::tokenizer::{Tag, Termination, Token};

const OG_PREFIX: &str = "og:";
const IMAGE_FIELD: &str = "image";

/// Store `value` unless the slot is already taken
fn claim(slot: &mut Option<String>, value: &str) {
    if slot.is_none() {
        *slot = Some(value.to_string());
    }
}

/// Raw fields of one preview image
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImageDraft {
    pub url: Option<String>,
    pub secure_url: Option<String>,
    pub mime_type: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub alt: Option<String>,
}

impl ImageDraft {
    fn record(&mut self, field: &str, content: &str) {
        let slot = match field {
            "image:secure_url" => &mut self.secure_url,
            "image:type" => &mut self.mime_type,
            "image:width" => &mut self.width,
            "image:height" => &mut self.height,
            "image:alt" => &mut self.alt,
            _ => return,
        };
        claim(slot, content);
    }
}

/// Raw attributes of the page's icon link
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IconLink {
    pub rel: Option<String>,
    pub href: Option<String>,
    pub link_type: Option<String>,
    pub sizes: Option<String>,
}

/// Everything discovered in the head section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadFields {
    pub og_type: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub site_name: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub keywords: Option<String>,
    /// Text of the `<title>` element
    pub main_title: Option<String>,
    pub icon: IconLink,
    /// Slot 0 collects image sub-properties seen before any image
    images: Vec<ImageDraft>,
}

impl Default for HeadFields {
    fn default() -> Self {
        Self {
            og_type: None,
            url: None,
            title: None,
            site_name: None,
            description: None,
            author: None,
            keywords: None,
            main_title: None,
            icon: IconLink::default(),
            images: vec![ImageDraft::default()],
        }
    }
}

impl HeadFields {
    /// Number of `og:image` tags seen
    pub fn image_count(&self) -> usize {
        self.images.len() - 1
    }

    /// Images in first-seen order
    pub fn images(&self) -> &[ImageDraft] {
        &self.images[1..]
    }

    /// Sub-properties that appeared before the first image
    pub fn orphan_image_fields(&self) -> &ImageDraft {
        &self.images[0]
    }

    /// Record one named meta field
    pub fn record_field(&mut self, field: &str, content: &str) {
        if field == IMAGE_FIELD {
            self.images.push(ImageDraft {
                url: Some(content.to_string()),
                ..ImageDraft::default()
            });
            return;
        }

        if field.contains(IMAGE_FIELD) {
            if let Some(current) = self.images.last_mut() {
                current.record(field, content);
            }
            return;
        }

        let slot = match field {
            "type" => &mut self.og_type,
            "url" => &mut self.url,
            "title" => &mut self.title,
            "site_name" => &mut self.site_name,
            "description" => &mut self.description,
            "author" => &mut self.author,
            "keywords" => &mut self.keywords,
            _ => return,
        };
        claim(slot, content);
    }

    fn record_meta_tag(&mut self, tag: &Tag) {
        if let Some((field, content)) = meta_field(tag) {
            self.record_field(field, content);
        }
    }

    fn record_link_tag(&mut self, tag: &Tag) {
        if tag.attr("rel") != Some("icon") {
            return;
        }
        for attr in &tag.attrs {
            let slot = match attr.key.as_str() {
                "rel" => &mut self.icon.rel,
                "href" => &mut self.icon.href,
                "type" => &mut self.icon.link_type,
                "sizes" => &mut self.icon.sizes,
                _ => continue,
            };
            claim(slot, &attr.value);
        }
    }
}

/// Field name and content of a meta tag, if it carries both
///
/// `name` takes precedence over an `og:`-prefixed `property` wherever the two
/// appear in the tag.
fn meta_field(tag: &Tag) -> Option<(&str, &str)> {
    let property = tag
        .attr("property")
        .and_then(|value| value.strip_prefix(OG_PREFIX));
    let field = tag.attr("name").or(property)?;
    let content = tag.attr("content")?;

    if field.is_empty() || content.is_empty() {
        return None;
    }
    Some((field, content))
}

/// Scan tokens up to `</head>` or the end of the stream
///
/// # Errors
///
/// Returns `SummaryError::MalformedMarkup` if the stream terminates with
/// anything other than end-of-stream before the head closes.
///
/// # Examples
///
/// ```rust
/// use page_summary::accumulator::accumulate;
/// use page_summary::tokenizer::Tokens;
///
/// let html = br#"<head>
///     <meta property="og:image" content="/a.png">
///     <meta property="og:image:width" content="640">
/// </head>"#;
/// let fields = accumulate(Tokens::from_reader(&html[..])).unwrap();
///
/// assert_eq!(fields.image_count(), 1);
/// assert_eq!(fields.images()[0].width.as_deref(), Some("640"));
/// ```
pub fn accumulate<I>(tokens: I) -> Result<HeadFields, SummaryError>
where
    I: IntoIterator<Item = Token>,
{
    let mut fields = HeadFields::default();
    let mut tokens = tokens.into_iter().peekable();

    while let Some(token) = tokens.next() {
        match token {
            Token::Error(Termination::EndOfStream) => break,
            Token::Error(Termination::Malformed(err)) => return Err(err.into()),
            Token::EndTag(tag) if tag.name == "head" => break,
            Token::StartTag(tag) | Token::SelfClosingTag(tag) => match tag.name.as_str() {
                "meta" => fields.record_meta_tag(&tag),
                "title" => record_title(&mut tokens, &mut fields),
                "link" => fields.record_link_tag(&tag),
                _ => {}
            },
            Token::EndTag(_) | Token::Text(_) => {}
        }
    }

    Ok(fields)
}

/// Take the token after `<title>` only when it is text
fn record_title<I>(tokens: &mut Peekable<I>, fields: &mut HeadFields)
where
    I: Iterator<Item = Token>,
{
    if let Some(Token::Text(text)) = tokens.next_if(|token| matches!(token, Token::Text(_))) {
        claim(&mut fields.main_title, &text);
    }
}
