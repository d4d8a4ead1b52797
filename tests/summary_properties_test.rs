//! End-to-end extraction tests
//!
//! These tests drive `extract_summary` through in-memory readers and check
//! the observable properties of the summary record.

use std::io::{self, Read};

use page_summary::{
    ExtractOptions, MarkupError, OriginMode, PageSummary, SummaryError, TokenizerOptions,
    extract_summary,
};
use proptest::prelude::*;

const PAGE_URL: &str = "https://example.com/a/b";

fn summarize(html: &str) -> PageSummary {
    extract_summary(PAGE_URL, html.as_bytes(), &ExtractOptions::default())
        .expect("Extraction failed")
}

/// Reader that yields its payload and then fails
struct BrokenPipe<'a>(&'a [u8]);

impl Read for BrokenPipe<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.0.is_empty() {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "connection dropped"));
        }
        let n = self.0.len().min(buf.len());
        buf[..n].copy_from_slice(&self.0[..n]);
        self.0 = &self.0[n..];
        Ok(n)
    }
}

#[test]
fn test_full_document() {
    let html = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Fallback Title</title>
    <meta property="og:type" content="article">
    <meta property="og:url" content="https://example.com/a/b">
    <meta property="og:title" content="An Article">
    <meta property="og:site_name" content="Example News">
    <meta property="og:description" content="What happened today">
    <meta name="author" content="Jane Smith">
    <meta name="keywords" content="news, world, today">
    <link rel="stylesheet" href="/main.css">
    <link rel="icon" href="/favicon.png" type="image/png" sizes="32x32">
    <meta property="og:image" content="/images/hero.jpg">
    <meta property="og:image:secure_url" content="https://example.com/images/hero.jpg">
    <meta property="og:image:type" content="image/jpeg">
    <meta property="og:image:width" content="1200">
    <meta property="og:image:height" content="630">
    <meta property="og:image:alt" content="A hero image">
    <script>var x = "<meta property='og:title' content='nope'>";</script>
</head>
<body><meta property="og:author" content="ignored"></body>
</html>"#;

    let summary = summarize(html);
    assert_eq!(summary.page_type.as_deref(), Some("article"));
    assert_eq!(summary.url.as_deref(), Some("https://example.com/a/b"));
    assert_eq!(summary.title.as_deref(), Some("An Article"));
    assert_eq!(summary.site_name.as_deref(), Some("Example News"));
    assert_eq!(summary.description.as_deref(), Some("What happened today"));
    assert_eq!(summary.author.as_deref(), Some("Jane Smith"));
    assert_eq!(summary.keywords, vec!["news", "world", "today"]);

    let icon = summary.icon.as_ref().expect("icon");
    assert_eq!(icon.url, "https://example.com/favicon.png");
    assert_eq!(icon.mime_type.as_deref(), Some("image/png"));
    assert_eq!((icon.height, icon.width), (32, 32));

    assert_eq!(summary.images.len(), 1);
    let image = &summary.images[0];
    assert_eq!(image.url, "https://example.com/images/hero.jpg");
    assert_eq!(
        image.secure_url.as_deref(),
        Some("https://example.com/images/hero.jpg")
    );
    assert_eq!(image.mime_type.as_deref(), Some("image/jpeg"));
    assert_eq!((image.width, image.height), (1200, 630));
    assert_eq!(image.alt.as_deref(), Some("A hero image"));
}

#[test]
fn test_og_title_wins_regardless_of_position() {
    let before = summarize(
        r#"<head><meta property="og:title" content="OG"><title>Element</title></head>"#,
    );
    let after = summarize(
        r#"<head><title>Element</title><meta property="og:title" content="OG"></head>"#,
    );
    assert_eq!(before.title.as_deref(), Some("OG"));
    assert_eq!(after.title.as_deref(), Some("OG"));
}

#[test]
fn test_title_element_used_without_og_title() {
    let summary = summarize("<html><head><title>Just a title</title></head></html>");
    assert_eq!(summary.title.as_deref(), Some("Just a title"));
}

#[test]
fn test_title_text_is_verbatim() {
    let summary = summarize("<head><title>  A &amp; B  </title></head>");
    assert_eq!(summary.title.as_deref(), Some("  A & B  "));
}

#[test]
fn test_relative_icon_uses_truncated_origin() {
    let summary = summarize(r#"<head><link rel="icon" href="/favicon.ico"></head>"#);
    assert_eq!(
        summary.icon.expect("icon").url,
        "https://example.com/favicon.ico"
    );
}

#[test]
fn test_relative_icon_without_com_uses_host_origin() {
    let html = br#"<head><link rel="icon" href="/f.ico"></head>"#;
    let summary =
        extract_summary("https://example.org/a", &html[..], &ExtractOptions::default()).unwrap();
    assert_eq!(summary.icon.expect("icon").url, "https://example.org/f.ico");
}

#[test]
fn test_icon_sizes_are_height_then_width() {
    let summary = summarize(r#"<head><link rel="icon" href="/i.png" sizes="32x16"></head>"#);
    let icon = summary.icon.expect("icon");
    assert_eq!(icon.height, 32);
    assert_eq!(icon.width, 16);
}

#[test]
fn test_keywords_spaces_removed_then_split() {
    let summary = summarize(r#"<head><meta name="keywords" content="a, b,c"></head>"#);
    assert_eq!(summary.keywords, vec!["a", "b", "c"]);
}

#[test]
fn test_duplicate_field_keeps_first_value() {
    let summary = summarize(
        r#"<head>
        <meta property="og:title" content="First">
        <meta property="og:title" content="Second">
        </head>"#,
    );
    assert_eq!(summary.title.as_deref(), Some("First"));
}

#[test]
fn test_nothing_after_head_is_inspected() {
    let summary = summarize(
        r#"<head><title>T</title></head>
        <meta property="og:description" content="late">
        <link rel="icon" href="/late.ico">"#,
    );
    assert_eq!(summary.description, None);
    assert_eq!(summary.icon, None);
}

#[test]
fn test_truncated_document_succeeds_with_partial_data() {
    let summary = summarize(r#"<html><head><meta property="og:title" content="Cut off"><meta prop"#);
    assert_eq!(summary.title.as_deref(), Some("Cut off"));
}

#[test]
fn test_capped_read_keeps_fields_before_the_cap() {
    let html = br#"<head><meta property="og:title" content="T"><meta name="description" content="cut off by the cap"></head>"#;
    let capped = (&html[..]).take(60);
    let summary = extract_summary(PAGE_URL, capped, &ExtractOptions::default()).unwrap();
    assert_eq!(summary.title.as_deref(), Some("T"));
    assert_eq!(summary.description, None);
}

#[test]
fn test_stream_failure_before_head_end_fails_extraction() {
    let reader = BrokenPipe(br#"<html><head><meta property="og:title" content="T">"#);
    let err = extract_summary(PAGE_URL, reader, &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, SummaryError::MalformedMarkup(MarkupError::Io(_))));
    assert_eq!(err.code(), 1);
}

#[test]
fn test_stream_failure_after_head_end_is_never_read() {
    // the head closes inside the first chunk, so the failing read never happens
    let reader = BrokenPipe(br#"<head><meta property="og:title" content="T"></head><body>"#);
    let summary = extract_summary(PAGE_URL, reader, &ExtractOptions::default()).unwrap();
    assert_eq!(summary.title.as_deref(), Some("T"));
}

#[test]
fn test_invalid_utf8_fails_extraction() {
    let html = b"<head><title>caf\xE9</title></head>";
    let err = extract_summary(PAGE_URL, &html[..], &ExtractOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        SummaryError::MalformedMarkup(MarkupError::InvalidUtf8 { .. })
    ));
}

#[test]
fn test_strict_mode_rejects_parse_errors() {
    let html = br#"<head><meta property="og:title" content="T"#;
    let options = ExtractOptions {
        tokenizer: TokenizerOptions {
            strict: true,
            ..TokenizerOptions::default()
        },
        ..ExtractOptions::default()
    };
    assert!(extract_summary(PAGE_URL, &html[..], &options).is_err());
    assert!(extract_summary(PAGE_URL, &html[..], &ExtractOptions::default()).is_ok());
}

#[test]
fn test_authority_origin_mode() {
    let html = br#"<head><meta property="og:image" content="/x.png"></head>"#;
    let options = ExtractOptions {
        origin: OriginMode::Authority,
        ..ExtractOptions::default()
    };
    let summary = extract_summary("https://comics.example.com/strip/1", &html[..], &options).unwrap();
    assert_eq!(summary.images[0].url, "https://comics.example.com/x.png");

    let summary = extract_summary(
        "https://comics.example.com/strip/1",
        &html[..],
        &ExtractOptions::default(),
    )
    .unwrap();
    assert_eq!(summary.images[0].url, "https://com/x.png");
}

#[test]
fn test_missing_fields_are_omitted_from_json() {
    let summary = summarize("<head></head>");
    assert_eq!(summary, PageSummary::default());
    assert_eq!(summary.to_json().unwrap(), "{}");
}

#[test]
fn test_json_shape() {
    let summary = summarize(
        r#"<head>
        <meta property="og:site_name" content="Site">
        <meta property="og:image" content="https://example.com/i.png">
        <meta property="og:image:width" content="10">
        </head>"#,
    );
    let value: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
    assert_eq!(value["siteName"], "Site");
    assert_eq!(value["images"][0]["url"], "https://example.com/i.png");
    assert_eq!(value["images"][0]["width"], 10);
    assert!(value["images"][0].get("height").is_none());
    assert!(value.get("keywords").is_none());
}

proptest! {
    /// N og:image tags give N images in source order, each with its own width
    #[test]
    fn prop_images_in_first_seen_order(
        images in proptest::collection::vec(("[a-z]{1,8}", 1u32..4000, proptest::option::of(1u32..4000)), 0..10)
    ) {
        let mut html = String::from("<html><head>\n");
        for (name, width, height) in &images {
            html.push_str(&format!("<meta property=\"og:image\" content=\"/{}.png\">\n", name));
            html.push_str(&format!("<meta property=\"og:image:width\" content=\"{}\">\n", width));
            if let Some(height) = height {
                html.push_str(&format!("<meta property=\"og:image:height\" content=\"{}\">\n", height));
            }
        }
        html.push_str("</head></html>");

        let summary = summarize(&html);
        prop_assert_eq!(summary.images.len(), images.len());
        for (image, (name, width, height)) in summary.images.iter().zip(&images) {
            prop_assert_eq!(&image.url, &format!("https://example.com/{}.png", name));
            prop_assert_eq!(image.width, *width);
            prop_assert_eq!(image.height, height.unwrap_or(0));
        }
    }

    /// Arbitrary input never panics
    #[test]
    fn prop_arbitrary_bytes_do_not_panic(input in proptest::collection::vec(any::<u8>(), 0..1024)) {
        let _ = extract_summary(PAGE_URL, &input[..], &ExtractOptions::default());
    }
}
