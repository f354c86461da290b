//! HTML written in the markdown source.

use mdpipe::{parse_markdown, Pipeline, PipelineOptions, RootDirectory};
use std::sync::Arc;

fn escaped_pipeline() -> Pipeline {
    let options = PipelineOptions {
        allow_dangerous_html: false,
        ..PipelineOptions::default()
    };
    Pipeline::standard(&options, Arc::new(RootDirectory))
}

#[test]
fn test_inline_html_passes_through_unescaped() {
    let html = parse_markdown("Hello <span>world</span>").unwrap();
    assert_eq!(html, "<p>Hello <span>world</span></p>\n");
    assert!(!html.contains("&lt;span"));
}

#[test]
fn test_html_block_is_kept_verbatim() {
    let html = parse_markdown("<div class=\"note\">\n*not emphasis*\n</div>\n\ntext").unwrap();
    assert_eq!(html, "<div class=\"note\">\n*not emphasis*\n</div>\n<p>text</p>\n");
}

#[test]
fn test_script_is_not_sanitized_by_default() {
    let html = parse_markdown("<script>alert(1)</script>\n").unwrap();
    assert_eq!(html, "<script>alert(1)</script>\n");
}

#[test]
fn test_passthrough_disabled_drops_raw_html() {
    let pipeline = escaped_pipeline();
    let file = pipeline
        .process(pipeline.file("Hello <span>world</span>"))
        .unwrap();

    assert_eq!(file.value, "<p>Hello world</p>\n");
    assert_eq!(file.messages.len(), 1);
    assert_eq!(file.messages[0].stage, "to-html");
}

#[test]
fn test_raw_never_leaks_when_disabled() {
    let html = escaped_pipeline()
        .process_str("<img src=x onerror=alert(1)>\n")
        .unwrap();
    assert!(!html.contains("<img"));
}
