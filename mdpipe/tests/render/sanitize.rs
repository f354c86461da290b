//! The optional sanitize stage.

use mdpipe::{Pipeline, PipelineOptions, RootDirectory};
use std::sync::Arc;

fn sanitizing(options: PipelineOptions) -> Pipeline {
    let options = PipelineOptions {
        sanitize: mdpipe::transforms::sanitize::SanitizeOptions { enabled: true },
        ..options
    };
    Pipeline::standard(&options, Arc::new(RootDirectory))
}

#[test]
fn test_script_blocks_are_removed() {
    let html = sanitizing(PipelineOptions::default())
        .process_str("<script>alert(1)</script>\n\nok")
        .unwrap();
    assert_eq!(html, "<p>ok</p>\n");
}

#[test]
fn test_inline_markup_is_cleaned() {
    let html = sanitizing(PipelineOptions::default())
        .process_str("Hello <b onclick=\"x()\">bold</b>")
        .unwrap();
    assert_eq!(html, "<p>Hello <b>bold</b></p>\n");
}

#[test]
fn test_inline_markup_keeps_text_after_closing_tag() {
    let html = sanitizing(PipelineOptions::default())
        .process_str("a <em>b</em> and <span id=\"s\">c</span> d")
        .unwrap();
    assert_eq!(html, "<p>a <em>b</em> and <span>c</span> d</p>\n");
}

#[test]
fn test_javascript_links_lose_their_href() {
    let html = sanitizing(PipelineOptions::default())
        .process_str("[x](javascript:alert(1))")
        .unwrap();
    assert_eq!(html, "<p><a>x</a></p>\n");
}

#[test]
fn test_prefixed_ids_match_toc_links() {
    let mut options = PipelineOptions {
        heading_ids: true,
        ..PipelineOptions::default()
    };
    options.toc.prefix = Some("user-content-".to_string());

    let html = sanitizing(options)
        .process_str("## Contents\n\n## Intro\n")
        .unwrap();
    assert!(html.contains("<a href=\"#user-content-intro\">Intro</a>"));
    assert!(html.contains("<h2 id=\"user-content-intro\">Intro</h2>"));
}

#[test]
fn test_safe_markup_is_unchanged() {
    let input = "# Title\n\n- [link](https://example.com)\n";
    let plain = Pipeline::standard(&PipelineOptions::default(), Arc::new(RootDirectory))
        .process_str(input)
        .unwrap();
    let cleaned = sanitizing(PipelineOptions::default())
        .process_str(input)
        .unwrap();
    assert_eq!(plain, cleaned);
}
