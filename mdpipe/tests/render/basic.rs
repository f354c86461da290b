//! Rendering of the common markdown constructs with default options.

use mdpipe::{parse_markdown, Pipeline, PipelineOptions, RootDirectory};
use std::sync::Arc;

fn gfm(input: &str) -> String {
    let mut options = PipelineOptions::default();
    options.parse.gfm = true;
    Pipeline::standard(&options, Arc::new(RootDirectory))
        .process_str(input)
        .unwrap()
}

#[test]
fn test_heading_and_paragraph() {
    let html = parse_markdown("# Title\n\nHello").unwrap();

    assert!(html.contains("<h1>Title</h1>"));
    assert!(html.contains("<p>Hello</p>"));
    assert_eq!(html, "<h1>Title</h1>\n<p>Hello</p>\n");
}

#[test]
fn test_empty_input() {
    assert_eq!(parse_markdown("").unwrap(), "");
    assert_eq!(parse_markdown("  \n\n").unwrap(), "");
}

#[test]
fn test_inline_formatting() {
    let html = parse_markdown("Some *emph* and **strong** and `code`.").unwrap();
    assert_eq!(
        html,
        "<p>Some <em>emph</em> and <strong>strong</strong> and <code>code</code>.</p>\n"
    );
}

#[test]
fn test_soft_breaks_collapse_to_spaces() {
    assert_eq!(parse_markdown("one\ntwo").unwrap(), "<p>one two</p>\n");
}

#[test]
fn test_text_is_escaped() {
    assert_eq!(parse_markdown("a < b & c").unwrap(), "<p>a &lt; b &amp; c</p>\n");
}

#[test]
fn test_link_with_title() {
    let html = parse_markdown("[docs](https://example.com \"Docs\")").unwrap();
    assert_eq!(
        html,
        "<p><a href=\"https://example.com\" title=\"Docs\">docs</a></p>\n"
    );
}

#[test]
fn test_tight_list() {
    assert_eq!(
        parse_markdown("- a\n- b\n").unwrap(),
        "<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>\n"
    );
}

#[test]
fn test_loose_list() {
    assert_eq!(
        parse_markdown("- a\n\n- b\n").unwrap(),
        "<ul>\n  <li>\n    <p>a</p>\n  </li>\n  <li>\n    <p>b</p>\n  </li>\n</ul>\n"
    );
}

#[test]
fn test_ordered_list_start() {
    let html = parse_markdown("3. three\n4. four\n").unwrap();
    assert!(html.starts_with("<ol start=\"3\">\n"));
}

#[test]
fn test_fenced_code_keeps_whitespace() {
    let html = parse_markdown("```rust\nfn main() {\n    run();\n}\n```\n").unwrap();
    assert_eq!(
        html,
        "<pre><code class=\"language-rust\">fn main() {\n    run();\n}\n</code></pre>\n"
    );
}

#[test]
fn test_blockquote_is_indented() {
    assert_eq!(
        parse_markdown("> quote\n").unwrap(),
        "<blockquote>\n  <p>quote</p>\n</blockquote>\n"
    );
}

#[test]
fn test_thematic_break() {
    assert_eq!(parse_markdown("a\n\n---\n\nb").unwrap(), "<p>a</p>\n<hr>\n<p>b</p>\n");
}

#[test]
fn test_gfm_is_off_by_default() {
    let html = parse_markdown("~~gone~~").unwrap();
    assert!(!html.contains("<del>"));
}

#[test]
fn test_gfm_table() {
    let html = gfm("| a | b |\n|:--|--:|\n| 1 | 2 |\n");
    assert_eq!(
        html,
        "<table>\n  <thead>\n    <tr>\n      <th align=\"left\">a</th>\n      <th align=\"right\">b</th>\n    </tr>\n  </thead>\n  <tbody>\n    <tr>\n      <td align=\"left\">1</td>\n      <td align=\"right\">2</td>\n    </tr>\n  </tbody>\n</table>\n"
    );
}

#[test]
fn test_gfm_task_list() {
    let html = gfm("- [x] done\n- [ ] todo\n");
    assert_eq!(
        html,
        "<ul class=\"contains-task-list\">\n  <li class=\"task-list-item\"><input type=\"checkbox\" checked=\"\" disabled=\"\"> done</li>\n  <li class=\"task-list-item\"><input type=\"checkbox\" disabled=\"\"> todo</li>\n</ul>\n"
    );
}

#[test]
fn test_gfm_strikethrough() {
    assert_eq!(gfm("~~gone~~"), "<p><del>gone</del></p>\n");
}

#[test]
fn test_unformatted_output_keeps_conversion_newlines() {
    let options = PipelineOptions {
        format_enabled: false,
        ..PipelineOptions::default()
    };
    let html = Pipeline::standard(&options, Arc::new(RootDirectory))
        .process_str("# A\n\n- b\n")
        .unwrap();
    assert_eq!(html, "<h1>A</h1>\n<ul>\n<li>b</li>\n</ul>");
}

#[test]
fn test_custom_indent() {
    let mut options = PipelineOptions::default();
    options.format.indent = "\t".to_string();
    let html = Pipeline::standard(&options, Arc::new(RootDirectory))
        .process_str("> quote\n")
        .unwrap();
    assert_eq!(html, "<blockquote>\n\t<p>quote</p>\n</blockquote>\n");
}
