//! Table of contents through the full pipeline.

use insta::assert_snapshot;
use mdpipe::{parse_markdown, Pipeline, PipelineOptions, RootDirectory};
use std::sync::Arc;

const GUIDE: &str = "# Guide\n\n## Contents\n\n## Install\n\nRun it.\n\n## Usage\n";

fn with_options(options: PipelineOptions, input: &str) -> String {
    Pipeline::standard(&options, Arc::new(RootDirectory))
        .process_str(input)
        .unwrap()
}

#[test]
fn test_guide_snapshot() {
    let html = parse_markdown(GUIDE).unwrap();
    assert_snapshot!(html, @r##"
    <h1>Guide</h1>
    <h2>Contents</h2>
    <ul>
      <li><a href="#install">Install</a></li>
      <li><a href="#usage">Usage</a></li>
    </ul>
    <h2>Install</h2>
    <p>Run it.</p>
    <h2>Usage</h2>
    "##);
}

#[test]
fn test_toc_links_appear_in_output() {
    let html = parse_markdown(GUIDE).unwrap();
    assert!(html.contains("<a href=\"#install\">Install</a>"));
    assert!(html.contains("<a href=\"#usage\">Usage</a>"));
}

#[test]
fn test_without_toc_heading_nothing_is_inserted() {
    let html = parse_markdown("# Guide\n\n## Install\n").unwrap();
    assert_eq!(html, "<h1>Guide</h1>\n<h2>Install</h2>\n");
}

#[test]
fn test_nested_entries_are_tight() {
    let html = parse_markdown("## Contents\n\n## A\n\n### A1\n\n## B\n").unwrap();
    assert_snapshot!(html, @r##"
    <h2>Contents</h2>
    <ul>
      <li>
        <a href="#a">A</a>
        <ul>
          <li><a href="#a1">A1</a></li>
        </ul>
      </li>
      <li><a href="#b">B</a></li>
    </ul>
    <h2>A</h2>
    <h3>A1</h3>
    <h2>B</h2>
    "##);
}

#[test]
fn test_loose_toc_wraps_nested_entries_in_paragraphs() {
    let mut options = PipelineOptions::default();
    options.toc.tight = false;
    let html = with_options(options, "## Contents\n\n## A\n\n### A1\n\n## B\n");
    assert!(html.contains("  <li>\n    <p><a href=\"#a\">A</a></p>\n    <ul>\n"));
    assert!(html.contains("  <li>\n    <p><a href=\"#b\">B</a></p>\n  </li>\n"));
}

#[test]
fn test_old_section_content_is_replaced() {
    let html = parse_markdown("## Table of contents\n\nstale\n\n## One\n").unwrap();
    assert!(!html.contains("stale"));
    assert!(html.contains("<a href=\"#one\">One</a>"));
}

#[test]
fn test_heading_ids_match_links() {
    let options = PipelineOptions {
        heading_ids: true,
        ..PipelineOptions::default()
    };
    let html = with_options(options, "# Contents\n\n# Notes\n\n# Notes\n");
    assert!(html.contains("<a href=\"#notes\">Notes</a>"));
    assert!(html.contains("<a href=\"#notes-1\">Notes</a>"));
    assert!(html.contains("<h1 id=\"notes\">Notes</h1>"));
    assert!(html.contains("<h1 id=\"notes-1\">Notes</h1>"));
}

#[test]
fn test_toc_can_be_disabled() {
    let options = PipelineOptions {
        toc_enabled: false,
        ..PipelineOptions::default()
    };
    let html = with_options(options, GUIDE);
    assert!(!html.contains("<ul>"));
}

#[test]
fn test_ordered_and_depth_limited() {
    let mut options = PipelineOptions::default();
    options.toc.ordered = true;
    options.toc.max_depth = 2;
    let html = with_options(options, "## Contents\n\n## A\n\n### Deep\n");
    assert!(html.contains("<ol>\n  <li><a href=\"#a\">A</a></li>\n</ol>"));
    assert!(!html.contains("#deep"));
}
