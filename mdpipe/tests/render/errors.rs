//! Processing failures surface as `ProcessError` with no partial output.

use mdpipe::mdast::parser::ParseOptions;
use mdpipe::pipeline::Stage;
use mdpipe::transforms::to_hast::ToHtmlOptions;
use mdpipe::{
    parse_markdown, parse_markdown_bytes, Pipeline, PipelineOptions, ProcessError, RootDirectory,
};
use std::sync::Arc;

#[test]
fn test_invalid_utf8_fails() {
    let err = parse_markdown_bytes(&[b'#', b' ', 0xff, 0xfe]).unwrap_err();
    assert!(matches!(err, ProcessError::InvalidUtf8(_)));
}

#[test]
fn test_valid_bytes_match_text_entry_point() {
    let bytes = "# Grüße\n".as_bytes();
    assert_eq!(
        parse_markdown_bytes(bytes).unwrap(),
        parse_markdown("# Grüße\n").unwrap()
    );
}

#[test]
fn test_excessive_nesting_fails() {
    let input = format!("{} deep", ">".repeat(300));
    let err = parse_markdown(&input).unwrap_err();
    assert_eq!(err, ProcessError::NestingTooDeep { limit: 256 });
}

#[test]
fn test_nesting_limit_is_configurable() {
    let mut options = PipelineOptions::default();
    options.parse.max_nesting = 4;
    let pipeline = Pipeline::standard(&options, Arc::new(RootDirectory));

    assert!(pipeline.process_str("> quoted").is_ok());
    assert!(matches!(
        pipeline.process_str("> > > > > > quoted"),
        Err(ProcessError::NestingTooDeep { limit: 4 })
    ));
}

#[test]
fn test_bad_toc_pattern_fails() {
    let mut options = PipelineOptions::default();
    options.toc.heading = "(".to_string();
    let pipeline = Pipeline::standard(&options, Arc::new(RootDirectory));
    let err = pipeline.process_str("# Contents\n\n# A\n").unwrap_err();
    assert!(matches!(err, ProcessError::InvalidOption { stage: "toc", .. }));
}

#[test]
fn test_stage_mismatch() {
    let pipeline = Pipeline::new(Arc::new(RootDirectory))
        .stage(Stage::Parse(ParseOptions::default()))
        .stage(Stage::ToHtml(ToHtmlOptions::default()))
        .stage(Stage::ToHtml(ToHtmlOptions::default()));
    let err = pipeline.process_str("text").unwrap_err();
    assert_eq!(
        err.to_string(),
        "stage 'to-html' expects mdast but received hast"
    );
}

#[test]
fn test_missing_stringify_has_no_output() {
    let pipeline =
        Pipeline::new(Arc::new(RootDirectory)).stage(Stage::Parse(ParseOptions::default()));
    assert_eq!(
        pipeline.process_str("text").unwrap_err(),
        ProcessError::NoOutput { last: "mdast" }
    );
}
