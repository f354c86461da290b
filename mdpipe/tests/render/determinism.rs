//! The output is a pure function of the input.

use mdpipe::{parse_markdown, Pipeline, PipelineOptions, RootDirectory};
use proptest::prelude::*;
use std::sync::Arc;

proptest! {
    #[test]
    fn same_input_same_output(input in "\\PC{0,200}") {
        prop_assert_eq!(parse_markdown(&input), parse_markdown(&input));
    }

    #[test]
    fn markdown_like_input_renders(input in "[#>*_`\\-\\[\\]()| a-z0-9\n]{0,160}") {
        let html = parse_markdown(&input).unwrap();
        prop_assert!(html.is_empty() || html.ends_with('\n'));
        prop_assert_eq!(html, parse_markdown(&input).unwrap());
    }

    #[test]
    fn shared_pipeline_matches_fresh_pipeline(input in "[#>*_ a-z\n]{0,120}") {
        let pipeline = Pipeline::standard(&PipelineOptions::default(), Arc::new(RootDirectory));
        let first = pipeline.process_str(&input).unwrap();
        let second = pipeline.process_str(&input).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first, parse_markdown(&input).unwrap());
    }
}

#[test]
fn test_separate_threads_agree() {
    let input = "# Contents\n\n# One\n\n- a\n- b\n";
    let expected = parse_markdown(input).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(move || parse_markdown(input).unwrap()))
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
