//! Markdown to HTML through a fixed chain of tree transforms
//!
//!     This crate turns markdown text into formatted HTML. The work is split into small stages
//!     that each do one thing to one tree, run in a fixed order by a [`Pipeline`]:
//!
//!         parse -> toc -> to-html -> [sanitize] -> format -> stringify
//!
//!     TLDR: For callers:
//!         - [`parse_markdown`] is the whole story for most uses: text in, HTML out.
//!         - Build a [`Pipeline`] yourself when you need other options, a different working
//!           directory, or an intermediate tree ([`Pipeline::run_until`]).
//!         - Every failure is a [`ProcessError`]; there is no partial output.
//!
//! Architecture
//!
//!     Two trees carry the document. The markdown tree (./mdast) is built by the parse stage
//!     from comrak's arena AST and rewritten by the TOC stage. The HTML tree (./hast) is
//!     produced by the to-html conversion, cleaned by the optional sanitize stage, re-indented
//!     by the format stage and written out with html5ever's serializer.
//!
//!     Both trees are plain owned values: no arenas or lifetimes escape the parse stage, so a
//!     tree can be inspected, serialized to JSON or handed to another stage freely.
//!
//!     This is a pure lib, that is, it powers mdpipe-cli but is shell agnostic: no code here
//!     prints, reads environment variables, or asks the process for its working directory. The
//!     working directory of a file comes from a [`WorkingDirectory`] capability passed in when
//!     the pipeline is built.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # ProcessError
//!     ├── vfile.rs                # VFile and the WorkingDirectory capability
//!     ├── pipeline.rs             # Stage, Pipeline, PipelineOptions
//!     ├── mdast
//!     │   ├── mod.rs              # markdown tree
//!     │   └── parser.rs           # comrak -> mdast
//!     ├── hast
//!     │   ├── mod.rs              # HTML tree
//!     │   └── serializer.rs       # hast -> String (html5ever)
//!     └── transforms
//!         ├── slug.rs             # GitHub-style slugs
//!         ├── toc.rs              # table of contents
//!         ├── to_hast.rs          # mdast -> hast
//!         ├── sanitize.rs         # allowlist cleaning
//!         └── format.rs           # whitespace and indentation
//!
//! Testing
//!     tests
//!     └── <area>
//!         └── <testname>.rs
//!
//!     Rust does not discover tests in subdirectories, so they are included from tests/lib.rs.
//!
//! Raw HTML
//!
//!     HTML written in the markdown source is kept as raw nodes and passed through to the
//!     output unescaped. This is controlled by one setting, `allow_dangerous_html`, which the
//!     standard chain applies to both to-html and stringify. Sanitization is available as a
//!     stage but is off unless asked for.

pub mod error;
pub mod hast;
pub mod mdast;
pub mod pipeline;
pub mod transforms;
pub mod vfile;

pub use error::ProcessError;
pub use pipeline::{Pipeline, PipelineOptions, Stage, Tree};
pub use vfile::{RootDirectory, VFile, WorkingDirectory};

use std::sync::Arc;

/// Render markdown to formatted HTML with the standard chain.
///
/// The chain is built fresh for every call with default options and a
/// [`RootDirectory`], so calls share no state.
pub fn parse_markdown(input: &str) -> Result<String, ProcessError> {
    let pipeline = Pipeline::standard(&PipelineOptions::default(), Arc::new(RootDirectory));
    pipeline.process_str(input)
}

/// [`parse_markdown`] for byte input. Fails with [`ProcessError::InvalidUtf8`]
/// when the bytes are not UTF-8.
pub fn parse_markdown_bytes(input: &[u8]) -> Result<String, ProcessError> {
    let text = std::str::from_utf8(input)?;
    parse_markdown(text)
}
