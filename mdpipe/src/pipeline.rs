//! Pipeline runner
//!
//! A [`Pipeline`] is an ordered list of [`Stage`]s plus the working-directory
//! capability stamped on the files it processes. Each stage consumes one kind
//! of document state and produces the next:
//!
//! ```text
//! text --parse--> mdast --toc--> mdast --to-html--> hast
//!      --sanitize--> hast --format--> hast --stringify--> output
//! ```
//!
//! Stages run in list order with no early exit. A stage that receives the
//! wrong state fails the run with [`ProcessError::StageMismatch`], and a chain
//! that never reaches `stringify` fails with [`ProcessError::NoOutput`].

use crate::error::ProcessError;
use crate::hast;
use crate::hast::serializer::{stringify, StringifyOptions};
use crate::mdast;
use crate::mdast::parser::{self, ParseOptions};
use crate::transforms::format::{format, FormatOptions};
use crate::transforms::sanitize::{sanitize, SanitizeOptions};
use crate::transforms::to_hast::{to_hast, ToHtmlOptions};
use crate::transforms::toc::{insert_toc, TocOptions};
use crate::vfile::{VFile, WorkingDirectory};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// One step of the chain, with its options.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Parse(ParseOptions),
    Toc(TocOptions),
    ToHtml(ToHtmlOptions),
    Sanitize(SanitizeOptions),
    Format(FormatOptions),
    Stringify(StringifyOptions),
}

/// An intermediate tree returned by [`Pipeline::run_until`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Tree {
    Markdown(mdast::Root),
    Html(hast::Root),
}

/// Document state between stages.
enum State {
    Source,
    Markdown(mdast::Root),
    Html(hast::Root),
    Output(String),
}

impl State {
    fn kind(&self) -> &'static str {
        match self {
            State::Source => "text",
            State::Markdown(_) => "mdast",
            State::Html(_) => "hast",
            State::Output(_) => "output",
        }
    }
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Parse(_) => "parse",
            Stage::Toc(_) => "toc",
            Stage::ToHtml(_) => "to-html",
            Stage::Sanitize(_) => "sanitize",
            Stage::Format(_) => "format",
            Stage::Stringify(_) => "stringify",
        }
    }

    /// The state kind this stage consumes.
    pub fn input(&self) -> &'static str {
        match self {
            Stage::Parse(_) => "text",
            Stage::Toc(_) | Stage::ToHtml(_) => "mdast",
            Stage::Sanitize(_) | Stage::Format(_) | Stage::Stringify(_) => "hast",
        }
    }

    /// The state kind this stage produces.
    pub fn output(&self) -> &'static str {
        match self {
            Stage::Parse(_) | Stage::Toc(_) => "mdast",
            Stage::ToHtml(_) | Stage::Sanitize(_) | Stage::Format(_) => "hast",
            Stage::Stringify(_) => "output",
        }
    }

    /// Whether the stage does anything with its current options.
    pub fn is_active(&self) -> bool {
        match self {
            Stage::Sanitize(options) => options.enabled,
            _ => true,
        }
    }

    fn mismatch(&self, state: &State) -> ProcessError {
        ProcessError::StageMismatch {
            stage: self.name(),
            expected: self.input(),
            found: state.kind(),
        }
    }

    fn apply(&self, state: State, file: &mut VFile) -> Result<State, ProcessError> {
        match (self, state) {
            (Stage::Parse(options), State::Source) => {
                parser::parse_markdown(&file.value, options).map(State::Markdown)
            }
            (Stage::Toc(options), State::Markdown(mut root)) => {
                if !insert_toc(&mut root, options)? {
                    tracing::debug!("no table of contents inserted");
                }
                Ok(State::Markdown(root))
            }
            (Stage::ToHtml(options), State::Markdown(root)) => {
                Ok(State::Html(to_hast(&root, options, file)))
            }
            (Stage::Sanitize(options), State::Html(mut root)) => {
                if options.enabled {
                    sanitize(&mut root)?;
                }
                Ok(State::Html(root))
            }
            (Stage::Format(options), State::Html(mut root)) => {
                format(&mut root, options);
                Ok(State::Html(root))
            }
            (Stage::Stringify(options), State::Html(root)) => {
                stringify(&root, options).map(State::Output)
            }
            (stage, state) => Err(stage.mismatch(&state)),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        if !self.is_active() {
            f.write_str(" (disabled)")?;
        }
        Ok(())
    }
}

/// Options for the standard chain.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub parse: ParseOptions,
    pub toc_enabled: bool,
    pub toc: TocOptions,
    /// Pass raw HTML from the source through to the output unescaped
    pub allow_dangerous_html: bool,
    pub heading_ids: bool,
    pub sanitize: SanitizeOptions,
    pub format_enabled: bool,
    pub format: FormatOptions,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            toc_enabled: true,
            toc: TocOptions::default(),
            allow_dangerous_html: true,
            heading_ids: false,
            sanitize: SanitizeOptions::default(),
            format_enabled: true,
            format: FormatOptions::default(),
        }
    }
}

/// An ordered chain of stages.
#[derive(Clone)]
pub struct Pipeline {
    stages: Vec<Stage>,
    directory: Arc<dyn WorkingDirectory>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages)
            .field("cwd", &self.directory.cwd())
            .finish()
    }
}

impl Pipeline {
    /// An empty pipeline. Add stages with [`Pipeline::stage`].
    pub fn new(directory: Arc<dyn WorkingDirectory>) -> Self {
        Self {
            stages: Vec::new(),
            directory,
        }
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// The standard chain: parse, toc, to-html, sanitize, format, stringify.
    ///
    /// `allow_dangerous_html` is applied to both to-html and stringify so raw
    /// markup either survives both or neither.
    pub fn standard(options: &PipelineOptions, directory: Arc<dyn WorkingDirectory>) -> Self {
        let mut pipeline = Self::new(directory).stage(Stage::Parse(options.parse.clone()));
        if options.toc_enabled {
            pipeline = pipeline.stage(Stage::Toc(options.toc.clone()));
        }
        pipeline = pipeline
            .stage(Stage::ToHtml(ToHtmlOptions {
                allow_dangerous_html: options.allow_dangerous_html,
                heading_ids: options.heading_ids,
            }))
            .stage(Stage::Sanitize(options.sanitize));
        if options.format_enabled {
            pipeline = pipeline.stage(Stage::Format(options.format.clone()));
        }
        pipeline.stage(Stage::Stringify(StringifyOptions {
            allow_dangerous_html: options.allow_dangerous_html,
        }))
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(Stage::name).collect()
    }

    /// A new virtual file rooted in this pipeline's working directory.
    pub fn file(&self, value: impl Into<String>) -> VFile {
        VFile::new(value, self.directory.as_ref())
    }

    /// Run every stage over `file`, replacing its value with the output.
    #[tracing::instrument(level = "debug", skip_all, fields(file = %file.label()))]
    pub fn process(&self, mut file: VFile) -> Result<VFile, ProcessError> {
        let state = self.run(&mut file, None)?;
        match state {
            State::Output(output) => {
                file.value = output;
                Ok(file)
            }
            other => Err(ProcessError::NoOutput { last: other.kind() }),
        }
    }

    /// Process a string and return the output text.
    pub fn process_str(&self, input: &str) -> Result<String, ProcessError> {
        self.process(self.file(input)).map(|file| file.value)
    }

    /// Run the chain up to and including the stage called `name` and return
    /// the tree it produced.
    #[tracing::instrument(level = "debug", skip(self, file), fields(file = %file.label()))]
    pub fn run_until(&self, mut file: VFile, name: &str) -> Result<Tree, ProcessError> {
        let Some(position) = self.stages.iter().position(|stage| stage.name() == name) else {
            return Err(ProcessError::invalid_option(
                "pipeline",
                format!("no stage named '{name}' (stages: {})", self.stage_names().join(", ")),
            ));
        };

        match self.run(&mut file, Some(position + 1))? {
            State::Markdown(root) => Ok(Tree::Markdown(root)),
            State::Html(root) => Ok(Tree::Html(root)),
            other => Err(ProcessError::invalid_option(
                "pipeline",
                format!("stage '{name}' produces {} rather than a tree", other.kind()),
            )),
        }
    }

    fn run(&self, file: &mut VFile, limit: Option<usize>) -> Result<State, ProcessError> {
        let limit = limit.unwrap_or(self.stages.len());
        let mut state = State::Source;
        for stage in &self.stages[..limit] {
            let started = Instant::now();
            state = stage.apply(state, file)?;
            tracing::debug!(
                stage = stage.name(),
                active = stage.is_active(),
                produced = state.kind(),
                elapsed_us = started.elapsed().as_micros() as u64,
                "stage complete"
            );
        }
        Ok(state)
    }
}
