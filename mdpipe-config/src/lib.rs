//! Shared configuration loader for mdpipe.
//!
//! `defaults/mdpipe.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`MdpipeConfig`],
//! which converts into the library's [`PipelineOptions`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use mdpipe::mdast::parser::ParseOptions;
use mdpipe::pipeline::PipelineOptions;
use mdpipe::transforms::format::FormatOptions;
use mdpipe::transforms::sanitize::SanitizeOptions;
use mdpipe::transforms::toc::TocOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/mdpipe.default.toml");

/// Name of the configuration file picked up from the working directory.
pub const LOCAL_CONFIG_FILE: &str = "mdpipe.toml";

/// Top-level configuration consumed by mdpipe applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MdpipeConfig {
    pub parse: ParseConfig,
    pub toc: TocConfig,
    pub html: HtmlConfig,
    pub sanitize: SanitizeConfig,
    pub format: FormatConfig,
    pub bench: BenchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParseConfig {
    pub gfm: bool,
    pub smart: bool,
    pub max_nesting: usize,
}

/// Table-of-contents knobs. Empty strings stand for "not set".
#[derive(Debug, Clone, Deserialize)]
pub struct TocConfig {
    pub enabled: bool,
    pub heading: String,
    pub min_depth: u8,
    pub max_depth: u8,
    pub skip: String,
    pub tight: bool,
    pub ordered: bool,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HtmlConfig {
    pub allow_dangerous_html: bool,
    pub heading_ids: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SanitizeConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormatConfig {
    pub enabled: bool,
    pub indent: String,
    pub blanks: Vec<String>,
}

/// Settings for `mdpipe bench`.
#[derive(Debug, Clone, Deserialize)]
pub struct BenchConfig {
    pub iterations: usize,
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl From<&ParseConfig> for ParseOptions {
    fn from(config: &ParseConfig) -> Self {
        ParseOptions {
            gfm: config.gfm,
            smart: config.smart,
            max_nesting: config.max_nesting,
        }
    }
}

impl From<&TocConfig> for TocOptions {
    fn from(config: &TocConfig) -> Self {
        TocOptions {
            heading: config.heading.clone(),
            min_depth: config.min_depth,
            max_depth: config.max_depth,
            skip: non_empty(&config.skip),
            tight: config.tight,
            ordered: config.ordered,
            prefix: non_empty(&config.prefix),
        }
    }
}

impl From<&FormatConfig> for FormatOptions {
    fn from(config: &FormatConfig) -> Self {
        FormatOptions {
            indent: config.indent.clone(),
            blanks: config.blanks.clone(),
        }
    }
}

impl From<&MdpipeConfig> for PipelineOptions {
    fn from(config: &MdpipeConfig) -> Self {
        PipelineOptions {
            parse: (&config.parse).into(),
            toc_enabled: config.toc.enabled,
            toc: (&config.toc).into(),
            allow_dangerous_html: config.html.allow_dangerous_html,
            heading_ids: config.html.heading_ids,
            sanitize: SanitizeOptions {
                enabled: config.sanitize.enabled,
            },
            format_enabled: config.format.enabled,
            format: (&config.format).into(),
        }
    }
}

impl From<MdpipeConfig> for PipelineOptions {
    fn from(config: MdpipeConfig) -> Self {
        PipelineOptions::from(&config)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MdpipeConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MdpipeConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(!config.parse.gfm);
        assert_eq!(config.parse.max_nesting, 256);
        assert!(config.toc.enabled);
        assert!(config.html.allow_dangerous_html);
        assert!(!config.sanitize.enabled);
        assert_eq!(config.format.indent, "  ");
        assert_eq!(config.bench.iterations, 10);
    }

    #[test]
    fn defaults_match_library_defaults() {
        let config = load_defaults().expect("defaults to deserialize");
        let options: PipelineOptions = config.into();
        assert_eq!(options, PipelineOptions::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("format.indent", "\t")
            .expect("override to apply")
            .set_override("sanitize.enabled", true)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.format.indent, "\t");
        assert!(config.sanitize.enabled);
    }

    #[test]
    fn empty_strings_become_unset_toc_options() {
        let config = Loader::new()
            .set_override("toc.prefix", "user-content-")
            .expect("override to apply")
            .build()
            .expect("config to build");
        let toc: TocOptions = (&config.toc).into();
        assert_eq!(toc.prefix.as_deref(), Some("user-content-"));
        assert_eq!(toc.skip, None);
    }

    #[test]
    fn layers_files_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mdpipe.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[parse]\ngfm = true\n\n[toc]\nmax_depth = 3").unwrap();

        let config = Loader::new().with_file(&path).build().expect("config to build");
        assert!(config.parse.gfm);
        assert_eq!(config.toc.max_depth, 3);
        assert_eq!(config.toc.min_depth, 1);
        assert!(config.toc.tight);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = Loader::new().with_file("/nonexistent/mdpipe.toml").build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/mdpipe.toml")
            .build()
            .expect("config to build");
        assert!(config.toc.enabled);
    }
}
