//! Error types for pipeline operations

/// Errors that can occur while running a pipeline.
///
/// Every variant is a processing failure: the run stops at the first one and
/// no partial output is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProcessError {
    /// Byte input that is not UTF-8 text
    #[error("input is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    /// Document structure nested deeper than the parser accepts
    #[error("document nesting exceeds the limit of {limit} levels")]
    NestingTooDeep { limit: usize },

    /// A stage was configured with an unusable option
    #[error("invalid option for stage '{stage}': {message}")]
    InvalidOption { stage: &'static str, message: String },

    /// A stage received a tree it cannot consume
    #[error("stage '{stage}' expects {expected} but received {found}")]
    StageMismatch {
        stage: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// The chain finished without compiling the tree to text
    #[error("pipeline finished without output (last state: {last})")]
    NoOutput { last: &'static str },

    /// Error while writing HTML
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ProcessError {
    pub(crate) fn invalid_option(stage: &'static str, message: impl Into<String>) -> Self {
        ProcessError::InvalidOption {
            stage,
            message: message.into(),
        }
    }
}

impl From<std::str::Utf8Error> for ProcessError {
    fn from(err: std::str::Utf8Error) -> Self {
        ProcessError::InvalidUtf8(err.to_string())
    }
}
