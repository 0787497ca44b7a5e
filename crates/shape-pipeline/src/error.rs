//! Pipeline error type.

use shape_validate::ValidationErrors;
use thiserror::Error;

/// Result of running a pipeline or router.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Why a pipeline run produced no output.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The last middleware called `next`; nothing was left to handle the input.
    #[error("no middleware handled the input")]
    Unhandled,

    /// A router's input descriptor rejected the input. No handler ran.
    #[error("input rejected: {0}")]
    InputRejected(ValidationErrors),

    /// A router's handlers produced a value its output descriptor rejects.
    #[error("output rejected: {0}")]
    OutputRejected(ValidationErrors),

    /// A middleware failed.
    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

impl PipelineError {
    /// The validation errors, for input and output rejections.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            PipelineError::InputRejected(errors) | PipelineError::OutputRejected(errors) => {
                Some(errors)
            }
            PipelineError::Unhandled | PipelineError::Handler(_) => None,
        }
    }
}
