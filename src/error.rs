//! Error handling for the conversation actions
//!
//! One `thiserror` enum covers every stage of the report pipeline as well as
//! the action registry and configuration. The report action converts these
//! into a user-visible failure message; the HTTP layer maps them to status
//! codes.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for action operations
pub type ActionResult<T> = Result<T, ActionError>;

/// Main error type for actions and the report pipeline
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("no user messages to classify")]
    NoUserMessages,

    #[error("classification service unavailable: {0}")]
    ClassificationUnavailable(String),

    #[error("emotion report is empty")]
    EmptyReport,

    #[error("rendering engine unavailable: {0}")]
    RenderEngineUnavailable(String),

    #[error("document rendering failed: {0}")]
    RenderFailed(String),

    #[error("destination '{}' is not writable: {source}", .path.display())]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template error: {0}")]
    Template(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("No registered action found for name '{0}'.")]
    UnknownAction(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ActionError {
    /// Stable machine-readable code, used in logs and HTTP bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ActionError::NoUserMessages => "no_user_messages",
            ActionError::ClassificationUnavailable(_) => "classification_unavailable",
            ActionError::EmptyReport => "empty_report",
            ActionError::RenderEngineUnavailable(_) => "render_engine_unavailable",
            ActionError::RenderFailed(_) => "render_failed",
            ActionError::DestinationUnwritable { .. } => "destination_unwritable",
            ActionError::Template(_) => "template",
            ActionError::Config(_) => "config",
            ActionError::UnknownAction(_) => "unknown_action",
            ActionError::InvalidRequest(_) => "invalid_request",
        }
    }

    /// Errors raised by the report pipeline itself, as opposed to
    /// registry lookups or malformed requests.
    pub fn is_pipeline_failure(&self) -> bool {
        !matches!(
            self,
            ActionError::UnknownAction(_) | ActionError::InvalidRequest(_)
        )
    }
}

impl From<handlebars::RenderError> for ActionError {
    fn from(err: handlebars::RenderError) -> Self {
        ActionError::Template(err.to_string())
    }
}

impl From<handlebars::TemplateError> for ActionError {
    fn from(err: handlebars::TemplateError) -> Self {
        ActionError::Template(err.to_string())
    }
}
