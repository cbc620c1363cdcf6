//! # Crew Errors
//!
//! Failure taxonomy for a pipeline run. Anything raised here aborts the
//! whole run; callers never see output from the tasks that finished first.

use thiserror::Error;

/// Errors produced while building or executing a crew run
#[derive(Debug, Error)]
pub enum CrewError {
    /// The inference endpoint could not be reached or the body could not be read
    #[error("inference request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The inference endpoint answered with a non-success status
    #[error("inference endpoint returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// The completion carried no assistant content
    #[error("inference endpoint returned no content for agent '{agent}'")]
    EmptyCompletion { agent: String },

    /// A task or request referenced a persona that is not defined
    #[error("unknown agent '{0}'")]
    UnknownPersona(String),

    /// The pipeline definition violates its shape rules
    #[error("invalid pipeline definition: {0}")]
    InvalidDefinition(String),

    /// A task failed; wraps the underlying cause with the failing stage
    #[error("task '{task}' assigned to '{agent}' failed: {source}")]
    TaskFailed {
        task: String,
        agent: String,
        #[source]
        source: Box<CrewError>,
    },
}

pub type CrewResult<T> = Result<T, CrewError>;

impl CrewError {
    /// Whether the caller addressed something that does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            CrewError::UnknownPersona(_) => true,
            CrewError::TaskFailed { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}
