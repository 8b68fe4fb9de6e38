//! Generation error types.

use taleweaver_core::error::ApiError;
use taleweaver_core::job::JobStatus;
use taleweaver_story::application::loader::LoadError;
use thiserror::Error;

/// Message used when a job fails without saying why.
pub const DEFAULT_FAILURE_MESSAGE: &str = "generation failed";

/// Terminal failure of a generation request, or misuse of the poller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The theme was blank.
    #[error("theme must not be empty")]
    EmptyTheme,

    /// `submit` was called while a request was already being handled.
    #[error("a generation request is already in progress")]
    AlreadyInFlight,

    /// A result arrived for a request the poller is no longer handling.
    #[error("result arrived for a generation request that is no longer in progress")]
    Stale,

    /// submit-generation failed; no job was created.
    #[error("failed to generate story: {0}")]
    Submission(ApiError),

    /// The job reported failure.
    #[error("{0}")]
    JobFailed(String),

    /// fetch-job-status failed with something other than a transient miss.
    #[error("failed to check story status: {0}")]
    StatusCheck(ApiError),

    /// The job reported an active status after a terminal one.
    #[error("job status went back from {from} to {to}")]
    StatusRegressed {
        /// Terminal status already seen.
        from: JobStatus,
        /// Active status reported afterwards.
        to: JobStatus,
    },

    /// The job completed without naming a story.
    #[error("generation completed without a story")]
    MissingStory,

    /// The generated story could not be loaded.
    #[error(transparent)]
    StoryFetch(#[from] LoadError),

    /// Polling stopped before the job resolved.
    #[error("generation cancelled")]
    Cancelled,
}
