//! The generation job poller state machine.
//!
//! The poller performs no I/O. The caller issues each remote call and feeds
//! the result back through one of the `apply_*` methods, which applies the
//! whole transition at once. Results that arrive after the poller moved on
//! (reset, failure, resolution) are rejected as stale and change nothing.

use taleweaver_core::api::{CreateStoryRequest, JobResponse, JobStatusResponse};
use taleweaver_core::error::ApiError;
use taleweaver_core::ids::{JobId, StoryId};
use taleweaver_core::job::JobStatus;
use taleweaver_story::application::loader::LoadError;
use taleweaver_story::domain::story::Story;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::{DEFAULT_FAILURE_MESSAGE, GenerationError};
use super::theme::Theme;

/// Observable state of a [`JobPoller`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollerState {
    /// Nothing submitted.
    Idle,
    /// submit-generation is in flight.
    Submitting {
        /// The submitted theme.
        theme: Theme,
    },
    /// A job exists and is being polled.
    Tracking {
        /// The job being tracked.
        job_id: JobId,
        /// Last reported status.
        status: JobStatus,
    },
    /// The job produced a story, which has been handed off.
    Resolved {
        /// The generated story.
        story_id: StoryId,
    },
    /// The request ended in failure.
    Failed(GenerationError),
}

impl PollerState {
    /// Returns `true` for `Resolved` and `Failed`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved { .. } | Self::Failed(_))
    }

    /// Returns `true` while a job is being polled.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        matches!(self, Self::Tracking { .. })
    }

    /// The failure, if the request failed.
    #[must_use]
    pub fn error(&self) -> Option<&GenerationError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Short name of the state, for logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting { .. } => "submitting",
            Self::Tracking { .. } => "tracking",
            Self::Resolved { .. } => "resolved",
            Self::Failed(_) => "failed",
        }
    }
}

/// Tracks one generation request from submission to resolution.
#[derive(Debug)]
pub struct JobPoller {
    state: PollerState,
    correlation_id: Option<Uuid>,
}

impl Default for JobPoller {
    fn default() -> Self {
        Self::new()
    }
}

impl JobPoller {
    /// Creates an idle poller.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: PollerState::Idle,
            correlation_id: None,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &PollerState {
        &self.state
    }

    /// Correlation id of the current request, used to tie log lines
    /// together.
    #[must_use]
    pub fn correlation_id(&self) -> Option<Uuid> {
        self.correlation_id
    }

    /// The tracked job, while tracking.
    #[must_use]
    pub fn job_id(&self) -> Option<&JobId> {
        match &self.state {
            PollerState::Tracking { job_id, .. } => Some(job_id),
            _ => None,
        }
    }

    /// Starts a request: moves to `Submitting` and returns the body for
    /// submit-generation.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::AlreadyInFlight` unless the poller is idle.
    pub fn begin_submit(&mut self, theme: Theme) -> Result<CreateStoryRequest, GenerationError> {
        if self.state != PollerState::Idle {
            return Err(GenerationError::AlreadyInFlight);
        }
        let correlation_id = Uuid::new_v4();
        self.correlation_id = Some(correlation_id);
        info!(%correlation_id, theme = theme.as_str(), "submitting generation request");

        let request = CreateStoryRequest {
            theme: theme.as_str().to_owned(),
        };
        self.state = PollerState::Submitting { theme };
        Ok(request)
    }

    /// Applies the outcome of submit-generation.
    ///
    /// A job reported as already failed ends the request. Any other status
    /// starts tracking, including `completed`, whose story id only comes
    /// with the next status check.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Submission` or `GenerationError::JobFailed`
    /// (and moves to `Failed`), or `GenerationError::Stale` if no submission
    /// was in flight.
    pub fn apply_submission(
        &mut self,
        result: Result<JobResponse, ApiError>,
    ) -> Result<(), GenerationError> {
        if !matches!(self.state, PollerState::Submitting { .. }) {
            return Err(GenerationError::Stale);
        }
        match result {
            Ok(JobResponse {
                status: JobStatus::Failed,
                ..
            }) => self.fail(GenerationError::JobFailed(DEFAULT_FAILURE_MESSAGE.to_owned())),
            Ok(JobResponse { job_id, status }) => {
                info!(
                    correlation_id = ?self.correlation_id,
                    %job_id,
                    %status,
                    "generation job created"
                );
                self.state = PollerState::Tracking { job_id, status };
                Ok(())
            }
            Err(err) => self.fail(GenerationError::Submission(err)),
        }
    }

    /// Applies the outcome of one fetch-job-status call.
    ///
    /// Returns `Ok(None)` to keep polling and `Ok(Some(story_id))` once the
    /// story should be fetched. A not-found response while the job is still
    /// pending or processing is a transient miss and keeps polling.
    ///
    /// A response carrying an error message fails the request even when
    /// its status is not terminal, unless the job completed with a story.
    ///
    /// # Errors
    ///
    /// Returns the failure (and moves to `Failed`) for a failed job, an
    /// error message, a completion without story, or any other fetch
    /// failure, and `GenerationError::StatusRegressed` if a job already
    /// reported as terminal is reported as active again. Returns
    /// `GenerationError::Stale` if no job is tracked.
    pub fn apply_status(
        &mut self,
        result: Result<JobStatusResponse, ApiError>,
    ) -> Result<Option<StoryId>, GenerationError> {
        let PollerState::Tracking { job_id, status } = &mut self.state else {
            return Err(GenerationError::Stale);
        };

        let response = match result {
            Ok(response) => response,
            Err(err) if err.is_not_found() && status.is_active() => {
                warn!(
                    correlation_id = ?self.correlation_id,
                    %job_id,
                    "job not visible yet, polling again"
                );
                return Ok(None);
            }
            Err(err) => return self.fail(GenerationError::StatusCheck(err)),
        };

        if status.is_terminal() && response.status.is_active() {
            let err = GenerationError::StatusRegressed {
                from: *status,
                to: response.status,
            };
            return self.fail(err);
        }

        *status = response.status;
        debug!(
            correlation_id = ?self.correlation_id,
            %job_id,
            status = %response.status,
            "job status checked"
        );

        let error = response.error.filter(|message| !message.is_empty());
        match (response.status, response.story_id, error) {
            (JobStatus::Completed, Some(story_id), _) => Ok(Some(story_id)),
            (JobStatus::Failed, _, error) | (_, _, error @ Some(_)) => self.fail(
                GenerationError::JobFailed(
                    error.unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_owned()),
                ),
            ),
            (JobStatus::Completed, None, None) => self.fail(GenerationError::MissingStory),
            _ => Ok(None),
        }
    }

    /// Applies the outcome of loading the generated story. On success the
    /// job state is discarded and only the story id is kept.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::StoryFetch` (and moves to `Failed`) if the
    /// story could not be loaded, or `GenerationError::Stale` unless the
    /// tracked job has completed.
    pub fn apply_story(
        &mut self,
        result: Result<Story, LoadError>,
    ) -> Result<Story, GenerationError> {
        if !matches!(
            self.state,
            PollerState::Tracking {
                status: JobStatus::Completed,
                ..
            }
        ) {
            return Err(GenerationError::Stale);
        }
        match result {
            Ok(story) => {
                info!(
                    correlation_id = ?self.correlation_id,
                    story_id = %story.id(),
                    "generation resolved"
                );
                self.state = PollerState::Resolved {
                    story_id: story.id().clone(),
                };
                Ok(story)
            }
            Err(err) => self.fail(GenerationError::StoryFetch(err)),
        }
    }

    /// Ends a request that has not reached a terminal state because polling
    /// was torn down.
    pub fn abandon(&mut self) {
        if !self.state.is_terminal() && self.state != PollerState::Idle {
            let _ = self.fail::<()>(GenerationError::Cancelled);
        }
    }

    /// Forgets the current request and returns to `Idle`.
    pub fn reset(&mut self) {
        debug!(
            correlation_id = ?self.correlation_id,
            from = self.state.label(),
            "resetting poller"
        );
        self.state = PollerState::Idle;
        self.correlation_id = None;
    }

    fn fail<T>(&mut self, err: GenerationError) -> Result<T, GenerationError> {
        warn!(correlation_id = ?self.correlation_id, error = %err, "generation failed");
        self.state = PollerState::Failed(err.clone());
        Err(err)
    }
}
