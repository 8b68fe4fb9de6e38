//! Test story services — scripted `StoryApi` implementations for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use taleweaver_core::api::{
    CompleteStoryResponse, CreateStoryRequest, JobResponse, JobStatusResponse, StoryApi,
    StoryCount, StorySummary,
};
use taleweaver_core::error::ApiError;
use taleweaver_core::ids::{JobId, StoryId};

/// A call received by a [`ScriptedStoryApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// submit-generation with the given theme.
    SubmitGeneration(String),
    /// fetch-job-status for the given job.
    FetchJobStatus(JobId),
    /// fetch-complete-story for the given story.
    FetchCompleteStory(StoryId),
    /// list-stories with the given window.
    ListStories {
        /// Stories skipped.
        skip: u64,
        /// Maximum returned.
        limit: u64,
    },
    /// count-stories.
    CountStories,
}

/// A story service that answers from a script and records every call.
///
/// Submit and status responses are consumed in order. Once the status
/// script runs dry the repeating status (if any) is returned forever.
/// Stories not registered with [`ScriptedStoryApi::with_story`] are
/// reported as not found.
#[derive(Debug, Default)]
pub struct ScriptedStoryApi {
    submits: Mutex<VecDeque<Result<JobResponse, ApiError>>>,
    statuses: Mutex<VecDeque<Result<JobStatusResponse, ApiError>>>,
    repeating_status: Option<Result<JobStatusResponse, ApiError>>,
    stories: HashMap<StoryId, CompleteStoryResponse>,
    story_error: Option<ApiError>,
    summaries: Vec<StorySummary>,
    list_error: Option<ApiError>,
    count_error: Option<ApiError>,
    calls: Mutex<Vec<ApiCall>>,
}

impl ScriptedStoryApi {
    /// Creates an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response to the next submit-generation call.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_submit(mut self, result: Result<JobResponse, ApiError>) -> Self {
        self.submits.get_mut().unwrap().push_back(result);
        self
    }

    /// Queues a response to the next fetch-job-status call.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_status(mut self, result: Result<JobStatusResponse, ApiError>) -> Self {
        self.statuses.get_mut().unwrap().push_back(result);
        self
    }

    /// Sets the status returned once the queued statuses are exhausted.
    #[must_use]
    pub fn with_repeating_status(mut self, result: Result<JobStatusResponse, ApiError>) -> Self {
        self.repeating_status = Some(result);
        self
    }

    /// Registers a story served by fetch-complete-story.
    #[must_use]
    pub fn with_story(mut self, story: CompleteStoryResponse) -> Self {
        self.stories.insert(story.id.clone(), story);
        self
    }

    /// Makes every fetch-complete-story call fail with `error`.
    #[must_use]
    pub fn with_story_error(mut self, error: ApiError) -> Self {
        self.story_error = Some(error);
        self
    }

    /// Sets the stories served by list-stories and counted by count-stories.
    #[must_use]
    pub fn with_summaries(mut self, summaries: Vec<StorySummary>) -> Self {
        self.summaries = summaries;
        self
    }

    /// Makes every list-stories call fail with `error`.
    #[must_use]
    pub fn with_list_error(mut self, error: ApiError) -> Self {
        self.list_error = Some(error);
        self
    }

    /// Makes every count-stories call fail with `error`.
    #[must_use]
    pub fn with_count_error(mut self, error: ApiError) -> Self {
        self.count_error = Some(error);
        self
    }

    /// Returns a snapshot of all calls received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of fetch-job-status calls received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn status_checks(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, ApiCall::FetchJobStatus(_)))
            .count()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl StoryApi for ScriptedStoryApi {
    async fn submit_generation(
        &self,
        request: &CreateStoryRequest,
    ) -> Result<JobResponse, ApiError> {
        self.record(ApiCall::SubmitGeneration(request.theme.clone()));
        self.submits
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted submit response".into())))
    }

    async fn fetch_job_status(&self, job_id: &JobId) -> Result<JobStatusResponse, ApiError> {
        self.record(ApiCall::FetchJobStatus(job_id.clone()));
        let next = self.statuses.lock().unwrap().pop_front();
        next.or_else(|| self.repeating_status.clone())
            .unwrap_or_else(|| Err(ApiError::Network("no scripted status response".into())))
    }

    async fn fetch_complete_story(
        &self,
        story_id: &StoryId,
    ) -> Result<CompleteStoryResponse, ApiError> {
        self.record(ApiCall::FetchCompleteStory(story_id.clone()));
        if let Some(error) = &self.story_error {
            return Err(error.clone());
        }
        self.stories
            .get(story_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("/stories/{story_id}/complete")))
    }

    async fn list_stories(&self, skip: u64, limit: u64) -> Result<Vec<StorySummary>, ApiError> {
        self.record(ApiCall::ListStories { skip, limit });
        if let Some(error) = &self.list_error {
            return Err(error.clone());
        }
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(self.summaries.iter().skip(skip).take(limit).cloned().collect())
    }

    async fn count_stories(&self) -> Result<StoryCount, ApiError> {
        self.record(ApiCall::CountStories);
        if let Some(error) = &self.count_error {
            return Err(error.clone());
        }
        Ok(StoryCount {
            count: self.summaries.len() as u64,
        })
    }
}

/// A story service that fails every call with a network error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingStoryApi;

impl FailingStoryApi {
    fn error() -> ApiError {
        ApiError::Network("connection refused".into())
    }
}

#[async_trait]
impl StoryApi for FailingStoryApi {
    async fn submit_generation(
        &self,
        _request: &CreateStoryRequest,
    ) -> Result<JobResponse, ApiError> {
        Err(Self::error())
    }

    async fn fetch_job_status(&self, _job_id: &JobId) -> Result<JobStatusResponse, ApiError> {
        Err(Self::error())
    }

    async fn fetch_complete_story(
        &self,
        _story_id: &StoryId,
    ) -> Result<CompleteStoryResponse, ApiError> {
        Err(Self::error())
    }

    async fn list_stories(&self, _skip: u64, _limit: u64) -> Result<Vec<StorySummary>, ApiError> {
        Err(Self::error())
    }

    async fn count_stories(&self) -> Result<StoryCount, ApiError> {
        Err(Self::error())
    }
}
