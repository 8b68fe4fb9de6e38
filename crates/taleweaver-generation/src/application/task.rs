//! The polling task: submits a theme, polls on every tick, and loads the
//! generated story.

use std::sync::Arc;

use taleweaver_core::api::StoryApi;
use taleweaver_core::schedule::Ticker;
use taleweaver_story::application::loader::load_story;
use taleweaver_story::domain::story::Story;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::error::GenerationError;
use crate::domain::poller::{JobPoller, PollerState};
use crate::domain::theme::Theme;

/// Runs one generation request to completion on `poller`.
///
/// The first status check happens on the first tick after submission, and
/// each following tick is only requested once the previous check has been
/// applied, so at most one status call is ever in flight. `on_transition`
/// sees the poller state after every applied transition.
///
/// # Errors
///
/// Returns the terminal failure of the request, `GenerationError::Cancelled`
/// if the ticker stops before the job resolves, or
/// `GenerationError::AlreadyInFlight` if `poller` was not idle.
pub async fn run_generation<T, F>(
    poller: &mut JobPoller,
    theme: Theme,
    api: &dyn StoryApi,
    mut ticker: T,
    mut on_transition: F,
) -> Result<Story, GenerationError>
where
    T: Ticker,
    F: FnMut(&PollerState) + Send,
{
    let request = poller.begin_submit(theme)?;
    on_transition(poller.state());

    let submitted = poller.apply_submission(api.submit_generation(&request).await);
    on_transition(poller.state());
    submitted?;

    while let Some(job_id) = poller.job_id().cloned() {
        if !ticker.tick().await {
            poller.abandon();
            on_transition(poller.state());
            return Err(GenerationError::Cancelled);
        }

        let checked = poller.apply_status(api.fetch_job_status(&job_id).await);
        on_transition(poller.state());

        if let Some(story_id) = checked? {
            let story = poller.apply_story(load_story(&story_id, api).await);
            on_transition(poller.state());
            return story;
        }
    }

    Err(GenerationError::Stale)
}

/// A generation request running in the background.
///
/// Dropping the task, or calling [`GenerationTask::cancel`], aborts it:
/// the pending tick is cancelled and no later result can change its state.
#[derive(Debug)]
pub struct GenerationTask {
    state: watch::Receiver<PollerState>,
    handle: Option<JoinHandle<Result<Story, GenerationError>>>,
}

/// Spawns a generation request for `theme` on the current runtime.
pub fn spawn_generation<T>(theme: Theme, api: Arc<dyn StoryApi>, ticker: T) -> GenerationTask
where
    T: Ticker + 'static,
{
    let (state_tx, state_rx) = watch::channel(PollerState::Idle);
    let handle = tokio::spawn(async move {
        let mut poller = JobPoller::new();
        run_generation(&mut poller, theme, api.as_ref(), ticker, |state| {
            state_tx.send_replace(state.clone());
        })
        .await
    });

    GenerationTask {
        state: state_rx,
        handle: Some(handle),
    }
}

impl GenerationTask {
    /// Latest published state.
    #[must_use]
    pub fn state(&self) -> PollerState {
        self.state.borrow().clone()
    }

    /// A receiver notified on every state transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PollerState> {
        self.state.clone()
    }

    /// Aborts the request. Any pending tick is dropped immediately.
    pub fn cancel(&self) {
        if let Some(handle) = &self.handle {
            debug!("cancelling generation task");
            handle.abort();
        }
    }

    /// Waits for the request to finish and returns the generated story.
    ///
    /// # Errors
    ///
    /// Returns the request's terminal failure, or
    /// `GenerationError::Cancelled` if the task was aborted.
    ///
    /// # Panics
    ///
    /// Resumes the panic if the task panicked.
    pub async fn outcome(mut self) -> Result<Story, GenerationError> {
        let Some(handle) = self.handle.take() else {
            return Err(GenerationError::Cancelled);
        };
        match handle.await {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => Err(GenerationError::Cancelled),
            Err(err) => std::panic::resume_unwind(err.into_panic()),
        }
    }
}

impl Drop for GenerationTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use taleweaver_core::api::{JobResponse, JobStatusResponse};
    use taleweaver_core::error::ApiError;
    use taleweaver_core::ids::{JobId, NodeId, StoryId};
    use taleweaver_core::job::JobStatus;
    use taleweaver_core::schedule::FixedDelayTicker;
    use taleweaver_story::application::loader::LoadError;
    use taleweaver_story::domain::navigator::StoryNavigator;
    use taleweaver_test_support::{
        ApiCall, FailingStoryApi, ScriptedStoryApi, manual_ticker, pirate_story,
    };

    use super::*;

    fn job(id: &str, status: JobStatus) -> Result<JobResponse, ApiError> {
        Ok(JobResponse {
            job_id: JobId::from(id),
            status,
        })
    }

    fn status(status: JobStatus) -> Result<JobStatusResponse, ApiError> {
        Ok(JobStatusResponse {
            status,
            story_id: None,
            error: None,
        })
    }

    fn completed(story_id: &str) -> Result<JobStatusResponse, ApiError> {
        Ok(JobStatusResponse {
            status: JobStatus::Completed,
            story_id: Some(StoryId::from(story_id)),
            error: None,
        })
    }

    fn pirates() -> Theme {
        Theme::new("pirates").unwrap()
    }

    async fn wait_until_tracking(task: &GenerationTask) {
        task.subscribe()
            .wait_for(PollerState::is_tracking)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_pirates_scenario_resolves_and_navigates() {
        // Arrange
        let api = Arc::new(
            ScriptedStoryApi::new()
                .with_submit(job("j1", JobStatus::Pending))
                .with_status(status(JobStatus::Processing))
                .with_status(completed("s1"))
                .with_story(pirate_story()),
        );
        let (ticks, ticker) = manual_ticker();
        let task = spawn_generation(pirates(), api.clone(), ticker);
        wait_until_tracking(&task).await;
        assert_eq!(api.status_checks(), 0);

        // Act / Assert — tick 1: still processing.
        assert!(ticks.tick().await);
        assert_eq!(
            task.state(),
            PollerState::Tracking {
                job_id: JobId::from("j1"),
                status: JobStatus::Processing
            }
        );

        // Act / Assert — tick 2: completed, polling stops.
        assert!(!ticks.tick().await);
        let story = task.outcome().await.unwrap();
        assert_eq!(
            api.calls(),
            vec![
                ApiCall::SubmitGeneration("pirates".into()),
                ApiCall::FetchJobStatus(JobId::from("j1")),
                ApiCall::FetchJobStatus(JobId::from("j1")),
                ApiCall::FetchCompleteStory(StoryId::from("s1")),
            ]
        );

        let mut navigator = StoryNavigator::new(story);
        assert_eq!(navigator.cursor(), &NodeId::from("n0"));
        navigator.select_option(NodeId::from("n1"));
        assert_eq!(
            navigator.current_view().unwrap().node_id,
            &NodeId::from("n1")
        );
    }

    #[tokio::test]
    async fn test_failed_job_stops_polling_with_reported_message() {
        // Arrange
        let api = Arc::new(
            ScriptedStoryApi::new()
                .with_submit(job("j2", JobStatus::Pending))
                .with_status(status(JobStatus::Processing))
                .with_status(Ok(JobStatusResponse {
                    status: JobStatus::Failed,
                    story_id: None,
                    error: Some("theme rejected".into()),
                })),
        );
        let (ticks, ticker) = manual_ticker();
        let task = spawn_generation(pirates(), api.clone(), ticker);
        wait_until_tracking(&task).await;

        // Act
        assert!(ticks.tick().await);
        let stopped = !ticks.tick().await;

        // Assert
        assert!(stopped);
        assert_eq!(
            task.state(),
            PollerState::Failed(GenerationError::JobFailed("theme rejected".into()))
        );
        assert!(!ticks.tick().await);
        assert_eq!(api.status_checks(), 2);
        let err = task.outcome().await.unwrap_err();
        assert_eq!(err.to_string(), "theme rejected");
    }

    #[tokio::test]
    async fn test_not_found_while_pending_keeps_polling() {
        // Arrange
        let api = Arc::new(
            ScriptedStoryApi::new()
                .with_submit(job("j1", JobStatus::Pending))
                .with_status(Err(ApiError::NotFound("/jobs/j1".into())))
                .with_status(completed("s1"))
                .with_story(pirate_story()),
        );
        let (ticks, ticker) = manual_ticker();
        let task = spawn_generation(pirates(), api.clone(), ticker);
        wait_until_tracking(&task).await;

        // Act
        let continued = ticks.tick().await;

        // Assert
        assert!(continued);
        assert_eq!(
            task.state(),
            PollerState::Tracking {
                job_id: JobId::from("j1"),
                status: JobStatus::Pending
            }
        );
        assert!(task.state().error().is_none());

        assert!(!ticks.tick().await);
        assert!(task.outcome().await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_generated_story_surfaces_story_not_found() {
        // Arrange
        let api = Arc::new(
            ScriptedStoryApi::new()
                .with_submit(job("j1", JobStatus::Pending))
                .with_status(completed("s404")),
        );
        let (ticks, ticker) = manual_ticker();
        let task = spawn_generation(pirates(), api.clone(), ticker);
        wait_until_tracking(&task).await;

        // Act
        assert!(!ticks.tick().await);
        let err = task.outcome().await.unwrap_err();

        // Assert
        assert_eq!(
            err,
            GenerationError::StoryFetch(LoadError::StoryNotFound(StoryId::from("s404")))
        );
        assert_eq!(err.to_string(), "story not found");
    }

    #[tokio::test]
    async fn test_story_server_error_surfaces_load_failure() {
        // Arrange
        let api = Arc::new(
            ScriptedStoryApi::new()
                .with_submit(job("j1", JobStatus::Pending))
                .with_status(completed("s1"))
                .with_story_error(ApiError::Http {
                    status: 500,
                    message: "database unavailable".into(),
                }),
        );
        let (ticks, ticker) = manual_ticker();
        let task = spawn_generation(pirates(), api.clone(), ticker);
        wait_until_tracking(&task).await;

        // Act
        assert!(!ticks.tick().await);
        let err = task.outcome().await.unwrap_err();

        // Assert
        assert_eq!(
            err,
            GenerationError::StoryFetch(LoadError::Fetch(ApiError::Http {
                status: 500,
                message: "database unavailable".into(),
            }))
        );
        assert_eq!(
            err.to_string(),
            "failed to load story: request failed with status 500: database unavailable"
        );
        assert_eq!(
            api.calls().last(),
            Some(&ApiCall::FetchCompleteStory(StoryId::from("s1")))
        );
    }

    #[tokio::test]
    async fn test_submission_failure_never_polls() {
        // Arrange
        let (ticks, ticker) = manual_ticker();
        let task = spawn_generation(pirates(), Arc::new(FailingStoryApi), ticker);

        // Act
        let err = task.outcome().await.unwrap_err();

        // Assert
        assert_eq!(
            err.to_string(),
            "failed to generate story: network error: connection refused"
        );
        assert!(!ticks.tick().await);
    }

    #[tokio::test]
    async fn test_closed_ticker_cancels_request() {
        // Arrange
        let api = Arc::new(
            ScriptedStoryApi::new()
                .with_submit(job("j1", JobStatus::Pending))
                .with_repeating_status(status(JobStatus::Processing)),
        );
        let (ticks, ticker) = manual_ticker();
        let task = spawn_generation(pirates(), api.clone(), ticker);
        wait_until_tracking(&task).await;

        // Act
        drop(ticks);
        let mut states = task.subscribe();
        states
            .wait_for(PollerState::is_terminal)
            .await
            .unwrap();

        // Assert
        assert_eq!(task.state(), PollerState::Failed(GenerationError::Cancelled));
        assert_eq!(task.outcome().await.unwrap_err(), GenerationError::Cancelled);
        assert_eq!(api.status_checks(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_status_check_per_interval() {
        // Arrange
        let api = Arc::new(
            ScriptedStoryApi::new()
                .with_submit(job("j1", JobStatus::Pending))
                .with_repeating_status(status(JobStatus::Processing)),
        );
        let task = spawn_generation(pirates(), api.clone(), FixedDelayTicker::default());

        // Act / Assert — nothing before the first tick.
        tokio::time::sleep(Duration::from_millis(4999)).await;
        assert_eq!(api.status_checks(), 0);
        assert!(task.state().is_tracking());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(api.status_checks(), 1);

        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(api.status_checks(), 3);

        // Act / Assert — cancellation stops further checks.
        task.cancel();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(api.status_checks(), 3);
        assert_eq!(task.outcome().await.unwrap_err(), GenerationError::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_task_cancels_pending_tick() {
        // Arrange
        let api = Arc::new(
            ScriptedStoryApi::new()
                .with_submit(job("j1", JobStatus::Pending))
                .with_repeating_status(status(JobStatus::Processing)),
        );
        let task = spawn_generation(pirates(), api.clone(), FixedDelayTicker::default());
        tokio::time::sleep(Duration::from_millis(1)).await;

        // Act
        drop(task);
        tokio::time::sleep(Duration::from_secs(30)).await;

        // Assert
        assert_eq!(api.status_checks(), 0);
        assert_eq!(api.calls().len(), 1);
    }
}
