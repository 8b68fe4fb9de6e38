//! Story generation with live progress reporting.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use taleweaver_core::api::StoryApi;
use taleweaver_core::schedule::FixedDelayTicker;
use taleweaver_generation::application::generator::Generator;
use taleweaver_generation::application::task::GenerationTask;
use taleweaver_generation::domain::error::GenerationError;
use taleweaver_generation::domain::poller::PollerState;
use taleweaver_story::domain::story::Story;
use tracing::warn;

use crate::error::AppError;

fn report(state: &PollerState, out: &mut impl Write) -> std::io::Result<()> {
    match state {
        PollerState::Idle => Ok(()),
        PollerState::Submitting { .. } => writeln!(out, "Submitting theme..."),
        PollerState::Tracking { job_id, status } => writeln!(out, "Job {job_id} is {status}..."),
        PollerState::Resolved { story_id } => writeln!(out, "Story {story_id} is ready."),
        PollerState::Failed(err) => writeln!(out, "Generation failed: {err}"),
    }
}

/// Generates a story for `theme`, printing each state change, and returns
/// it once it has been loaded.
///
/// Resolving `shutdown` cancels the request.
///
/// # Errors
///
/// Returns `AppError::Generation` if the theme is blank, the request fails
/// or it is cancelled, and `AppError::Io` if progress cannot be written.
pub async fn create<W, S>(
    theme: &str,
    api: Arc<dyn StoryApi>,
    poll_interval: Duration,
    out: &mut W,
    shutdown: S,
) -> Result<Story, AppError>
where
    W: Write,
    S: Future<Output = ()>,
{
    let mut generator = Generator::new(api);
    generator.start(theme, FixedDelayTicker::new(poll_interval))?;
    let Some(mut states) = generator.task().map(GenerationTask::subscribe) else {
        return Err(GenerationError::Cancelled.into());
    };
    writeln!(out, "Generating a story about {}...", theme.trim())?;
    tokio::pin!(shutdown);

    let mut last = PollerState::Idle;
    loop {
        let state = states.borrow_and_update().clone();
        if state != last {
            report(&state, out)?;
        }
        if state.is_terminal() {
            break;
        }
        last = state;

        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            () = &mut shutdown => {
                warn!("story generation interrupted");
                generator.reset();
                return Err(GenerationError::Cancelled.into());
            }
        }
    }

    Ok(generator.outcome().await?)
}

#[cfg(test)]
mod tests {
    use taleweaver_core::api::{JobResponse, JobStatusResponse};
    use taleweaver_core::ids::{JobId, StoryId};
    use taleweaver_core::job::JobStatus;
    use taleweaver_test_support::{ScriptedStoryApi, pirate_story};

    use super::*;

    const INTERVAL: Duration = Duration::from_secs(5);

    fn submitted() -> Result<JobResponse, taleweaver_core::error::ApiError> {
        Ok(JobResponse {
            job_id: JobId::from("j1"),
            status: JobStatus::Pending,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_reports_progress_and_returns_story() {
        // Arrange
        let api = Arc::new(
            ScriptedStoryApi::new()
                .with_submit(submitted())
                .with_status(Ok(JobStatusResponse {
                    status: JobStatus::Processing,
                    story_id: None,
                    error: None,
                }))
                .with_status(Ok(JobStatusResponse {
                    status: JobStatus::Completed,
                    story_id: Some(StoryId::from("s1")),
                    error: None,
                }))
                .with_story(pirate_story()),
        );
        let mut out = Vec::new();

        // Act
        let story = create("pirates", api, INTERVAL, &mut out, std::future::pending())
            .await
            .unwrap();

        // Assert
        let output = String::from_utf8(out).unwrap();
        assert_eq!(story.title(), "The Pirate Cove");
        assert!(output.starts_with("Generating a story about pirates..."));
        assert!(output.contains("Job j1 is pending..."));
        assert!(output.contains("Job j1 is processing..."));
        assert!(output.contains("Story s1 is ready."));
    }

    #[tokio::test]
    async fn test_blank_theme_is_rejected_without_output() {
        let api = Arc::new(ScriptedStoryApi::new());
        let mut out = Vec::new();

        let result = create("   ", api.clone(), INTERVAL, &mut out, std::future::pending()).await;

        assert!(matches!(
            result,
            Err(AppError::Generation(GenerationError::EmptyTheme))
        ));
        assert!(out.is_empty());
        assert!(api.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_job_is_reported() {
        let api = Arc::new(ScriptedStoryApi::new().with_submit(submitted()).with_status(Ok(
            JobStatusResponse {
                status: JobStatus::Failed,
                story_id: None,
                error: Some("model overloaded".into()),
            },
        )));
        let mut out = Vec::new();

        let result = create("pirates", api, INTERVAL, &mut out, std::future::pending()).await;

        assert_eq!(result.unwrap_err().to_string(), "model overloaded");
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("Generation failed: model overloaded"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_polling() {
        // Arrange
        let api = Arc::new(
            ScriptedStoryApi::new()
                .with_submit(submitted())
                .with_repeating_status(Ok(JobStatusResponse {
                    status: JobStatus::Processing,
                    story_id: None,
                    error: None,
                })),
        );
        let shutdown = tokio::time::sleep(Duration::from_secs(12));

        // Act
        let result = create("pirates", api.clone(), INTERVAL, &mut Vec::new(), shutdown).await;
        tokio::time::sleep(Duration::from_secs(60)).await;

        // Assert
        assert!(matches!(
            result,
            Err(AppError::Generation(GenerationError::Cancelled))
        ));
        assert_eq!(api.status_checks(), 2);
    }
}
