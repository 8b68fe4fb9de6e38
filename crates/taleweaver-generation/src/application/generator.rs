//! Long-lived generation controller: one request at a time, restartable.

use std::sync::Arc;

use taleweaver_core::api::StoryApi;
use taleweaver_core::schedule::Ticker;
use taleweaver_story::domain::story::Story;
use tracing::info;

use super::task::{GenerationTask, spawn_generation};
use crate::domain::error::GenerationError;
use crate::domain::poller::PollerState;
use crate::domain::theme::Theme;

/// Owns at most one running generation request.
///
/// Starting a new request or resetting cancels the previous one before
/// anything else happens, so a stale request can never publish into the
/// new one.
pub struct Generator {
    api: Arc<dyn StoryApi>,
    task: Option<GenerationTask>,
}

impl Generator {
    /// Creates an idle generator.
    #[must_use]
    pub fn new(api: Arc<dyn StoryApi>) -> Self {
        Self { api, task: None }
    }

    /// Current state; `Idle` when no request has been started since the
    /// last reset.
    #[must_use]
    pub fn state(&self) -> PollerState {
        self.task
            .as_ref()
            .map_or(PollerState::Idle, GenerationTask::state)
    }

    /// The running request, if any.
    #[must_use]
    pub fn task(&self) -> Option<&GenerationTask> {
        self.task.as_ref()
    }

    /// Starts generating a story for `theme`, replacing any running request.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::EmptyTheme` for a blank theme; the running
    /// request, if any, is left untouched.
    pub fn start<T>(&mut self, theme: &str, ticker: T) -> Result<(), GenerationError>
    where
        T: Ticker + 'static,
    {
        let theme = Theme::new(theme)?;
        self.reset();
        info!(theme = theme.as_str(), "starting story generation");
        self.task = Some(spawn_generation(theme, Arc::clone(&self.api), ticker));
        Ok(())
    }

    /// Cancels the running request and returns to `Idle`.
    pub fn reset(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel();
        }
    }

    /// Waits for the running request to finish, leaving the generator
    /// idle.
    ///
    /// # Errors
    ///
    /// Returns the request's terminal failure, or
    /// `GenerationError::Cancelled` if nothing was running.
    pub async fn outcome(&mut self) -> Result<Story, GenerationError> {
        match self.task.take() {
            Some(task) => task.outcome().await,
            None => Err(GenerationError::Cancelled),
        }
    }
}
