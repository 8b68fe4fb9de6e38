//! Loading complete stories from the story service.

use taleweaver_core::api::StoryApi;
use taleweaver_core::error::ApiError;
use taleweaver_core::ids::StoryId;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::domain::story::Story;

/// Failure to load a complete story.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The service does not know the story.
    #[error("story not found")]
    StoryNotFound(StoryId),

    /// Any other failure of the fetch.
    #[error("failed to load story: {0}")]
    Fetch(ApiError),
}

/// Fetches a complete story and converts it into a navigable graph.
///
/// Selectable options pointing outside the story are logged but do not
/// reject the story; reaching one surfaces as `NodeNotFound` during
/// navigation.
///
/// # Errors
///
/// Returns `LoadError::StoryNotFound` if the service reports the story as
/// missing, and `LoadError::Fetch` for every other failure.
#[instrument(skip(api), fields(story_id = %story_id))]
pub async fn load_story(story_id: &StoryId, api: &dyn StoryApi) -> Result<Story, LoadError> {
    let response = api
        .fetch_complete_story(story_id)
        .await
        .map_err(|err| match err {
            ApiError::NotFound(_) => LoadError::StoryNotFound(story_id.clone()),
            other => LoadError::Fetch(other),
        })?;

    let story = Story::from(response);

    for dangling in story.dangling_targets() {
        warn!(from = %dangling.from, target = %dangling.target, "option targets a missing node");
    }
    info!(title = story.title(), nodes = story.node_count(), "story loaded");

    Ok(story)
}
