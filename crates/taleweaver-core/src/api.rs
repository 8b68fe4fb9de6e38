//! Story service abstraction and its wire payloads.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ApiError;
use crate::ids::{JobId, NodeId, StoryId};
use crate::job::JobStatus;

/// Request body for submit-generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateStoryRequest {
    /// Theme the story should be generated around.
    pub theme: String,
}

/// Response to submit-generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResponse {
    /// The job tracking this generation.
    pub job_id: JobId,
    /// Status at submission time.
    pub status: JobStatus,
}

/// Response to fetch-job-status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatusResponse {
    /// Current job status.
    pub status: JobStatus,
    /// The generated story, once the job has completed.
    #[serde(default)]
    pub story_id: Option<StoryId>,
    /// Failure detail reported by the service.
    #[serde(default)]
    pub error: Option<String>,
}

/// A choice leading from one node to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionResponse {
    /// Label shown to the reader.
    pub text: String,
    /// Node the choice leads to.
    pub node_id: NodeId,
}

/// A single story node as delivered by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeResponse {
    /// Node identifier.
    pub id: NodeId,
    /// Narrative text.
    pub content: String,
    /// Whether the node ends the story.
    #[serde(default)]
    pub is_ending: bool,
    /// Whether the ending is a winning one.
    #[serde(default)]
    pub is_winning_ending: bool,
    /// Outgoing choices; the service may send `null` for endings.
    #[serde(default)]
    pub options: Option<Vec<OptionResponse>>,
}

/// Response to fetch-complete-story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteStoryResponse {
    /// Story identifier.
    pub id: StoryId,
    /// Story title.
    pub title: String,
    /// The node the story starts at.
    pub root_node: NodeResponse,
    /// Every node in the story, keyed by id.
    pub all_nodes: HashMap<NodeId, NodeResponse>,
}

/// One entry of list-stories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorySummary {
    /// Story identifier.
    pub id: StoryId,
    /// Story title.
    pub title: String,
    /// Creation time, when the service reports one.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// The opening node, used for previews.
    #[serde(default)]
    pub root_node: Option<NodeResponse>,
    /// Every node in the story, keyed by id.
    #[serde(default)]
    pub all_nodes: HashMap<NodeId, NodeResponse>,
}

impl StorySummary {
    /// Number of nodes in the story graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.all_nodes.len()
    }

    /// The first `max_chars` characters of the opening node's text.
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> String {
        self.root_node
            .as_ref()
            .map(|node| node.content.chars().take(max_chars).collect())
            .unwrap_or_default()
    }
}

/// Response to count-stories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryCount {
    /// Total number of stories.
    pub count: u64,
}

/// Accepts RFC 3339 timestamps as well as offset-less ones, which are
/// taken to be UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}

/// Contract of the remote story service.
///
/// Every call either yields the decoded payload or a classified
/// [`ApiError`].
#[async_trait]
pub trait StoryApi: Send + Sync {
    /// Submits a new generation request.
    async fn submit_generation(
        &self,
        request: &CreateStoryRequest,
    ) -> Result<JobResponse, ApiError>;

    /// Fetches the current status of a generation job.
    async fn fetch_job_status(&self, job_id: &JobId) -> Result<JobStatusResponse, ApiError>;

    /// Fetches a complete story graph.
    async fn fetch_complete_story(
        &self,
        story_id: &StoryId,
    ) -> Result<CompleteStoryResponse, ApiError>;

    /// Lists stories, skipping the first `skip` and returning at most `limit`.
    async fn list_stories(&self, skip: u64, limit: u64) -> Result<Vec<StorySummary>, ApiError>;

    /// Counts all stories.
    async fn count_stories(&self) -> Result<StoryCount, ApiError>;
}
