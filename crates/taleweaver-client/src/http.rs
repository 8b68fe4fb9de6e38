//! `StoryApi` over JSON/HTTP.

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use taleweaver_core::api::{
    CompleteStoryResponse, CreateStoryRequest, JobResponse, JobStatusResponse, StoryApi,
    StoryCount, StorySummary,
};
use taleweaver_core::error::ApiError;
use taleweaver_core::ids::{JobId, StoryId};
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Error body returned by the story service.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Story service client.
#[derive(Debug, Clone)]
pub struct HttpStoryApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpStoryApi {
    /// Builds a client for the configured service.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Build` if the HTTP client cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// The service base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "story service responded");

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(response.url().path().to_owned()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(parsed) => parsed.detail,
                Err(_) if body.is_empty() => {
                    status.canonical_reason().unwrap_or_default().to_owned()
                }
                Err(_) => body,
            };
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl StoryApi for HttpStoryApi {
    #[instrument(skip(self, request), fields(theme = %request.theme))]
    async fn submit_generation(
        &self,
        request: &CreateStoryRequest,
    ) -> Result<JobResponse, ApiError> {
        let url = self.endpoint(&["stories", "create"]);
        self.send(self.client.post(url).json(request)).await
    }

    #[instrument(skip(self), fields(job_id = %job_id))]
    async fn fetch_job_status(&self, job_id: &JobId) -> Result<JobStatusResponse, ApiError> {
        let url = self.endpoint(&["jobs", job_id.as_str()]);
        self.send(self.client.get(url)).await
    }

    #[instrument(skip(self), fields(story_id = %story_id))]
    async fn fetch_complete_story(
        &self,
        story_id: &StoryId,
    ) -> Result<CompleteStoryResponse, ApiError> {
        let url = self.endpoint(&["stories", story_id.as_str(), "complete"]);
        self.send(self.client.get(url)).await
    }

    #[instrument(skip(self))]
    async fn list_stories(&self, skip: u64, limit: u64) -> Result<Vec<StorySummary>, ApiError> {
        let url = self.endpoint(&["stories"]);
        let request = self
            .client
            .get(url)
            .query(&[("skip", skip), ("limit", limit)]);
        self.send(request).await
    }

    #[instrument(skip(self))]
    async fn count_stories(&self) -> Result<StoryCount, ApiError> {
        let url = self.endpoint(&["stories", "count"]);
        self.send(self.client.get(url)).await
    }
}
