//! HTTP client for the Taleweaver story service.
//!
//! Implements [`taleweaver_core::api::StoryApi`] over JSON/HTTP and maps
//! transport outcomes onto [`taleweaver_core::error::ApiError`] classes.

pub mod config;
pub mod error;
pub mod http;

pub use config::ClientConfig;
pub use error::ClientError;
pub use http::HttpStoryApi;
