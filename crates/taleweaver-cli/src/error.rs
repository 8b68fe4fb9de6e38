//! Top-level error type for the terminal front end.

use taleweaver_client::ClientError;
use taleweaver_generation::domain::error::GenerationError;
use taleweaver_story::application::catalog::CatalogError;
use taleweaver_story::application::loader::LoadError;
use taleweaver_story::domain::error::NavigationError;
use thiserror::Error;

/// Anything that can end a command early.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable held an invalid value.
    #[error("configuration error: {0}")]
    Config(String),

    /// The story service client could not be set up.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Reading from or writing to the terminal failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Story generation failed or was cancelled.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// A story could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The story graph led somewhere it does not contain.
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    /// The story catalog could not be listed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
