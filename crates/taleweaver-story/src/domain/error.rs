//! Navigation error types.

use taleweaver_core::ids::NodeId;
use thiserror::Error;

/// Failure while walking a story graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// The cursor points at a node the story does not contain. This is a
    /// defect in the story data and must not be retried.
    #[error("story node not found: {0}")]
    NodeNotFound(NodeId),

    /// A choice was made by position and no option sits at that position.
    #[error("option {index} is out of range ({available} available)")]
    OptionOutOfRange {
        /// Requested position.
        index: usize,
        /// Number of selectable options.
        available: usize,
    },
}
