//! Story graph navigation.
//!
//! The navigator owns nothing but a cursor. Everything shown to the reader
//! is derived on demand by [`view`], so there is no cached state to go
//! stale when the cursor moves.

use taleweaver_core::ids::NodeId;
use tracing::debug;

use super::error::NavigationError;
use super::story::{Story, StoryOption};

/// How a story ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// The reader reached a winning ending.
    Winning,
    /// The adventure ended without a win.
    Losing,
}

/// What the reader sees at one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeView<'a> {
    /// The node being viewed.
    pub node_id: &'a NodeId,
    /// Narrative text.
    pub content: &'a str,
    /// Whether the node ends the story.
    pub is_ending: bool,
    /// Whether the ending is a winning one.
    pub is_winning_ending: bool,
    /// Selectable options; empty for endings.
    pub options: &'a [StoryOption],
}

impl NodeView<'_> {
    /// Classifies the ending, or `None` if the story continues.
    #[must_use]
    pub fn ending(&self) -> Option<Ending> {
        match (self.is_ending, self.is_winning_ending) {
            (false, _) => None,
            (true, true) => Some(Ending::Winning),
            (true, false) => Some(Ending::Losing),
        }
    }
}

/// Derives the view of `story` at `cursor`.
///
/// # Errors
///
/// Returns `NavigationError::NodeNotFound` if `cursor` is not a node of
/// `story`.
pub fn view<'a>(story: &'a Story, cursor: &NodeId) -> Result<NodeView<'a>, NavigationError> {
    let node = story.node(cursor)?;
    Ok(NodeView {
        node_id: &node.id,
        content: &node.content,
        is_ending: node.is_ending,
        is_winning_ending: node.is_ending && node.is_winning_ending,
        options: node.options(),
    })
}

/// Walks a story graph one choice at a time.
///
/// No visited history is kept: graphs may contain cycles and revisiting a
/// node yields the same view as the first visit.
#[derive(Debug, Clone)]
pub struct StoryNavigator {
    story: Story,
    cursor: NodeId,
}

impl StoryNavigator {
    /// Takes ownership of `story` and positions the cursor at its root.
    #[must_use]
    pub fn new(story: Story) -> Self {
        let cursor = story.root_node_id().clone();
        Self { story, cursor }
    }

    /// The story being navigated.
    #[must_use]
    pub fn story(&self) -> &Story {
        &self.story
    }

    /// The node the cursor points at.
    #[must_use]
    pub fn cursor(&self) -> &NodeId {
        &self.cursor
    }

    /// Returns `true` while the cursor is at the story root.
    #[must_use]
    pub fn is_at_root(&self) -> bool {
        &self.cursor == self.story.root_node_id()
    }

    /// The view at the cursor.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::NodeNotFound` if the cursor points outside
    /// the story.
    pub fn current_view(&self) -> Result<NodeView<'_>, NavigationError> {
        view(&self.story, &self.cursor)
    }

    /// Moves the cursor to `target`.
    ///
    /// The target is not checked against the current node's options; callers
    /// pass targets taken from [`StoryNavigator::current_view`]. A target
    /// outside the story surfaces on the next view.
    pub fn select_option(&mut self, target: NodeId) {
        debug!(from = %self.cursor, to = %target, "selecting option");
        self.cursor = target;
    }

    /// Selects the option at `index` of the current view.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::NodeNotFound` if the cursor points outside
    /// the story, or `NavigationError::OptionOutOfRange` if there is no
    /// option at `index` (endings have none).
    pub fn choose(&mut self, index: usize) -> Result<(), NavigationError> {
        let current = self.current_view()?;
        let target = current
            .options
            .get(index)
            .map(|option| option.target.clone())
            .ok_or(NavigationError::OptionOutOfRange {
                index,
                available: current.options.len(),
            })?;
        self.select_option(target);
        Ok(())
    }

    /// Moves the cursor back to the story root.
    pub fn restart(&mut self) {
        debug!(story_id = %self.story.id(), "restarting story");
        self.cursor = self.story.root_node_id().clone();
    }
}
