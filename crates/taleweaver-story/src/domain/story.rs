//! The story graph.

use std::collections::HashMap;

use taleweaver_core::api::{CompleteStoryResponse, NodeResponse, OptionResponse};
use taleweaver_core::ids::{NodeId, StoryId};
use tracing::warn;

use super::error::NavigationError;

/// A labelled edge from one node to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryOption {
    /// Label shown to the reader.
    pub text: String,
    /// Node this option leads to.
    pub target: NodeId,
}

/// A single narrative node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryNode {
    /// Node identifier.
    pub id: NodeId,
    /// Narrative text.
    pub content: String,
    /// Whether the node ends the story.
    pub is_ending: bool,
    /// Whether the ending is a winning one. Meaningless unless `is_ending`.
    pub is_winning_ending: bool,
    options: Vec<StoryOption>,
}

impl StoryNode {
    /// Creates a node.
    #[must_use]
    pub fn new(
        id: NodeId,
        content: impl Into<String>,
        is_ending: bool,
        is_winning_ending: bool,
        options: Vec<StoryOption>,
    ) -> Self {
        Self {
            id,
            content: content.into(),
            is_ending,
            is_winning_ending,
            options,
        }
    }

    /// Selectable options. Always empty for endings, whatever was stored.
    #[must_use]
    pub fn options(&self) -> &[StoryOption] {
        if self.is_ending { &[] } else { &self.options }
    }

    /// Options exactly as stored, including any attached to an ending.
    #[must_use]
    pub fn stored_options(&self) -> &[StoryOption] {
        &self.options
    }
}

/// An option whose target is missing from the story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingTarget {
    /// Node holding the option.
    pub from: NodeId,
    /// Missing target.
    pub target: NodeId,
}

/// A fully loaded, read-only story graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    id: StoryId,
    title: String,
    root_node_id: NodeId,
    nodes: HashMap<NodeId, StoryNode>,
}

impl Story {
    /// Creates a story. Nodes are keyed by their own id.
    #[must_use]
    pub fn new(
        id: StoryId,
        title: impl Into<String>,
        root_node_id: NodeId,
        nodes: impl IntoIterator<Item = StoryNode>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            root_node_id,
            nodes: nodes.into_iter().map(|node| (node.id.clone(), node)).collect(),
        }
    }

    /// Story identifier.
    #[must_use]
    pub fn id(&self) -> &StoryId {
        &self.id
    }

    /// Story title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The node the story starts at.
    #[must_use]
    pub fn root_node_id(&self) -> &NodeId {
        &self.root_node_id
    }

    /// Number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Looks up a node.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::NodeNotFound` if the story has no such node.
    pub fn node(&self, id: &NodeId) -> Result<&StoryNode, NavigationError> {
        self.nodes
            .get(id)
            .ok_or_else(|| NavigationError::NodeNotFound(id.clone()))
    }

    /// Every selectable option whose target is not part of the story,
    /// ordered by source node then target. Options stored on endings are
    /// not selectable and are skipped.
    #[must_use]
    pub fn dangling_targets(&self) -> Vec<DanglingTarget> {
        let mut dangling: Vec<DanglingTarget> = self
            .nodes
            .values()
            .flat_map(|node| {
                node.options()
                    .iter()
                    .filter(|option| !self.nodes.contains_key(&option.target))
                    .map(|option| DanglingTarget {
                        from: node.id.clone(),
                        target: option.target.clone(),
                    })
            })
            .collect();
        dangling.sort_by(|a, b| (&a.from, &a.target).cmp(&(&b.from, &b.target)));
        dangling
    }
}

impl From<OptionResponse> for StoryOption {
    fn from(option: OptionResponse) -> Self {
        Self {
            text: option.text,
            target: option.node_id,
        }
    }
}

impl From<NodeResponse> for StoryNode {
    fn from(node: NodeResponse) -> Self {
        let options = node
            .options
            .unwrap_or_default()
            .into_iter()
            .map(StoryOption::from)
            .collect();
        Self::new(
            node.id,
            node.content,
            node.is_ending,
            node.is_winning_ending,
            options,
        )
    }
}

impl From<CompleteStoryResponse> for Story {
    /// Only `all_nodes` populates the graph; `root_node` contributes its id.
    /// A root missing from `all_nodes` is surfaced later as `NodeNotFound`.
    ///
    /// Nodes are addressed by their `all_nodes` key. A node whose own id
    /// disagrees with its key takes the key as its id.
    fn from(response: CompleteStoryResponse) -> Self {
        let story_id = response.id;
        let nodes = response
            .all_nodes
            .into_iter()
            .map(|(key, node)| {
                let mut node = StoryNode::from(node);
                if node.id != key {
                    warn!(
                        story_id = %story_id,
                        key = %key,
                        node_id = %node.id,
                        "story node id differs from its key, using the key"
                    );
                    node.id = key;
                }
                node
            })
            .collect::<Vec<_>>();
        Self::new(story_id, response.title, response.root_node.id, nodes)
    }
}
