//! Story fixtures.

use std::collections::HashMap;

use taleweaver_core::api::{CompleteStoryResponse, NodeResponse, OptionResponse, StorySummary};
use taleweaver_core::ids::{NodeId, StoryId};

/// Builds `CompleteStoryResponse` payloads node by node.
///
/// The first node added is the root unless [`StoryBuilder::root`] says
/// otherwise.
#[derive(Debug)]
pub struct StoryBuilder {
    id: StoryId,
    title: String,
    root: Option<NodeId>,
    nodes: Vec<NodeResponse>,
}

impl StoryBuilder {
    /// Starts a story with the given id and title.
    #[must_use]
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: StoryId::from(id),
            title: title.to_owned(),
            root: None,
            nodes: Vec::new(),
        }
    }

    /// Adds a non-ending node.
    #[must_use]
    pub fn node(mut self, id: &str, content: &str) -> Self {
        self.nodes.push(NodeResponse {
            id: NodeId::from(id),
            content: content.to_owned(),
            is_ending: false,
            is_winning_ending: false,
            options: Some(Vec::new()),
        });
        self
    }

    /// Adds an ending node.
    #[must_use]
    pub fn ending(mut self, id: &str, content: &str, winning: bool) -> Self {
        self.nodes.push(NodeResponse {
            id: NodeId::from(id),
            content: content.to_owned(),
            is_ending: true,
            is_winning_ending: winning,
            options: None,
        });
        self
    }

    /// Adds a choice from node `from` to node `to`. The target does not
    /// need to exist, which allows building dangling references.
    ///
    /// # Panics
    ///
    /// Panics if `from` has not been added yet.
    #[must_use]
    pub fn option(mut self, from: &str, text: &str, to: &str) -> Self {
        let node = self
            .nodes
            .iter_mut()
            .find(|node| node.id.as_str() == from)
            .unwrap_or_else(|| panic!("StoryBuilder::option: unknown node {from}"));
        node.options.get_or_insert_with(Vec::new).push(OptionResponse {
            text: text.to_owned(),
            node_id: NodeId::from(to),
        });
        self
    }

    /// Overrides the root node id. The id does not need to exist.
    #[must_use]
    pub fn root(mut self, id: &str) -> Self {
        self.root = Some(NodeId::from(id));
        self
    }

    /// Produces the payload.
    ///
    /// # Panics
    ///
    /// Panics if no node was added and no root was set.
    #[must_use]
    pub fn build(self) -> CompleteStoryResponse {
        let root_id = self
            .root
            .or_else(|| self.nodes.first().map(|node| node.id.clone()))
            .expect("StoryBuilder::build: story has no nodes");
        let root_node = self
            .nodes
            .iter()
            .find(|node| node.id == root_id)
            .cloned()
            .unwrap_or_else(|| NodeResponse {
                id: root_id.clone(),
                content: String::new(),
                is_ending: false,
                is_winning_ending: false,
                options: None,
            });
        let all_nodes: HashMap<NodeId, NodeResponse> = self
            .nodes
            .into_iter()
            .map(|node| (node.id.clone(), node))
            .collect();

        CompleteStoryResponse {
            id: self.id,
            title: self.title,
            root_node,
            all_nodes,
        }
    }
}

/// The reference story: root `n0` offers "Flee" (to `n1`) and "Fight" (to
/// `n2`); `n1` loops back to `n0` or leads to the winning ending `n3`, whose
/// stored options must be ignored; `n2` is a losing ending.
#[must_use]
pub fn pirate_story() -> CompleteStoryResponse {
    StoryBuilder::new("s1", "The Pirate Cove")
        .node("n0", "Pirates swarm over the rail of your ship.")
        .node("n1", "You row into the fog, oars muffled.")
        .ending("n2", "The pirates overwhelm you.", false)
        .ending("n3", "You find the captain's buried treasure.", true)
        .option("n0", "Flee", "n1")
        .option("n0", "Fight", "n2")
        .option("n1", "Return to the ship", "n0")
        .option("n1", "Hide in the cove", "n3")
        .option("n3", "Keep digging", "n0")
        .build()
}

/// A list-stories entry built from a complete story.
#[must_use]
pub fn summary(story: &CompleteStoryResponse) -> StorySummary {
    StorySummary {
        id: story.id.clone(),
        title: story.title.clone(),
        created_at: None,
        root_node: Some(story.root_node.clone()),
        all_nodes: story.all_nodes.clone(),
    }
}
