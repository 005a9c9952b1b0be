use serde::{Deserialize, Serialize};

use super::node::Node;

/// An ordered list of nodes, the target of function expansion.
///
/// Also used as the payload of `graph`/`graphs` attributes. Concurrent writers
/// must serialize appends themselves (e.g. behind a `Mutex<Graph>`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub name: Option<String>,
    pub nodes: Vec<Node>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            nodes: Vec::new(),
        }
    }

    /// Append `node` and return a handle to it.
    pub fn add_node(&mut self, node: Node) -> &mut Node {
        self.nodes.push(node);
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every tensor name read or written by a node of the graph.
    pub fn tensor_names(&self) -> impl Iterator<Item = &str> {
        self.nodes
            .iter()
            .flat_map(|node| node.inputs.iter().chain(node.outputs.iter()))
            .map(String::as_str)
    }
}
