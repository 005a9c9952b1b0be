//! Whole-graph inlining
//!
//! Replaces every call site of a registered function by its expansion. Function
//! bodies may themselves call registered functions; those are expanded in turn,
//! each nested expansion scoped under the prefix of the one that produced it.

use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::error::{FunctionError, Result};
use crate::expand::expand_function;
use crate::function::Function;
use crate::ir::{Graph, Node};
use crate::registry::FunctionRegistry;

/// Configuration of [`inline_functions`].
#[derive(Debug, Clone, PartialEq, Eq, new, Serialize, Deserialize)]
#[serde(default)]
pub struct InlineConfig {
    /// Domain used for call sites that do not name one.
    pub domain: String,
    /// Opset version of the graph; functions newer than this are not used.
    pub opset_version: usize,
    /// Deepest allowed chain of nested expansions.
    pub max_depth: usize,
}

impl Default for InlineConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            opset_version: usize::MAX,
            max_depth: 16,
        }
    }
}

/// Return a copy of `graph` in which every node that resolves to a function in
/// `registry` is replaced by its (recursively inlined) expansion.
///
/// The call site at position `i` is expanded with prefix `_n{i}`; a call site at
/// position `j` inside that expansion gets `_n{i}_n{j}`, and so on.
pub fn inline_functions(
    graph: &Graph,
    registry: &FunctionRegistry,
    config: &InlineConfig,
) -> Result<Graph> {
    let mut inlined = Graph {
        name: graph.name.clone(),
        nodes: Vec::with_capacity(graph.nodes.len()),
    };
    let mut call_stack = Vec::new();

    inline_nodes(
        &graph.nodes,
        "",
        registry,
        config,
        &mut call_stack,
        &mut inlined,
    )?;

    log::debug!(
        "Inlined graph {:?}: {} nodes -> {} nodes",
        graph.name,
        graph.nodes.len(),
        inlined.nodes.len()
    );

    Ok(inlined)
}

fn inline_nodes(
    nodes: &[Node],
    scope: &str,
    registry: &FunctionRegistry,
    config: &InlineConfig,
    call_stack: &mut Vec<String>,
    target: &mut Graph,
) -> Result<()> {
    for (index, node) in nodes.iter().enumerate() {
        let domain = node.domain.as_deref().unwrap_or(&config.domain);
        let Some(function) = registry.get(&node.op_type, config.opset_version, domain) else {
            target.add_node(node.clone());
            continue;
        };

        let qualified = qualified_name(function);
        if call_stack.contains(&qualified) {
            let mut chain = call_stack.clone();
            chain.push(qualified);
            return Err(FunctionError::RecursiveFunction { chain });
        }
        if call_stack.len() >= config.max_depth {
            return Err(FunctionError::InlineDepthExceeded {
                max_depth: config.max_depth,
            });
        }

        let prefix = format!("{scope}_n{index}");
        let mut expanded = Graph::new();
        expand_function(node, function, &mut expanded, Some(prefix.as_str()))?;

        call_stack.push(qualified);
        inline_nodes(
            &expanded.nodes,
            &prefix,
            registry,
            config,
            call_stack,
            target,
        )?;
        call_stack.pop();
    }

    Ok(())
}

/// `domain::name`, or just `name` in the default domain.
fn qualified_name(function: &Function) -> String {
    if function.domain.is_empty() {
        function.name.clone()
    } else {
        format!("{}::{}", function.domain, function.name)
    }
}
