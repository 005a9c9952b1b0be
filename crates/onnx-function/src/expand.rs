//! Function expansion
//!
//! Expanding a call site appends a renamed copy of the function body to a target
//! graph:
//!
//! - formal inputs/outputs are replaced by the call site's actual tensor names,
//!   bound by position;
//! - every other tensor name of the body is internal to this expansion and is
//!   rewritten to `Func_<node name>_<name>`, where the node name is the call
//!   site's name or, for an unnamed call site, the function name followed by the
//!   uniqueness scope;
//! - attribute references are replaced by the call site's attribute of the
//!   referenced name, or dropped when the call site does not set it.
//!
//! ```text
//! F(x, y) -> z { tmp = Add(x, y); z = Mul(tmp) {alpha: $k:float} }
//!
//! Add2(a, b) -> c {k: 2.0}, scope "p1"
//!   => Func_Fp1_tmp = Add(a, b)
//!      c = Mul(Func_Fp1_tmp) {alpha: 2.0}
//! ```
//!
//! All bindings are checked before the first node is appended, so a failed
//! expansion leaves the graph as it was. Callers should still treat expansion as
//! non-transactional and discard the graph on error.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{FormalKind, FunctionError, Result};
use crate::function::Function;
use crate::ir::{AttributeValue, Graph, Node};

static NEXT_SCOPE: AtomicUsize = AtomicUsize::new(0);

/// Name of an internal tensor of the expansion for `node_name`.
pub fn internal_tensor_name(node_name: &str, internal_name: &str) -> String {
    format!("Func_{node_name}_{internal_name}")
}

/// Scope used when the caller does not supply a prefix.
///
/// Unique within the process only; not reproducible across runs.
fn fallback_scope() -> String {
    format!("__{}", NEXT_SCOPE.fetch_add(1, Ordering::Relaxed))
}

/// Expand `call_site`, an invocation of `function`, into `graph`.
///
/// `prefix` is the uniqueness scope for internal tensor names; when `None` or
/// empty a process-local counter is used instead. Supply a prefix whenever the
/// result must be reproducible.
pub fn expand_function(
    call_site: &Node,
    function: &Function,
    graph: &mut Graph,
    prefix: Option<&str>,
) -> Result<()> {
    let scope = match prefix {
        Some(prefix) if !prefix.is_empty() => prefix.to_string(),
        _ => fallback_scope(),
    };
    let node_name = match &call_site.name {
        Some(name) => name.clone(),
        None => format!("{}{}", function.name, scope),
    };

    log::debug!(
        "Expanding {} as {node_name} ({} body nodes)",
        function.name,
        function.nodes.len()
    );

    let input_map = bind_positional(
        &node_name,
        FormalKind::Input,
        &function.inputs,
        &call_site.inputs,
    )?;
    let output_map = bind_positional(
        &node_name,
        FormalKind::Output,
        &function.outputs,
        &call_site.outputs,
    )?;
    let attr_map: HashMap<&str, &AttributeValue> = call_site
        .attrs
        .iter()
        .map(|(name, value)| (name.as_str(), value))
        .collect();

    log_unused_attributes(call_site, function);

    for body_node in &function.nodes {
        let mut new_node = body_node.template();
        if let Some(name) = &body_node.name {
            new_node.name = Some(format!("{node_name}_{name}"));
        }

        new_node.inputs = body_node
            .inputs
            .iter()
            .map(|input| rename_tensor(&node_name, &input_map, input))
            .collect();
        new_node.outputs = body_node
            .outputs
            .iter()
            .map(|output| rename_tensor(&node_name, &output_map, output))
            .collect();

        for (attr_name, value) in &body_node.attrs {
            match value {
                AttributeValue::Reference { name, .. } => match attr_map.get(name.as_str()) {
                    Some(bound) => {
                        new_node.attrs.insert(attr_name.clone(), (*bound).clone());
                    }
                    None => log::trace!(
                        "{node_name}: {} attribute {attr_name} not set by call site, omitted",
                        body_node.op_type
                    ),
                },
                literal => {
                    new_node.attrs.insert(attr_name.clone(), literal.clone());
                }
            }
        }

        log::trace!(
            "{node_name}: {}({:?}) -> {:?}",
            new_node.op_type,
            new_node.inputs,
            new_node.outputs
        );
        graph.add_node(new_node);
    }

    Ok(())
}

fn bind_positional<'a>(
    node_name: &str,
    kind: FormalKind,
    formals: &'a [String],
    actuals: &'a [String],
) -> Result<HashMap<&'a str, &'a str>> {
    let mut map = HashMap::with_capacity(actuals.len());

    for (index, actual) in actuals.iter().enumerate() {
        let formal = formals
            .get(index)
            .ok_or_else(|| FunctionError::OutOfBoundsBinding {
                node: node_name.to_string(),
                kind,
                index,
                arity: formals.len(),
            })?;
        map.insert(formal.as_str(), actual.as_str());
    }

    Ok(map)
}

fn rename_tensor(node_name: &str, bound: &HashMap<&str, &str>, name: &str) -> String {
    if let Some(actual) = bound.get(name) {
        return actual.to_string();
    }
    // An empty name marks an omitted optional input or output.
    if name.is_empty() {
        return String::new();
    }
    internal_tensor_name(node_name, name)
}

fn log_unused_attributes(call_site: &Node, function: &Function) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }

    let referenced = function.referenced_attributes();
    for name in call_site.attrs.keys() {
        if !referenced.contains_key(name.as_str()) {
            log::debug!(
                "Call site attribute {name} is not used by function {}",
                function.name
            );
        }
    }
}
