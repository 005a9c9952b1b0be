//! Function definitions
//!
//! A [`Function`] is a named, versioned subgraph with formal inputs, outputs and
//! attributes. Bodies are described with [`NodeDef`]s and assembled by
//! [`Function::define`] (or the fluent [`FunctionBuilder`]), which validates the
//! signature and parses attribute references up front so that malformed bodies
//! never reach expansion.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::attr_builder::IntoAttributeValue;
use crate::error::{FormalKind, FunctionError, Result};
use crate::ir::{AttributeType, AttributeValue, Node, TensorData};
use crate::reference::parse_attribute_str;

/// A reusable, parameterized subgraph.
///
/// Immutable once defined; expansions only ever read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub since_version: usize,
    /// Operator set domain the function is registered under. Empty is the default domain.
    pub domain: String,
    pub doc_string: Option<String>,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub attributes: Vec<String>,
    pub nodes: Vec<Node>,
}

impl Function {
    /// Assemble a function from its signature and body.
    ///
    /// Fails when a formal name is repeated within `inputs`, `outputs` or
    /// `attributes`, when a body node sets the same attribute twice, or when an
    /// attribute reference is malformed, names an attribute not in `attributes`,
    /// or is used with two different type tags.
    pub fn define<S: Into<String>>(
        name: impl Into<String>,
        since_version: usize,
        inputs: impl IntoIterator<Item = S>,
        outputs: impl IntoIterator<Item = S>,
        attributes: impl IntoIterator<Item = S>,
        node_defs: Vec<NodeDef>,
    ) -> Result<Self> {
        let name = name.into();
        let inputs = collect_formals(&name, FormalKind::Input, inputs)?;
        let outputs = collect_formals(&name, FormalKind::Output, outputs)?;
        let attributes = collect_formals(&name, FormalKind::Attribute, attributes)?;

        let mut nodes = Vec::with_capacity(node_defs.len());
        for def in node_defs {
            nodes.push(def.into_node(&name)?);
        }

        check_references(&name, &attributes, &nodes)?;

        log::debug!(
            "Defined function {name} (since version {since_version}) with {} body nodes",
            nodes.len()
        );

        Ok(Self {
            name,
            since_version,
            domain: String::new(),
            doc_string: None,
            inputs,
            outputs,
            attributes,
            nodes,
        })
    }

    /// Formal attributes referenced by the body, with their expected types.
    pub fn referenced_attributes(&self) -> HashMap<&str, AttributeType> {
        self.nodes
            .iter()
            .flat_map(|node| node.attrs.values())
            .filter_map(|value| match value {
                AttributeValue::Reference { name, ty } => Some((name.as_str(), *ty)),
                _ => None,
            })
            .collect()
    }
}

fn collect_formals<S: Into<String>>(
    function: &str,
    kind: FormalKind,
    names: impl IntoIterator<Item = S>,
) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut formals = Vec::new();

    for name in names {
        let name = name.into();
        if !seen.insert(name.clone()) {
            return Err(FunctionError::DuplicateFormal {
                function: function.to_string(),
                kind,
                name,
            });
        }
        formals.push(name);
    }

    Ok(formals)
}

fn check_references(function: &str, attributes: &[String], nodes: &[Node]) -> Result<()> {
    let mut seen: HashMap<&str, AttributeType> = HashMap::new();

    for value in nodes.iter().flat_map(|node| node.attrs.values()) {
        let AttributeValue::Reference { name, ty } = value else {
            continue;
        };

        if !attributes.iter().any(|formal| formal == name) {
            return Err(FunctionError::UnknownFormalAttribute {
                function: function.to_string(),
                name: name.clone(),
            });
        }

        match seen.get(name.as_str()) {
            Some(first) if first != ty => {
                return Err(FunctionError::ConflictingReferenceType {
                    function: function.to_string(),
                    name: name.clone(),
                    first: *first,
                    second: *ty,
                });
            }
            Some(_) => {}
            None => {
                seen.insert(name.as_str(), *ty);
            }
        }
    }

    Ok(())
}

/// Source of a body attribute: a concrete value, or text parsed with the
/// `$<name>:<tag>` reference grammar when the function is defined.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrInit {
    Value(AttributeValue),
    Text(String),
}

impl From<&str> for AttrInit {
    fn from(text: &str) -> Self {
        AttrInit::Text(text.to_string())
    }
}

impl From<String> for AttrInit {
    fn from(text: String) -> Self {
        AttrInit::Text(text)
    }
}

impl AttrInit {
    /// Wrap a concrete value, bypassing the reference grammar.
    pub fn value(value: impl IntoAttributeValue) -> Self {
        AttrInit::Value(value.into_attribute_value())
    }

    fn resolve(self) -> Result<AttributeValue> {
        match self {
            AttrInit::Value(value) => Ok(value),
            AttrInit::Text(text) => parse_attribute_str(&text),
        }
    }
}

/// Description of one body node: `{outputs} = op_type(inputs) {attributes}`.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDef {
    pub outputs: Vec<String>,
    pub op_type: String,
    pub inputs: Vec<String>,
    pub attributes: Vec<(String, AttrInit)>,
    pub domain: Option<String>,
    pub name: Option<String>,
}

impl NodeDef {
    pub fn new<S: Into<String>>(
        outputs: impl IntoIterator<Item = S>,
        op_type: impl Into<String>,
        inputs: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            outputs: outputs.into_iter().map(Into::into).collect(),
            op_type: op_type.into(),
            inputs: inputs.into_iter().map(Into::into).collect(),
            attributes: Vec::new(),
            domain: None,
            name: None,
        }
    }

    /// A `Constant` node producing `output` from a tensor `value` attribute.
    pub fn constant(output: impl Into<String>, value: TensorData) -> Self {
        Self::new([output.into()], "Constant", Vec::<String>::new())
            .attr("value", AttrInit::value(value))
    }

    /// Add an attribute. Text values go through the reference grammar; pass
    /// [`AttrInit::value`] for a literal that must not be parsed.
    pub fn attr(mut self, name: impl Into<String>, init: impl Into<AttrInit>) -> Self {
        self.attributes.push((name.into(), init.into()));
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn into_node(self, function: &str) -> Result<Node> {
        let mut node = Node {
            op_type: self.op_type,
            domain: self.domain,
            name: self.name,
            inputs: self.inputs,
            outputs: self.outputs,
            ..Default::default()
        };

        for (name, init) in self.attributes {
            if node.attrs.contains_key(&name) {
                return Err(FunctionError::DuplicateNodeAttribute {
                    function: function.to_string(),
                    op_type: node.op_type,
                    name,
                });
            }
            node.attrs.insert(name, init.resolve()?);
        }

        Ok(node)
    }
}

/// Fluent front-end over [`Function::define`].
#[derive(Debug, Clone, Default)]
pub struct FunctionBuilder {
    name: String,
    since_version: usize,
    domain: String,
    doc_string: Option<String>,
    inputs: Vec<String>,
    outputs: Vec<String>,
    attributes: Vec<String>,
    nodes: Vec<NodeDef>,
}

impl FunctionBuilder {
    pub fn new(name: impl Into<String>, since_version: usize) -> Self {
        Self {
            name: name.into(),
            since_version,
            ..Default::default()
        }
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn doc_string(mut self, doc: impl Into<String>) -> Self {
        self.doc_string = Some(doc.into());
        self
    }

    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(name.into());
        self
    }

    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(name.into());
        self
    }

    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(name.into());
        self
    }

    pub fn node(mut self, def: NodeDef) -> Self {
        self.nodes.push(def);
        self
    }

    pub fn build(self) -> Result<Function> {
        let mut function = Function::define(
            self.name,
            self.since_version,
            self.inputs,
            self.outputs,
            self.attributes,
            self.nodes,
        )?;
        function.domain = self.domain;
        function.doc_string = self.doc_string;
        Ok(function)
    }
}
