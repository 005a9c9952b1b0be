//! Node representation
//!
//! A [`Node`] is used both for the body of a function and for the call site
//! that invokes it: inputs and outputs are tensor names, attributes are keyed by name.

use serde::{Deserialize, Serialize};

use super::attribute::{AttributeValue, Attributes};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// The operator type, e.g. `Add`, or the name of a function for a call site.
    pub op_type: String,

    /// Operator set domain. `None` is the default ONNX domain.
    pub domain: Option<String>,

    /// Explicit node name.
    pub name: Option<String>,

    /// Input tensor names, in positional order. An empty name is an omitted optional input.
    pub inputs: Vec<String>,

    /// Output tensor names, in positional order.
    pub outputs: Vec<String>,

    pub attrs: Attributes,

    pub doc_string: Option<String>,
}

impl Node {
    pub fn new(op_type: impl Into<String>) -> Self {
        Self {
            op_type: op_type.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = outputs.into_iter().map(Into::into).collect();
        self
    }

    /// Set an attribute, replacing any previous value under the same name.
    pub fn with_attr(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attrs.insert(name.into(), value);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&AttributeValue> {
        self.attrs.get(name)
    }

    /// Copy of this node with inputs, outputs and attributes cleared.
    ///
    /// Used as the template for expanded nodes: the op type, domain, name and
    /// doc string carry over.
    pub(crate) fn template(&self) -> Self {
        Self {
            op_type: self.op_type.clone(),
            domain: self.domain.clone(),
            name: self.name.clone(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            attrs: Attributes::new(),
            doc_string: self.doc_string.clone(),
        }
    }
}
