//! Attribute values
//!
//! This module contains the AttributeValue enum which represents the attributes
//! attached to nodes, including references to the formal attributes of an
//! enclosing function.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{Graph, TensorData};

/// Attribute type codes, matching `AttributeProto.AttributeType`.
///
/// The lowercase variant name doubles as the type tag of the `$<name>:<tag>`
/// reference grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum AttributeType {
    Float,
    Int,
    String,
    Tensor,
    Graph,
    Floats,
    Ints,
    Strings,
    Tensors,
    Graphs,
}

/// The value of an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Float32(f32),
    Float32s(Vec<f32>),
    Int64(i64),
    Int64s(Vec<i64>),
    String(String),
    Strings(Vec<String>),
    Tensor(TensorData),
    Tensors(Vec<TensorData>),
    Graph(Graph),
    Graphs(Vec<Graph>),
    /// Forwarded attribute: resolved against the call site's attribute `name`
    /// when the enclosing function is expanded.
    Reference { name: String, ty: AttributeType },
}

/// Attributes of a node, keyed by attribute name.
pub type Attributes = BTreeMap<String, AttributeValue>;

impl AttributeValue {
    /// Type code of the value. For a reference this is the expected type of the
    /// forwarded value.
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            AttributeValue::Float32(_) => AttributeType::Float,
            AttributeValue::Float32s(_) => AttributeType::Floats,
            AttributeValue::Int64(_) => AttributeType::Int,
            AttributeValue::Int64s(_) => AttributeType::Ints,
            AttributeValue::String(_) => AttributeType::String,
            AttributeValue::Strings(_) => AttributeType::Strings,
            AttributeValue::Tensor(_) => AttributeType::Tensor,
            AttributeValue::Tensors(_) => AttributeType::Tensors,
            AttributeValue::Graph(_) => AttributeType::Graph,
            AttributeValue::Graphs(_) => AttributeType::Graphs,
            AttributeValue::Reference { ty, .. } => *ty,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, AttributeValue::Reference { .. })
    }

    /// Name of the referenced formal attribute, if this is a reference.
    pub fn reference_name(&self) -> Option<&str> {
        match self {
            AttributeValue::Reference { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            AttributeValue::Float32(elem) => Some(*elem),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Int64(elem) => Some(*elem),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn as_tensor(&self) -> Option<&TensorData> {
        match self {
            AttributeValue::Tensor(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn as_graph(&self) -> Option<&Graph> {
        match self {
            AttributeValue::Graph(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn as_f32s(&self) -> Option<&[f32]> {
        match self {
            AttributeValue::Float32s(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn as_i64s(&self) -> Option<&[i64]> {
        match self {
            AttributeValue::Int64s(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            AttributeValue::Strings(elem) => Some(elem),
            _ => None,
        }
    }
}

/// A named attribute, as produced by [`make_attribute`](crate::make_attribute).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: AttributeValue,
}

impl Attribute {
    pub fn attribute_type(&self) -> AttributeType {
        self.value.attribute_type()
    }
}
