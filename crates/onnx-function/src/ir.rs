//! IR substrate shared by function definitions and the graphs they expand into.
//!
//! The types here mirror the ONNX protobuf messages (`NodeProto`, `GraphProto`,
//! `AttributeProto`) closely enough for function bodies to be written against them,
//! without tying the crate to the wire format.

mod attribute;
mod graph;
mod node;

pub use attribute::{Attribute, AttributeType, AttributeValue, Attributes};
pub use graph::Graph;
pub use node::Node;

use burn_tensor::Element;
use serde::{Deserialize, Serialize};

/// Tensor payload carried by `tensor`/`tensors` attributes.
///
/// Wraps burn-tensor's [`TensorData`](burn_tensor::TensorData) so attribute values can be
/// compared structurally (dtype, shape and raw bytes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensorData {
    /// Underlying burn-tensor data
    #[serde(flatten)]
    pub inner: burn_tensor::TensorData,
}

impl TensorData {
    /// Create new TensorData from vector
    pub fn new<E: Element>(data: Vec<E>, shape: Vec<usize>) -> Self {
        Self {
            inner: burn_tensor::TensorData::new(data, shape),
        }
    }

    /// Rank-0 tensor holding a single value.
    pub fn scalar<E: Element>(value: E) -> Self {
        Self::new(vec![value], vec![])
    }

    /// Get the shape
    pub fn shape(&self) -> &[usize] {
        &self.inner.shape
    }

    /// Get data as Vec (copying)
    pub fn to_vec<E: Element>(&self) -> Result<Vec<E>, burn_tensor::DataError> {
        self.inner.to_vec()
    }
}

impl PartialEq for TensorData {
    fn eq(&self, other: &Self) -> bool {
        self.inner.dtype == other.inner.dtype
            && self.inner.shape == other.inner.shape
            && self.inner.as_bytes() == other.inner.as_bytes()
    }
}

impl From<burn_tensor::TensorData> for TensorData {
    fn from(inner: burn_tensor::TensorData) -> Self {
        Self { inner }
    }
}
