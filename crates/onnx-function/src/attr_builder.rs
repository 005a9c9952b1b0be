//! Constructors for concrete attribute values.

use crate::ir::{Attribute, AttributeValue, Graph, TensorData};

/// Conversion of a primitive, tensor or subgraph value (or a vector of them) into
/// a concrete [`AttributeValue`].
pub trait IntoAttributeValue {
    fn into_attribute_value(self) -> AttributeValue;
}

macro_rules! impl_into_attribute_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl IntoAttributeValue for $ty {
                fn into_attribute_value(self) -> AttributeValue {
                    AttributeValue::$variant(self)
                }
            }
        )*
    };
}

impl_into_attribute_value! {
    f32 => Float32,
    i64 => Int64,
    String => String,
    TensorData => Tensor,
    Graph => Graph,
    Vec<f32> => Float32s,
    Vec<i64> => Int64s,
    Vec<String> => Strings,
    Vec<TensorData> => Tensors,
    Vec<Graph> => Graphs,
}

impl IntoAttributeValue for &str {
    fn into_attribute_value(self) -> AttributeValue {
        AttributeValue::String(self.to_string())
    }
}

impl IntoAttributeValue for Vec<&str> {
    fn into_attribute_value(self) -> AttributeValue {
        AttributeValue::Strings(self.into_iter().map(str::to_string).collect())
    }
}

impl IntoAttributeValue for AttributeValue {
    fn into_attribute_value(self) -> AttributeValue {
        self
    }
}

/// Build a named attribute from any supported value.
///
/// ```
/// use onnx_function::{make_attribute, ir::AttributeType};
///
/// let axes = make_attribute("axes", vec![0i64, 2]);
/// assert_eq!(axes.attribute_type(), AttributeType::Ints);
/// ```
pub fn make_attribute(name: impl Into<String>, value: impl IntoAttributeValue) -> Attribute {
    Attribute {
        name: name.into(),
        value: value.into_attribute_value(),
    }
}
