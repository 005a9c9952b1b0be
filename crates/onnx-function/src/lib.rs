#![doc = include_str!("../README.md")]

mod attr_builder;
mod defs;
mod error;
mod expand;
mod function;
mod inline;
mod reference;
mod registry;

pub mod ir;

pub use attr_builder::{IntoAttributeValue, make_attribute};
pub use defs::{mean_variance_normalization, register_standard_functions, softmax_grad};
pub use error::{FormalKind, FunctionError, Result};
pub use expand::{expand_function, internal_tensor_name};
pub use function::{AttrInit, Function, FunctionBuilder, NodeDef};
pub use inline::{InlineConfig, inline_functions};
pub use reference::parse_attribute_str;
pub use registry::FunctionRegistry;
