use strum::Display;

use crate::ir::AttributeType;

/// Which side of a signature a formal or actual belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FormalKind {
    Input,
    Output,
    Attribute,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FunctionError {
    /// The call site supplies more positional actuals than the function declares.
    #[error("{kind} {index} for function node {node} is out of bounds (function declares {arity})")]
    OutOfBoundsBinding {
        node: String,
        kind: FormalKind,
        index: usize,
        arity: usize,
    },

    #[error("malformed attribute reference '{value}': unknown type tag '{tag}'")]
    MalformedReference { value: String, tag: String },

    #[error("function {function}: duplicate {kind} name '{name}'")]
    DuplicateFormal {
        function: String,
        kind: FormalKind,
        name: String,
    },

    #[error(
        "function {function}: attribute '{name}' is referenced both as {first} and as {second}"
    )]
    ConflictingReferenceType {
        function: String,
        name: String,
        first: AttributeType,
        second: AttributeType,
    },

    #[error("function {function}: {op_type} node sets attribute '{name}' more than once")]
    DuplicateNodeAttribute {
        function: String,
        op_type: String,
        name: String,
    },

    #[error("function {function}: reference to undeclared attribute '{name}'")]
    UnknownFormalAttribute { function: String, name: String },

    #[error("function {name} version {version} is already registered in domain '{domain}'")]
    DuplicateFunction {
        domain: String,
        name: String,
        version: usize,
    },

    #[error("recursive function call: {}", .chain.join(" -> "))]
    RecursiveFunction { chain: Vec<String> },

    #[error("function inlining exceeded the maximum depth of {max_depth}")]
    InlineDepthExceeded { max_depth: usize },
}

pub type Result<T> = core::result::Result<T, FunctionError>;
