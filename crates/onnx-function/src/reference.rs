//! Textual attribute values used when writing function bodies.
//!
//! A body attribute given as text is either a literal string, or a reference
//! `$<name>:<tag>` to the formal attribute `<name>` of the enclosing function,
//! where `<tag>` is one of `float`, `int`, `string`, `tensor`, `graph` or their
//! plural forms. References are resolved against the call site at expansion time.
//!
//! Any other text starting with `$`, apart from a lone `$`, is rejected.

use std::str::FromStr;

use crate::error::{FunctionError, Result};
use crate::ir::{AttributeType, AttributeValue};

/// Classify `value` as a literal string or a forwarded reference.
///
/// ```
/// use onnx_function::parse_attribute_str;
/// use onnx_function::ir::{AttributeType, AttributeValue};
///
/// let value = parse_attribute_str("$alpha:float").unwrap();
/// assert_eq!(
///     value,
///     AttributeValue::Reference { name: "alpha".into(), ty: AttributeType::Float }
/// );
/// assert_eq!(parse_attribute_str("$").unwrap(), AttributeValue::String("$".into()));
/// ```
pub fn parse_attribute_str(value: &str) -> Result<AttributeValue> {
    let Some(rest) = value.strip_prefix('$').filter(|_| value.len() >= 2) else {
        return Ok(AttributeValue::String(value.to_string()));
    };

    let Some((name, tag)) = rest.split_once(':') else {
        return Err(FunctionError::MalformedReference {
            value: value.to_string(),
            tag: rest.to_string(),
        });
    };

    let ty = AttributeType::from_str(tag).map_err(|_| FunctionError::MalformedReference {
        value: value.to_string(),
        tag: tag.to_string(),
    })?;

    Ok(AttributeValue::Reference {
        name: name.to_string(),
        ty,
    })
}
