//! Function definitions for operators expressed as compositions of primitives.

use crate::error::Result;
use crate::function::{Function, FunctionBuilder, NodeDef};
use crate::ir::TensorData;
use crate::registry::FunctionRegistry;

/// `MeanVarianceNormalization` (since version 9): `(X - E[X]) / (sqrt(E[X^2] - E[X]^2) + eps)`
/// over the axes given by the `axes` attribute.
pub fn mean_variance_normalization() -> Result<Function> {
    FunctionBuilder::new("MeanVarianceNormalization", 9)
        .doc_string("Mean variance normalization over the given axes.")
        .input("X")
        .output("X_MVN")
        .attribute("axes")
        .node(NodeDef::constant("Exponent", TensorData::scalar(2.0f32)))
        .node(NodeDef::constant("Epsilon", TensorData::scalar(1e-9f32)))
        .node(NodeDef::new(["X_RM"], "ReduceMean", ["X"]).attr("axes", "$axes:ints"))
        .node(NodeDef::new(["EX_squared"], "Pow", ["X_RM", "Exponent"]))
        .node(NodeDef::new(["X_squared"], "Pow", ["X", "Exponent"]))
        .node(
            NodeDef::new(["E_Xsquared"], "ReduceMean", ["X_squared"]).attr("axes", "$axes:ints"),
        )
        .node(NodeDef::new(["Variance"], "Sub", ["E_Xsquared", "EX_squared"]))
        .node(NodeDef::new(["STD"], "Sqrt", ["Variance"]))
        .node(NodeDef::new(["X_variance"], "Sub", ["X", "X_RM"]))
        .node(NodeDef::new(["Processed_STD"], "Add", ["STD", "Epsilon"]))
        .node(NodeDef::new(["X_MVN"], "Div", ["X_variance", "Processed_STD"]))
        .build()
}

/// `SoftmaxGrad` (since version 9): gradient of `Softmax(x)` given the gradient
/// of its output.
pub fn softmax_grad() -> Result<Function> {
    FunctionBuilder::new("SoftmaxGrad", 9)
        .input("x")
        .input("grad_softmax")
        .output("grad_x")
        .node(NodeDef::new(["softmax"], "Softmax", ["x"]))
        .node(NodeDef::new(["n0"], "Mul", ["grad_softmax", "softmax"]))
        .node(NodeDef::constant("indices", TensorData::scalar(1.0f32)))
        .node(NodeDef::new(["n1"], "Sum", ["n0", "indices"]))
        .node(NodeDef::constant(
            "newshape",
            TensorData::new(vec![-1.0f32, 1.0], vec![2]),
        ))
        .node(NodeDef::new(["n2"], "Reshape", ["n1", "newshape"]))
        .node(NodeDef::new(["n3"], "Sub", ["grad_softmax", "n2"]))
        .node(NodeDef::new(["grad_x"], "Mul", ["n3", "softmax"]))
        .build()
}

/// Register every definition of this module in the default domain.
pub fn register_standard_functions(registry: &mut FunctionRegistry) -> Result<()> {
    registry.register("", mean_variance_normalization()?)?;
    registry.register("", softmax_grad()?)?;
    Ok(())
}
