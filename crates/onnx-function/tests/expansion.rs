use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread;

use onnx_function::ir::{AttributeValue, Graph, Node, TensorData};
use onnx_function::{
    AttrInit, FormalKind, Function, FunctionError, FunctionRegistry, InlineConfig, NodeDef,
    expand_function, inline_functions, register_standard_functions,
};
use rstest::rstest;

fn scale() -> Function {
    Function::define(
        "F",
        1,
        ["x", "y"],
        ["z"],
        ["k"],
        vec![
            NodeDef::new(["tmp"], "Add", ["x", "y"]),
            NodeDef::new(["z"], "Mul", ["tmp"]).attr("k", "$k:float"),
        ],
    )
    .unwrap()
}

/// Two inputs, two outputs and three internal tensors.
fn two_by_two() -> Function {
    Function::define(
        "TwoByTwo",
        1,
        ["a", "b"],
        ["c", "d"],
        Vec::<&str>::new(),
        vec![
            NodeDef::new(["s"], "Add", ["a", "b"]),
            NodeDef::new(["p"], "Mul", ["a", "b"]),
            NodeDef::new(["q"], "Sub", ["s", "p"]),
            NodeDef::new(["c"], "Relu", ["q"]),
            NodeDef::new(["d"], "Neg", ["q"]),
        ],
    )
    .unwrap()
}

fn call(inputs: usize, outputs: usize) -> Node {
    Node::new("TwoByTwo")
        .with_inputs((0..inputs).map(|i| format!("in{i}")))
        .with_outputs((0..outputs).map(|i| format!("out{i}")))
}

fn internal_names(graph: &Graph) -> HashSet<String> {
    graph
        .tensor_names()
        .filter(|name| name.starts_with("Func_"))
        .map(str::to_string)
        .collect()
}

#[rstest]
#[case(0, 0, true)]
#[case(1, 0, true)]
#[case(2, 1, true)]
#[case(2, 2, true)]
#[case(3, 2, false)]
#[case(2, 3, false)]
#[case(5, 0, false)]
fn positional_arity(#[case] inputs: usize, #[case] outputs: usize, #[case] succeeds: bool) {
    let mut graph = Graph::new();
    let result = expand_function(&call(inputs, outputs), &two_by_two(), &mut graph, Some("p"));

    if succeeds {
        assert!(result.is_ok());
        assert_eq!(graph.len(), 5);
    } else {
        assert!(matches!(
            result,
            Err(FunctionError::OutOfBoundsBinding { .. })
        ));
    }
}

#[test]
fn out_of_bounds_reports_input_side_first() {
    let mut graph = Graph::new();
    let err = expand_function(&call(3, 3), &two_by_two(), &mut graph, Some("p")).unwrap_err();

    assert_eq!(
        err,
        FunctionError::OutOfBoundsBinding {
            node: "TwoByTwop".to_string(),
            kind: FormalKind::Input,
            index: 2,
            arity: 2,
        }
    );
    assert_eq!(
        err.to_string(),
        "Input 2 for function node TwoByTwop is out of bounds (function declares 2)"
    );
}

#[test]
fn expansions_into_one_graph_do_not_collide() {
    let function = two_by_two();
    let mut graph = Graph::new();

    expand_function(&call(2, 2), &function, &mut graph, Some("first")).unwrap();
    let first = internal_names(&graph);
    expand_function(&call(2, 2), &function, &mut graph, Some("second")).unwrap();
    let all = internal_names(&graph);

    assert_eq!(graph.len(), 10);
    assert_eq!(first.len(), 3);
    assert_eq!(all.len(), 6);
    assert!(first.is_subset(&all));
}

#[test]
fn unnamed_call_sites_without_prefix_do_not_collide() {
    let function = two_by_two();
    let site = call(1, 0);

    let mut a = Graph::new();
    let mut b = Graph::new();
    expand_function(&site, &function, &mut a, None).unwrap();
    expand_function(&site, &function, &mut b, None).unwrap();

    assert!(internal_names(&a).is_disjoint(&internal_names(&b)));
}

#[test]
fn internal_names_do_not_shadow_actuals() {
    // Actual names that look like the function's internal names stay untouched.
    let site = Node::new("TwoByTwo")
        .with_inputs(["s", "p"])
        .with_outputs(["q", "c"]);
    let mut graph = Graph::new();
    expand_function(&site, &two_by_two(), &mut graph, Some("x")).unwrap();

    assert_eq!(graph.nodes[0].inputs, vec!["s", "p"]);
    assert_eq!(graph.nodes[0].outputs, vec!["Func_TwoByTwox_s"]);
    assert_eq!(graph.nodes[3].outputs, vec!["q"]);
    assert_eq!(graph.nodes[4].outputs, vec!["c"]);
}

#[test]
fn expansion_is_deterministic_with_prefix() {
    let function = scale();
    let site = Node::new("Add2")
        .with_inputs(["a", "b"])
        .with_outputs(["c"])
        .with_attr("k", AttributeValue::Float32(2.0));

    let mut first = Graph::new();
    let mut second = Graph::new();
    expand_function(&site, &function, &mut first, Some("p1")).unwrap();
    expand_function(&site, &function, &mut second, Some("p1")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn worked_example() {
    let site = Node::new("Add2")
        .with_inputs(["a", "b"])
        .with_outputs(["c"])
        .with_attr("k", AttributeValue::Float32(2.0));
    let mut graph = Graph::new();
    expand_function(&site, &scale(), &mut graph, Some("p1")).unwrap();

    assert_eq!(graph.len(), 2);
    assert_eq!(graph.nodes[0].op_type, "Add");
    assert_eq!(graph.nodes[0].inputs, vec!["a", "b"]);
    assert_eq!(graph.nodes[0].outputs, vec!["Func_Fp1_tmp"]);
    assert_eq!(graph.nodes[1].op_type, "Mul");
    assert_eq!(graph.nodes[1].inputs, vec!["Func_Fp1_tmp"]);
    assert_eq!(graph.nodes[1].outputs, vec!["c"]);
    assert_eq!(graph.nodes[1].attr("k"), Some(&AttributeValue::Float32(2.0)));
}

#[test]
fn attribute_forwarding_and_omission() {
    let function = Function::define(
        "Scaled",
        1,
        ["x"],
        ["y"],
        ["scale"],
        vec![NodeDef::new(["y"], "Mul", ["x"]).attr("factor", "$scale:float")],
    )
    .unwrap();

    let mut with_scale = Graph::new();
    let site = Node::new("Scaled")
        .with_inputs(["x0"])
        .with_outputs(["y0"])
        .with_attr("scale", AttributeValue::Float32(0.5));
    expand_function(&site, &function, &mut with_scale, Some("a")).unwrap();
    assert_eq!(
        with_scale.nodes[0].attr("factor"),
        Some(&AttributeValue::Float32(0.5))
    );

    let mut without_scale = Graph::new();
    let site = Node::new("Scaled").with_inputs(["x0"]).with_outputs(["y0"]);
    expand_function(&site, &function, &mut without_scale, Some("b")).unwrap();
    assert_eq!(without_scale.nodes[0].attr("factor"), None);
}

#[test]
fn unused_call_site_attribute_is_ignored() {
    let site = Node::new("Add2")
        .with_inputs(["a", "b"])
        .with_outputs(["c"])
        .with_attr("k", AttributeValue::Float32(2.0))
        .with_attr("unrelated", AttributeValue::Int64(7));
    let mut graph = Graph::new();
    expand_function(&site, &scale(), &mut graph, Some("p1")).unwrap();

    assert!(graph.nodes.iter().all(|node| node.attr("unrelated").is_none()));
}

#[test]
fn literal_attribute_ignores_call_site() {
    let function = Function::define(
        "Padded",
        1,
        ["x"],
        ["y"],
        ["mode"],
        vec![
            NodeDef::new(["y"], "Pad", ["x"])
                .attr("mode", "constant")
                .attr("value", AttrInit::value(TensorData::scalar(0.0f32))),
        ],
    )
    .unwrap();
    let site = Node::new("Padded")
        .with_inputs(["x0"])
        .with_outputs(["y0"])
        .with_attr("mode", AttributeValue::String("edge".to_string()));
    let mut graph = Graph::new();
    expand_function(&site, &function, &mut graph, Some("p")).unwrap();

    assert_eq!(
        graph.nodes[0].attr("mode"),
        Some(&AttributeValue::String("constant".to_string()))
    );
}

#[test]
fn function_is_shared_across_threads() {
    let function = Arc::new(two_by_two());
    let graph = Arc::new(Mutex::new(Graph::new()));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let function = Arc::clone(&function);
            let graph = Arc::clone(&graph);
            thread::spawn(move || {
                let mut local = Graph::new();
                let prefix = format!("t{i}");
                expand_function(&call(2, 2), &function, &mut local, Some(prefix.as_str()))
                    .unwrap();
                graph.lock().unwrap().nodes.extend(local.nodes);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let graph = graph.lock().unwrap();
    assert_eq!(graph.len(), 20);
    assert_eq!(internal_names(&graph).len(), 12);
    assert_eq!(*function, two_by_two());
}

#[test]
fn inlining_standard_functions_leaves_no_call_sites() {
    let mut registry = FunctionRegistry::new();
    register_standard_functions(&mut registry).unwrap();

    let mut graph = Graph::with_name("model");
    graph.add_node(
        Node::new("MeanVarianceNormalization")
            .with_inputs(["input"])
            .with_outputs(["normalized"])
            .with_attr("axes", AttributeValue::Int64s(vec![0, 2, 3])),
    );
    graph.add_node(
        Node::new("SoftmaxGrad")
            .with_inputs(["normalized", "dy"])
            .with_outputs(["dx"]),
    );

    let config = InlineConfig::new(String::new(), 13, 16);
    let inlined = inline_functions(&graph, &registry, &config).unwrap();

    assert_eq!(inlined.name.as_deref(), Some("model"));
    assert_eq!(inlined.len(), 11 + 8);
    assert!(
        inlined
            .nodes
            .iter()
            .all(|node| !registry.contains(&node.op_type, ""))
    );
    let produced: HashSet<_> = inlined
        .nodes
        .iter()
        .flat_map(|node| node.outputs.iter().cloned())
        .collect();
    assert!(produced.contains("normalized"));
    assert!(produced.contains("dx"));
}
