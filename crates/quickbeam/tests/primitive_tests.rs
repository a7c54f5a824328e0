//! Primitive evaluation through the engine

use pretty_assertions::assert_eq;
use quickbeam::*;

fn engine() -> Engine {
    Engine::new(EngineConfig::with_worker_threads(4)).unwrap()
}

fn node(engine: &Engine, name: &str, operands: Vec<Value>) -> Value {
    engine.create(name, operands, "primitive_tests").unwrap()
}

fn eval(engine: &Engine, value: &Value) -> Result<Value> {
    engine.run(value, vec![])
}

fn matrix_3x2() -> Value {
    Value::Int(NodeData::matrix(3, 2, vec![6, 9, 13, 42, 54, 54]))
}

// ═══════════════════════════════════════════════════════════════════════
// Arithmetic
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_add_scalars() {
    let e = engine();
    let add = node(&e, "__add", vec![Value::int(40), Value::float(2.0)]);
    assert_eq!(eval(&e, &add).unwrap(), Value::float(42.0));
}

#[test]
fn test_fold_associativity() {
    let e = engine();
    let a = || Value::vector(vec![1.0, 2.0, 3.0]);
    let b = || Value::matrix(2, 3, vec![0.5, 1.5, 2.5, 3.5, 4.5, 5.5]);
    let c = || Value::float(0.25);

    let flat = node(&e, "__add", vec![a(), b(), c()]);
    let ab = node(&e, "__add", vec![a(), b()]);
    let left = node(&e, "__add", vec![ab, c()]);
    let bc = node(&e, "__add", vec![b(), c()]);
    let right = node(&e, "__add", vec![a(), bc]);

    let expected = eval(&e, &flat).unwrap();
    assert_eq!(eval(&e, &left).unwrap(), expected);
    assert_eq!(eval(&e, &right).unwrap(), expected);
    assert_eq!(
        expected,
        Value::matrix(2, 3, vec![1.75, 3.75, 5.75, 4.75, 6.75, 8.75])
    );
}

#[test]
fn test_nested_subtraction() {
    let e = engine();
    let inner = node(&e, "__mul", vec![Value::int(3), Value::vector(vec![1.0, 2.0])]);
    let outer = node(&e, "__sub", vec![Value::float(10.0), inner]);
    assert_eq!(eval(&e, &outer).unwrap(), Value::vector(vec![7.0, 4.0]));
}

#[test]
fn test_add_mismatched_matrices() {
    let e = engine();
    let add = node(
        &e,
        "__add",
        vec![Value::matrix(2, 3, vec![0.0; 6]), Value::matrix(3, 2, vec![0.0; 6])],
    );
    let err = eval(&e, &add).unwrap_err();
    assert!(matches!(err, EvalError::ShapeMismatch { .. }));
}

#[test]
fn test_nil_operand_fails_fast() {
    let e = engine();
    let add = node(&e, "__add", vec![Value::Nil, Value::int(1)]);
    assert!(matches!(eval(&e, &add), Err(EvalError::InvalidOperand { .. })));
}

#[test]
fn test_single_operand_is_arity_error() {
    let e = engine();
    let add = node(&e, "__add", vec![Value::int(1)]);
    assert!(matches!(eval(&e, &add), Err(EvalError::Arity { .. })));
}

#[test]
fn test_fold_allocates_once() {
    let site = Site::new("__add", "");
    let shared = || Value::vector(vec![1.0, 2.0]).into_shared();

    let out = ops::fold(ops::ArithmeticOp::Add, vec![shared(), shared(), shared()], &site).unwrap();
    assert!(!out.is_ref());
    assert_eq!(out, Value::vector(vec![3.0, 6.0]));

    // An owned accumulator is written in place at every step.
    let owned = NodeData::vector(vec![1.0, 2.0]);
    let storage = owned.as_slice().as_ptr();
    let out = ops::fold(
        ops::ArithmeticOp::Add,
        vec![Value::Float(owned), shared(), shared()],
        &site,
    )
    .unwrap();
    assert_eq!(out.as_float().unwrap().as_slice().as_ptr(), storage);
    assert_eq!(out, Value::vector(vec![3.0, 6.0]));
}

#[test]
fn test_list_flattening() {
    let e = engine();
    let left = node(&e, "make_list", vec![Value::int(1), Value::int(2)]);
    let inner = node(&e, "make_list", vec![Value::int(4)]);
    let right = node(&e, "make_list", vec![Value::int(3), inner]);
    let add = node(&e, "__add", vec![left, right]);

    assert_eq!(
        eval(&e, &add).unwrap(),
        Value::list(vec![
            Value::int(1),
            Value::int(2),
            Value::int(3),
            Value::list(vec![Value::int(4)]),
        ])
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Comparisons
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_greater_scalars() {
    let e = engine();
    let gt = node(&e, "__gt", vec![Value::float(1.0), Value::int(2)]);
    assert_eq!(eval(&e, &gt).unwrap(), Value::Mask(NodeData::scalar(0)));
}

#[test]
fn test_greater_integer_scalars() {
    let e = engine();
    let gt = node(&e, "__gt", vec![Value::int(5), Value::int(3)]);
    assert_eq!(eval(&e, &gt).unwrap(), Value::Mask(NodeData::scalar(1)));
}

#[test]
fn test_greater_nil_flag_rejected() {
    let e = engine();
    let gt = node(&e, "__gt", vec![Value::int(5), Value::int(3), Value::Nil]);
    assert!(matches!(eval(&e, &gt), Err(EvalError::InvalidOperand { .. })));
}

#[test]
fn test_greater_vector_scalar() {
    let e = engine();
    let gt = node(
        &e,
        "__gt",
        vec![Value::vector(vec![1.0, 2.0, 3.0]), Value::float(2.0)],
    );
    assert_eq!(eval(&e, &gt).unwrap(), Value::mask(vec![false, false, true]));
}

#[test]
fn test_greater_matrix_as_float() {
    let e = engine();
    let gt = node(
        &e,
        "__gt",
        vec![
            Value::matrix(2, 2, vec![1.0, 5.0, 3.0, 0.0]),
            Value::vector(vec![2.0, 2.0]),
            Value::Bool(true),
        ],
    );
    assert_eq!(
        eval(&e, &gt).unwrap(),
        Value::matrix(2, 2, vec![0.0, 1.0, 1.0, 0.0])
    );
}

#[test]
fn test_greater_rejects_mask_pairs() {
    let e = engine();
    let mask = node(&e, "__gt", vec![Value::int_vector(vec![1, 2]), Value::int(1)]);
    let gt = node(&e, "__gt", vec![mask, Value::mask(vec![true, false])]);
    assert!(matches!(eval(&e, &gt), Err(EvalError::TypeMismatch { .. })));
}

// ═══════════════════════════════════════════════════════════════════════
// Reductions and lengths
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_sum_all() {
    let e = engine();
    let sum = node(&e, "sum", vec![matrix_3x2()]);
    assert_eq!(eval(&e, &sum).unwrap(), Value::int(178));
}

#[test]
fn test_sum_axis0() {
    let e = engine();
    let sum = node(&e, "sum", vec![matrix_3x2(), Value::int(0)]);
    assert_eq!(eval(&e, &sum).unwrap(), Value::int_vector(vec![73, 105]));
}

#[test]
fn test_sum_axis1() {
    let e = engine();
    let sum = node(&e, "sum", vec![matrix_3x2(), Value::int(1)]);
    assert_eq!(eval(&e, &sum).unwrap(), Value::int_vector(vec![15, 55, 108]));
}

#[test]
fn test_sum_keepdims() {
    let e = engine();
    let sum = node(&e, "sum", vec![matrix_3x2(), Value::Nil, Value::Bool(true)]);
    assert_eq!(
        eval(&e, &sum).unwrap(),
        Value::Int(NodeData::matrix(1, 1, vec![178]))
    );
}

#[test]
fn test_sum_vector() {
    let e = engine();
    let v = || Value::int_vector(vec![6, 9, 13, 42, 54]);
    let sum = node(&e, "sum", vec![v()]);
    assert_eq!(eval(&e, &sum).unwrap(), Value::int(124));

    let keep = node(&e, "sum", vec![v(), Value::Nil, Value::Bool(true)]);
    assert_eq!(eval(&e, &keep).unwrap(), Value::int_vector(vec![124]));
}

#[test]
fn test_sum_axis_from_variables() {
    let e = engine();
    let axis = node(&e, "variable", vec![Value::Nil]);
    let keepdims = node(&e, "variable", vec![Value::Bool(false)]);
    let sum = node(
        &e,
        "sum",
        vec![Value::int_vector(vec![6, 9, 13, 42, 54]), axis, keepdims],
    );
    assert_eq!(eval(&e, &sum).unwrap(), Value::int(124));
}

#[test]
fn test_sum_integer_overflow() {
    let e = engine();
    let sum = node(&e, "sum", vec![Value::int_vector(vec![i64::MAX, 1])]);
    match eval(&e, &sum) {
        Err(EvalError::InvalidOperand { site, .. }) => assert_eq!(site.name(), "sum"),
        other => panic!("expected an overflow error, got {:?}", other),
    }
}

#[test]
fn test_sum_float_matrix() {
    let e = engine();
    let sum = node(
        &e,
        "sum",
        vec![Value::matrix(2, 2, vec![0.5, 1.5, 2.0, 2.0]), Value::int(-1)],
    );
    assert_eq!(eval(&e, &sum).unwrap(), Value::vector(vec![2.0, 4.0]));
}

#[test]
fn test_len() {
    let e = engine();
    let empty = node(&e, "make_list", vec![]);
    let len_empty = node(&e, "len", vec![empty]);
    assert_eq!(eval(&e, &len_empty).unwrap(), Value::int(0));

    let pair = node(&e, "make_list", vec![Value::int(1), Value::int(2)]);
    let len_pair = node(&e, "len", vec![pair]);
    assert_eq!(eval(&e, &len_pair).unwrap(), Value::int(2));

    let triple = node(
        &e,
        "make_list",
        vec![Value::int(1), Value::int(2), Value::int(3)],
    );
    let len_triple = node(&e, "len", vec![triple]);
    assert_eq!(eval(&e, &len_triple).unwrap(), Value::int(3));

    let text = node(
        &e,
        "len",
        vec![Value::string("Question of Life, Universe, and Everything")],
    );
    assert_eq!(eval(&e, &text).unwrap(), Value::int(42));
}

// ═══════════════════════════════════════════════════════════════════════
// Arguments and callables
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_access_argument() {
    let e = engine();
    let arg = node(&e, "access-argument", vec![Value::int(1)]);
    let out = e
        .run(&arg, vec![Value::int(10), Value::string("second")])
        .unwrap();
    assert_eq!(out, Value::string("second"));

    let err = e.run(&arg, vec![Value::int(10)]).unwrap_err();
    assert!(matches!(err, EvalError::UnboundReference { .. }));
}

#[test]
fn test_arguments_flow_through_nested_nodes() {
    let e = engine();
    let x = node(&e, "access-argument", vec![Value::int(0)]);
    let add = node(&e, "__add", vec![x, Value::float(1.0)]);
    let out = e.run(&add, vec![Value::vector(vec![1.0, 2.0])]).unwrap();
    assert_eq!(out, Value::vector(vec![2.0, 3.0]));
}

#[test]
fn test_lambda_and_call() {
    let e = engine();
    let x = node(&e, "access-argument", vec![Value::int(0)]);
    let y = node(&e, "access-argument", vec![Value::int(1)]);
    let body = node(&e, "__mul", vec![x, y]);
    let lambda = node(&e, "lambda", vec![Value::int(2), body]);

    let call = node(&e, "call", vec![lambda.clone(), Value::int(6), Value::int(7)]);
    assert_eq!(eval(&e, &call).unwrap(), Value::float(42.0));

    let bad = node(&e, "call", vec![lambda, Value::int(6)]);
    assert!(matches!(eval(&e, &bad), Err(EvalError::Arity { .. })));
}

#[test]
fn test_call_arguments_see_caller_args() {
    let e = engine();
    let inner_arg = node(&e, "access-argument", vec![Value::int(0)]);
    let double = node(&e, "__add", vec![inner_arg.clone(), inner_arg]);
    let lambda = node(&e, "lambda", vec![Value::int(1), double]);

    let outer_arg = node(&e, "access-argument", vec![Value::int(0)]);
    let call = node(&e, "call", vec![lambda, outer_arg]);
    let out = e.run(&call, vec![Value::float(2.5)]).unwrap();
    assert_eq!(out, Value::float(5.0));
}

#[test]
fn test_call_non_callable() {
    let e = engine();
    let call = node(&e, "call", vec![Value::int(1), Value::int(2)]);
    assert!(matches!(eval(&e, &call), Err(EvalError::TypeMismatch { .. })));
}

#[test]
fn test_variable_returns_view() {
    let e = engine();
    let var = node(&e, "variable", vec![Value::vector(vec![1.0, 2.0])]);
    let out = eval(&e, &var).unwrap();
    assert!(out.is_ref());
    assert_eq!(out, Value::vector(vec![1.0, 2.0]));
}

#[test]
fn test_zero_operand_node_uses_args() {
    let e = engine();
    let list = node(&e, "make_list", vec![]);
    let out = e.run(&list, vec![Value::int(1), Value::Bool(false)]).unwrap();
    assert_eq!(out, Value::list(vec![Value::int(1), Value::Bool(false)]));
}

// ═══════════════════════════════════════════════════════════════════════
// Files
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_file_read() {
    let path = std::env::temp_dir().join(format!("quickbeam-read-{}.txt", std::process::id()));
    std::fs::write(&path, "forty-two").unwrap();

    let e = engine();
    let read = node(&e, "file_read", vec![Value::string(path.to_string_lossy())]);
    assert_eq!(eval(&e, &read).unwrap(), Value::string("forty-two"));

    std::fs::remove_file(&path).unwrap();
    assert!(matches!(eval(&e, &read), Err(EvalError::Io { .. })));
}

// ═══════════════════════════════════════════════════════════════════════
// Concurrency
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_repeated_concurrent_evaluation_is_deterministic() {
    let e = engine();
    let a = Value::matrix(2, 3, vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
    let b = Value::vector(vec![1.0 / 3.0, 2.0 / 7.0, 5.0 / 11.0]);
    let prod = node(&e, "__mul", vec![a.clone(), b.clone()]);
    let quot = node(&e, "__div", vec![a, b]);
    let root = node(&e, "__sub", vec![prod, quot, Value::float(0.125)]);

    let expected = eval(&e, &root).unwrap();
    let expected_bits: Vec<u64> = expected
        .as_float()
        .unwrap()
        .as_slice()
        .iter()
        .map(|x| x.to_bits())
        .collect();

    let pending: Vec<_> = (0..64).map(|_| e.evaluate(&root, vec![])).collect();
    let results = futures::executor::block_on(futures::future::try_join_all(pending)).unwrap();

    for result in results {
        let bits: Vec<u64> = result
            .as_float()
            .unwrap()
            .as_slice()
            .iter()
            .map(|x| x.to_bits())
            .collect();
        assert_eq!(bits, expected_bits);
    }
}
