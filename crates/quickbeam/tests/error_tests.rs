//! Errors name the primitive that raised them

use quickbeam::*;

fn engine() -> Engine {
    Engine::new(EngineConfig::default()).unwrap()
}

#[test]
fn test_nested_error_names_inner_site() {
    let e = engine();
    let inner = e
        .create(
            "__add",
            vec![Value::matrix(2, 3, vec![0.0; 6]), Value::matrix(3, 2, vec![0.0; 6])],
            "kernel.physl(4, 9)",
        )
        .unwrap();
    let outer = e.create("sum", vec![inner], "kernel.physl(4, 1)").unwrap();

    let err = e.run(&outer, vec![]).unwrap_err();
    let site = err.site().unwrap();
    assert_eq!(site.name(), "__add");
    assert_eq!(site.codename(), "kernel.physl(4, 9)");
    assert!(err.to_string().starts_with("__add$0(kernel.physl(4, 9)): shape mismatch"));
}

#[test]
fn test_first_failure_wins() {
    let e = engine();
    let bad = e.create("len", vec![Value::Bool(true)], "").unwrap();
    let good = e.create("len", vec![Value::string("ok")], "").unwrap();
    let list = e.create("make_list", vec![good, bad], "").unwrap();

    assert!(matches!(
        e.run(&list, vec![]),
        Err(EvalError::TypeMismatch { .. })
    ));
}

#[test]
fn test_unknown_operator() {
    let e = engine();
    match e.create("__pow", vec![], "pow(1, 1)") {
        Err(EvalError::UnboundReference { site, .. }) => assert_eq!(site.codename(), "pow(1, 1)"),
        other => panic!("expected unbound reference, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_type_names() {
    assert_eq!(type_name(&Value::mask(vec![true])), "boolean array");
    assert_eq!(type_name(&Value::list(vec![])), "list");
    assert_eq!(type_name(&Value::expression("x + 1")), "expression");
}

#[test]
fn test_errors_are_cloneable_and_comparable_by_message() {
    let site = Site::new("len", "");
    let err = EvalError::invalid_operand(&site, "a scalar has no length");
    assert_eq!(err.clone().to_string(), err.to_string());
}
