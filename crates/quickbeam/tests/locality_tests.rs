//! Remote localities are indistinguishable from local evaluation

use pretty_assertions::assert_eq;
use quickbeam::*;

fn engine() -> Engine {
    Engine::new(EngineConfig::with_worker_threads(2)).unwrap()
}

#[test]
fn test_remote_matches_local() {
    let e = engine();
    let remote = e.spawn_locality();
    let operands = || {
        vec![
            Value::matrix(2, 2, vec![1.0, 2.0, 3.0, 4.0]),
            Value::vector(vec![10.0, 20.0]),
        ]
    };

    let local = e.create("__sub", operands(), "local(1, 1)").unwrap();
    let hosted = e.create_on(&remote, "__sub", operands(), "remote(1, 1)").unwrap();

    let hosted_handle = hosted.as_primitive().unwrap();
    assert_eq!(hosted_handle.locality(), remote.id());
    assert_ne!(hosted_handle.locality(), e.home());

    assert_eq!(e.run(&hosted, vec![]).unwrap(), e.run(&local, vec![]).unwrap());
}

#[test]
fn test_mixed_tree_across_localities() {
    let e = engine();
    let remote = e.spawn_locality();

    let x = e.create_on(&remote, "access-argument", vec![Value::int(0)], "").unwrap();
    let doubled = e.create_on(&remote, "__add", vec![x.clone(), x], "").unwrap();
    let root = e.create("sum", vec![doubled], "").unwrap();

    let out = e.run(&root, vec![Value::vector(vec![1.0, 2.0, 3.5])]).unwrap();
    assert_eq!(out, Value::float(13.0));
}

#[test]
fn test_remote_errors_propagate() {
    let e = engine();
    let remote = e.spawn_locality();
    let bad = e
        .create_on(&remote, "__add", vec![Value::string("a"), Value::int(1)], "bad(2, 3)")
        .unwrap();

    match e.run(&bad, vec![]) {
        Err(EvalError::TypeMismatch { site, .. }) => {
            assert_eq!(site.name(), "__add");
            assert_eq!(site.codename(), "bad(2, 3)");
        }
        other => panic!("expected a type mismatch, got {:?}", other),
    }
}

#[test]
fn test_shutdown_makes_nodes_unreachable() {
    let e = engine();
    let remote = e.spawn_locality();
    let hosted = e
        .create_on(&remote, "__add", vec![Value::int(1), Value::int(2)], "kernel(3, 4)")
        .unwrap();
    let root = e.create("__mul", vec![hosted, Value::int(2)], "main(1, 1)").unwrap();
    assert_eq!(e.run(&root, vec![]).unwrap(), Value::float(6.0));

    remote.shutdown();

    match e.run(&root, vec![]) {
        Err(EvalError::RemoteUnreachable { site, locality, .. }) => {
            assert_eq!(locality, remote.id());
            assert_eq!(site.name(), "__add");
            assert_eq!(site.codename(), "kernel(3, 4)");
        }
        other => panic!("expected an unreachable locality, got {:?}", other),
    }
}

#[test]
fn test_create_on_closed_locality() {
    let e = engine();
    let remote = e.spawn_locality();
    remote.shutdown();

    // The serving task exits once it sees the shutdown request.
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
    while !remote.is_closed() && std::time::Instant::now() < deadline {
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    let err = e.create_on(&remote, "len", vec![Value::string("x")], "").unwrap_err();
    assert!(matches!(err, EvalError::RemoteUnreachable { .. }));
}

#[test]
fn test_remote_counters_are_recorded() {
    let e = engine();
    let remote = e.spawn_locality();
    let hosted = e
        .create_on(&remote, "len", vec![Value::string("four")], "")
        .unwrap();

    e.run(&hosted, vec![]).unwrap();
    e.run(&hosted, vec![]).unwrap();

    assert_eq!(e.counters().get("len$0").unwrap().eval_count, 2);
}
