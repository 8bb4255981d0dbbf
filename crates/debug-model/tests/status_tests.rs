//! Status propagation and serialization

use debug_model::{Contents, DebugStatus, Kind, StatusCell, Variable};

#[smol_potat::test]
async fn test_subscribers_observe_updates() {
    let cell = StatusCell::default();
    let first = cell.subscribe();
    let watch = cell.watch();
    let second = watch.subscribe();

    cell.set(DebugStatus::Building);
    cell.set(DebugStatus::Ready);
    cell.set(DebugStatus::Running);

    for rx in [first, second] {
        let mut seen = Vec::new();
        while let Ok(status) = rx.try_recv() {
            seen.push(status);
        }
        assert_eq!(
            seen,
            vec![DebugStatus::Building, DebugStatus::Ready, DebugStatus::Running]
        );
    }
    assert!(watch.get().is_active());
}

#[smol_potat::test]
async fn test_subscriber_wakes_on_set() {
    let cell = StatusCell::default();
    let rx = cell.subscribe();

    let waiter = async move { rx.recv().await.unwrap() };
    cell.set(DebugStatus::Stopped);

    assert_eq!(waiter.await, DebugStatus::Stopped);
}

#[test]
fn test_dropped_subscriber_does_not_block() {
    let cell = StatusCell::default();
    drop(cell.subscribe());
    cell.set(DebugStatus::Finished);
    assert_eq!(cell.get(), DebugStatus::Finished);
}

#[test]
fn test_status_encodes_as_member_name() {
    assert_eq!(serde_json::to_string(&DebugStatus::Stopped).unwrap(), "\"Stopped\"");
    let status: DebugStatus = serde_json::from_str("\"Finished\"").unwrap();
    assert_eq!(status, DebugStatus::Finished);
    assert!(serde_json::from_str::<DebugStatus>("\"finished\"").is_err());
}

#[test]
fn test_variable_tree_from_json() {
    let json = r#"{
        "name": "cfg",
        "type_str": "main.Config",
        "kind": "Struct",
        "contents": {
            "type": "Children",
            "items": [
                {"name": "Port", "type_str": "int", "kind": "Int",
                 "contents": {"type": "Scalar", "items": "8080"}},
                {"name": "Tags", "type_str": "[]string", "kind": "Slice",
                 "contents": {"type": "List", "items": ["a", "b"]}}
            ]
        }
    }"#;

    let var: Variable = serde_json::from_str(json).unwrap();

    assert!(var.is_consistent());
    assert!(matches!(var.contents, Contents::Children(ref c) if c.len() == 2));
    assert_eq!(var.find_path("Tags").map(|v| v.kind), Some(Kind::Slice));
    assert_eq!(
        var.value_string(false, 0, 4, 100, true),
        "main.Config {Port: 8080, Tags: []string {0: a, 1: b}}"
    );
}
