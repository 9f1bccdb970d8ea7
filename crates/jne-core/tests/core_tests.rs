use jne_core::{
    EditError, EditSet, EditValue, FieldRow, JsonKind, NodeSnapshot, Segment, apply_edits,
    apply_edits_to_value, compute_editable_fields, format_path, parse_path, parse_pointer,
    resolve_container, to_pointer,
};
use serde_json::json;

fn key(k: &str) -> Segment {
    Segment::from(k)
}

fn idx(i: usize) -> Segment {
    Segment::from(i)
}

#[test]
fn format_path_display() {
    assert_eq!(format_path(None), "$");
    assert_eq!(format_path(Some(&[])), "$");
    assert_eq!(format_path(Some(&[key("a"), idx(0), key("b")])), r#"$["a"][0]["b"]"#);
    assert_eq!(
        format_path(Some(&[key("users"), idx(0), key("name")])),
        r#"$["users"][0]["name"]"#
    );
    // quotes inside keys are escaped so the display stays well formed
    assert_eq!(format_path(Some(&[key("say \"hi\"")])), r#"$["say \"hi\""]"#);
}

#[test]
fn segment_display_matches_path_display() {
    let k = key("tab\there \"q\"");
    assert_eq!(k.to_string(), r#""tab\there \"q\"""#);
    assert_eq!(format_path(Some(&[k.clone()])), format!("$[{}]", k));
    assert_eq!(idx(3).to_string(), "3");
}

#[test]
fn resolve_container_mutates_in_place() {
    let mut root = json!({"users": [{"name": "ann"}, {"name": "bob"}]});
    let node = resolve_container(&mut root, &[key("users"), idx(1)]).unwrap();
    node["name"] = json!("rob");
    assert_eq!(root["users"][1]["name"], json!("rob"));
    assert_eq!(root["users"][0]["name"], json!("ann"));
}

#[test]
fn resolve_container_reports_failing_segment() {
    let mut root = json!({"list": [1, 2], "obj": {"k": 1}});
    match resolve_container(&mut root, &[key("list"), idx(5)]) {
        Err(EditError::PathResolution { index, segment, .. }) => {
            assert_eq!(index, 1);
            assert_eq!(segment, idx(5));
        }
        other => panic!("unexpected: {:?}", other),
    }
    match resolve_container(&mut root, &[key("missing"), key("k")]) {
        Err(EditError::PathResolution { index, .. }) => assert_eq!(index, 0),
        other => panic!("unexpected: {:?}", other),
    }
    // walking into a scalar fails at that segment
    assert!(matches!(
        resolve_container(&mut root, &[key("obj"), key("k"), key("deeper")]),
        Err(EditError::PathResolution { index: 2, .. })
    ));
}

#[test]
fn resolve_mixes_keys_and_indices_like_property_access() {
    let mut root = json!({"0": {"k": true}, "arr": ["x", "y"]});
    assert_eq!(*resolve_container(&mut root, &[idx(0), key("k")]).unwrap(), json!(true));
    assert_eq!(*resolve_container(&mut root, &[key("arr"), key("1")]).unwrap(), json!("y"));
    assert!(resolve_container(&mut root, &[key("arr"), key("01")]).is_err());
}

#[test]
fn pointer_and_json_path_parsing() {
    let p = parse_pointer("/users/0/a~1b/~0t").unwrap();
    assert_eq!(p, vec![key("users"), idx(0), key("a/b"), key("~t")]);
    assert_eq!(to_pointer(&p), "/users/0/a~1b/~0t");
    assert!(parse_pointer("").unwrap().is_empty());
    assert!(parse_pointer("users").is_err());

    assert_eq!(parse_path(r#"["users", 0, "name"]"#).unwrap(), vec![key("users"), idx(0), key("name")]);
    assert!(parse_path("[-1]").is_err());
    assert!(parse_path(r#"{"a":1}"#).is_err());
}

#[test]
fn editable_fields_filter() {
    let rows = vec![
        FieldRow { key: Some("x".into()), kind: JsonKind::String, value: Some(json!("v")) },
        FieldRow { key: Some("y".into()), kind: JsonKind::Object, value: None },
        FieldRow { key: None, kind: JsonKind::Number, value: Some(json!(1)) },
    ];
    let editable = compute_editable_fields(&rows);
    assert_eq!(editable.len(), 1);
    assert_eq!(editable[0].key.as_deref(), Some("x"));
}

#[test]
fn snapshot_rows_follow_document_order() {
    let root = json!({"node": {"z": 1, "a": "s", "m": null, "nested": {"q": 1}, "list": [1], "ok": false}});
    let snap = NodeSnapshot::capture(&root, &[key("node")]).unwrap();
    let kinds: Vec<_> = snap.rows.iter().map(|r| (r.key.clone().unwrap(), r.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            ("z".to_string(), JsonKind::Number),
            ("a".to_string(), JsonKind::String),
            ("m".to_string(), JsonKind::Null),
            ("nested".to_string(), JsonKind::Object),
            ("list".to_string(), JsonKind::Array),
            ("ok".to_string(), JsonKind::Boolean),
        ]
    );
    assert!(snap.field("nested").unwrap().value.is_none());
    let editable: Vec<_> = snap.editable_fields().iter().filter_map(|r| r.key.clone()).collect();
    assert_eq!(editable, vec!["z", "a", "m", "ok"]);
    assert_eq!(snap.path_display(), r#"$["node"]"#);

    let arr = NodeSnapshot::capture(&json!([1, {"a": 1}]), &[]).unwrap();
    assert_eq!(arr.rows.len(), 2);
    assert!(arr.rows.iter().all(|r| r.key.is_none()));
    assert!(arr.editable_fields().is_empty());
}

#[test]
fn seed_keeps_kinds_and_defaults_absent_to_empty_string() {
    let rows = vec![
        FieldRow { key: Some("n".into()), kind: JsonKind::Number, value: Some(json!(7)) },
        FieldRow { key: Some("b".into()), kind: JsonKind::Boolean, value: Some(json!(true)) },
        FieldRow { key: Some("s".into()), kind: JsonKind::String, value: None },
        FieldRow { key: Some("o".into()), kind: JsonKind::Object, value: None },
        FieldRow { key: Some("z".into()), kind: JsonKind::Null, value: Some(json!(null)) },
    ];
    let set = EditSet::seed(&rows);
    assert_eq!(set.len(), 4);
    assert_eq!(set.get("z"), Some(&EditValue::Null));
    assert_eq!(set.get("n"), Some(&EditValue::from(7i64)));
    assert_eq!(set.get("b"), Some(&EditValue::Bool(true)));
    assert_eq!(set.get("s"), Some(&EditValue::from("")));
    assert!(set.get("o").is_none());
}

#[test]
fn edit_is_local_to_the_node() {
    let doc = r#"{"a":{"x":1,"y":2},"b":3}"#;
    let mut edits = EditSet::new();
    edits.set("x", 99i64);
    let out = apply_edits(doc, &[key("a")], &edits).unwrap();
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v, json!({"a": {"x": 99, "y": 2}, "b": 3}));
}

#[test]
fn applying_twice_equals_applying_once() {
    let doc = r#"{"cfg":{"name":"a","port":80,"debug":false}}"#;
    let mut edits = EditSet::new();
    edits.set_text("name", "b");
    edits.set("port", 8080i64);
    let once = apply_edits(doc, &[key("cfg")], &edits).unwrap();
    let twice = apply_edits(&once, &[key("cfg")], &edits).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn empty_edit_set_preserves_order_and_values() {
    let doc = r#"{"z":1,"a":{"k":"v","b":[1,2.5,null]},"m":true}"#;
    let out = apply_edits(doc, &[], &EditSet::new()).unwrap();
    let before: serde_json::Value = serde_json::from_str(doc).unwrap();
    let after: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(before, after);
    let keys: Vec<_> = after.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
    let inner: Vec<_> = after["a"].as_object().unwrap().keys().cloned().collect();
    assert_eq!(inner, vec!["k", "b"]);
}

#[test]
fn output_is_pretty_printed_with_two_spaces() {
    let mut edits = EditSet::new();
    edits.set("a", 2i64);
    let out = apply_edits(r#"{"a":1,"b":{"c":"d"}}"#, &[], &edits).unwrap();
    assert_eq!(out, "{\n  \"a\": 2,\n  \"b\": {\n    \"c\": \"d\"\n  }\n}");
}

#[test]
fn malformed_document_is_rejected() {
    let mut edits = EditSet::new();
    edits.set("x", 1i64);
    assert!(matches!(
        apply_edits("{not json", &[key("a")], &edits),
        Err(EditError::MalformedDocument(_))
    ));
}

#[test]
fn missing_path_is_rejected() {
    let mut edits = EditSet::new();
    edits.set("x", 1i64);
    assert!(matches!(
        apply_edits(r#"{"a":{"x":0}}"#, &[key("b")], &edits),
        Err(EditError::PathResolution { index: 0, .. })
    ));
}

#[test]
fn writes_do_not_check_kind() {
    let mut edits = EditSet::new();
    edits.set_text("age", "forty");
    let out = apply_edits(r#"{"p":{"age":40}}"#, &[key("p")], &edits).unwrap();
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["p"]["age"], json!("forty"));
}

#[test]
fn coercion_restores_declared_kinds() {
    let root = json!({"p": {"age": 40, "admin": false, "nick": null, "name": "ann"}});
    let snap = NodeSnapshot::capture(&root, &[key("p")]).unwrap();
    let mut edits = EditSet::seed(&snap.rows);
    edits.set_text("age", " 41 ");
    edits.set_text("admin", "true");
    edits.set_text("nick", "null");
    edits.set_text("name", "42");
    let coerced = edits.coerce_to(&snap);
    assert_eq!(coerced.get("age"), Some(&EditValue::from(41i64)));
    assert_eq!(coerced.get("admin"), Some(&EditValue::Bool(true)));
    assert_eq!(coerced.get("nick"), Some(&EditValue::Null));
    assert_eq!(coerced.get("name"), Some(&EditValue::from("42")));

    // text that does not parse as the declared kind is left alone
    edits.set_text("age", "forty");
    assert_eq!(edits.coerce_to(&snap).get("age"), Some(&EditValue::from("forty")));
}

#[test]
fn unknown_field_aborts_without_writing() {
    let mut root = json!({"a": {"x": 1}});
    let original = root.clone();
    let mut edits = EditSet::new();
    edits.set("x", 2i64);
    edits.set("renamed", 3i64);
    assert!(matches!(
        apply_edits_to_value(&mut root, &[key("a")], &edits),
        Err(EditError::UnknownField { ref key, .. }) if key == "renamed"
    ));
    assert_eq!(root, original);
}

#[test]
fn array_node_fields_are_addressed_by_index() {
    let mut root = json!({"list": ["a", "b", "c"]});
    let mut edits = EditSet::new();
    edits.set_text("1", "B");
    assert_eq!(apply_edits_to_value(&mut root, &[key("list")], &edits).unwrap(), 1);
    assert_eq!(root, json!({"list": ["a", "B", "c"]}));

    edits.set_text("3", "D");
    assert!(matches!(
        apply_edits_to_value(&mut root, &[key("list")], &edits),
        Err(EditError::UnknownField { .. })
    ));
    assert_eq!(root, json!({"list": ["a", "B", "c"]}));
}

#[test]
fn scalar_node_accepts_only_empty_edit_set() {
    let mut root = json!({"a": {"x": 1}});
    assert_eq!(apply_edits_to_value(&mut root, &[key("a"), key("x")], &EditSet::new()).unwrap(), 0);
    let mut edits = EditSet::new();
    edits.set("y", 1i64);
    assert!(matches!(
        apply_edits_to_value(&mut root, &[key("a"), key("x")], &edits),
        Err(EditError::NotAContainer { kind: JsonKind::Number, .. })
    ));
}

#[test]
fn edit_value_conversions() {
    assert_eq!(EditValue::from(f64::NAN), EditValue::Null);
    assert_eq!(EditValue::from(1.5).to_string(), "1.5");
    assert_eq!(EditValue::from("text").to_string(), "text");
    assert_eq!(EditValue::from_scalar(&json!([1])), None);
    assert_eq!(serde_json::Value::from(&EditValue::from(true)), json!(true));
    assert_eq!(EditValue::from("s").kind(), JsonKind::String);
}
