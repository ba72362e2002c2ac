use npatch_core::model::ChildRow;
use npatch_core::{
    EditorOptions, JsonKind, Node, NodePath, PatchError, PatchKind, Segment, commit, lookup, merge,
    project, project_value, render_path, resolve_parent,
};
use serde_json::json;

fn path(segs: Vec<Segment>) -> NodePath {
    NodePath::new(segs)
}

fn parsed(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap()
}

#[test]
fn render_bracketed_paths() {
    let p = path(vec!["customer".into(), 0.into(), "id".into()]);
    assert_eq!(render_path(&p), r#"$["customer"][0]["id"]"#);
    assert_eq!(render_path(&NodePath::root()), "$");
    let quoted = path(vec![r#"say "hi""#.into()]);
    assert_eq!(quoted.to_string(), r#"$["say \"hi\""]"#);
}

#[test]
fn parse_path_expressions_and_pointers() {
    let p = NodePath::parse_expression(r#"$["customer"][0]["a]b"]"#).unwrap();
    assert_eq!(p, path(vec!["customer".into(), 0.into(), "a]b".into()]));
    assert_eq!(NodePath::parse_expression(&p.render()).unwrap(), p);
    assert!(NodePath::parse_expression("$").unwrap().is_root());
    assert!(matches!(
        NodePath::parse_expression("customer[0]"),
        Err(PatchError::InvalidPathSyntax(_))
    ));
    assert!(NodePath::parse_expression("$[01]").is_err());
    assert!(NodePath::parse_expression(r#"$["open"#).is_err());

    let p = NodePath::from_pointer("/customer/0/a~1b~0c").unwrap();
    assert_eq!(p, path(vec!["customer".into(), 0.into(), "a/b~c".into()]));
    assert!(NodePath::from_pointer("").unwrap().is_root());
    assert!(NodePath::from_pointer("customer").is_err());
}

#[test]
fn resolve_parent_and_lookup() {
    let doc = json!({"customer": [{"id": 7, "tags": ["x"]}], "3": "three"});
    let p = path(vec!["customer".into(), 0.into(), "id".into()]);
    let (parent, last) = resolve_parent(&doc, &p).unwrap();
    assert_eq!(parent, &json!({"id": 7, "tags": ["x"]}));
    assert_eq!(last, &Segment::Key("id".into()));

    // pointer-style numeric tokens still reach object members
    let three = NodePath::from_pointer("/3").unwrap();
    assert_eq!(lookup(&doc, &three), Some(&json!("three")));
    let by_key = path(vec!["customer".into(), "0".into(), "tags".into(), "0".into()]);
    assert_eq!(lookup(&doc, &by_key), Some(&json!("x")));

    let missing = path(vec!["missing".into(), "x".into()]);
    match resolve_parent(&doc, &missing) {
        Err(PatchError::InvalidPath { path, segment }) => {
            assert_eq!(path, r#"$["missing"]["x"]"#);
            assert_eq!(segment.as_deref(), Some(r#"["missing"]"#));
        }
        other => panic!("unexpected {:?}", other),
    }
    let out_of_range = path(vec!["customer".into(), 4.into(), "id".into()]);
    assert!(resolve_parent(&doc, &out_of_range).is_err());
    let through_scalar = path(vec!["3".into(), "x".into()]);
    match resolve_parent(&doc, &through_scalar) {
        Err(PatchError::InvalidPath { segment, .. }) => assert_eq!(segment.as_deref(), Some(r#"["3"]"#)),
        other => panic!("unexpected {:?}", other),
    }
    assert!(resolve_parent(&doc, &NodePath::root()).is_err());
}

#[test]
fn scalar_on_the_way_is_named_in_the_error() {
    let doc = json!({"a": "str"});
    let cases: [Vec<Segment>; 2] = [vec!["a".into(), "b".into()], vec!["a".into(), "b".into(), "c".into()]];
    for segs in cases {
        let p = path(segs);
        match resolve_parent(&doc, &p) {
            Err(PatchError::InvalidPath { segment, .. }) => assert_eq!(segment.as_deref(), Some(r#"["a"]"#)),
            other => panic!("unexpected {:?}", other),
        }
        match commit(r#"{"a":"str"}"#, &p, "1", &EditorOptions::default()) {
            Err(PatchError::InvalidPath { segment, .. }) => assert_eq!(segment.as_deref(), Some(r#"["a"]"#)),
            other => panic!("unexpected {:?}", other),
        }
    }
    // a scalar root has no earlier segment to blame
    let err = resolve_parent(&json!(5), &path(vec!["x".into()])).unwrap_err();
    assert!(matches!(err, PatchError::InvalidPath { segment: Some(ref s), .. } if s == r#"["x"]"#));
}

#[test]
fn projection_drops_nested_rows() {
    let doc = json!({"name": "Al", "age": 30, "ok": true, "none": null, "tags": ["a"], "addr": {"c": "X"}});
    let node = Node::from_document(&doc, &NodePath::root()).unwrap();
    let flat = project(Some(&node));
    assert_eq!(parsed(&flat), json!({"name": "Al", "age": 30, "ok": true, "none": null}));
    assert_eq!(flat, "{\n  \"name\": \"Al\",\n  \"age\": 30,\n  \"ok\": true,\n  \"none\": null\n}");
    // idempotent
    assert_eq!(project(Some(&node)), flat);
}

#[test]
fn projection_special_cases() {
    assert_eq!(project(None), "{}");
    assert_eq!(project(Some(&Node::empty())), "{}");

    let five = Node::new(NodePath::root(), vec![ChildRow { key: None, value: json!(5), kind: JsonKind::Number }]);
    assert_eq!(project(Some(&five)), "5");

    let word = Node::new(NodePath::root(), vec![ChildRow::unkeyed(json!("hello"))]);
    assert_eq!(project(Some(&word)), "hello");

    let arr = Node::new(NodePath::root(), vec![ChildRow::unkeyed(json!([1, 2]))]);
    assert_eq!(parsed(&project(Some(&arr))), json!([1, 2]));

    // a single keyed row stays a mapping
    let keyed = Node::new(NodePath::root(), vec![ChildRow::keyed("n", json!(1))]);
    assert_eq!(project(Some(&keyed)), "{\n  \"n\": 1\n}");

    // an unkeyed row among keyed ones has no name to map under
    let mixed = Node::new(
        NodePath::root(),
        vec![ChildRow::unkeyed(json!(1)), ChildRow::keyed("k", json!(2))],
    );
    assert_eq!(parsed(&project(Some(&mixed))), json!({"k": 2}));

    // only nested rows: nothing left to show
    let nested = Node::new(
        NodePath::root(),
        vec![ChildRow::keyed("a", json!({})), ChildRow::keyed("b", json!([]))],
    );
    assert_eq!(project(Some(&nested)), "{}");
}

#[test]
fn node_rows_from_document() {
    let doc = json!({"list": [3, {"k": 1}], "obj": {"x": 1, "y": [1]}});
    let elem = Node::from_document(&doc, &path(vec!["list".into(), 0.into()])).unwrap();
    assert_eq!(elem.rows, vec![ChildRow::unkeyed(json!(3))]);
    let obj = Node::from_document(&doc, &path(vec!["obj".into()])).unwrap();
    assert_eq!(obj.rows.len(), 2);
    assert_eq!(obj.rows[1].kind, JsonKind::Array);
    assert!(Node::from_document(&doc, &path(vec!["nope".into()])).is_none());
}

#[test]
fn project_value_rules() {
    assert_eq!(project_value(&json!("raw")), "raw");
    assert_eq!(project_value(&json!(1.5)), "1.5");
    assert_eq!(project_value(&json!(null)), "null");
    assert_eq!(project_value(&json!({"a": 1, "b": {"c": 2}})), "{\n  \"a\": 1\n}");
    assert_eq!(parsed(&project_value(&json!(["c"]))), json!(["c"]));
}

// Locked behaviour: objects merge one level deep, everything else is replaced.
#[test]
fn merge_is_shallow_for_objects_only() {
    let existing = json!({"name": "Al", "age": 30, "addr": {"city": "X", "zip": "1"}});
    let merged = merge(Some(&existing), json!({"age": 31, "addr": {"city": "Y"}}));
    assert_eq!(merged, json!({"name": "Al", "age": 31, "addr": {"city": "Y"}}));

    assert_eq!(merge(Some(&json!(["a", "b"])), json!(["c"])), json!(["c"]));
    assert_eq!(merge(Some(&json!({"a": 1})), json!([1])), json!([1]));
    assert_eq!(merge(Some(&json!([1])), json!({"a": 1})), json!({"a": 1}));
    assert_eq!(merge(Some(&json!(null)), json!({"a": 1})), json!({"a": 1}));
    assert_eq!(merge(Some(&json!({"a": 1})), json!(null)), json!(null));
    assert_eq!(merge(None, json!(4)), json!(4));
    // inputs untouched
    assert_eq!(existing["age"], json!(30));
}

#[test]
fn commit_merges_preserving_siblings() {
    let doc = r#"{"user":{"name":"Al","age":30,"pets":["cat"]},"other":1}"#;
    let p = path(vec!["user".into()]);
    let out = commit(doc, &p, r#"{"age":31}"#, &EditorOptions::default()).unwrap();
    assert_eq!(out.kind, PatchKind::Merged);
    assert_eq!(
        parsed(&out.document),
        json!({"user": {"name": "Al", "age": 31, "pets": ["cat"]}, "other": 1})
    );
    assert_eq!(out.baseline, "{\n  \"name\": \"Al\",\n  \"age\": 31\n}");
}

#[test]
fn commit_replaces_arrays_and_scalars() {
    let doc = r#"{"tags":["a","b"],"n":1,"list":[1,2]}"#;
    let opts = EditorOptions::compact();
    let out = commit(doc, &path(vec!["tags".into()]), r#"["c"]"#, &opts).unwrap();
    assert_eq!(out.document, r#"{"tags":["c"],"n":1,"list":[1,2]}"#);

    let out = commit(doc, &path(vec!["list".into(), 1.into()]), "5", &opts).unwrap();
    assert_eq!(out.document, r#"{"tags":["a","b"],"n":1,"list":[1,5]}"#);
    assert_eq!(out.baseline, "5");

    let out = commit(doc, &path(vec!["n".into()]), r#""text""#, &opts).unwrap();
    assert_eq!(parsed(&out.document)["n"], json!("text"));
    assert_eq!(out.baseline, "text");
}

#[test]
fn commit_writes_new_slots() {
    let opts = EditorOptions::compact();
    let out = commit(r#"{"a":{}}"#, &path(vec!["a".into(), "b".into()]), "1", &opts).unwrap();
    assert_eq!(out.document, r#"{"a":{"b":1}}"#);
    let out = commit(r#"{"a":[0]}"#, &path(vec!["a".into(), 1.into()]), "1", &opts).unwrap();
    assert_eq!(out.document, r#"{"a":[0,1]}"#);
    let err = commit(r#"{"a":[0]}"#, &path(vec!["a".into(), 5.into()]), "1", &opts).unwrap_err();
    assert!(matches!(err, PatchError::InvalidPath { .. }));
    let err = commit(r#"{"a":[0]}"#, &path(vec!["a".into(), "x".into()]), "1", &opts).unwrap_err();
    assert!(matches!(err, PatchError::InvalidPath { .. }));
}

#[test]
fn commit_at_root_replaces_without_merge() {
    let out = commit(r#"{"a":1,"b":2}"#, &NodePath::root(), r#"{"a":1}"#, &EditorOptions::compact()).unwrap();
    assert_eq!(out.kind, PatchKind::RootReplaced);
    assert_eq!(out.document, r#"{"a":1}"#);
    assert_eq!(out.baseline, out.document);
}

#[test]
fn commit_blank_draft_is_empty_object() {
    let out = commit(r#"{"a":{"x":1}}"#, &path(vec!["a".into()]), "  \n", &EditorOptions::compact()).unwrap();
    assert_eq!(out.document, r#"{"a":{"x":1}}"#);
    let out = commit(r#"{"a":1}"#, &NodePath::root(), "", &EditorOptions::compact()).unwrap();
    assert_eq!(out.document, "{}");
}

#[test]
fn commit_rejects_bad_draft_and_bad_path() {
    let doc = r#"{"a":1}"#;
    let err = commit(doc, &path(vec!["a".into()]), "{invalid", &EditorOptions::default()).unwrap_err();
    assert!(matches!(err, PatchError::InvalidJson(_)));
    assert!(err.to_string().starts_with("invalid JSON"));

    let err = commit(doc, &path(vec!["missing".into(), "x".into()]), "{}", &EditorOptions::default()).unwrap_err();
    assert!(matches!(err, PatchError::InvalidPath { .. }));
    assert!(err.to_string().contains(r#"$["missing"]["x"]"#));
}

#[test]
fn commit_recovers_from_unparseable_document() {
    let out = commit("not json", &path(vec!["a".into(), 0.into()]), r#"{"x":1}"#, &EditorOptions::default()).unwrap();
    assert_eq!(out.kind, PatchKind::DocumentUnparseable);
    assert_eq!(out.document, serde_json::to_string_pretty(&json!({"x": 1})).unwrap());
    assert_eq!(out.baseline, out.document);

    // draft errors still win over recovery
    let err = commit("not json", &NodePath::root(), "{invalid", &EditorOptions::default()).unwrap_err();
    assert!(matches!(err, PatchError::InvalidJson(_)));
}

#[test]
fn document_style_options() {
    let doc = r#"{"a":{"b":1}}"#;
    let p = path(vec!["a".into()]);
    let pretty = commit(doc, &p, r#"{"b":2}"#, &EditorOptions::default()).unwrap();
    assert_eq!(pretty.document, "{\n  \"a\": {\n    \"b\": 2\n  }\n}");
    let four = EditorOptions { indent: 4, ..EditorOptions::default() };
    let wide = commit(doc, &p, r#"{"b":2}"#, &four).unwrap();
    assert_eq!(wide.document, "{\n    \"a\": {\n        \"b\": 2\n    }\n}");
    // baseline ignores document style
    assert_eq!(wide.baseline, "{\n  \"b\": 2\n}");
}
