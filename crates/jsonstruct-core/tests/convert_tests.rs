use jsonstruct_core::{
    from_json_str, from_json_str_with, list_from_json, list_to_json, struct_from_json,
    struct_to_json, to_json_string, update_from_json, update_json_from_list,
    update_json_from_struct, update_list, update_struct, Container, ConvertOptions, EmptyPolicy,
    ListValue, Struct, StructError, ValueRef,
};
use serde_json::{json, Map, Value};

/// Convert a JSON object into a fresh struct with the given options.
fn build(value: &Value, options: &ConvertOptions) -> Struct {
    let mut root = Struct::new();
    update_struct(&mut root, value.as_object().expect("object fixture"), options)
        .expect("conversion into struct failed");
    root
}

fn patched(value: &Value) -> Struct {
    build(value, &ConvertOptions::default())
}

fn unpatched(value: &Value) -> Struct {
    build(value, &ConvertOptions::unpatched())
}

fn read_back(tree: &Struct) -> Value {
    Value::Object(struct_to_json(tree).expect("read back failed"))
}

// ============================================================================
// Empty containers, patched path
// ============================================================================

#[test]
fn empty_dict_roundtrips() {
    let input = json!({"empty_dict": {}});
    let tree = patched(&input);

    let mut out = Map::new();
    update_json_from_struct(&mut out, &tree).unwrap();
    assert_eq!(Value::Object(out), input);
}

#[test]
fn empty_list_roundtrips() {
    let input = json!({"empty_list": []});
    assert_eq!(read_back(&patched(&input)), input);
}

#[test]
fn empty_containers_are_directly_readable() {
    let tree = patched(&json!({"empty_dict": {}, "empty_list": []}));

    let dict = tree.get("empty_dict").unwrap().as_struct().unwrap();
    assert!(dict.is_empty());
    assert!(!dict.contains_key("k"));

    let list = tree.get("empty_list").unwrap().as_list().unwrap();
    assert!(list.is_empty());
}

#[test]
fn deeply_nested_empty_containers_roundtrip() {
    let input = json!({
        "a": {"b": {"c": {}}},
        "l": [[], {}, [[]], [{}]],
        "mixed": {"x": [], "y": {"z": []}}
    });
    assert_eq!(read_back(&patched(&input)), input);
}

#[test]
fn empty_root_object_roundtrips() {
    let tree = patched(&json!({}));
    assert!(tree.is_committed());
    assert!(tree.is_empty());
    assert_eq!(read_back(&tree), json!({}));
}

#[test]
fn empty_root_array_roundtrips() {
    let list = list_from_json(&[]).unwrap();
    assert!(list.is_committed());
    assert_eq!(list_to_json(&list).unwrap(), Vec::<Value>::new());
}

#[test]
fn placeholder_does_not_clobber_existing_entries() {
    let mut root = Struct::new();
    root.set("k", "keep me");
    update_struct(&mut root, &Map::new(), &ConvertOptions::default()).unwrap();
    assert_eq!(root.get("k").unwrap(), ValueRef::String("keep me"));

    let mut list = ListValue::new();
    list.append("first");
    update_list(&mut list, &[], &ConvertOptions::default()).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list.get(0).unwrap(), ValueRef::String("first"));
}

// ============================================================================
// Empty containers, unpatched path
// ============================================================================

#[test]
fn unpatched_empty_dict_fails_on_direct_read() {
    let tree = unpatched(&json!({"empty_dict": {}}));
    match tree.get("empty_dict") {
        Err(StructError::ValueNotSet { slot }) => assert_eq!(slot, "empty_dict"),
        other => panic!("expected ValueNotSet, got {other:?}"),
    }
}

#[test]
fn unpatched_empty_dict_fails_on_read_back() {
    let tree = unpatched(&json!({"empty_dict": {}}));
    assert!(matches!(
        struct_to_json(&tree),
        Err(StructError::ValueNotSet { .. })
    ));
}

#[test]
fn unpatched_empty_list_fails_on_read_back() {
    let tree = unpatched(&json!({"empty_list": []}));
    assert!(matches!(
        tree.get("empty_list"),
        Err(StructError::ValueNotSet { .. })
    ));
    assert!(matches!(
        struct_to_json(&tree),
        Err(StructError::ValueNotSet { .. })
    ));
}

#[test]
fn unpatched_empty_container_inside_list_fails_on_read_back() {
    let tree = unpatched(&json!({"items": [1, {}]}));
    match struct_to_json(&tree) {
        Err(StructError::ValueNotSet { slot }) => assert_eq!(slot, "[1]"),
        other => panic!("expected ValueNotSet, got {other:?}"),
    }
}

#[test]
fn from_json_str_with_unpatched_policy() {
    let options = ConvertOptions::default().with_empty_policy(EmptyPolicy::LeaveUnset);
    let tree = from_json_str_with(r#"{"a":{"b":[]}}"#, &options).unwrap();
    assert!(matches!(
        to_json_string(&tree),
        Err(StructError::ValueNotSet { .. })
    ));
}

// ============================================================================
// Non-empty containers
// ============================================================================

#[test]
fn non_empty_input_is_identical_under_both_policies() {
    let input = json!({"a": 1, "b": [2, 3], "c": {"d": "e", "f": [true, null]}});
    let fixed = patched(&input);
    let broken = unpatched(&input);

    assert_eq!(fixed, broken);
    assert_eq!(read_back(&fixed), read_back(&broken));
}

#[test]
fn numbers_come_back_as_floats() {
    let tree = patched(&json!({"a": 1, "b": [2, 3.5]}));
    assert_eq!(read_back(&tree), json!({"a": 1.0, "b": [2.0, 3.5]}));
}

#[test]
fn scalars_roundtrip() {
    let input = json!({"n": null, "t": true, "f": false, "s": "text", "e": "", "x": -0.25});
    assert_eq!(read_back(&patched(&input)), input);
}

#[test]
fn key_order_is_preserved() {
    let input = json!({"zebra": "z", "apple": "a", "mango": {"y": "1", "b": "2"}});
    let out = read_back(&patched(&input));
    let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["zebra", "apple", "mango"]);
    let inner: Vec<&String> = out["mango"].as_object().unwrap().keys().collect();
    assert_eq!(inner, vec!["y", "b"]);
}

#[test]
fn element_order_is_preserved() {
    let input = json!({"l": ["c", "a", "b", ["z", "y"], {"q": "r"}]});
    assert_eq!(read_back(&patched(&input)), input);
}

#[test]
fn read_back_is_repeatable() {
    let tree = patched(&json!({"a": {"b": []}, "c": ["d", {}]}));
    let first = read_back(&tree);
    let second = read_back(&tree);
    assert_eq!(first, second);
}

#[test]
fn update_json_returns_its_target_for_chaining() {
    let tree = patched(&json!({"b": "2"}));
    let mut out = Map::new();
    out.insert("a".to_string(), json!("1"));
    let len = update_json_from_struct(&mut out, &tree).unwrap().len();
    assert_eq!(len, 2);

    let list = list_from_json(&[json!("x")]).unwrap();
    let mut items = vec![json!("w")];
    update_json_from_list(&mut items, &list).unwrap().push(json!("y"));
    assert_eq!(items, vec![json!("w"), json!("x"), json!("y")]);
}

// ============================================================================
// Entry points and errors
// ============================================================================

#[test]
fn update_from_json_dispatches_on_container() {
    let mut s = Struct::new();
    update_from_json(
        Container::Struct(&mut s),
        &json!({"a": []}),
        &ConvertOptions::default(),
    )
    .unwrap();
    assert!(s.get("a").unwrap().as_list().unwrap().is_empty());

    let mut l = ListValue::new();
    update_from_json(
        Container::List(&mut l),
        &json!([{}, 1]),
        &ConvertOptions::default(),
    )
    .unwrap();
    assert!(l.get(0).unwrap().as_struct().unwrap().is_empty());
}

#[test]
fn update_from_json_rejects_mismatched_container() {
    let mut s = Struct::new();
    let err = update_from_json(
        Container::Struct(&mut s),
        &json!([1, 2]),
        &ConvertOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        StructError::ContainerMismatch {
            expected: "struct",
            found: "array"
        }
    ));
}

#[test]
fn from_json_str_requires_object_root() {
    assert!(matches!(
        from_json_str("[1,2]"),
        Err(StructError::ContainerMismatch { .. })
    ));
    assert!(matches!(
        from_json_str("not json"),
        Err(StructError::JsonParse(_))
    ));
}

#[test]
fn struct_from_json_uses_force_set() {
    let map = json!({"e": {}}).as_object().unwrap().clone();
    let tree = struct_from_json(&map).unwrap();
    assert!(tree.get("e").is_ok());
}

#[test]
fn depth_limit_is_enforced() {
    let input = json!({"a": {"b": {"c": 1}}});
    let options = ConvertOptions::default().with_max_depth(2);
    let mut root = Struct::new();
    let err = update_struct(&mut root, input.as_object().unwrap(), &options).unwrap_err();
    assert!(matches!(err, StructError::DepthLimitExceeded { limit: 2 }));

    let shallow = json!({"a": {"b": 1}});
    let mut root = Struct::new();
    update_struct(&mut root, shallow.as_object().unwrap(), &options).unwrap();
}

#[test]
fn non_finite_number_fails_on_read_back() {
    let mut s = Struct::new();
    s.set("bad", f64::NAN);
    assert!(matches!(
        struct_to_json(&s),
        Err(StructError::NonFiniteNumber(_))
    ));
}
