//! Unit tests for the specification model and literal loader.
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface broken fixtures"
)]

use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::{Node, Registry, from_value};
use crate::{BedframeError, BuildResult, Context, MergePolicy};

#[fixture]
fn registry() -> Registry {
    Registry::new()
        .with_executor("echo", |ctx: &Context, _args: &[Value]| ctx.to_value())
        .with_preparer("noop", |_ctx: &mut Context| -> BuildResult<()> { Ok(()) })
}

#[rstest]
fn loads_structure_and_ordinary_properties(registry: Registry) {
    let node = from_value(
        &json!({
            "verb": "GET",
            "executor": "echo",
            "preparer": "noop",
            "propertyTypes": { "url": "slash_combine" },
            "children": [
                { "property": "Users", "children": [{ "method": "get", "verb": "PUT" }] }
            ]
        }),
        &registry,
    )
    .expect("literal loads");

    assert_eq!(node.get("verb"), Some(&json!("GET")));
    assert!(node.executor().is_some());
    assert!(node.preparer().is_some());
    assert_eq!(
        node.property_types().map(|types| types.policy_for("url")),
        Some(MergePolicy::SlashCombine)
    );
    let users = node.children().and_then(<[Node]>::first).expect("one child");
    assert_eq!(users.property(), Some("Users"));
    let get = users.children().and_then(<[Node]>::first).expect("one grandchild");
    assert_eq!(get.method(), Some("get"));
    assert_eq!(get.get("verb"), Some(&json!("PUT")));
    assert!(get.get("method").is_none(), "method is structural");
}

#[rstest]
#[case(json!({ "children": {} }), "children", "array", "object")]
#[case(json!({ "children": [1] }), "children[0]", "object", "number")]
#[case(json!({ "children": [{ "method": 3 }] }), "children[0].method", "string", "number")]
#[case(json!({ "property": ["a"] }), "property", "string", "array")]
#[case(json!({ "executor": true }), "executor", "string", "boolean")]
#[case(json!({ "propertyTypes": "url" }), "propertyTypes", "object", "string")]
#[case(json!("root"), "specification", "object", "string")]
fn rejects_mistyped_structural_fields(
    registry: Registry,
    #[case] literal: Value,
    #[case] field: &str,
    #[case] want: &str,
    #[case] got: &str,
) {
    let err = from_value(&literal, &registry).expect_err("literal is mistyped");
    let BedframeError::WrongType {
        name,
        expected,
        received,
    } = err.as_ref()
    else {
        panic!("expected WrongType, got {err:?}");
    };
    assert_eq!(name, field);
    assert_eq!(*expected, want);
    assert_eq!(*received, got);
}

#[rstest]
#[case(json!({ "executor": "missing" }), "executor")]
#[case(json!({ "preparer": "missing" }), "preparer")]
fn rejects_unregistered_callables(registry: Registry, #[case] literal: Value, #[case] want: &str) {
    let err = from_value(&literal, &registry).expect_err("name is unregistered");
    assert!(
        matches!(err.as_ref(), BedframeError::Unregistered { kind, name } if *kind == want && name == "missing"),
        "unexpected error {err:?}"
    );
}

#[rstest]
fn null_structural_fields_count_as_absent(registry: Registry) {
    let node = from_value(&json!({ "method": null, "executor": null, "children": null }), &registry)
        .expect("nulls are ignored");
    assert!(node.method().is_none());
    assert!(node.executor().is_none());
    assert!(node.children().is_none());
}

#[rstest]
fn unknown_policy_names_load_as_unrecognised(registry: Registry) {
    let node = from_value(&json!({ "propertyTypes": { "url": 3, "tag": "deep" } }), &registry)
        .expect("policies load");
    let types = node.property_types().expect("declared");
    assert_eq!(types.policy_for("url"), MergePolicy::Unrecognised);
    assert_eq!(types.policy_for("tag"), MergePolicy::Unrecognised);
}

#[test]
fn builder_appends_children_in_order() {
    let node = Node::root()
        .with_child(Node::leaf("a"))
        .with_child(Node::leaf("b"));
    let names: Vec<_> = node
        .children()
        .unwrap_or_default()
        .iter()
        .filter_map(Node::method)
        .collect();
    assert_eq!(names, ["a", "b"]);
}

#[test]
fn setting_names_routes_to_structural_fields() {
    let mut node = Node::new()
        .with("method", json!("get"))
        .with("property", json!("Users"))
        .with("verb", json!("GET"));
    assert_eq!(node.method(), Some("get"));
    assert_eq!(node.property(), Some("Users"));
    assert!(node.get("method").is_none());
    assert!(node.get("property").is_none());
    assert_eq!(node.get("verb"), Some(&json!("GET")));

    assert_eq!(node.set("method", json!("list")), Some(json!("get")));
    assert_eq!(node.method(), Some("list"));
    assert_eq!(node.set("property", Value::Null), Some(json!("Users")));
    assert!(node.property().is_none());
}

#[test]
fn setting_policy_tables_from_values() {
    let node = Node::new().with("propertyTypes", json!({ "url": "slash_combine" }));
    let types = node.property_types().expect("object is accepted");
    assert_eq!(types.policy_for("url"), MergePolicy::SlashCombine);
}

#[rstest]
#[case("children", json!([{ "method": "get" }]))]
#[case("executor", json!("echo"))]
#[case("preparer", json!("defaults"))]
#[case("method", json!(7))]
#[case("propertyTypes", json!("slash_combine"))]
fn unrepresentable_structural_values_are_dropped(#[case] key: &str, #[case] value: Value) {
    let mut node = Node::new();
    assert_eq!(node.set(key, value), None);
    assert!(node.properties().is_empty());
    assert!(node.children().is_none());
    assert!(node.executor().is_none());
    assert!(node.preparer().is_none());
    assert!(node.method().is_none());
    assert!(node.property_types().is_none());
}
