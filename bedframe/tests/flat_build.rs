//! Integration tests for the flat `namespaces` / `methods` form.
#![expect(
    clippy::expect_used,
    reason = "tests panic when a build unexpectedly succeeds"
)]

use anyhow::{Result, anyhow, ensure};
use bedframe::{
    BedframeError, Namespace, Node, Registry,
    flat::{FlatApi, FlatNamespace, build_flat},
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use test_helpers::{Recorder, specs};

#[fixture]
fn recorder() -> Recorder {
    Recorder::new()
}

fn build_err(api: &Value, registry: &Registry) -> std::sync::Arc<BedframeError> {
    build_flat(&mut Namespace::new(), api, registry).expect_err("build should fail")
}

fn missing_name(err: &BedframeError) -> Option<&str> {
    match err {
        BedframeError::MissingArgument { name } => Some(name.as_str()),
        _ => None,
    }
}

#[rstest]
fn flat_users_resolve_rest_namespaces(recorder: Recorder) -> Result<()> {
    let mut cloud = Namespace::new();
    build_flat(&mut cloud, &specs::flat_users(), &specs::registry(&recorder))?;
    ensure!(
        cloud.endpoint_paths() == ["Users.create", "Users.get", "Users.remove"],
        "unexpected endpoints {:?}",
        cloud.endpoint_paths()
    );

    for (path, verb, rest) in [
        ("Users.create", "POST", "users"),
        ("Users.get", "GET", "user"),
        ("Users.remove", "DELETE", "users"),
    ] {
        let reply = cloud.call(path, &[]).ok_or_else(|| anyhow!("{path} missing"))?;
        ensure!(reply["verb"] == verb, "{path} verb {}", reply["verb"]);
        ensure!(reply["restNamespace"] == rest, "{path} restNamespace {}", reply["restNamespace"]);
        ensure!(reply["foo"] == "bar", "{path} lost foo");
        ensure!(reply["namespace"] == "Users", "{path} lost namespace");
    }
    let paths: Vec<String> = recorder.calls().into_iter().map(|call| call.path).collect();
    ensure!(paths == ["Users.create", "Users.get", "Users.remove"], "unexpected {paths:?}");
    Ok(())
}

#[rstest]
fn methods_may_move_to_another_namespace(recorder: Recorder) -> Result<()> {
    let api = FlatApi::new(Node::new().with_shared_executor(recorder.executor())).with_namespace(
        FlatNamespace::new(
            Node::new().with("namespace", json!("Users")),
            [
                Node::leaf("get"),
                Node::leaf("audit").with("namespace", json!("Admin")),
            ],
        ),
    );
    let mut cloud = Namespace::new();
    api.build(&mut cloud)?;
    ensure!(
        cloud.endpoint_paths() == ["Admin.audit", "Users.get"],
        "unexpected endpoints {:?}",
        cloud.endpoint_paths()
    );
    Ok(())
}

#[rstest]
fn namespaces_are_shared_between_entries(recorder: Recorder) -> Result<()> {
    let api = json!({
        "executor": specs::EXECUTOR,
        "namespaces": [
            { "namespace": "Users", "methods": [{ "method": "get" }] },
            { "namespace": "Users", "methods": [{ "method": "list" }] }
        ]
    });
    let mut cloud = Namespace::new();
    build_flat(&mut cloud, &api, &specs::registry(&recorder))?;
    ensure!(cloud.len() == 1, "expected one namespace");
    ensure!(cloud.endpoint_paths() == ["Users.get", "Users.list"]);
    Ok(())
}

#[rstest]
#[case::no_namespaces(json!({ "executor": "default" }), "namespaces")]
#[case::no_methods(json!({ "namespaces": [{ "namespace": "Users" }] }), "namespaces[0].methods")]
#[case::no_namespace_property(
    json!({ "executor": "default", "namespaces": [{ "methods": [{ "method": "get" }] }] }),
    "namespaces[0].methods[0].namespace"
)]
#[case::no_method(
    json!({ "executor": "default", "namespaces": [{ "namespace": "Users", "methods": [{ "verb": "GET" }] }] }),
    "namespaces[0].methods[0].method"
)]
#[case::no_executor(
    json!({ "namespaces": [{ "namespace": "Users", "methods": [{ "method": "get" }] }] }),
    "namespaces[0].methods[0].executor"
)]
fn missing_fields_are_named(recorder: Recorder, #[case] api: Value, #[case] expected: &str) -> Result<()> {
    let err = build_err(&api, &specs::registry(&recorder));
    ensure!(missing_name(&err) == Some(expected), "unexpected error {err}");
    Ok(())
}

#[rstest]
#[case::namespaces_not_a_list(json!({ "namespaces": {} }), "namespaces", "array")]
#[case::methods_not_a_list(
    json!({ "namespaces": [{ "namespace": "Users", "methods": "get" }] }),
    "namespaces[0].methods",
    "array"
)]
#[case::namespace_not_a_string(
    json!({ "executor": "default", "namespaces": [{ "namespace": 7, "methods": [{ "method": "get" }] }] }),
    "namespaces[0].methods[0].namespace",
    "string"
)]
#[case::api_not_an_object(json!([]), "api", "object")]
fn mistyped_fields_are_named(
    recorder: Recorder,
    #[case] api: Value,
    #[case] expected_name: &str,
    #[case] expected_type: &str,
) -> Result<()> {
    let err = build_err(&api, &specs::registry(&recorder));
    let BedframeError::WrongType { name, expected, .. } = err.as_ref() else {
        return Err(anyhow!("expected a type error, got {err}"));
    };
    ensure!(name == expected_name, "unexpected name {name}");
    ensure!(*expected == expected_type, "unexpected expected type {expected}");
    Ok(())
}

#[rstest]
fn failure_keeps_earlier_methods(recorder: Recorder) -> Result<()> {
    let api = json!({
        "namespaces": [{
            "namespace": "Users",
            "methods": [
                { "method": "create", "executor": specs::EXECUTOR },
                { "method": "get", "executor": specs::EXECUTOR },
                { "method": "remove" }
            ]
        }]
    });
    let mut cloud = Namespace::new();
    let err = build_flat(&mut cloud, &api, &specs::registry(&recorder)).expect_err("remove has no executor");
    ensure!(
        missing_name(&err) == Some("namespaces[0].methods[2].executor"),
        "unexpected error {err}"
    );
    ensure!(cloud.endpoint_paths() == ["Users.create", "Users.get"]);
    Ok(())
}
