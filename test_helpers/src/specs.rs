//! Canned specification literals used across test suites.
//!
//! Executors are referenced by name; register them with [`registry`].

use bedframe::{BuildResult, Context, Registry};
use serde_json::{Value, json};

use crate::Recorder;

/// Executor name used by every literal in this module.
pub const EXECUTOR: &str = "default";

/// Preparer name used by [`flat_users`].
pub const PREPARER: &str = "rest_namespace";

/// Registry binding [`EXECUTOR`] to `recorder` and [`PREPARER`] to a
/// preparer that lowercases `namespace` into `restNamespace` when unset.
#[must_use]
pub fn registry(recorder: &Recorder) -> Registry {
    Registry::new()
        .with_shared_executor(EXECUTOR, recorder.executor())
        .with_preparer(PREPARER, |ctx: &mut Context| -> BuildResult<()> {
            if !ctx.contains("restNamespace") {
                let lowered = ctx.get_str("namespace").map(str::to_lowercase);
                if let Some(rest) = lowered {
                    ctx.set("restNamespace", Value::String(rest));
                }
            }
            Ok(())
        })
}

/// Users API in nested-children form.
#[must_use]
pub fn users() -> Value {
    json!({
        "verb": "GET",
        "executor": EXECUTOR,
        "children": [{
            "property": "Users",
            "foo": "bar",
            "children": [
                { "method": "create", "verb": "POST" },
                { "method": "get" },
                { "method": "remove", "verb": "DELETE" }
            ]
        }]
    })
}

/// Users API in the flat `namespaces` / `methods` form.
#[must_use]
pub fn flat_users() -> Value {
    json!({
        "verb": "GET",
        "executor": EXECUTOR,
        "preparer": PREPARER,
        "namespaces": [{
            "foo": "bar",
            "namespace": "Users",
            "methods": [
                { "method": "create", "verb": "POST" },
                { "method": "get", "restNamespace": "user" },
                { "method": "remove", "verb": "DELETE" }
            ]
        }]
    })
}

/// Catalogue API with `url` joined by slashes at every level.
#[must_use]
pub fn catalog() -> Value {
    json!({
        "propertyTypes": { "url": "slash_combine" },
        "executor": EXECUTOR,
        "verb": "GET",
        "url": "http://odata.netflix.com/v2/Catalog",
        "$format": "json",
        "children": [
            { "property": "Genres", "url": "Genres", "children": [{ "method": "find" }] },
            {
                "property": "Title",
                "children": [
                    { "url": "Titles", "method": "find" },
                    { "url": "Titles", "method": "findOne" },
                    {
                        "property": "AudioFormats",
                        "url": "TitleAudioFormats",
                        "children": [{ "method": "find" }]
                    },
                    {
                        "property": "Awards",
                        "url": "TitleAwards",
                        "children": [{ "method": "find" }]
                    }
                ]
            },
            { "property": "People", "url": "People", "children": [{ "method": "find" }] }
        ]
    })
}
