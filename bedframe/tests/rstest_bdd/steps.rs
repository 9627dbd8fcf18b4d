//! Step definitions for the API build scenarios.

use anyhow::{Result, anyhow, ensure};
use bedframe::{BedframeError, BuildOptions, Builder, Namespace, spec::from_value};
use rstest_bdd_macros::{given, then, when};
use serde_json::Value;
use test_helpers::{Recorder, specs, text};

use crate::fixtures::BuildState;

fn load(build_state: &BuildState, literal: &Value) -> Result<()> {
    ensure!(build_state.spec.is_empty(), "specification already loaded");
    let recorder = Recorder::new();
    let spec = from_value(literal, &specs::registry(&recorder))?;
    build_state.recorder.set(recorder);
    build_state.spec.set(spec);
    Ok(())
}

fn run(build_state: &BuildState, builder: Builder) -> Result<()> {
    let spec = build_state
        .spec
        .take()
        .ok_or_else(|| anyhow!("no specification loaded"))?;
    let mut api = Namespace::new();
    if let Err(err) = builder.build(&mut api, &spec) {
        build_state.error.set(err);
    }
    build_state.api.set(api);
    Ok(())
}

fn built(build_state: &BuildState) -> Result<Namespace> {
    if let Some(err) = build_state.error.get() {
        return Err(anyhow!("build failed: {err}"));
    }
    build_state.api.get().ok_or_else(|| anyhow!("nothing was built"))
}

#[given("the users specification")]
fn users(build_state: &BuildState) -> Result<()> {
    load(build_state, &specs::users())
}

#[given("the catalog specification")]
fn catalog(build_state: &BuildState) -> Result<()> {
    load(build_state, &specs::catalog())
}

#[given("the users specification without an executor")]
fn users_without_executor(build_state: &BuildState) -> Result<()> {
    let mut literal = specs::users();
    literal
        .as_object_mut()
        .and_then(|root| root.remove("executor"))
        .ok_or_else(|| anyhow!("users literal has no executor"))?;
    load(build_state, &literal)
}

#[given("the users specification with an unnamed namespace")]
fn users_with_unnamed_namespace(build_state: &BuildState) -> Result<()> {
    let mut literal = specs::users();
    literal
        .get_mut("children")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| anyhow!("users literal has no children"))?
        .push(serde_json::json!({ "children": [{ "method": "lost" }] }));
    load(build_state, &literal)
}

#[when("the specification is built")]
fn build_strict(build_state: &BuildState) -> Result<()> {
    run(build_state, Builder::default())
}

#[when("the specification is built leniently")]
fn build_lenient(build_state: &BuildState) -> Result<()> {
    run(build_state, Builder::new(BuildOptions::lenient()))
}

#[then("the endpoints are {paths}")]
fn endpoints_are(build_state: &BuildState, paths: String) -> Result<()> {
    let actual = built(build_state)?.endpoint_paths();
    let expected = text::list(&paths);
    ensure!(actual == expected, "expected {expected:?}, found {actual:?}");
    Ok(())
}

#[then("calling {path} sends verb {verb}")]
fn sends_verb(build_state: &BuildState, path: String, verb: String) -> Result<()> {
    let reply = built(build_state)?
        .call(&path, &[])
        .ok_or_else(|| anyhow!("{path} is not an endpoint"))?;
    ensure!(reply["verb"] == verb.as_str(), "{path} sent {}", reply["verb"]);
    let recorded = build_state
        .recorder
        .with_ref(Recorder::last)
        .flatten()
        .ok_or_else(|| anyhow!("executor was not called"))?;
    ensure!(recorded.path == path, "executor saw {}", recorded.path);
    Ok(())
}

#[then("calling {path} sees {key} set to {value}")]
fn sees_property(build_state: &BuildState, path: String, key: String, value: String) -> Result<()> {
    let reply = built(build_state)?
        .call(&path, &[])
        .ok_or_else(|| anyhow!("{path} is not an endpoint"))?;
    ensure!(reply[key.as_str()] == value.as_str(), "{path} saw {key} = {}", reply[key.as_str()]);
    Ok(())
}

#[then("{path} targets {url}")]
fn targets(build_state: &BuildState, path: String, url: String) -> Result<()> {
    let api = built(build_state)?;
    let endpoint = api
        .endpoint(&path)
        .ok_or_else(|| anyhow!("{path} is not an endpoint"))?;
    let actual = endpoint.context().get_str("url");
    ensure!(actual == Some(url.as_str()), "{path} targets {actual:?}");
    Ok(())
}

#[then("the build fails because {name} is missing")]
fn fails_missing(build_state: &BuildState, name: String) -> Result<()> {
    let err = build_state
        .error
        .get()
        .ok_or_else(|| anyhow!("build unexpectedly succeeded"))?;
    ensure!(
        matches!(err.as_ref(), BedframeError::MissingArgument { name: missing } if *missing == name),
        "unexpected error: {err}"
    );
    Ok(())
}

#[then("the build fails because {path} is unrepresented")]
fn fails_unrepresented(build_state: &BuildState, path: String) -> Result<()> {
    let err = build_state
        .error
        .get()
        .ok_or_else(|| anyhow!("build unexpectedly succeeded"))?;
    ensure!(
        matches!(err.as_ref(), BedframeError::Unrepresented { path: at } if *at == path),
        "unexpected error: {err}"
    );
    Ok(())
}

#[then("no endpoints were installed")]
fn nothing_installed(build_state: &BuildState) -> Result<()> {
    let api = build_state
        .api
        .get()
        .ok_or_else(|| anyhow!("build did not run"))?;
    ensure!(api.is_empty(), "target was modified: {}", api.shape());
    Ok(())
}
