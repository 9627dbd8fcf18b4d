//! Builds a small Users API in code and prints the requests it would send.

use std::error::Error;
use std::io::{self, Write};

use bedframe::{Context, Namespace, Node};
use serde_json::{Value, json};

fn request(ctx: &Context, args: &[Value]) -> Value {
    let verb = ctx.get_str("verb").unwrap_or("GET");
    let resource = ctx.get_str("resource").unwrap_or_default();
    let id = args
        .first()
        .and_then(|arg| arg.get("id"))
        .map(|id| format!("/{id}"))
        .unwrap_or_default();
    json!(format!("{verb} /{resource}{id}"))
}

fn main() -> Result<(), Box<dyn Error>> {
    let spec = Node::root()
        .with("verb", json!("GET"))
        .with_executor(request)
        .with_child(
            Node::container("Users")
                .with("resource", json!("users"))
                .with_child(Node::leaf("create").with("verb", json!("POST")))
                .with_child(Node::leaf("get"))
                .with_child(Node::leaf("remove").with("verb", json!("DELETE"))),
        );

    let mut api = Namespace::new();
    bedframe::build(&mut api, &spec)?;

    let mut out = io::stdout().lock();
    writeln!(out, "{}", serde_json::to_string_pretty(&api.shape())?)?;
    for path in api.endpoint_paths() {
        if let Some(reply) = api.call(&path, &[json!({ "id": 42 })]) {
            writeln!(out, "{path}: {reply}")?;
        }
    }
    Ok(())
}
