//! Loads an OData catalogue specification from JSON and prints the URL each
//! method would fetch.

use std::error::Error;
use std::io::{self, Write};

use bedframe::{Context, Namespace, Registry, spec::from_value};
use serde_json::{Value, json};

/// Joins `url` with every `$`-prefixed property and the call's arguments.
fn odata(ctx: &Context, args: &[Value]) -> Value {
    let base = ctx.get_str("url").unwrap_or_default();
    let mut query: Vec<String> = ctx
        .properties()
        .iter()
        .filter(|(key, _)| key.starts_with('$'))
        .map(|(key, value)| format!("{key}={}", value.as_str().unwrap_or_default()))
        .collect();
    if let Some(Value::Object(params)) = args.first() {
        query.extend(params.iter().map(|(key, value)| format!("${key}={value}")));
    }
    if query.is_empty() {
        json!(base)
    } else {
        json!(format!("{base}?{}", query.join("&")))
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let literal = json!({
        "propertyTypes": { "url": "slash_combine" },
        "executor": "odata",
        "url": "http://odata.netflix.com/v2/Catalog/",
        "$format": "json",
        "children": [
            { "property": "Genres", "url": "Genres", "children": [{ "method": "find" }] },
            {
                "property": "Title",
                "url": "/",
                "children": [
                    { "method": "find", "url": "Titles" },
                    {
                        "property": "AudioFormats",
                        "url": "TitleAudioFormats",
                        "children": [{ "method": "find" }]
                    }
                ]
            }
        ]
    });
    let registry = Registry::new().with_executor("odata", odata);
    let mut catalog = Namespace::new();
    bedframe::build(&mut catalog, &from_value(&literal, &registry)?)?;

    let mut out = io::stdout().lock();
    for path in catalog.endpoint_paths() {
        if let Some(url) = catalog.call(&path, &[json!({ "top": 5 })]) {
            writeln!(out, "{path} -> {url}")?;
        }
    }
    Ok(())
}
