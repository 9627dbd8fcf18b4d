//! Execution context captured by every endpoint.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::Executor;

/// Fully merged view of a method, handed to its preparer and executor.
///
/// The context is snapshotted when the method is materialized; nothing done
/// to the specification afterwards can reach it.
///
/// While a preparer runs, the context also carries the executor the method
/// inherited, so the preparer may supply or replace it. The executor never
/// takes part in equality or serialization.
#[derive(Clone, Default, Serialize)]
pub struct Context {
    #[serde(skip)]
    container: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<String>,
    #[serde(flatten)]
    properties: Map<String, Value>,
    #[serde(skip)]
    executor: Option<Executor>,
}

impl Context {
    /// Create a context for `method` inside the container at `container`.
    ///
    /// `container` is the dotted path of the enclosing namespace, empty for
    /// methods installed directly on the target.
    #[must_use]
    pub fn new(
        container: impl Into<String>,
        method: Option<String>,
        properties: Map<String, Value>,
    ) -> Self {
        Self {
            container: container.into(),
            method,
            properties,
            executor: None,
        }
    }

    /// Name the method is installed under, once known.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// Replace the method name. Only meaningful from a preparer.
    pub fn set_method(&mut self, method: impl Into<String>) {
        self.method = Some(method.into());
    }

    /// Executor the method will be bound to, if any.
    #[must_use]
    pub const fn executor(&self) -> Option<&Executor> {
        self.executor.as_ref()
    }

    /// Replace the executor. Only meaningful from a preparer.
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use bedframe::{Context, Executor};
    /// use serde_json::{Map, Value, json};
    ///
    /// let mut ctx = Context::new("", Some("ping".into()), Map::new());
    /// assert!(ctx.executor().is_none());
    /// let pong: Executor = Arc::new(|_: &Context, _: &[Value]| json!("pong"));
    /// ctx.set_executor(pong);
    /// assert!(ctx.executor().is_some());
    /// ```
    pub fn set_executor(&mut self, executor: Executor) {
        self.executor = Some(executor);
    }

    pub(crate) fn take_executor(&mut self) -> Option<Executor> {
        self.executor.take()
    }

    /// Dotted path of the enclosing namespace.
    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }

    pub(crate) fn set_container(&mut self, container: impl Into<String>) {
        self.container = container.into();
    }

    /// Dotted path of the endpoint, e.g. `Title.AudioFormats.find`.
    #[must_use]
    pub fn path(&self) -> String {
        join_path(&self.container, self.method.as_deref().unwrap_or_default())
    }

    /// Merged value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Merged value of `key` when it is a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use bedframe::Context;
    /// use serde_json::{Map, json};
    ///
    /// let mut ctx = Context::new("Users", Some("get".into()), Map::new());
    /// ctx.set("verb", json!("GET"));
    /// assert_eq!(ctx.get_str("verb"), Some("GET"));
    /// assert_eq!(ctx.path(), "Users.get");
    /// ```
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Returns `true` when `key` resolved to a value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Set `key`, returning the value it replaced.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.properties.insert(key.into(), value)
    }

    /// All merged properties in key order.
    #[must_use]
    pub const fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// JSON object of the merged properties plus `method`.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut object = self.properties.clone();
        if let Some(method) = &self.method {
            object.insert(String::from("method"), Value::String(method.clone()));
        }
        Value::Object(object)
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.container == other.container
            && self.method == other.method
            && self.properties == other.properties
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("container", &self.container)
            .field("method", &self.method)
            .field("properties", &self.properties)
            .field("executor", &self.executor.as_ref().map(|_| "<executor>"))
            .finish()
    }
}

pub(crate) fn join_path(parent: &str, name: &str) -> String {
    match (parent.is_empty(), name.is_empty()) {
        (true, _) => name.to_owned(),
        (false, true) => parent.to_owned(),
        (false, false) => format!("{parent}.{name}"),
    }
}
