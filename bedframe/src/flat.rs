//! Flat `namespaces` / `methods` specifications.
//!
//! The flat form predates nested children: a root holds a list of
//! namespaces, each holding a list of methods. Every method is mixed down
//! `root -> namespace -> method`, its preparer runs, and it must then resolve
//! to a `method` name, a `namespace` name and an executor. The endpoint is
//! installed at `target[namespace][method]`.
//!
//! ```
//! use bedframe::{Context, Namespace, Registry, flat::build_flat};
//! use serde_json::{Value, json};
//!
//! let registry = Registry::new()
//!     .with_executor("rest", |ctx: &Context, _args: &[Value]| json!(ctx.get("verb")));
//! let mut cloud = Namespace::new();
//! build_flat(
//!     &mut cloud,
//!     &json!({
//!         "verb": "GET",
//!         "executor": "rest",
//!         "namespaces": [{
//!             "namespace": "Users",
//!             "methods": [{ "method": "create", "verb": "POST" }, { "method": "get" }]
//!         }]
//!     }),
//!     &registry,
//! )?;
//! assert_eq!(cloud.call("Users.create", &[]), Some(json!("POST")));
//! assert_eq!(cloud.call("Users.get", &[]), Some(json!("GET")));
//! # Ok::<_, std::sync::Arc<bedframe::BedframeError>>(())
//! ```

use serde_json::{Map, Value};

use crate::{
    BedframeError, BuildResult, Endpoint, Namespace, Node, Registry,
    build::resolve_leaf,
    merge::{Scope, cascade},
    spec::{field_name, load_node},
};

/// Literal key holding the namespace list.
pub const NAMESPACES: &str = "namespaces";
/// Literal key holding a namespace's method list.
pub const METHODS: &str = "methods";
/// Property naming the namespace a method is installed in.
pub const NAMESPACE: &str = "namespace";

/// A namespace of the flat form and its methods.
#[derive(Clone, Debug, Default)]
pub struct FlatNamespace {
    node: Node,
    methods: Vec<Node>,
}

impl FlatNamespace {
    /// Create a namespace with properties from `node` and the given methods.
    #[must_use]
    pub fn new(node: Node, methods: impl IntoIterator<Item = Node>) -> Self {
        Self {
            node,
            methods: methods.into_iter().collect(),
        }
    }

    /// Namespace-level properties.
    #[must_use]
    pub const fn node(&self) -> &Node {
        &self.node
    }

    /// Methods in declaration order.
    #[must_use]
    pub fn methods(&self) -> &[Node] {
        &self.methods
    }
}

/// A complete flat specification.
#[derive(Clone, Debug, Default)]
pub struct FlatApi {
    root: Node,
    namespaces: Vec<FlatNamespace>,
}

impl FlatApi {
    /// Create a flat specification whose shared properties live on `root`.
    #[must_use]
    pub const fn new(root: Node) -> Self {
        Self {
            root,
            namespaces: Vec::new(),
        }
    }

    /// Append a namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: FlatNamespace) -> Self {
        self.namespaces.push(namespace);
        self
    }

    /// Namespaces in declaration order.
    #[must_use]
    pub fn namespaces(&self) -> &[FlatNamespace] {
        &self.namespaces
    }

    /// Load a flat specification from a JSON literal.
    ///
    /// # Errors
    ///
    /// Returns [`BedframeError::MissingArgument`] when `namespaces` or a
    /// namespace's `methods` is absent, [`BedframeError::WrongType`] when
    /// either is not an array, and any error from [`crate::spec::from_value`].
    pub fn from_value(api: &Value, registry: &Registry) -> BuildResult<Self> {
        let (root, namespaces) = split_list(api, NAMESPACES, "")?;
        let mut flat = Self::new(load_node(&root, registry, "")?);
        for (n, entry) in namespaces.iter().enumerate() {
            let at = format!("{NAMESPACES}[{n}]");
            let (namespace, literals) = split_list(entry, METHODS, &at)?;
            let methods_at = field_name(&at, METHODS);
            let methods = literals
                .iter()
                .enumerate()
                .map(|(m, method)| load_node(method, registry, &format!("{methods_at}[{m}]")))
                .collect::<BuildResult<Vec<_>>>()?;
            flat = flat.with_namespace(FlatNamespace::new(load_node(&namespace, registry, &at)?, methods));
        }
        Ok(flat)
    }

    /// Install every method into `target`.
    ///
    /// Stops at the first error; methods installed before it remain.
    ///
    /// # Errors
    ///
    /// Returns [`BedframeError::MissingArgument`] or
    /// [`BedframeError::WrongType`] when a method lacks a string `method`,
    /// a string `namespace` or an executor after merging,
    /// [`BedframeError::Collision`] on name clashes, and preparer errors.
    pub fn build(&self, target: &mut Namespace) -> BuildResult<()> {
        let root = Scope::root(&self.root);
        for (n, namespace) in self.namespaces.iter().enumerate() {
            let shared = cascade(&root, &namespace.node);
            for (m, method) in namespace.methods.iter().enumerate() {
                let at = format!("{NAMESPACES}[{n}].{METHODS}[{m}]");
                let (name, mut context, executor) = resolve_leaf(
                    cascade(&shared, method),
                    method.method(),
                    "",
                    &[NAMESPACE],
                    &|key: &str| field_name(&at, key),
                )?;
                let container = context.get_str(NAMESPACE).unwrap_or_default().to_owned();
                context.set_container(container.as_str());
                target
                    .namespace_mut(&container, &container)?
                    .install_endpoint(&name, Endpoint::new(context, executor))?;
            }
        }
        Ok(())
    }
}

/// Load and build a flat literal into `target`.
///
/// # Errors
///
/// See [`FlatApi::from_value`] and [`FlatApi::build`].
pub fn build_flat(target: &mut Namespace, api: &Value, registry: &Registry) -> BuildResult<()> {
    FlatApi::from_value(api, registry)?.build(target)
}

/// Split the array under `key` out of the object `value`.
fn split_list(value: &Value, key: &str, at: &str) -> BuildResult<(Value, Vec<Value>)> {
    let Some(object) = value.as_object() else {
        let name = if at.is_empty() { "api" } else { at };
        return Err(BedframeError::wrong_type(name, "object", value).into());
    };
    let mut rest: Map<String, Value> = object.clone();
    let name = field_name(at, key);
    match rest.remove(key) {
        None | Some(Value::Null) => Err(BedframeError::missing(name).into()),
        Some(Value::Array(items)) => Ok((Value::Object(rest), items)),
        Some(other) => Err(BedframeError::wrong_type(name, "array", &other).into()),
    }
}
