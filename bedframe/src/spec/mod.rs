//! Specification tree consumed by the builder.
//!
//! A [`Node`] is one level of the tree: arbitrary JSON properties that
//! cascade to descendants, plus the structural fields that decide what the
//! node becomes. Trees are usually written with the builder methods:
//!
//! ```
//! use bedframe::{Context, MergePolicy, Namespace, Node, PropertyTypes};
//! use serde_json::{Value, json};
//!
//! let spec = Node::root()
//!     .with_property_types(PropertyTypes::new().with("url", MergePolicy::SlashCombine))
//!     .with("url", json!("http://host/api"))
//!     .with_executor(|ctx: &Context, _args: &[Value]| json!(ctx.get("url")))
//!     .with_child(
//!         Node::container("Title")
//!             .with_child(Node::leaf("find").with("url", json!("Titles"))),
//!     );
//!
//! let mut api = Namespace::new();
//! bedframe::build(&mut api, &spec)?;
//! let url = api.endpoint("Title.find").map(|find| find.call(&[]));
//! assert_eq!(url, Some(json!("http://host/api/Titles")));
//! # Ok::<_, std::sync::Arc<bedframe::BedframeError>>(())
//! ```
//!
//! Trees can also be loaded from JSON literals with [`from_value`].

mod load;

use std::{fmt, sync::Arc};

use serde_json::{Map, Value};
use tracing::warn;

use crate::{Execute, Executor, MergePolicy, Prepare, Preparer, PropertyTypes};

pub use load::{Registry, from_value};
pub(crate) use load::{field_name, load_node};

/// Literal key holding a node's children.
pub const CHILDREN: &str = "children";
/// Literal key holding a node's merge policy table.
pub const PROPERTY_TYPES: &str = "propertyTypes";
/// Literal key naming a method.
pub const METHOD: &str = "method";
/// Literal key naming a nested namespace.
pub const PROPERTY: &str = "property";
/// Literal key naming the executor.
pub const EXECUTOR: &str = "executor";
/// Literal key naming the preparer.
pub const PREPARER: &str = "preparer";

/// Keys that are never cascaded as ordinary properties.
pub const STRUCTURAL_KEYS: [&str; 6] = [CHILDREN, PROPERTY_TYPES, METHOD, PROPERTY, EXECUTOR, PREPARER];

/// Returns `true` when `key` names a structural field.
#[must_use]
pub fn is_structural(key: &str) -> bool {
    STRUCTURAL_KEYS.contains(&key)
}

/// One level of a specification tree.
#[derive(Clone, Default)]
pub struct Node {
    properties: Map<String, Value>,
    property_types: Option<Arc<PropertyTypes>>,
    method: Option<String>,
    property: Option<String>,
    executor: Option<Executor>,
    preparer: Option<Preparer>,
    children: Option<Vec<Node>>,
}

impl Node {
    /// Create an empty node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a root node. Identical to [`Node::new`]; reads better at call sites.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Create a leaf installed under `method`.
    #[must_use]
    pub fn leaf(method: impl Into<String>) -> Self {
        Self::default().with_method(method)
    }

    /// Create a nested namespace installed under `property`.
    ///
    /// The node only counts as a container once it has children.
    #[must_use]
    pub fn container(property: impl Into<String>) -> Self {
        Self::default().with_property_name(property)
    }

    /// Set a property. Structural names are routed as [`Node::set`] describes.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.set(key, value);
        self
    }

    /// Set the method name.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Set the namespace name.
    #[must_use]
    pub fn with_property_name(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    /// Declare this node's merge policy table.
    #[must_use]
    pub fn with_property_types(mut self, property_types: PropertyTypes) -> Self {
        self.property_types = Some(Arc::new(property_types));
        self
    }

    /// Set the executor from any [`Execute`] implementation.
    #[must_use]
    pub fn with_executor(self, executor: impl Execute + 'static) -> Self {
        self.with_shared_executor(Arc::new(executor))
    }

    /// Set an already shared executor.
    #[must_use]
    pub fn with_shared_executor(mut self, executor: Executor) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Set the preparer from any [`Prepare`] implementation.
    #[must_use]
    pub fn with_preparer(self, preparer: impl Prepare + 'static) -> Self {
        self.with_shared_preparer(Arc::new(preparer))
    }

    /// Set an already shared preparer.
    #[must_use]
    pub fn with_shared_preparer(mut self, preparer: Preparer) -> Self {
        self.preparer = Some(preparer);
        self
    }

    /// Append a child, turning this node into a container or root.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    /// Replace the children with `children`, even when empty.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children = Some(children.into_iter().collect());
        self
    }

    /// Set a property, returning the value it replaced.
    ///
    /// `method` and `property` set the node's names (a string sets, `null`
    /// clears) and `propertyTypes` takes an object of policy names. Values of
    /// the wrong kind for those fields, and `children`, `executor` or
    /// `preparer` (which a bare value cannot describe), are dropped with a
    /// warning; use the dedicated builders for them.
    ///
    /// ```
    /// use bedframe::Node;
    /// use serde_json::json;
    ///
    /// let mut node = Node::new();
    /// node.set("method", json!("get"));
    /// assert_eq!(node.method(), Some("get"));
    /// assert!(node.get("method").is_none());
    /// ```
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let name = key.into();
        match name.as_str() {
            METHOD => replace_name(&mut self.method, &name, value),
            PROPERTY => replace_name(&mut self.property, &name, value),
            PROPERTY_TYPES => {
                if let Value::Object(policies) = value {
                    let types = policies
                        .iter()
                        .map(|(field, policy)| (field.as_str(), MergePolicy::from_literal(policy)))
                        .collect();
                    self.property_types = Some(Arc::new(types));
                } else {
                    warn!(key = %name, "ignoring propertyTypes that is not an object");
                }
                None
            }
            CHILDREN | EXECUTOR | PREPARER => {
                warn!(key = %name, "structural field cannot be set from a value; use the builder");
                None
            }
            _ => self.properties.insert(name, value),
        }
    }

    /// Remove an ordinary property.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.properties.remove(key)
    }

    /// Own (unmerged) value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Own (unmerged) ordinary properties.
    #[must_use]
    pub const fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// Own merge policy table, if declared.
    #[must_use]
    pub fn property_types(&self) -> Option<&Arc<PropertyTypes>> {
        self.property_types.as_ref()
    }

    /// Own method name.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// Own namespace name.
    #[must_use]
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    /// Own executor.
    #[must_use]
    pub const fn executor(&self) -> Option<&Executor> {
        self.executor.as_ref()
    }

    /// Own preparer.
    #[must_use]
    pub const fn preparer(&self) -> Option<&Preparer> {
        self.preparer.as_ref()
    }

    /// Children, or `None` for a leaf.
    #[must_use]
    pub fn children(&self) -> Option<&[Self]> {
        self.children.as_deref()
    }

    /// Mutable access to the children.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Self>> {
        self.children.as_mut()
    }
}

fn replace_name(slot: &mut Option<String>, key: &str, value: Value) -> Option<Value> {
    let previous = match value {
        Value::String(text) => slot.replace(text),
        Value::Null => slot.take(),
        other => {
            warn!(key, received = %other, "ignoring non-string name");
            return None;
        }
    };
    previous.map(Value::String)
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("properties", &self.properties)
            .field("property_types", &self.property_types)
            .field("method", &self.method)
            .field("property", &self.property)
            .field("executor", &self.executor.as_ref().map(|_| "<executor>"))
            .field("preparer", &self.preparer.as_ref().map(|_| "<preparer>"))
            .field("children", &self.children)
            .finish()
    }
}

#[cfg(test)]
mod tests;
