//! Property cascading between a node and its parent.
//!
//! [`cascade`] computes a child's effective [`Scope`] from its parent's
//! effective scope and the child's own [`Node`]. The policy table used for
//! the pair is the child's own `propertyTypes` when it declares one and the
//! parent's effective table otherwise; it is chosen before any property is
//! combined. Structural fields never cascade as ordinary properties.

use std::{borrow::Cow, sync::Arc};

use serde_json::{Map, Value};
use tracing::warn;

use crate::{
    Executor, MergePolicy, Node, Preparer, PropertyTypes,
    spec::{EXECUTOR, PREPARER, is_structural},
};

/// Effective properties, policies and callables of a node.
///
/// Scopes are fresh values built per node; cascading never mutates the parent
/// or the specification.
#[derive(Clone, Default)]
pub struct Scope {
    pub(crate) properties: Map<String, Value>,
    pub(crate) property_types: Option<Arc<PropertyTypes>>,
    pub(crate) executor: Option<Executor>,
    pub(crate) preparer: Option<Preparer>,
}

impl Scope {
    /// Scope of a node with no ancestors: its own values, unmerged.
    #[must_use]
    pub fn root(node: &Node) -> Self {
        cascade(&Self::default(), node)
    }

    /// Effective ordinary properties.
    #[must_use]
    pub const fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// Effective value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Effective policy table.
    #[must_use]
    pub fn property_types(&self) -> Option<&PropertyTypes> {
        self.property_types.as_deref()
    }

    /// Policy governing `key` in this scope.
    #[must_use]
    pub fn policy_for(&self, key: &str) -> MergePolicy {
        self.property_types
            .as_deref()
            .map_or(MergePolicy::OnlyLatest, |types| types.policy_for(key))
    }

    /// Effective executor.
    #[must_use]
    pub const fn executor(&self) -> Option<&Executor> {
        self.executor.as_ref()
    }

    /// Effective preparer.
    #[must_use]
    pub const fn preparer(&self) -> Option<&Preparer> {
        self.preparer.as_ref()
    }
}

/// Compute the effective scope of `child` beneath `parent`.
///
/// # Examples
///
/// ```
/// use bedframe::{MergePolicy, Node, PropertyTypes, merge::{Scope, cascade}};
/// use serde_json::json;
///
/// let root = Node::root()
///     .with_property_types(PropertyTypes::new().with("url", MergePolicy::SlashCombine))
///     .with("url", json!("http://host/api"))
///     .with("verb", json!("GET"));
/// let child = Node::leaf("create").with("url", json!("Users")).with("verb", json!("POST"));
///
/// let scope = cascade(&Scope::root(&root), &child);
/// assert_eq!(scope.get("url"), Some(&json!("http://host/api/Users")));
/// assert_eq!(scope.get("verb"), Some(&json!("POST")));
/// ```
#[must_use]
pub fn cascade(parent: &Scope, child: &Node) -> Scope {
    let property_types = child
        .property_types()
        .cloned()
        .or_else(|| parent.property_types.clone());
    let policy = |key: &str| {
        property_types
            .as_deref()
            .map_or(MergePolicy::OnlyLatest, |types| types.policy_for(key))
    };

    let mut properties: Map<String, Value> = child
        .properties()
        .iter()
        .filter(|(key, _)| !is_structural(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    for (key, inherited) in &parent.properties {
        combine(policy(key), key, inherited, &mut properties);
    }

    Scope {
        properties,
        executor: inherit(policy(EXECUTOR), parent.executor.as_ref(), child.executor()),
        preparer: inherit(policy(PREPARER), parent.preparer.as_ref(), child.preparer()),
        property_types,
    }
}

fn combine(policy: MergePolicy, key: &str, inherited: &Value, properties: &mut Map<String, Value>) {
    match policy {
        MergePolicy::OnlyLatest => {
            if !properties.contains_key(key) {
                properties.insert(key.to_owned(), inherited.clone());
            }
        }
        MergePolicy::SlashCombine => {
            let own = properties.get(key).map_or(Some(Cow::Borrowed("")), slash_part);
            let joined = slash_part(inherited)
                .zip(own)
                .map(|(head, tail)| slash_combine(&head, &tail));
            match joined {
                Some(Some(text)) => {
                    properties.insert(key.to_owned(), Value::String(text));
                }
                Some(None) => {
                    properties.remove(key);
                }
                None => {
                    warn!(property = key, "slash_combine needs scalar values; keeping the latest");
                    combine(MergePolicy::OnlyLatest, key, inherited, properties);
                }
            }
        }
        MergePolicy::Ignore | MergePolicy::Unrecognised => {}
    }
}

fn inherit<T: Clone>(policy: MergePolicy, inherited: Option<&T>, own: Option<&T>) -> Option<T> {
    own.or_else(|| inherited.filter(|_| policy.cascades())).cloned()
}

fn slash_part(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(text) => Some(Cow::Borrowed(text)),
        Value::Null => Some(Cow::Borrowed("")),
        Value::Bool(_) | Value::Number(_) => Some(Cow::Owned(value.to_string())),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Join `parent` and `child` with exactly one `/`.
///
/// Every trailing slash of `parent` and leading slash of `child` is dropped,
/// then empty parts are skipped; when both are empty the result is `None`.
///
/// # Examples
///
/// ```
/// use bedframe::merge::slash_combine;
///
/// assert_eq!(slash_combine("http://host/api", "Titles").as_deref(), Some("http://host/api/Titles"));
/// assert_eq!(slash_combine("http://host/api/", "/Titles").as_deref(), Some("http://host/api/Titles"));
/// assert_eq!(slash_combine("http://host/api//", "Titles").as_deref(), Some("http://host/api/Titles"));
/// assert_eq!(slash_combine("", "Titles").as_deref(), Some("Titles"));
/// assert_eq!(slash_combine("api", "").as_deref(), Some("api"));
/// assert_eq!(slash_combine("", ""), None);
/// ```
#[must_use]
pub fn slash_combine(parent: &str, child: &str) -> Option<String> {
    let head = parent.trim_end_matches('/');
    let tail = child.trim_start_matches('/');
    match (head.is_empty(), tail.is_empty()) {
        (true, true) => None,
        (false, true) => Some(head.to_owned()),
        (true, false) => Some(tail.to_owned()),
        (false, false) => Some(format!("{head}/{tail}")),
    }
}
