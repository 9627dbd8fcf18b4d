//! Loading specification trees from JSON literals.
//!
//! Literals cannot carry closures, so `executor` and `preparer` hold names
//! that are resolved against a [`Registry`].

use std::{collections::BTreeMap, fmt, sync::Arc};

use serde_json::Value;

use crate::{BedframeError, BuildResult, Execute, Executor, MergePolicy, Prepare, Preparer, PropertyTypes};

use super::{CHILDREN, EXECUTOR, METHOD, Node, PREPARER, PROPERTY, PROPERTY_TYPES};

/// Named executors and preparers referenced from literals.
#[derive(Clone, Default)]
pub struct Registry {
    executors: BTreeMap<String, Executor>,
    preparers: BTreeMap<String, Preparer>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `executor` under `name`.
    #[must_use]
    pub fn with_executor(mut self, name: impl Into<String>, executor: impl Execute + 'static) -> Self {
        self.executors.insert(name.into(), Arc::new(executor));
        self
    }

    /// Register an already shared executor under `name`.
    #[must_use]
    pub fn with_shared_executor(mut self, name: impl Into<String>, executor: Executor) -> Self {
        self.executors.insert(name.into(), executor);
        self
    }

    /// Register `preparer` under `name`.
    #[must_use]
    pub fn with_preparer(mut self, name: impl Into<String>, preparer: impl Prepare + 'static) -> Self {
        self.preparers.insert(name.into(), Arc::new(preparer));
        self
    }

    /// Executor registered under `name`.
    #[must_use]
    pub fn executor(&self, name: &str) -> Option<&Executor> {
        self.executors.get(name)
    }

    /// Preparer registered under `name`.
    #[must_use]
    pub fn preparer(&self, name: &str) -> Option<&Preparer> {
        self.preparers.get(name)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("executors", &self.executors.keys().collect::<Vec<_>>())
            .field("preparers", &self.preparers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Convert a JSON literal into a [`Node`] tree.
///
/// Structural keys are typed: `children` must be an array of objects,
/// `method` and `property` strings, `propertyTypes` an object of policy
/// names, and `executor` / `preparer` strings naming registry entries. A
/// `null` structural value counts as absent. Every other key becomes an
/// ordinary property.
///
/// # Examples
///
/// ```
/// use bedframe::{Context, Namespace, Registry, spec::from_value};
/// use serde_json::{Value, json};
///
/// let registry = Registry::new()
///     .with_executor("echo", |ctx: &Context, _args: &[Value]| ctx.to_value());
/// let root = from_value(
///     &json!({
///         "executor": "echo",
///         "verb": "GET",
///         "children": [{ "property": "Users", "children": [{ "method": "get" }] }]
///     }),
///     &registry,
/// )?;
///
/// let mut api = Namespace::new();
/// bedframe::build(&mut api, &root)?;
/// assert_eq!(
///     api.call("Users.get", &[]),
///     Some(json!({ "method": "get", "verb": "GET" }))
/// );
/// # Ok::<_, std::sync::Arc<bedframe::BedframeError>>(())
/// ```
///
/// # Errors
///
/// Returns [`BedframeError::WrongType`] for mistyped structural fields and
/// [`BedframeError::Unregistered`] for unknown executor or preparer names.
pub fn from_value(value: &Value, registry: &Registry) -> BuildResult<Node> {
    load_node(value, registry, "")
}

/// Like [`from_value`], reporting field locations below `at`.
pub(crate) fn load_node(value: &Value, registry: &Registry, at: &str) -> BuildResult<Node> {
    let Some(object) = value.as_object() else {
        let name = if at.is_empty() { "specification" } else { at };
        return Err(BedframeError::wrong_type(name, "object", value).into());
    };

    let mut node = Node::new();
    for (key, field) in object {
        if field.is_null() && super::is_structural(key) {
            continue;
        }
        let name = field_name(at, key);
        node = match key.as_str() {
            CHILDREN => node.with_children(load_children(field, registry, &name)?),
            PROPERTY_TYPES => node.with_property_types(load_property_types(field, &name)?),
            METHOD => node.with_method(expect_str(field, &name)?),
            PROPERTY => node.with_property_name(expect_str(field, &name)?),
            EXECUTOR => {
                let executor = lookup(registry.executor(expect_str(field, &name)?), EXECUTOR, field)?;
                node.with_shared_executor(executor)
            }
            PREPARER => {
                let preparer = lookup(registry.preparer(expect_str(field, &name)?), PREPARER, field)?;
                node.with_shared_preparer(preparer)
            }
            _ => node.with(key.clone(), field.clone()),
        };
    }
    Ok(node)
}

fn load_children(value: &Value, registry: &Registry, name: &str) -> BuildResult<Vec<Node>> {
    let Some(items) = value.as_array() else {
        return Err(BedframeError::wrong_type(name, "array", value).into());
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| load_node(item, registry, &format!("{name}[{index}]")))
        .collect()
}

fn load_property_types(value: &Value, name: &str) -> BuildResult<PropertyTypes> {
    let Some(object) = value.as_object() else {
        return Err(BedframeError::wrong_type(name, "object", value).into());
    };
    Ok(object
        .iter()
        .map(|(key, policy)| (key.as_str(), MergePolicy::from_literal(policy)))
        .collect())
}

fn expect_str<'v>(value: &'v Value, name: &str) -> BuildResult<&'v str> {
    value
        .as_str()
        .ok_or_else(|| BedframeError::wrong_type(name, "string", value).into())
}

fn lookup<T: Clone>(found: Option<&T>, kind: &'static str, literal: &Value) -> BuildResult<T> {
    found.cloned().ok_or_else(|| {
        Arc::new(BedframeError::Unregistered {
            kind,
            name: literal.as_str().unwrap_or_default().to_owned(),
        })
    })
}

pub(crate) fn field_name(at: &str, key: &str) -> String {
    if at.is_empty() {
        key.to_owned()
    } else {
        format!("{at}.{key}")
    }
}
