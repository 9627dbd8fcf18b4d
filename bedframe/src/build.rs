//! Materializing a specification tree into a [`Namespace`].
//!
//! The walk merges each node with its parent (see [`crate::merge`]) and then
//! decides what it becomes:
//!
//! - no `children`: a method, bound as an [`Endpoint`] under its `method`;
//! - `property` and `children`: a nested namespace, filled recursively;
//! - anything else: unrepresented, an error unless the builder is lenient.
//!
//! The root contributes its properties but no namespace of its own; its
//! children land directly in the target.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    BedframeError, BuildOptions, BuildResult, Context, Endpoint, Entry, Executor, Namespace, Node,
    context::join_path,
    merge::{Scope, cascade},
    spec::{CHILDREN, EXECUTOR, METHOD, field_name},
};

/// Builds namespaces from specification trees.
#[derive(Clone, Copy, Debug, Default)]
pub struct Builder {
    options: BuildOptions,
}

impl Builder {
    /// Create a builder with `options`.
    #[must_use]
    pub const fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Options in effect.
    #[must_use]
    pub const fn options(&self) -> BuildOptions {
        self.options
    }

    /// Install every method and namespace described by `root` into `target`.
    ///
    /// The build stops at the first error. Entries installed before the error
    /// stay in `target`; a namespace created for a subtree is attached only
    /// once that subtree has been built.
    ///
    /// # Errors
    ///
    /// Returns [`BedframeError::MissingArgument`] when the root has no
    /// children or a method lacks a `method` name or an executor,
    /// [`BedframeError::Unrepresented`] for malformed nodes in strict mode,
    /// [`BedframeError::Collision`] when an endpoint and a namespace share a
    /// name, and any error returned by a preparer.
    pub fn build(&self, target: &mut Namespace, root: &Node) -> BuildResult<()> {
        Walk {
            options: self.options,
            errors: None,
        }
        .root(target, root)
    }

    /// Check `root` without touching any caller-owned namespace.
    ///
    /// Unlike [`Builder::build`], every problem is collected. Preparers run
    /// exactly as they would during a build.
    ///
    /// # Errors
    ///
    /// Returns the single error found, or [`BedframeError::Aggregate`] when
    /// there are several.
    pub fn validate(&self, root: &Node) -> BuildResult<()> {
        let mut errors = Vec::new();
        let mut scratch = Namespace::new();
        Walk {
            options: self.options,
            errors: Some(&mut errors),
        }
        .root(&mut scratch, root)?;
        BedframeError::try_aggregate(errors).map_or(Ok(()), |err| Err(Arc::new(err)))
    }
}

/// Build `root` into `target` with default (strict) options.
///
/// # Errors
///
/// See [`Builder::build`].
pub fn build(target: &mut Namespace, root: &Node) -> BuildResult<()> {
    Builder::default().build(target, root)
}

/// Run the preparer and check a method's merged scope.
///
/// The preparer sees the inherited executor on the context and may replace
/// or supply it.
///
/// `required` names extra properties that must resolve to strings; `field`
/// maps a key to the location reported in errors.
pub(crate) fn resolve_leaf(
    scope: Scope,
    method: Option<&str>,
    container: &str,
    required: &[&str],
    field: &dyn Fn(&str) -> String,
) -> BuildResult<(String, Context, Executor)> {
    let Scope {
        properties,
        executor: inherited,
        preparer,
        ..
    } = scope;
    let mut context = Context::new(container, method.map(str::to_owned), properties);
    if let Some(shared) = inherited {
        context.set_executor(shared);
    }
    if let Some(preparer) = preparer {
        preparer.prepare(&mut context)?;
    }

    let Some(name) = context.method().map(str::to_owned) else {
        return Err(BedframeError::missing(field(METHOD)).into());
    };
    for &key in required {
        match context.get(key) {
            None | Some(Value::Null) => return Err(BedframeError::missing(field(key)).into()),
            Some(Value::String(_)) => {}
            Some(other) => return Err(BedframeError::wrong_type(field(key), "string", other).into()),
        }
    }
    let Some(executor) = context.take_executor() else {
        return Err(BedframeError::missing(field(EXECUTOR)).into());
    };
    Ok((name, context, executor))
}

#[derive(Clone, Debug, Default)]
struct Location {
    spec: String,
    api: String,
}

impl Location {
    fn child(&self, index: usize) -> Self {
        Self {
            spec: field_name(&self.spec, &format!("{CHILDREN}[{index}]")),
            api: self.api.clone(),
        }
    }

    fn named(&self, name: &str) -> Self {
        Self {
            spec: self.spec.clone(),
            api: join_path(&self.api, name),
        }
    }

    fn field(&self, key: &str) -> String {
        field_name(&self.spec, key)
    }

    fn describe(&self) -> String {
        if self.spec.is_empty() {
            String::from("(root)")
        } else {
            self.spec.clone()
        }
    }
}

struct Walk<'e> {
    options: BuildOptions,
    errors: Option<&'e mut Vec<Arc<BedframeError>>>,
}

impl Walk<'_> {
    fn report(&mut self, err: impl Into<Arc<BedframeError>>) -> BuildResult<()> {
        let shared = err.into();
        match self.errors.as_deref_mut() {
            Some(errors) => {
                errors.push(shared);
                Ok(())
            }
            None => Err(shared),
        }
    }

    fn root(&mut self, target: &mut Namespace, root: &Node) -> BuildResult<()> {
        let at = Location::default();
        if root.method().is_some() || root.property().is_some() {
            self.unrepresented(&at)?;
        }
        let Some(children) = root.children() else {
            return self.report(BedframeError::missing(CHILDREN));
        };
        self.children(target, &Scope::root(root), children, &at)
    }

    fn children(
        &mut self,
        target: &mut Namespace,
        scope: &Scope,
        children: &[Node],
        at: &Location,
    ) -> BuildResult<()> {
        for (index, child) in children.iter().enumerate() {
            self.node(target, scope, child, &at.child(index))?;
        }
        Ok(())
    }

    fn node(
        &mut self,
        target: &mut Namespace,
        parent: &Scope,
        node: &Node,
        at: &Location,
    ) -> BuildResult<()> {
        let scope = cascade(parent, node);
        match (node.children(), node.property()) {
            (None, _) => self.leaf(target, scope, node, at),
            (Some(children), Some(name)) => self.container(target, &scope, name, children, at),
            (Some(_), None) => self.unrepresented(at),
        }
    }

    fn leaf(
        &mut self,
        target: &mut Namespace,
        scope: Scope,
        node: &Node,
        at: &Location,
    ) -> BuildResult<()> {
        let resolved = resolve_leaf(scope, node.method(), &at.api, &[], &|key: &str| at.field(key));
        let (name, context, executor) = match resolved {
            Ok(parts) => parts,
            Err(err) => return self.report(err),
        };
        match target.install_endpoint(&name, Endpoint::new(context, executor)) {
            Ok(()) => Ok(()),
            Err(err) => self.report(err),
        }
    }

    fn container(
        &mut self,
        target: &mut Namespace,
        scope: &Scope,
        name: &str,
        children: &[Node],
        at: &Location,
    ) -> BuildResult<()> {
        let inner = at.named(name);
        match target.entry_mut(name) {
            Some(Entry::Namespace(existing)) => self.children(existing, scope, children, &inner),
            Some(Entry::Endpoint(_)) => self.report(BedframeError::Collision {
                path: inner.api,
                existing: "an endpoint",
            }),
            None => {
                let mut created = Namespace::new();
                self.children(&mut created, scope, children, &inner)?;
                debug!(path = %inner.api, "installed namespace");
                target.attach(name, created);
                Ok(())
            }
        }
    }

    fn unrepresented(&mut self, at: &Location) -> BuildResult<()> {
        if self.options.is_strict() {
            return self.report(BedframeError::Unrepresented {
                path: at.describe(),
            });
        }
        warn!(
            path = %at.describe(),
            "skipping node that is neither a method nor a property container"
        );
        Ok(())
    }
}
