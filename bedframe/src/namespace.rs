//! Target object graph: namespaces of endpoints.

use std::{collections::BTreeMap, fmt, sync::Arc};

use serde_json::{Map, Value};
use tracing::debug;

use crate::{BedframeError, Context, Executor};

/// Bound callable produced for every method in a specification.
///
/// Holds the executor and an immutable snapshot of the method's merged
/// [`Context`]. Cloning is cheap and clones share the snapshot.
#[derive(Clone)]
pub struct Endpoint {
    context: Arc<Context>,
    executor: Executor,
}

impl Endpoint {
    /// Bind `executor` to `context`.
    #[must_use]
    pub fn new(context: Context, executor: Executor) -> Self {
        Self {
            context: Arc::new(context),
            executor,
        }
    }

    /// Invoke the executor with `args` and the captured context.
    #[must_use]
    pub fn call(&self, args: &[Value]) -> Value {
        self.executor.execute(&self.context, args)
    }

    /// Captured execution context.
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Dotted path of the endpoint.
    #[must_use]
    pub fn path(&self) -> String {
        self.context.path()
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.context == other.context
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("context", &self.context)
            .field("executor", &"<executor>")
            .finish()
    }
}

/// Entry installed in a [`Namespace`].
#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    /// A nested namespace.
    Namespace(Namespace),
    /// A callable method.
    Endpoint(Endpoint),
}

impl Entry {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Namespace(_) => "a namespace",
            Self::Endpoint(_) => "an endpoint",
        }
    }
}

/// Container of named endpoints and nested namespaces.
///
/// The builder only ever adds entries; existing namespaces are reused rather
/// than replaced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Namespace {
    entries: BTreeMap<String, Entry>,
}

impl Namespace {
    /// Create an empty namespace.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Entry directly under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// Nested namespace directly under `name`.
    #[must_use]
    pub fn namespace(&self, name: &str) -> Option<&Self> {
        match self.get(name)? {
            Entry::Namespace(namespace) => Some(namespace),
            Entry::Endpoint(_) => None,
        }
    }

    /// Entry at the dotted `path`, e.g. `Title.AudioFormats`.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&Entry> {
        let (parent, name) = match path.rsplit_once('.') {
            Some((parent, name)) => (self.resolve(parent)?, name),
            None => (self, path),
        };
        parent.get(name)
    }

    /// Endpoint at the dotted `path`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bedframe::{Context, Namespace, Node};
    /// use serde_json::{Value, json};
    ///
    /// let spec = Node::root()
    ///     .with_executor(|ctx: &Context, _args: &[Value]| json!(ctx.path()))
    ///     .with_child(Node::container("Users").with_child(Node::leaf("get")));
    /// let mut api = Namespace::new();
    /// bedframe::build(&mut api, &spec)?;
    /// assert!(api.endpoint("Users.get").is_some());
    /// assert!(api.endpoint("Users").is_none());
    /// # Ok::<_, std::sync::Arc<bedframe::BedframeError>>(())
    /// ```
    #[must_use]
    pub fn endpoint(&self, path: &str) -> Option<&Endpoint> {
        match self.lookup(path)? {
            Entry::Endpoint(endpoint) => Some(endpoint),
            Entry::Namespace(_) => None,
        }
    }

    /// Call the endpoint at `path`, or return `None` when there is none.
    #[must_use]
    pub fn call(&self, path: &str, args: &[Value]) -> Option<Value> {
        self.endpoint(path).map(|endpoint| endpoint.call(args))
    }

    /// Iterate over the direct entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Dotted paths of every endpoint below this namespace, in name order.
    #[must_use]
    pub fn endpoint_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_paths("", &mut paths);
        paths
    }

    /// Number of direct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing has been installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON summary of the graph: namespaces become objects and endpoints
    /// their context as returned by [`Context::to_value`].
    #[must_use]
    pub fn shape(&self) -> Value {
        let object: Map<String, Value> = self
            .entries
            .iter()
            .map(|(name, entry)| {
                let value = match entry {
                    Entry::Namespace(namespace) => namespace.shape(),
                    Entry::Endpoint(endpoint) => endpoint.context().to_value(),
                };
                (name.clone(), value)
            })
            .collect();
        Value::Object(object)
    }

    /// Install `endpoint` under `name`.
    ///
    /// A previous endpoint of the same name is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`BedframeError::Collision`] when `name` holds a namespace.
    pub fn install_endpoint(&mut self, name: &str, endpoint: Endpoint) -> Result<(), BedframeError> {
        if let Some(existing @ Entry::Namespace(_)) = self.entries.get(name) {
            return Err(BedframeError::Collision {
                path: endpoint.path(),
                existing: existing.kind(),
            });
        }
        let path = endpoint.path();
        if self.entries.insert(name.to_owned(), Entry::Endpoint(endpoint)).is_some() {
            debug!(%path, "replaced endpoint");
        } else {
            debug!(%path, "installed endpoint");
        }
        Ok(())
    }

    /// Namespace under `name`, creating it when absent.
    ///
    /// # Errors
    ///
    /// Returns [`BedframeError::Collision`] when `name` holds an endpoint;
    /// `path` is used in the error.
    pub fn namespace_mut(&mut self, name: &str, path: &str) -> Result<&mut Self, BedframeError> {
        let entry = self
            .entries
            .entry(name.to_owned())
            .or_insert_with(|| Entry::Namespace(Self::new()));
        match entry {
            Entry::Namespace(namespace) => Ok(namespace),
            Entry::Endpoint(_) => Err(BedframeError::Collision {
                path: path.to_owned(),
                existing: "an endpoint",
            }),
        }
    }

    pub(crate) fn entry_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.entries.get_mut(name)
    }

    pub(crate) fn attach(&mut self, name: &str, namespace: Self) {
        self.entries.insert(name.to_owned(), Entry::Namespace(namespace));
    }

    fn resolve(&self, path: &str) -> Option<&Self> {
        path.split('.')
            .try_fold(self, |namespace, name| namespace.namespace(name))
    }

    fn collect_paths(&self, prefix: &str, paths: &mut Vec<String>) {
        for (name, entry) in &self.entries {
            let path = crate::context::join_path(prefix, name);
            match entry {
                Entry::Namespace(namespace) => namespace.collect_paths(&path, paths),
                Entry::Endpoint(_) => paths.push(path),
            }
        }
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests panic to surface broken fixtures"
)]
mod tests {
    use super::{Endpoint, Entry, Namespace};
    use crate::{BedframeError, Context, Executor};
    use serde_json::{Map, Value, json};
    use std::sync::Arc;

    fn endpoint(container: &str, method: &str) -> Endpoint {
        let executor: Executor = Arc::new(|ctx: &Context, _: &[Value]| json!(ctx.path()));
        Endpoint::new(Context::new(container, Some(method.to_owned()), Map::new()), executor)
    }

    #[test]
    fn lookup_resolves_dotted_paths() {
        let mut root = Namespace::new();
        let title = root.namespace_mut("Title", "Title").expect("fresh namespace");
        let awards = title.namespace_mut("Awards", "Title.Awards").expect("fresh namespace");
        awards
            .install_endpoint("find", endpoint("Title.Awards", "find"))
            .expect("install");

        assert!(matches!(root.lookup("Title.Awards"), Some(Entry::Namespace(_))));
        assert_eq!(root.call("Title.Awards.find", &[]), Some(json!("Title.Awards.find")));
        assert!(root.lookup("Title.Missing.find").is_none());
        assert_eq!(root.endpoint_paths(), ["Title.Awards.find"]);
    }

    #[test]
    fn namespace_mut_reuses_existing_namespace() {
        let mut root = Namespace::new();
        root.namespace_mut("Users", "Users")
            .expect("fresh")
            .install_endpoint("get", endpoint("Users", "get"))
            .expect("install");
        let users = root.namespace_mut("Users", "Users").expect("existing");
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn endpoint_cannot_replace_namespace() {
        let mut root = Namespace::new();
        root.namespace_mut("Users", "Users").expect("fresh");
        let err = root
            .install_endpoint("Users", endpoint("", "Users"))
            .expect_err("namespace occupies the name");
        assert!(matches!(err, BedframeError::Collision { existing: "a namespace", .. }));
    }

    #[test]
    fn namespace_cannot_replace_endpoint() {
        let mut root = Namespace::new();
        root.install_endpoint("Users", endpoint("", "Users")).expect("install");
        let err = root.namespace_mut("Users", "Users").expect_err("endpoint occupies the name");
        assert!(matches!(err, BedframeError::Collision { existing: "an endpoint", .. }));
    }

    #[test]
    fn shape_lists_contexts() {
        let mut root = Namespace::new();
        root.install_endpoint("ping", endpoint("", "ping")).expect("install");
        assert_eq!(root.shape(), json!({ "ping": { "method": "ping" } }));
    }
}
