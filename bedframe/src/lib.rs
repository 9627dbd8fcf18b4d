//! Declarative API construction from a cascading specification tree.
//!
//! A specification is a tree of [`Node`]s. Properties declared on a node
//! cascade to its descendants according to per-property [`MergePolicy`]
//! rules; nodes with children become nested [`Namespace`]s and childless
//! nodes become [`Endpoint`]s that call a user-supplied executor with their
//! merged [`Context`]. The crate performs no I/O of its own: executors do the
//! real work.
//!
//! ```
//! use bedframe::{Context, Namespace, Node};
//! use serde_json::{Value, json};
//!
//! let spec = Node::root()
//!     .with("verb", json!("GET"))
//!     .with_executor(|ctx: &Context, args: &[Value]| {
//!         json!({ "verb": ctx.get("verb"), "path": ctx.path(), "args": args })
//!     })
//!     .with_child(
//!         Node::container("Users")
//!             .with_child(Node::leaf("create").with("verb", json!("POST")))
//!             .with_child(Node::leaf("get"))
//!             .with_child(Node::leaf("remove").with("verb", json!("DELETE"))),
//!     );
//!
//! let mut cloud = Namespace::new();
//! bedframe::build(&mut cloud, &spec)?;
//!
//! let reply = cloud.call("Users.create", &[json!({ "user": "dawson" })]);
//! assert_eq!(
//!     reply,
//!     Some(json!({ "verb": "POST", "path": "Users.create", "args": [{ "user": "dawson" }] }))
//! );
//! # Ok::<_, std::sync::Arc<bedframe::BedframeError>>(())
//! ```

mod build;
mod callable;
mod context;
mod error;
pub mod flat;
pub mod merge;
mod namespace;
mod options;
mod policy;
pub mod spec;

pub use build::{Builder, build};
pub use callable::{Execute, Executor, Prepare, Preparer};
pub use context::Context;
pub use error::{AggregatedErrors, BedframeError, BuildResult};
pub use namespace::{Endpoint, Entry, Namespace};
pub use options::BuildOptions;
pub use policy::{MergePolicy, PropertyTypes};
pub use spec::{Node, Registry};
