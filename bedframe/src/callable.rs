//! Executor and preparer seams.
//!
//! Both traits are blanket-implemented for closures with the matching
//! signature, so most callers never name them:
//!
//! ```
//! use bedframe::{Context, Executor};
//! use serde_json::{Value, json};
//! use std::sync::Arc;
//!
//! let echo: Executor = Arc::new(|ctx: &Context, args: &[Value]| {
//!     json!({ "verb": ctx.get("verb"), "args": args })
//! });
//! # let _ = echo;
//! ```

use std::sync::Arc;

use serde_json::Value;

use crate::{BuildResult, Context};

/// Performs the real work behind an endpoint.
///
/// Implementations receive the endpoint's captured [`Context`] and exactly the
/// arguments passed to [`crate::Endpoint::call`]. Any transport, retry or
/// error reporting is the implementation's own business.
pub trait Execute: Send + Sync {
    /// Run the endpoint with `args`.
    fn execute(&self, context: &Context, args: &[Value]) -> Value;
}

impl<F> Execute for F
where
    F: Fn(&Context, &[Value]) -> Value + Send + Sync,
{
    fn execute(&self, context: &Context, args: &[Value]) -> Value {
        self(context, args)
    }
}

/// Fills in defaults on a method's merged context before it is validated.
///
/// Called exactly once per method, after merging and before the `method` and
/// `executor` checks.
pub trait Prepare: Send + Sync {
    /// Adjust `context` in place.
    ///
    /// # Errors
    ///
    /// Returning an error aborts the build with that error.
    fn prepare(&self, context: &mut Context) -> BuildResult<()>;
}

impl<F> Prepare for F
where
    F: Fn(&mut Context) -> BuildResult<()> + Send + Sync,
{
    fn prepare(&self, context: &mut Context) -> BuildResult<()> {
        self(context)
    }
}

/// Shared executor handle cascaded through the specification tree.
pub type Executor = Arc<dyn Execute>;

/// Shared preparer handle cascaded through the specification tree.
pub type Preparer = Arc<dyn Prepare>;
