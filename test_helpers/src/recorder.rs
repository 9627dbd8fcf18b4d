//! Executor that records every call it receives.
//!
//! # Examples
//!
//! ```
//! use bedframe::{Namespace, Node};
//! use serde_json::json;
//! use bedframe_test_helpers::Recorder;
//!
//! let recorder = Recorder::new();
//! let spec = Node::root()
//!     .with_shared_executor(recorder.executor())
//!     .with_child(Node::leaf("ping").with("verb", json!("HEAD")));
//! let mut api = Namespace::new();
//! bedframe::build(&mut api, &spec)?;
//!
//! let _reply = api.call("ping", &[json!(1)]);
//! let call = recorder.last().expect("one call recorded");
//! assert_eq!(call.path, "ping");
//! assert_eq!(call.context["verb"], json!("HEAD"));
//! assert_eq!(call.args, vec![json!(1)]);
//! # Ok::<_, std::sync::Arc<bedframe::BedframeError>>(())
//! ```

use std::sync::Arc;

use bedframe::{Context, Executor};
use parking_lot::Mutex;
use serde_json::Value;

/// One invocation observed by a [`Recorder`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    /// Dotted path of the endpoint that was called.
    pub path: String,
    /// The endpoint's context as returned by [`Context::to_value`].
    pub context: Value,
    /// Arguments passed to the endpoint.
    pub args: Vec<Value>,
}

/// Shared log of executor invocations.
///
/// Clones share the same log. The executor returns the context value, so
/// callers can also inspect the reply directly.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl Recorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Executor appending to this recorder's log.
    #[must_use]
    pub fn executor(&self) -> Executor {
        let calls = Arc::clone(&self.calls);
        Arc::new(move |ctx: &Context, args: &[Value]| -> Value {
            let context = ctx.to_value();
            calls.lock().push(RecordedCall {
                path: ctx.path(),
                context: context.clone(),
                args: args.to_vec(),
            });
            context
        })
    }

    /// Snapshot of every call so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Most recent call.
    #[must_use]
    pub fn last(&self) -> Option<RecordedCall> {
        self.calls.lock().last().cloned()
    }

    /// Number of calls so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns `true` when nothing has been called.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }
}
