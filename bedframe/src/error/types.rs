//! Primary error enum for specification building.

use std::sync::Arc;

use thiserror::Error;

use super::aggregate::AggregatedErrors;

/// Shared result alias used throughout the crate.
///
/// Errors are reference counted so validation runs can collect them into an
/// [`AggregatedErrors`] without cloning.
pub type BuildResult<T> = Result<T, Arc<BedframeError>>;

/// Errors raised while turning a specification into a namespace.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BedframeError {
    /// A required structural field was absent after merging.
    #[error("Argument {name} was not provided")]
    MissingArgument {
        /// Location of the missing field, e.g. `children[0].executor`.
        name: String,
    },

    /// A structural field was present but held the wrong kind of value.
    #[error("Argument {name} was an unexpected type! Expected: {expected}, Received: {received}")]
    WrongType {
        /// Location of the offending field.
        name: String,
        /// Kind of value the field requires.
        expected: &'static str,
        /// Kind of value that was supplied.
        received: &'static str,
    },

    /// A node declared children without a `property` to install them under.
    #[error("node '{path}' is neither a method nor a property container")]
    Unrepresented {
        /// Location of the node in the specification.
        path: String,
    },

    /// An endpoint and a namespace competed for the same name.
    #[error("'{path}' is already bound to {existing}")]
    Collision {
        /// Dotted API path where the clash occurred.
        path: String,
        /// Kind of entry already installed at `path`.
        existing: &'static str,
    },

    /// A literal referred to an executor or preparer that was never registered.
    #[error("no {kind} registered under '{name}'")]
    Unregistered {
        /// Either `executor` or `preparer`.
        kind: &'static str,
        /// Name looked up in the registry.
        name: String,
    },

    /// A preparer rejected the merged context of a method.
    #[error("Validation failed for '{key}': {message}")]
    Validation {
        /// Property that failed validation.
        key: String,
        /// Human-readable explanation of the failure.
        message: String,
    },

    /// Several errors collected by a validation pass.
    #[error("multiple specification errors:\n{0}")]
    Aggregate(Box<AggregatedErrors>),
}
