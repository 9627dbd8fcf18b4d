//! Error types produced while materializing an API from a specification.

mod aggregate;
mod constructors;
mod types;

pub use aggregate::AggregatedErrors;
pub use types::{BedframeError, BuildResult};
