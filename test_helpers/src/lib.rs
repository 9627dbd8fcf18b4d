//! Test helpers shared across crates.
//!
//! Provides a recording executor, canned specification literals, and text
//! helpers for behavioural step placeholders.

pub mod recorder;
pub mod specs;
pub mod text;

pub use recorder::{RecordedCall, Recorder};
