//! Shared fixtures for the behavioural scenarios.

use std::sync::Arc;

use bedframe::{BedframeError, Namespace, Node};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use test_helpers::Recorder;

/// State carried from the specification through the build to the checks.
#[derive(Debug, Default, ScenarioState)]
pub struct BuildState {
    /// Executor log shared by every endpoint.
    pub recorder: Slot<Recorder>,
    /// Specification under test.
    pub spec: Slot<Node>,
    /// Namespace populated by the build.
    pub api: Slot<Namespace>,
    /// Error returned by the build, if any.
    pub error: Slot<Arc<BedframeError>>,
}

/// Creates an empty build state.
#[fixture]
pub fn build_state() -> BuildState {
    BuildState::default()
}
