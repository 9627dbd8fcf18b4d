//! Binds the feature files to the step registry.

use crate::fixtures::{BuildState, build_state};
use rstest_bdd_macros::scenarios;

scenarios!(
    "tests/features/api_build.feature",
    fixtures = [build_state: BuildState]
);
