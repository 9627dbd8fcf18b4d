//! `rstest-bdd` scenarios for `bedframe`.
//!
//! Fixtures live in [`fixtures`], step definitions in [`steps`] and the
//! feature bindings in [`scenarios`].

mod fixtures;
mod scenarios;
mod steps;
