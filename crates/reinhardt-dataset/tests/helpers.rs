//! Test helpers for reinhardt-dataset tests.

#[path = "helpers/fixture_tree.rs"]
pub mod fixture_tree;
