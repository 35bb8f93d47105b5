//! Test helpers for reinhardt-fixtures tests.

#[path = "helpers/log_capture.rs"]
pub mod log_capture;

#[path = "helpers/people.rs"]
pub mod people;
