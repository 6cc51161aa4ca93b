//! Unit tests for chartboard.

mod engine_tests;
mod perf_tests;
mod processor_tests;
mod settings_tests;
mod snapshot_tests;
