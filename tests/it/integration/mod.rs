//! Integration tests for chartboard.
//!
//! These tests verify the interaction between multiple components
//! and test complete workflows end-to-end.

mod concurrency_tests;
mod file_loading_tests;
mod pipeline_tests;
