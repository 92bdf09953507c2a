//! Unit tests for the session module.
//!
//! Tests are organised by component, covering happy paths, error cases and
//! edge cases for all public APIs.

mod cost_query_tests;
mod fixtures;
