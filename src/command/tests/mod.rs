//! Unit tests for the command module.
//!
//! Tests are organised by component, covering happy paths, error cases and
//! edge cases for all public APIs.
