//! Integration tests for the code printer
//!
//! These tests render the same expressions for every dialect.

// Tests for per-dialect rendering
mod dialect_tests;
