//! Integration tests for the parameter system
//!
//! These tests verify that the parameter system behaves correctly in various scenarios.

// Tests for Param, OptionParam and ConstParam
mod param_tests;

// Tests for ScalarParam, ArrayParam and SlaveParam
mod numeric_tests;

// Tests for repr and from_repr
mod repr_tests;

// Tests for the SymbolRegistry
mod registry_tests;
