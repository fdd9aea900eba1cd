//! Integration tests for units and unit-aware arithmetic

mod arithmetic_tests;
