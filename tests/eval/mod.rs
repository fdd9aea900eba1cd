//! Integration tests for the dependency evaluator

mod evaluator_tests;
