//! Integration tests for the expression tree and parser

// Tests for building and querying trees
mod tree_tests;

// Tests for parsing expression text
mod parser_tests;
