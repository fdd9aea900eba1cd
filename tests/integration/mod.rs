//! Integration tests for the modelparams-rs library
//!
//! This module organizes all integration tests that test the library as a whole,
//! rather than individual components.

// A small membrane model wired through the registry
pub mod membrane_model;
