//! Unit tests for dme-verify
//!
//! These tests use mocked ports and run fast without external I/O.

mod property_tests;
