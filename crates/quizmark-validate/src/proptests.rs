//! Property-based tests for cross-document checks.
