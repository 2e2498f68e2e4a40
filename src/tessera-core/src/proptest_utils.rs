//! Property-based tests for the core value model and naming helpers.
