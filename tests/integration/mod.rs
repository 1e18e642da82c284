//! Integration tests for the fingerprinting engine

mod file_hooks;
mod source_aggregation;
