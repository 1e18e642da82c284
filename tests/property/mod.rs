//! Property-based tests for determinism and exclusion guarantees

mod exclusion;
