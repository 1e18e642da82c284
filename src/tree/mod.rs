//! Filesystem hashing
//!
//! Files are streamed through the transform pipeline into an incremental
//! digest. Directories hash the name-sorted `(id, hex)` pairs of their
//! non-excluded children, so traversal order never reaches the digest.

pub mod dir;
pub mod file;
pub mod hasher;
pub mod path;

pub use dir::hash_dir;
pub use file::hash_file;
