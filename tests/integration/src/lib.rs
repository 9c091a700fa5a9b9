//! Integration test utilities for the ArchiCanvas API
//!
//! Spawns the real router on an ephemeral port, backed by the in-memory store and
//! temporary asset directories, and talks to it over HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
