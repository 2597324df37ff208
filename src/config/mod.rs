//! Configuration model for mocking sessions.
//!
//! This module defines the SessionConfig struct, usually read from a
//! `strictmock.yaml` next to the tests. It supports forward-compatible YAML
//! parsing (unknown fields are ignored), defaults for every field, and
//! validation of config values.

mod model;
mod operations;


// Re-export public API
pub use model::SessionConfig;
