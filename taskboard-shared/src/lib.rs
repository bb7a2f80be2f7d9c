//! # Taskboard Shared Library
//!
//! This crate contains the data model and the persistence gateway used by the
//! Taskboard API server.
//!
//! ## Module Organization
//!
//! - `models`: Users, tasks and the SQL that reads and writes them
//! - `store`: The `Store` trait plus PostgreSQL and in-memory backends
//! - `db`: Connection pool and migration helpers
//! - `error`: Typed persistence errors

pub mod db;
pub mod error;
pub mod models;
pub mod store;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
