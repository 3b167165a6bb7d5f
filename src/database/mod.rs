//! Database module
//!
//! PostgreSQL connection handling and schema migrations.

pub mod connection;

pub use connection::{connect, mask_database_url, ping, run_migrations};
