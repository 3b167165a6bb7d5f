//! Data models
//!
//! Structs that map one-to-one onto the PostgreSQL tables.

pub mod locality;
pub mod mis_report;
pub mod vehicle;
