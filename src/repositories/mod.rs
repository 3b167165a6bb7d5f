//! Repositories
//!
//! SQL access per table. Each repository owns a clone of the pool.

pub mod billing_repository;
pub mod locality_repository;
pub mod mis_report_repository;
pub mod vehicle_repository;
