//! Shared utilities
//!
//! Error types and the validation helpers used by the controllers.

pub mod errors;
pub mod validation;
