//! HTTP middleware
//!
//! Cross-origin settings for the web client.

pub mod cors;

pub use cors::cors_middleware_with_origins;
