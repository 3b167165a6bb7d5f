//! Services module
//!
//! Business logic on top of the repositories: locality matching, the billing
//! workflow tracker and document storage.

pub mod document_storage;
pub mod locality_matching_service;
pub mod lookup_map;
pub mod normalization;
pub mod workflow_tracker;

pub use document_storage::{DocumentStore, MemoryDocumentStore, S3DocumentStore};
pub use locality_matching_service::LocalityMatchingService;
pub use workflow_tracker::WorkflowTracker;
