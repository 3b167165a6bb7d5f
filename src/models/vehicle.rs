//! Vehicle model
//!
//! Roster entry keyed by registration number, with an optional RC document
//! stored in object storage.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of `vehicles`
#[derive(Debug, Clone, FromRow)]
pub struct Vehicle {
    pub id: i64,
    pub vehicle_no: String,
    pub contact_no: Option<String>,
    pub vehicle_ownership: Option<String>,
    pub cab_type: Option<String>,
    /// Object key of the uploaded RC document
    pub rc_document: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new vehicle, already validated
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub vehicle_no: String,
    pub contact_no: Option<String>,
    pub vehicle_ownership: Option<String>,
    pub cab_type: Option<String>,
    pub rc_document: Option<String>,
}
