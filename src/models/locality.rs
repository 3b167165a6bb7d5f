//! Locality models
//!
//! Pickup addresses, the master locality → zone table and the zone → km
//! rate table. Rows are correlated by normalized text, not foreign keys.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Row of `t3_localities`: an address and the locality it was mapped to
#[derive(Debug, Clone, FromRow)]
pub struct T3Locality {
    pub id: i64,
    pub address: String,
    pub t3_locality: Option<String>,
    pub locality_id: Option<i64>,
}

/// Characters that do not count as locality text. The pending filter in
/// `LocalityRepository` trims the same set in SQL.
pub const BLANK_CHARS: &[char] = &[' ', '\t', '\n', '\r', '\x0B', '\x0C'];

/// Locality text with blanks trimmed, `None` when nothing is left
pub fn trimmed_locality(locality: Option<&str>) -> Option<&str> {
    locality
        .map(|name| name.trim_matches(BLANK_CHARS))
        .filter(|name| !name.is_empty())
}

impl T3Locality {
    /// Display name, `None` when blank
    pub fn locality_name(&self) -> Option<&str> {
        trimmed_locality(self.t3_locality.as_deref())
    }
}

/// Row of `t3_billing_zones`
#[derive(Debug, Clone, FromRow)]
pub struct BillingZone {
    pub id: i64,
    pub t3_locality: String,
    pub t3_billing_zone: String,
    pub locality_key: String,
}

/// Row of `t3_billing_km`
#[derive(Debug, Clone, FromRow)]
pub struct BillingKm {
    pub id: i64,
    pub t3_billing_zone: String,
    pub t3_billing_km: Decimal,
    pub zone_key: String,
}

/// Whether an address still needs a locality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LocalityStatus {
    Done,
    Pending,
}

impl LocalityStatus {
    /// An address is done as soon as it carries a locality name; zone and km
    /// resolution do not count
    pub fn of(locality: Option<&str>) -> Self {
        match trimmed_locality(locality) {
            Some(_) => LocalityStatus::Done,
            None => LocalityStatus::Pending,
        }
    }
}
