use serde::{Deserialize, Serialize};

use crate::dto::common_dto::{FlexibleId, Pagination};
use crate::models::locality::{LocalityStatus, T3Locality};
use crate::services::locality_matching_service::{MasterLocality, MatchedLocality};

// Query of the locality listing
#[derive(Debug, Default, Deserialize)]
pub struct LocalityListQuery {
    pub page: Option<String>,
    pub search: Option<String>,
}

// Query of the pending-address search
#[derive(Debug, Default, Deserialize)]
pub struct SearchPendingQuery {
    pub q: Option<String>,
    pub page: Option<String>,
}

// Address row with its resolved billing data
#[derive(Debug, Serialize)]
pub struct LocalityRowResponse {
    pub id: i64,
    pub address: String,
    pub locality: Option<String>,
    pub locality_id: Option<i64>,
    pub billing_zone: String,
    pub billing_km: String,
    pub status: LocalityStatus,
}

impl From<MatchedLocality> for LocalityRowResponse {
    fn from(row: MatchedLocality) -> Self {
        Self {
            id: row.id,
            address: row.address,
            locality: row.locality,
            locality_id: row.locality_id,
            billing_zone: row.billing_zone,
            billing_km: row.billing_km,
            status: row.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LocalityListResponse {
    pub results: Vec<LocalityRowResponse>,
    pub global_pending: i64,
    pub pagination: Pagination,
}

// Entry of the master locality picker
#[derive(Debug, Serialize)]
pub struct DropdownLocality {
    pub id: i64,
    pub locality_name: String,
    pub billing_zone: String,
    pub billing_km: String,
}

impl From<MasterLocality> for DropdownLocality {
    fn from(entry: MasterLocality) -> Self {
        Self {
            id: entry.id,
            locality_name: entry.locality_name,
            billing_zone: entry.billing_zone,
            billing_km: entry.billing_km,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PendingAddress {
    pub id: i64,
    pub address: String,
    pub locality: Option<String>,
}

impl From<T3Locality> for PendingAddress {
    fn from(row: T3Locality) -> Self {
        Self {
            locality: row.locality_name().map(str::to_string),
            id: row.id,
            address: row.address,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NextPendingResponse {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PendingAddress>,
}

#[derive(Debug, Serialize)]
pub struct SearchPendingResponse {
    pub results: Vec<PendingAddress>,
    pub pagination: Pagination,
}

// Request to map one address
#[derive(Debug, Deserialize)]
pub struct SaveMappingRequest {
    #[serde(default)]
    pub address_id: Option<FlexibleId>,
    #[serde(default)]
    pub locality_id: Option<FlexibleId>,
}

// Request to map many addresses to the same locality
#[derive(Debug, Deserialize)]
pub struct BulkSaveRequest {
    #[serde(default)]
    pub address_ids: Vec<FlexibleId>,
    #[serde(default)]
    pub locality_id: Option<FlexibleId>,
}

#[derive(Debug, Serialize)]
pub struct BulkSaveResponse {
    pub success: bool,
    pub count: usize,
}

// Request to add a master locality under a zone
#[derive(Debug, Deserialize)]
pub struct AddMasterLocalityRequest {
    #[serde(default)]
    pub locality_name: Option<String>,
    #[serde(default)]
    pub zone_name: Option<String>,
}
