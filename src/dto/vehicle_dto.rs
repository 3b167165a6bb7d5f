use serde::Serialize;
use validator::Validate;

use crate::models::vehicle::Vehicle;
use crate::utils::validation::{validate_phone, validate_vehicle_no};

/// File part of an upload form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

// Fields of the add-vehicle form, collected from multipart parts
#[derive(Debug, Default, Validate)]
pub struct CreateVehicleRequest {
    #[validate(custom = "validate_vehicle_no")]
    pub vehicle_no: String,
    #[validate(custom = "validate_phone")]
    pub contact_no: Option<String>,
    #[validate(length(max = 50))]
    pub vehicle_ownership: Option<String>,
    #[validate(length(max = 50))]
    pub cab_type: Option<String>,
    pub rc_document: Option<UploadedFile>,
}

// Vehicle as listed in the roster
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: i64,
    pub vehicle_no: String,
    pub contact_no: Option<String>,
    pub ownership: Option<String>,
    pub cab_type: Option<String>,
    /// Public URL of the RC document
    pub rc_document: Option<String>,
}

impl VehicleResponse {
    pub fn from_vehicle(vehicle: Vehicle, document_url: impl Fn(&str) -> String) -> Self {
        Self {
            rc_document: vehicle.rc_document.as_deref().map(document_url),
            id: vehicle.id,
            vehicle_no: vehicle.vehicle_no,
            contact_no: vehicle.contact_no,
            ownership: vehicle.vehicle_ownership,
            cab_type: vehicle.cab_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VehicleListResponse {
    pub results: Vec<VehicleResponse>,
}
