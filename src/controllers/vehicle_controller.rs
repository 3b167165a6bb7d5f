use std::sync::Arc;

use sqlx::PgPool;
use tracing::{error, info};
use validator::Validate;

use crate::dto::common_dto::ApiResponse;
use crate::dto::vehicle_dto::{CreateVehicleRequest, VehicleListResponse, VehicleResponse};
use crate::models::vehicle::NewVehicle;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::document_storage::{rc_document_key, DocumentStore};
use crate::utils::errors::{conflict_error, AppError};
use crate::utils::validation::{canonical_vehicle_no, non_blank};

pub struct VehicleController {
    repository: VehicleRepository,
    documents: Arc<dyn DocumentStore>,
}

impl VehicleController {
    pub fn new(pool: PgPool, documents: Arc<dyn DocumentStore>) -> Self {
        Self {
            repository: VehicleRepository::new(pool),
            documents,
        }
    }

    /// Register a vehicle; the RC document is uploaded before the row exists
    pub async fn create(&self, request: CreateVehicleRequest) -> Result<ApiResponse<()>, AppError> {
        request.validate()?;

        let vehicle_no = canonical_vehicle_no(&request.vehicle_no);
        if self.repository.vehicle_no_exists(&vehicle_no).await? {
            return Err(conflict_error("Vehicle", &vehicle_no));
        }

        let rc_document = match request.rc_document {
            Some(file) => {
                let key = rc_document_key(&file.file_name);
                self.documents
                    .put(&key, file.bytes, &file.content_type)
                    .await?;
                Some(key)
            }
            None => None,
        };

        let new_vehicle = NewVehicle {
            vehicle_no: vehicle_no.clone(),
            contact_no: non_blank(request.contact_no),
            vehicle_ownership: non_blank(request.vehicle_ownership),
            cab_type: non_blank(request.cab_type),
            rc_document: rc_document.clone(),
        };

        let vehicle = match self.repository.create(new_vehicle).await {
            Ok(vehicle) => vehicle,
            Err(e) => {
                if let Some(key) = &rc_document {
                    error!("❌ Vehicle {} not saved, document '{}' left orphaned", vehicle_no, key);
                }
                return Err(e);
            }
        };

        info!("🚗 Vehicle {} added (id {})", vehicle.vehicle_no, vehicle.id);
        Ok(ApiResponse::message(format!(
            "Vehicle {} added successfully",
            vehicle.vehicle_no
        )))
    }

    pub async fn list(&self) -> Result<VehicleListResponse, AppError> {
        let vehicles = self.repository.list().await?;
        let results = vehicles
            .into_iter()
            .map(|v| VehicleResponse::from_vehicle(v, |key| self.documents.public_url(key)))
            .collect();

        Ok(VehicleListResponse { results })
    }
}
