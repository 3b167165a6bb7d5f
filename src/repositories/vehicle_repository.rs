use sqlx::PgPool;

use crate::models::vehicle::{NewVehicle, Vehicle};
use crate::utils::errors::{map_unique_violation, AppResult};

/// Vehicle roster
pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, vehicle: NewVehicle) -> AppResult<Vehicle> {
        sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (vehicle_no, contact_no, vehicle_ownership, cab_type, rc_document)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, vehicle_no, contact_no, vehicle_ownership, cab_type, rc_document, created_at
            "#,
        )
        .bind(&vehicle.vehicle_no)
        .bind(&vehicle.contact_no)
        .bind(&vehicle.vehicle_ownership)
        .bind(&vehicle.cab_type)
        .bind(&vehicle.rc_document)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Vehicle", &vehicle.vehicle_no))
    }

    /// Whole roster, newest first
    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, vehicle_no, contact_no, vehicle_ownership, cab_type, rc_document, created_at
            FROM vehicles
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn vehicle_no_exists(&self, vehicle_no: &str) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM vehicles WHERE upper(vehicle_no) = upper($1))",
        )
        .bind(vehicle_no)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }
}
