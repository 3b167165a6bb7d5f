use sqlx::PgPool;

use crate::models::locality::{BillingKm, BillingZone};
use crate::services::normalization::normalize;
use crate::utils::errors::{map_unique_violation, AppResult};

/// Master tables: locality → zone and zone → km
pub struct BillingRepository {
    pool: PgPool,
}

impl BillingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every master locality, in id order
    pub async fn list_zones(&self) -> AppResult<Vec<BillingZone>> {
        let zones = sqlx::query_as::<_, BillingZone>(
            "SELECT id, t3_locality, t3_billing_zone, locality_key FROM t3_billing_zones ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(zones)
    }

    /// Every zone rate, in id order
    pub async fn list_rates(&self) -> AppResult<Vec<BillingKm>> {
        let rates = sqlx::query_as::<_, BillingKm>(
            "SELECT id, t3_billing_zone, t3_billing_km, zone_key FROM t3_billing_km ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rates)
    }

    pub async fn find_zone_by_id(&self, id: i64) -> AppResult<Option<BillingZone>> {
        let zone = sqlx::query_as::<_, BillingZone>(
            "SELECT id, t3_locality, t3_billing_zone, locality_key FROM t3_billing_zones WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(zone)
    }

    /// Master locality by name, ignoring case and surrounding whitespace
    pub async fn find_zone_by_name(&self, name: &str) -> AppResult<Option<BillingZone>> {
        let zone = sqlx::query_as::<_, BillingZone>(
            "SELECT id, t3_locality, t3_billing_zone, locality_key FROM t3_billing_zones WHERE locality_key = $1",
        )
        .bind(normalize(Some(name)))
        .fetch_optional(&self.pool)
        .await?;

        Ok(zone)
    }

    pub async fn locality_exists(&self, name: &str) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM t3_billing_zones WHERE locality_key = $1)",
        )
        .bind(normalize(Some(name)))
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Insert a master locality; the id comes from the sequence and the
    /// unique key turns a concurrent duplicate into a conflict
    pub async fn create_zone(&self, locality_name: &str, zone_name: &str) -> AppResult<BillingZone> {
        sqlx::query_as::<_, BillingZone>(
            r#"
            INSERT INTO t3_billing_zones (t3_locality, t3_billing_zone, locality_key)
            VALUES ($1, $2, $3)
            RETURNING id, t3_locality, t3_billing_zone, locality_key
            "#,
        )
        .bind(locality_name)
        .bind(zone_name)
        .bind(normalize(Some(locality_name)))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Locality", locality_name))
    }
}
