use sqlx::PgPool;

use crate::models::locality::T3Locality;
use crate::utils::errors::AppResult;

// Missing, or made only of `BLANK_CHARS` (space, tab, LF, CR, VT, FF)
const PENDING: &str =
    r"(t3_locality IS NULL OR btrim(t3_locality, E' \t\n\r\x0B\x0C') = '')";

/// `%term%` for ILIKE, with the wildcards in the term escaped
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Pickup addresses and their locality mapping
pub struct LocalityRepository {
    pool: PgPool,
}

impl LocalityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One page of addresses, optionally filtered on address or locality text
    pub async fn list_page(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<T3Locality>> {
        let rows = sqlx::query_as::<_, T3Locality>(
            r#"
            SELECT id, address, t3_locality, locality_id
            FROM t3_localities
            WHERE $1::text IS NULL OR address ILIKE $1 OR t3_locality ILIKE $1
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(search.map(like_pattern))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count(&self, search: Option<&str>) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM t3_localities
            WHERE $1::text IS NULL OR address ILIKE $1 OR t3_locality ILIKE $1
            "#,
        )
        .bind(search.map(like_pattern))
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Addresses still waiting for a locality, across the whole table
    pub async fn count_pending(&self, search: Option<&str>) -> AppResult<i64> {
        let query = format!(
            "SELECT COUNT(*) FROM t3_localities WHERE {} AND ($1::text IS NULL OR address ILIKE $1)",
            PENDING
        );
        let result: (i64,) = sqlx::query_as(&query)
            .bind(search.map(like_pattern))
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    /// One page of pending addresses matching `search`
    pub async fn list_pending(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<T3Locality>> {
        let query = format!(
            r#"
            SELECT id, address, t3_locality, locality_id
            FROM t3_localities
            WHERE {} AND ($1::text IS NULL OR address ILIKE $1)
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#,
            PENDING
        );
        let rows = sqlx::query_as::<_, T3Locality>(&query)
            .bind(search.map(like_pattern))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Lowest-id address without a locality
    pub async fn next_pending(&self) -> AppResult<Option<T3Locality>> {
        let query = format!(
            "SELECT id, address, t3_locality, locality_id FROM t3_localities WHERE {} ORDER BY id LIMIT 1",
            PENDING
        );
        let row = sqlx::query_as::<_, T3Locality>(&query)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Lowest-id address that already has a locality
    pub async fn first_mapped(&self) -> AppResult<Option<T3Locality>> {
        let query = format!(
            "SELECT id, address, t3_locality, locality_id FROM t3_localities WHERE NOT {} ORDER BY id LIMIT 1",
            PENDING
        );
        let row = sqlx::query_as::<_, T3Locality>(&query)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Point one address at a master locality; returns whether the row existed
    pub async fn assign(&self, address_id: i64, locality_name: &str, locality_id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE t3_localities SET t3_locality = $2, locality_id = $3 WHERE id = $1",
        )
        .bind(address_id)
        .bind(locality_name)
        .bind(locality_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Point many addresses at one master locality in a single statement;
    /// ids that do not exist are skipped. Returns the rows changed.
    pub async fn assign_many(
        &self,
        address_ids: &[i64],
        locality_name: &str,
        locality_id: i64,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE t3_localities SET t3_locality = $2, locality_id = $3 WHERE id = ANY($1)",
        )
        .bind(address_ids)
        .bind(locality_name)
        .bind(locality_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
