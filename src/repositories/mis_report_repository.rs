use sqlx::PgPool;

use crate::models::mis_report::MisReport;
use crate::utils::errors::AppResult;

const COLUMNS: &str = r#"
    id, billing_year, billing_month,
    stage1_start_date, stage1_end_date, stage1_locality_set, stage1_gps_check,
    stage2_start_date, stage2_end_date, stage2_locality_set, stage2_gps_check,
    stage3_start_date, stage3_end_date, stage3_locality_set, stage3_gps_check,
    final_mis_status, bill_approval_status, created_at
"#;

/// MIS reports, one per billing period
pub struct MisReportRepository {
    pool: PgPool,
}

impl MisReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_period(&self, year: i32, month_name: &str) -> AppResult<Option<MisReport>> {
        let query = format!(
            "SELECT {} FROM mis_reports WHERE billing_year = $1 AND billing_month = $2",
            COLUMNS
        );
        let report = sqlx::query_as::<_, MisReport>(&query)
            .bind(year)
            .bind(month_name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(report)
    }

    /// All reports, optionally for one year
    pub async fn list(&self, year: Option<i32>) -> AppResult<Vec<MisReport>> {
        let query = format!(
            "SELECT {} FROM mis_reports WHERE $1::int IS NULL OR billing_year = $1 ORDER BY billing_year DESC, id DESC",
            COLUMNS
        );
        let reports = sqlx::query_as::<_, MisReport>(&query)
            .bind(year)
            .fetch_all(&self.pool)
            .await?;

        Ok(reports)
    }

    /// Create the report of a period, or overwrite its stage fields
    pub async fn upsert(&self, report: &MisReport) -> AppResult<MisReport> {
        let query = format!(
            r#"
            INSERT INTO mis_reports (
                billing_year, billing_month,
                stage1_start_date, stage1_end_date, stage1_locality_set, stage1_gps_check,
                stage2_start_date, stage2_end_date, stage2_locality_set, stage2_gps_check,
                stage3_start_date, stage3_end_date, stage3_locality_set, stage3_gps_check,
                final_mis_status, bill_approval_status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (billing_year, billing_month) DO UPDATE SET
                stage1_start_date = EXCLUDED.stage1_start_date,
                stage1_end_date = EXCLUDED.stage1_end_date,
                stage1_locality_set = EXCLUDED.stage1_locality_set,
                stage1_gps_check = EXCLUDED.stage1_gps_check,
                stage2_start_date = EXCLUDED.stage2_start_date,
                stage2_end_date = EXCLUDED.stage2_end_date,
                stage2_locality_set = EXCLUDED.stage2_locality_set,
                stage2_gps_check = EXCLUDED.stage2_gps_check,
                stage3_start_date = EXCLUDED.stage3_start_date,
                stage3_end_date = EXCLUDED.stage3_end_date,
                stage3_locality_set = EXCLUDED.stage3_locality_set,
                stage3_gps_check = EXCLUDED.stage3_gps_check,
                final_mis_status = EXCLUDED.final_mis_status,
                bill_approval_status = EXCLUDED.bill_approval_status
            RETURNING {}
            "#,
            COLUMNS
        );

        let saved = sqlx::query_as::<_, MisReport>(&query)
            .bind(report.billing_year)
            .bind(&report.billing_month)
            .bind(report.stage1_start_date)
            .bind(report.stage1_end_date)
            .bind(report.stage1_locality_set)
            .bind(report.stage1_gps_check)
            .bind(report.stage2_start_date)
            .bind(report.stage2_end_date)
            .bind(report.stage2_locality_set)
            .bind(report.stage2_gps_check)
            .bind(report.stage3_start_date)
            .bind(report.stage3_end_date)
            .bind(report.stage3_locality_set)
            .bind(report.stage3_gps_check)
            .bind(report.final_mis_status)
            .bind(report.bill_approval_status)
            .fetch_one(&self.pool)
            .await?;

        Ok(saved)
    }
}
