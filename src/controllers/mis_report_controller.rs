use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::dto::common_dto::ApiResponse;
use crate::dto::mis_report_dto::{
    MisReportListQuery, MisReportListResponse, MisReportSummary, SaveMisReportRequest,
};
use crate::models::mis_report::parse_month;
use crate::repositories::mis_report_repository::MisReportRepository;
use crate::utils::errors::AppError;
use crate::utils::validation::non_blank;

pub struct MisReportController {
    repository: MisReportRepository,
}

impl MisReportController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: MisReportRepository::new(pool),
        }
    }

    pub async fn list(&self, query: MisReportListQuery) -> Result<MisReportListResponse, AppError> {
        let year = match non_blank(query.year) {
            Some(raw) => Some(
                raw.parse::<i32>()
                    .map_err(|_| AppError::BadRequest(format!("Invalid year '{}'", raw)))?,
            ),
            None => None,
        };
        let reports = self.repository.list(year).await?;
        Ok(MisReportListResponse {
            results: reports.iter().map(MisReportSummary::from).collect(),
        })
    }

    /// Create the report of a period on first save, update it afterwards
    pub async fn save(
        &self,
        request: SaveMisReportRequest,
    ) -> Result<ApiResponse<MisReportSummary>, AppError> {
        request.validate()?;
        request.validate_stages()?;
        let month = parse_month(&request.billing_month).ok_or_else(|| {
            AppError::BadRequest(format!("Invalid month '{}'", request.billing_month))
        })?;

        let saved = self.repository.upsert(&request.into_report(month)).await?;
        info!(
            "📊 MIS report {} {} saved: {}% ({:?})",
            saved.billing_month,
            saved.billing_year,
            saved.progress(),
            saved.status()
        );

        let message = format!("Report for {} {} saved", saved.billing_month, saved.billing_year);
        Ok(ApiResponse::success_with_message(
            MisReportSummary::from(&saved),
            message,
        ))
    }
}
