use axum::{
    body::Bytes,
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::mis_report_controller::MisReportController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::mis_report_dto::{
    MisReportListQuery, MisReportListResponse, MisReportSummary, SaveMisReportRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::parse_json_body;

pub fn create_mis_report_router() -> Router<AppState> {
    Router::new().route("/mis-reports/", get(list_reports).post(save_report))
}

async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<MisReportListQuery>,
) -> Result<Json<MisReportListResponse>, AppError> {
    let controller = MisReportController::new(state.pool.clone());
    let response = controller.list(query).await?;
    Ok(Json(response))
}

async fn save_report(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiResponse<MisReportSummary>>, AppError> {
    let request: SaveMisReportRequest = parse_json_body(&body)?;
    let controller = MisReportController::new(state.pool.clone());
    let response = controller.save(request).await?;
    Ok(Json(response))
}
