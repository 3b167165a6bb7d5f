use axum::{
    body::Bytes,
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::locality_controller::LocalityController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::locality_dto::{
    AddMasterLocalityRequest, BulkSaveRequest, BulkSaveResponse, DropdownLocality,
    LocalityListQuery, LocalityListResponse, NextPendingResponse, SaveMappingRequest,
    SearchPendingQuery, SearchPendingResponse,
};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::parse_json_body;

pub fn create_locality_router() -> Router<AppState> {
    Router::new()
        .route("/localities/", get(list_localities))
        .route("/dropdown-localities/", get(dropdown_localities))
        .route("/next-pending/", get(next_pending))
        .route("/search-pending/", get(search_pending))
        .route("/save-mapping/", post(save_mapping))
        .route("/bulk-save/", post(bulk_save))
        .route("/add-master-locality/", post(add_master_locality))
}

async fn list_localities(
    State(state): State<AppState>,
    Query(query): Query<LocalityListQuery>,
) -> Result<Json<LocalityListResponse>, AppError> {
    let controller = LocalityController::new(state.pool.clone());
    let response = controller.list(query).await?;
    Ok(Json(response))
}

async fn dropdown_localities(
    State(state): State<AppState>,
) -> Result<Json<Vec<DropdownLocality>>, AppError> {
    let controller = LocalityController::new(state.pool.clone());
    let response = controller.dropdown().await?;
    Ok(Json(response))
}

async fn next_pending(
    State(state): State<AppState>,
) -> Result<Json<NextPendingResponse>, AppError> {
    let controller = LocalityController::new(state.pool.clone());
    let response = controller.next_pending().await?;
    Ok(Json(response))
}

async fn search_pending(
    State(state): State<AppState>,
    Query(query): Query<SearchPendingQuery>,
) -> Result<Json<SearchPendingResponse>, AppError> {
    let controller = LocalityController::new(state.pool.clone());
    let response = controller.search_pending(query).await?;
    Ok(Json(response))
}

// POST bodies are read raw: the web client does not always send a JSON content type

async fn save_mapping(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let request: SaveMappingRequest = parse_json_body(&body)?;
    let controller = LocalityController::new(state.pool.clone());
    let response = controller.save_mapping(request).await?;
    Ok(Json(response))
}

async fn bulk_save(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<BulkSaveResponse>, AppError> {
    let request: BulkSaveRequest = parse_json_body(&body)?;
    let controller = LocalityController::new(state.pool.clone());
    let response = controller.bulk_save(request).await?;
    Ok(Json(response))
}

async fn add_master_locality(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let request: AddMasterLocalityRequest = parse_json_body(&body)?;
    let controller = LocalityController::new(state.pool.clone());
    let response = controller.add_master_locality(request).await?;
    Ok(Json(response))
}
