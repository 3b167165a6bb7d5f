use axum::{
    extract::{
        multipart::{Field, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    routing::{get, post},
    Json, Router,
};

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UploadedFile, VehicleListResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::require_text;

pub fn create_vehicle_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/vehicles/", get(list_vehicles))
        .route(
            "/add-vehicle/",
            post(add_vehicle).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}

async fn list_vehicles(
    State(state): State<AppState>,
) -> Result<Json<VehicleListResponse>, AppError> {
    let controller = VehicleController::new(state.pool.clone(), state.documents.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn add_vehicle(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let multipart = multipart.map_err(rejected_form)?;
    let request = read_vehicle_form(multipart).await?;
    let controller = VehicleController::new(state.pool.clone(), state.documents.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

/// Collect the add-vehicle form; unknown parts are ignored
async fn read_vehicle_form(mut multipart: Multipart) -> Result<CreateVehicleRequest, AppError> {
    let mut vehicle_no = None;
    let mut request = CreateVehicleRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "vehicle_no" => vehicle_no = Some(field_text(field).await?),
            "contact_no" => request.contact_no = Some(field_text(field).await?),
            "vehicle_ownership" => request.vehicle_ownership = Some(field_text(field).await?),
            "cab_type" => request.cab_type = Some(field_text(field).await?),
            "rc_document" => request.rc_document = read_file(field).await?,
            _ => {}
        }
    }

    request.vehicle_no = require_text(vehicle_no, "vehicle_no")?;
    request.contact_no = request.contact_no.filter(|c| !c.trim().is_empty());
    Ok(request)
}

async fn field_text(field: Field<'_>) -> Result<String, AppError> {
    field.text().await.map_err(multipart_error)
}

/// File part, or `None` when the browser sent an empty file input
async fn read_file(field: Field<'_>) -> Result<Option<UploadedFile>, AppError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = field.bytes().await.map_err(multipart_error)?;

    if file_name.is_empty() && bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(UploadedFile {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    }))
}

fn rejected_form(rejection: MultipartRejection) -> AppError {
    AppError::BadRequest(format!("Invalid multipart form: {}", rejection.body_text()))
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart form: {}", e))
}
