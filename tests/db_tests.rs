//! Controller tests against a real PostgreSQL database, one fresh migrated
//! database per test (`DATABASE_URL` must point at a server)

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use sqlx::PgPool;

use billing_tracker::controllers::dashboard_controller::DashboardController;
use billing_tracker::controllers::locality_controller::LocalityController;
use billing_tracker::controllers::mis_report_controller::MisReportController;
use billing_tracker::controllers::vehicle_controller::VehicleController;
use billing_tracker::dto::common_dto::FlexibleId;
use billing_tracker::dto::dashboard_dto::DashboardQuery;
use billing_tracker::dto::locality_dto::{
    AddMasterLocalityRequest, BulkSaveRequest, LocalityListQuery, SaveMappingRequest,
    SearchPendingQuery,
};
use billing_tracker::dto::mis_report_dto::{MisReportListQuery, SaveMisReportRequest};
use billing_tracker::dto::vehicle_dto::{CreateVehicleRequest, UploadedFile};
use billing_tracker::models::locality::LocalityStatus;
use billing_tracker::models::mis_report::WorkflowStatus;
use billing_tracker::repositories::billing_repository::BillingRepository;
use billing_tracker::services::document_storage::MemoryDocumentStore;
use billing_tracker::utils::errors::AppError;

async fn add_zone(pool: &PgPool, locality: &str, zone: &str) -> i64 {
    BillingRepository::new(pool.clone())
        .create_zone(locality, zone)
        .await
        .unwrap()
        .id
}

async fn add_rate(pool: &PgPool, zone: &str, km: &str) {
    sqlx::query(
        "INSERT INTO t3_billing_km (t3_billing_zone, t3_billing_km, zone_key) VALUES ($1, $2, $3)",
    )
    .bind(zone)
    .bind(Decimal::from_str(km).unwrap())
    .bind(zone.trim().to_lowercase())
    .execute(pool)
    .await
    .unwrap();
}

async fn add_address(pool: &PgPool, address: &str, locality: Option<&str>) -> i64 {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO t3_localities (address, t3_locality) VALUES ($1, $2) RETURNING id",
    )
    .bind(address)
    .bind(locality)
    .fetch_one(pool)
    .await
    .unwrap();
    id
}

async fn mapping_of(pool: &PgPool, address_id: i64) -> (Option<String>, Option<i64>) {
    sqlx::query_as("SELECT t3_locality, locality_id FROM t3_localities WHERE id = $1")
        .bind(address_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

fn text(value: &str) -> Option<FlexibleId> {
    Some(FlexibleId::Text(value.to_string()))
}

#[sqlx::test(migrations = "./migrations")]
async fn test_add_master_locality_rejects_duplicate_in_any_case(pool: PgPool) {
    let controller = LocalityController::new(pool.clone());

    let created = controller
        .add_master_locality(AddMasterLocalityRequest {
            locality_name: Some("HSR Layout".to_string()),
            zone_name: Some("South Zone".to_string()),
        })
        .await
        .unwrap();
    assert!(created.success);

    let duplicate = controller
        .add_master_locality(AddMasterLocalityRequest {
            locality_name: Some("  hsr LAYOUT ".to_string()),
            zone_name: Some("East".to_string()),
        })
        .await;
    match duplicate {
        Err(AppError::Conflict(message)) => assert!(message.contains("already exists")),
        other => panic!("expected a conflict, got {:?}", other),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_zone_unique_key_is_conflict(pool: PgPool) {
    let billing = BillingRepository::new(pool.clone());
    billing.create_zone("Whitefield", "East").await.unwrap();

    let second = billing.create_zone("WHITEFIELD ", "East").await;
    assert!(matches!(second, Err(AppError::Conflict(_))));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_save_mapping_stores_name_and_reference(pool: PgPool) {
    let zone_id = add_zone(&pool, "HSR Layout", "South Zone").await;
    let by_id = add_address(&pool, "12 Outer Ring Road", None).await;
    let by_name = add_address(&pool, "4 27th Main", None).await;
    let controller = LocalityController::new(pool.clone());

    controller
        .save_mapping(SaveMappingRequest {
            address_id: Some(FlexibleId::Number(by_id)),
            locality_id: text(&zone_id.to_string()),
        })
        .await
        .unwrap();
    controller
        .save_mapping(SaveMappingRequest {
            address_id: text(&by_name.to_string()),
            locality_id: text(" hsr layout"),
        })
        .await
        .unwrap();

    let expected = (Some("HSR Layout".to_string()), Some(zone_id));
    assert_eq!(mapping_of(&pool, by_id).await, expected);
    assert_eq!(mapping_of(&pool, by_name).await, expected);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_save_mapping_unknown_address_or_locality(pool: PgPool) {
    let zone_id = add_zone(&pool, "HSR Layout", "South Zone").await;
    let address_id = add_address(&pool, "12 Outer Ring Road", None).await;
    let controller = LocalityController::new(pool.clone());

    let missing_address = controller
        .save_mapping(SaveMappingRequest {
            address_id: Some(FlexibleId::Number(address_id + 100)),
            locality_id: Some(FlexibleId::Number(zone_id)),
        })
        .await;
    assert!(matches!(missing_address, Err(AppError::NotFound(_))));

    let missing_locality = controller
        .save_mapping(SaveMappingRequest {
            address_id: Some(FlexibleId::Number(address_id)),
            locality_id: text("Atlantis"),
        })
        .await;
    assert!(matches!(missing_locality, Err(AppError::NotFound(_))));
    assert_eq!(mapping_of(&pool, address_id).await, (None, None));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_numeric_locality_name_is_found_by_name(pool: PgPool) {
    let zone_id = add_zone(&pool, "12", "North").await;
    assert_ne!(zone_id, 12);
    let address_id = add_address(&pool, "Sector 12 Market", None).await;

    LocalityController::new(pool.clone())
        .save_mapping(SaveMappingRequest {
            address_id: Some(FlexibleId::Number(address_id)),
            locality_id: text("12"),
        })
        .await
        .unwrap();

    assert_eq!(
        mapping_of(&pool, address_id).await,
        (Some("12".to_string()), Some(zone_id))
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_bulk_save_counts_submitted_ids(pool: PgPool) {
    let zone_id = add_zone(&pool, "Whitefield", "East").await;
    let first = add_address(&pool, "1 ITPL Road", None).await;
    let second = add_address(&pool, "9 Varthur Road", Some("Old Name")).await;

    let response = LocalityController::new(pool.clone())
        .bulk_save(BulkSaveRequest {
            address_ids: vec![
                FlexibleId::Number(first),
                FlexibleId::Text(second.to_string()),
                FlexibleId::Number(999_999),
            ],
            locality_id: Some(FlexibleId::Number(zone_id)),
        })
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.count, 3);
    let expected = (Some("Whitefield".to_string()), Some(zone_id));
    assert_eq!(mapping_of(&pool, first).await, expected);
    assert_eq!(mapping_of(&pool, second).await, expected);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_clamps_page_and_counts_pending(pool: PgPool) {
    add_zone(&pool, "HSR Layout", "South Zone").await;
    add_rate(&pool, "South", "12.50").await;
    for i in 0..55 {
        let locality = if i < 5 { Some("hsr layout") } else { None };
        add_address(&pool, &format!("{} Main Road", i), locality).await;
    }
    let controller = LocalityController::new(pool.clone());

    let first_page = controller
        .list(LocalityListQuery {
            page: Some("0".to_string()),
            search: None,
        })
        .await
        .unwrap();
    assert_eq!(first_page.pagination.current_page, 1);
    assert_eq!(first_page.results.len(), 50);
    assert_eq!(first_page.global_pending, 50);
    assert_eq!(first_page.results[0].status, LocalityStatus::Done);
    assert_eq!(first_page.results[0].billing_zone, "South Zone");
    assert_eq!(first_page.results[0].billing_km, "12.5");
    assert_eq!(first_page.results[5].status, LocalityStatus::Pending);
    assert_eq!(first_page.results[5].billing_zone, "-");

    let beyond = controller
        .list(LocalityListQuery {
            page: Some("7".to_string()),
            search: None,
        })
        .await
        .unwrap();
    assert_eq!(beyond.pagination.total_pages, 2);
    assert_eq!(beyond.pagination.current_page, 2);
    assert_eq!(beyond.pagination.total_records, 55);
    assert_eq!(beyond.results.len(), 5);

    let searched = controller
        .list(LocalityListQuery {
            page: None,
            search: Some("HSR".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(searched.pagination.total_records, 5);
    assert_eq!(searched.global_pending, 50);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_whitespace_locality_is_pending_everywhere(pool: PgPool) {
    let tabbed = add_address(&pool, "3 Church Street", Some("\t\r\n")).await;
    add_address(&pool, "8 Brigade Road", Some("Ashok Nagar")).await;
    let controller = LocalityController::new(pool.clone());

    let list = controller.list(LocalityListQuery::default()).await.unwrap();
    assert_eq!(list.global_pending, 1);
    assert_eq!(list.results[0].status, LocalityStatus::Pending);
    assert_eq!(list.results[1].status, LocalityStatus::Done);

    let next = controller.next_pending().await.unwrap();
    assert!(next.found);
    assert_eq!(next.data.unwrap().id, tabbed);

    let search = controller
        .search_pending(SearchPendingQuery {
            q: Some("church".to_string()),
            page: None,
        })
        .await
        .unwrap();
    assert_eq!(search.pagination.total_records, 1);
    assert_eq!(search.results[0].id, tabbed);
}

fn vehicle_request(vehicle_no: &str) -> CreateVehicleRequest {
    CreateVehicleRequest {
        vehicle_no: vehicle_no.to_string(),
        contact_no: Some("9845012345".to_string()),
        vehicle_ownership: Some("Owned".to_string()),
        cab_type: Some("Sedan".to_string()),
        rc_document: Some(UploadedFile {
            file_name: "rc front.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: b"%PDF-1.4".to_vec(),
        }),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_failed_upload_leaves_no_vehicle(pool: PgPool) {
    let controller = VehicleController::new(pool.clone(), Arc::new(MemoryDocumentStore::failing()));

    let result = controller.create(vehicle_request("KA-01-AB-1234")).await;
    assert!(matches!(result, Err(AppError::Storage(_))));

    let roster = controller.list().await.unwrap();
    assert!(roster.results.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_vehicle_roster_with_document(pool: PgPool) {
    let documents = Arc::new(MemoryDocumentStore::new());
    let controller = VehicleController::new(pool.clone(), documents.clone());

    controller
        .create(vehicle_request("ka-01-ab-1234"))
        .await
        .unwrap();
    assert_eq!(documents.len().await, 1);

    let duplicate = controller.create(vehicle_request("KA-01-AB-1234")).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
    assert_eq!(documents.len().await, 1);

    let roster = controller.list().await.unwrap();
    assert_eq!(roster.results.len(), 1);
    let vehicle = &roster.results[0];
    assert_eq!(vehicle.vehicle_no, "KA-01-AB-1234");
    assert_eq!(vehicle.ownership.as_deref(), Some("Owned"));
    assert!(vehicle
        .rc_document
        .as_deref()
        .unwrap()
        .starts_with("memory://rc_documents/"));
}

fn report_request(raw: serde_json::Value) -> SaveMisReportRequest {
    serde_json::from_value(raw).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_mis_report_upsert_and_dashboard(pool: PgPool) {
    let reports = MisReportController::new(pool.clone());

    let first = reports
        .save(report_request(serde_json::json!({
            "billing_year": 2025,
            "billing_month": "january",
            "stage1_locality_set": true,
            "stage1_gps_check": true,
            "stage2_locality_set": true,
            "stage2_gps_check": true
        })))
        .await
        .unwrap();
    assert_eq!(first.data.as_ref().unwrap().progress, 50);

    let updated = reports
        .save(report_request(serde_json::json!({
            "billing_year": 2025,
            "billing_month": "January",
            "stage1_locality_set": true,
            "stage1_gps_check": true,
            "stage2_locality_set": true,
            "stage2_gps_check": true,
            "stage3_locality_set": true,
            "stage3_gps_check": true,
            "final_mis_status": true,
            "bill_approval_status": true
        })))
        .await
        .unwrap();
    let summary = updated.data.unwrap();
    assert_eq!(summary.progress, 100);
    assert_eq!(summary.status, WorkflowStatus::Completed);

    let listed = reports
        .list(MisReportListQuery {
            year: Some("2025".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(listed.results.len(), 1);

    let dashboard = DashboardController::new(pool.clone())
        .dashboard(DashboardQuery {
            year: Some("2025".to_string()),
            month: Some("1".to_string()),
        })
        .await
        .unwrap();
    assert!(dashboard.current.data.found);
    assert_eq!(dashboard.current.data.progress, 100);
    assert_eq!(dashboard.previous.month, "December");
    assert_eq!(dashboard.previous.year, 2024);
    assert!(!dashboard.previous.data.found);
    assert_eq!(dashboard.previous.data.progress, 0);
}
