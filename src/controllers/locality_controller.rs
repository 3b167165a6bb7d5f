use sqlx::PgPool;
use tracing::{info, warn};

use crate::dto::common_dto::{ApiResponse, FlexibleId, Pagination, PAGE_SIZE};
use crate::dto::locality_dto::{
    AddMasterLocalityRequest, BulkSaveRequest, BulkSaveResponse, DropdownLocality,
    LocalityListQuery, LocalityListResponse, LocalityRowResponse, NextPendingResponse,
    PendingAddress, SaveMappingRequest, SearchPendingQuery, SearchPendingResponse,
};
use crate::models::locality::BillingZone;
use crate::repositories::billing_repository::BillingRepository;
use crate::repositories::locality_repository::LocalityRepository;
use crate::services::locality_matching_service::LocalityMatchingService;
use crate::utils::errors::{conflict_error, not_found_error, required_field_error, AppError};
use crate::utils::validation::{non_blank, require_text};

pub struct LocalityController {
    localities: LocalityRepository,
    billing: BillingRepository,
    matching: LocalityMatchingService,
}

impl LocalityController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            localities: LocalityRepository::new(pool.clone()),
            billing: BillingRepository::new(pool.clone()),
            matching: LocalityMatchingService::new(pool),
        }
    }

    /// Paginated addresses with zone, km and status resolved
    pub async fn list(&self, query: LocalityListQuery) -> Result<LocalityListResponse, AppError> {
        let search = non_blank(query.search);
        let search = search.as_deref();

        let (total_records, global_pending) =
            tokio::try_join!(self.localities.count(search), self.localities.count_pending(None))?;
        let pagination = Pagination::new(query.page.as_deref(), total_records, PAGE_SIZE);

        let rows = self
            .localities
            .list_page(search, PAGE_SIZE, pagination.offset(PAGE_SIZE))
            .await?;
        let results = self
            .matching
            .match_page(rows)
            .await?
            .into_iter()
            .map(LocalityRowResponse::from)
            .collect();

        Ok(LocalityListResponse {
            results,
            global_pending,
            pagination,
        })
    }

    /// Master localities for the picker
    pub async fn dropdown(&self) -> Result<Vec<DropdownLocality>, AppError> {
        let entries = self.matching.master_localities().await?;
        Ok(entries.into_iter().map(DropdownLocality::from).collect())
    }

    pub async fn next_pending(&self) -> Result<NextPendingResponse, AppError> {
        let next = self.localities.next_pending().await?;
        Ok(NextPendingResponse {
            found: next.is_some(),
            data: next.map(PendingAddress::from),
        })
    }

    pub async fn search_pending(
        &self,
        query: SearchPendingQuery,
    ) -> Result<SearchPendingResponse, AppError> {
        let term = non_blank(query.q);
        let term = term.as_deref();

        let total_records = self.localities.count_pending(term).await?;
        let pagination = Pagination::new(query.page.as_deref(), total_records, PAGE_SIZE);
        let rows = self
            .localities
            .list_pending(term, PAGE_SIZE, pagination.offset(PAGE_SIZE))
            .await?;

        Ok(SearchPendingResponse {
            results: rows.into_iter().map(PendingAddress::from).collect(),
            pagination,
        })
    }

    /// Map one address to a master locality
    pub async fn save_mapping(
        &self,
        request: SaveMappingRequest,
    ) -> Result<ApiResponse<()>, AppError> {
        let address_id = parse_address_id(request.address_id.as_ref())?;
        let target = required_target(request.locality_id.as_ref())?;
        let locality = self.resolve_target(target).await?;

        if !self
            .localities
            .assign(address_id, &locality.t3_locality, locality.id)
            .await?
        {
            return Err(not_found_error("Address", &address_id.to_string()));
        }

        info!(
            "📍 Address {} mapped to '{}' ({})",
            address_id, locality.t3_locality, locality.t3_billing_zone
        );
        Ok(ApiResponse::message(format!(
            "Address {} mapped to {}",
            address_id, locality.t3_locality
        )))
    }

    /// Map many addresses to one master locality
    pub async fn bulk_save(&self, request: BulkSaveRequest) -> Result<BulkSaveResponse, AppError> {
        if request.address_ids.is_empty() {
            return Ok(BulkSaveResponse {
                success: true,
                count: 0,
            });
        }

        let address_ids = request
            .address_ids
            .iter()
            .map(|id| parse_address_id(Some(id)))
            .collect::<Result<Vec<_>, _>>()?;
        let target = required_target(request.locality_id.as_ref())?;
        let locality = self.resolve_target(target).await?;

        let changed = self
            .localities
            .assign_many(&address_ids, &locality.t3_locality, locality.id)
            .await?;
        if changed < address_ids.len() as u64 {
            warn!(
                "⚠️ Bulk save: {} of {} addresses existed",
                changed,
                address_ids.len()
            );
        }
        info!(
            "📍 Bulk save: {} addresses mapped to '{}'",
            changed, locality.t3_locality
        );

        Ok(BulkSaveResponse {
            success: true,
            count: address_ids.len(),
        })
    }

    /// Create a master locality under a zone
    pub async fn add_master_locality(
        &self,
        request: AddMasterLocalityRequest,
    ) -> Result<ApiResponse<()>, AppError> {
        let locality_name = require_text(request.locality_name, "locality_name")?;
        let zone_name = require_text(request.zone_name, "zone_name")?;

        if self.billing.locality_exists(&locality_name).await? {
            return Err(conflict_error("Locality", &locality_name));
        }

        let created = self.billing.create_zone(&locality_name, &zone_name).await?;
        info!(
            "✅ Master locality '{}' added to zone '{}' (id {})",
            created.t3_locality, created.t3_billing_zone, created.id
        );

        Ok(ApiResponse::message(format!(
            "Locality '{}' added to {}",
            created.t3_locality, created.t3_billing_zone
        )))
    }

    /// Master locality given by id or by name; numeric text that is not an
    /// id is tried as a name
    async fn resolve_target(&self, target: &FlexibleId) -> Result<BillingZone, AppError> {
        let by_id = match target.as_id() {
            Some(id) => self.billing.find_zone_by_id(id).await?,
            None => None,
        };
        let found = match (by_id, target) {
            (Some(zone), _) => Some(zone),
            (None, FlexibleId::Text(name)) => self.billing.find_zone_by_name(name).await?,
            (None, FlexibleId::Number(_)) => None,
        };

        found.ok_or_else(|| not_found_error("Locality", &target_label(target)))
    }
}

fn target_label(target: &FlexibleId) -> String {
    match target {
        FlexibleId::Number(id) => id.to_string(),
        FlexibleId::Text(text) => text.trim().to_string(),
    }
}

fn required_target(target: Option<&FlexibleId>) -> Result<&FlexibleId, AppError> {
    target
        .filter(|t| !t.is_blank())
        .ok_or_else(|| required_field_error("locality_id"))
}

fn parse_address_id(id: Option<&FlexibleId>) -> Result<i64, AppError> {
    let id = id
        .filter(|id| !id.is_blank())
        .ok_or_else(|| required_field_error("address_id"))?;
    id.as_id().ok_or_else(|| {
        AppError::BadRequest(format!("Invalid address id '{}'", target_label(id)))
    })
}
