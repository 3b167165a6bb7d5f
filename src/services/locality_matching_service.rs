//! Locality matching
//!
//! Resolves address → locality → zone → km with in-memory lookup maps built
//! once per request from the two master tables. Text that does not resolve
//! comes back as the `"-"` sentinel instead of an error.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::debug;

use crate::models::locality::{BillingKm, BillingZone, LocalityStatus, T3Locality};
use crate::repositories::billing_repository::BillingRepository;
use crate::services::lookup_map::LookupMap;
use crate::utils::errors::AppResult;

/// Shown for a zone or rate that could not be resolved
pub const UNRESOLVED: &str = "-";

/// Zone and km found for a locality name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub billing_zone: String,
    pub billing_km: String,
}

/// An address row with its resolved billing data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedLocality {
    pub id: i64,
    pub address: String,
    pub locality: Option<String>,
    pub locality_id: Option<i64>,
    pub billing_zone: String,
    pub billing_km: String,
    pub status: LocalityStatus,
}

/// Master locality with its zone and km, for pickers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterLocality {
    pub id: i64,
    pub locality_name: String,
    pub billing_zone: String,
    pub billing_km: String,
}

/// Locality → zone and zone → km maps for one request
#[derive(Debug, Clone)]
pub struct ZoneLookup {
    zones: LookupMap<String>,
    rates: LookupMap<Decimal>,
}

impl ZoneLookup {
    pub fn build(zones: &[BillingZone], rates: &[BillingKm]) -> Self {
        Self {
            zones: LookupMap::from_pairs(
                zones
                    .iter()
                    .map(|z| (z.t3_locality.as_str(), z.t3_billing_zone.clone())),
            ),
            rates: LookupMap::from_pairs(
                rates
                    .iter()
                    .map(|r| (r.t3_billing_zone.as_str(), r.t3_billing_km)),
            ),
        }
    }

    /// Km rate for a zone name, or the sentinel
    pub fn rate_for(&self, zone: &str) -> String {
        self.rates
            .get(zone)
            .map(|km| format_km(*km))
            .unwrap_or_else(|| UNRESOLVED.to_string())
    }

    /// Zone and km for a locality name; blank or unknown names give sentinels
    pub fn resolve(&self, locality: Option<&str>) -> Resolution {
        match locality.and_then(|name| self.zones.get(name)) {
            Some(zone) => Resolution {
                billing_zone: zone.clone(),
                billing_km: self.rate_for(zone),
            },
            None => Resolution {
                billing_zone: UNRESOLVED.to_string(),
                billing_km: UNRESOLVED.to_string(),
            },
        }
    }

    /// Attach zone, km and status to each address row
    pub fn match_rows(&self, rows: Vec<T3Locality>) -> Vec<MatchedLocality> {
        rows.into_iter()
            .map(|row| {
                let resolution = self.resolve(row.locality_name());
                let status = LocalityStatus::of(row.locality_name());
                MatchedLocality {
                    id: row.id,
                    locality: row.locality_name().map(str::to_string),
                    locality_id: row.locality_id,
                    address: row.address,
                    billing_zone: resolution.billing_zone,
                    billing_km: resolution.billing_km,
                    status,
                }
            })
            .collect()
    }

    /// Master rows with the km rate of their zone
    pub fn master_entries(&self, zones: Vec<BillingZone>) -> Vec<MasterLocality> {
        zones
            .into_iter()
            .map(|zone| MasterLocality {
                id: zone.id,
                billing_km: self.rate_for(&zone.t3_billing_zone),
                locality_name: zone.t3_locality,
                billing_zone: zone.t3_billing_zone,
            })
            .collect()
    }
}

/// Decimal without trailing zeros (`12.50` → `"12.5"`)
pub fn format_km(km: Decimal) -> String {
    km.normalize().to_string()
}

/// Loads the master tables and matches addresses against them
pub struct LocalityMatchingService {
    billing: BillingRepository,
}

impl LocalityMatchingService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            billing: BillingRepository::new(pool),
        }
    }

    /// Read both master tables and index them
    pub async fn load_lookup(&self) -> AppResult<ZoneLookup> {
        let (zones, rates) = self.load_tables().await?;
        Ok(ZoneLookup::build(&zones, &rates))
    }

    async fn load_tables(&self) -> AppResult<(Vec<BillingZone>, Vec<BillingKm>)> {
        let (zones, rates) = tokio::try_join!(self.billing.list_zones(), self.billing.list_rates())?;
        debug!(
            "🗺️ Lookup tables loaded: {} localities, {} zone rates",
            zones.len(),
            rates.len()
        );
        Ok((zones, rates))
    }

    /// Resolve a page of address rows
    pub async fn match_page(&self, rows: Vec<T3Locality>) -> AppResult<Vec<MatchedLocality>> {
        let lookup = self.load_lookup().await?;
        Ok(lookup.match_rows(rows))
    }

    /// Every master locality with its zone and km
    pub async fn master_localities(&self) -> AppResult<Vec<MasterLocality>> {
        let (zones, rates) = self.load_tables().await?;
        let lookup = ZoneLookup::build(&zones, &rates);
        Ok(lookup.master_entries(zones))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn zone(id: i64, locality: &str, zone: &str) -> BillingZone {
        BillingZone {
            id,
            t3_locality: locality.to_string(),
            t3_billing_zone: zone.to_string(),
            locality_key: locality.trim().to_lowercase(),
        }
    }

    fn rate(id: i64, zone: &str, km: &str) -> BillingKm {
        BillingKm {
            id,
            t3_billing_zone: zone.to_string(),
            t3_billing_km: Decimal::from_str(km).unwrap(),
            zone_key: zone.trim().to_lowercase(),
        }
    }

    fn address(id: i64, text: &str, locality: Option<&str>) -> T3Locality {
        T3Locality {
            id,
            address: text.to_string(),
            t3_locality: locality.map(str::to_string),
            locality_id: None,
        }
    }

    fn lookup() -> ZoneLookup {
        ZoneLookup::build(
            &[
                zone(1, "HSR Layout", "South Zone"),
                zone(2, "Whitefield", "East"),
                zone(3, "Hebbal", "North Zone"),
            ],
            &[rate(1, "South", "12.50"), rate(2, "EAST ", "18")],
        )
    }

    #[test]
    fn test_resolves_through_inconsistent_text() {
        let resolution = lookup().resolve(Some("  hsr layout"));
        assert_eq!(resolution.billing_zone, "South Zone");
        assert_eq!(resolution.billing_km, "12.5");

        let resolution = lookup().resolve(Some("WHITEFIELD"));
        assert_eq!(resolution.billing_zone, "East");
        assert_eq!(resolution.billing_km, "18");
    }

    #[test]
    fn test_zone_without_rate_gives_sentinel() {
        let resolution = lookup().resolve(Some("Hebbal"));
        assert_eq!(resolution.billing_zone, "North Zone");
        assert_eq!(resolution.billing_km, UNRESOLVED);
    }

    #[test]
    fn test_unknown_locality_gives_sentinels() {
        let resolution = lookup().resolve(Some("Atlantis"));
        assert_eq!(resolution.billing_zone, UNRESOLVED);
        assert_eq!(resolution.billing_km, UNRESOLVED);
        assert_eq!(lookup().resolve(None).billing_zone, UNRESOLVED);
    }

    #[test]
    fn test_status_depends_only_on_locality_text() {
        let rows = lookup().match_rows(vec![
            address(10, "12 MG Road", Some("Atlantis")),
            address(11, "4 Church Street", Some("  ")),
            address(12, "7 Outer Ring Road", Some("HSR Layout")),
            address(13, "1 Brigade Road", None),
        ]);

        assert_eq!(rows[0].status, LocalityStatus::Done);
        assert_eq!(rows[0].billing_zone, UNRESOLVED);
        assert_eq!(rows[1].status, LocalityStatus::Pending);
        assert_eq!(rows[1].locality, None);
        assert_eq!(rows[2].status, LocalityStatus::Done);
        assert_eq!(rows[2].billing_km, "12.5");
        assert_eq!(rows[3].status, LocalityStatus::Pending);
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![10, 11, 12, 13]);
    }

    #[test]
    fn test_master_entries_carry_km() {
        let lookup = lookup();
        let entries = lookup.master_entries(vec![
            zone(1, "HSR Layout", "South Zone"),
            zone(3, "Hebbal", "North Zone"),
        ]);
        assert_eq!(entries[0].locality_name, "HSR Layout");
        assert_eq!(entries[0].billing_km, "12.5");
        assert_eq!(entries[1].billing_km, UNRESOLVED);
    }

    #[test]
    fn test_format_km() {
        assert_eq!(format_km(Decimal::from_str("12.50").unwrap()), "12.5");
        assert_eq!(format_km(Decimal::from_str("18.00").unwrap()), "18");
    }
}
