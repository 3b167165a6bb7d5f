//! Locality diagnosis
//!
//! Takes the first address that has a locality and walks it through the
//! zone and km lookups step by step, listing sample master rows when a
//! step fails.

use anyhow::{Context, Result};
use dotenvy::dotenv;

use billing_tracker::config::AppConfig;
use billing_tracker::database::connect;
use billing_tracker::repositories::billing_repository::BillingRepository;
use billing_tracker::repositories::locality_repository::LocalityRepository;
use billing_tracker::services::locality_matching_service::format_km;
use billing_tracker::services::lookup_map::LookupMap;
use billing_tracker::services::normalization::{canonical_key, normalize};

const SAMPLE_ROWS: usize = 5;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = AppConfig::load().context("Error loading configuration")?;
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    let pool = connect(&config.database()?).await?;
    let localities = LocalityRepository::new(pool.clone());
    let billing = BillingRepository::new(pool);

    println!("\n🚀 Starting diagnosis...");

    // Step 1: an address with a locality
    let Some(address) = localities.first_mapped().await? else {
        println!("❌ No address in t3_localities has a locality name.");
        return Ok(());
    };
    let raw_locality = address.locality_name().unwrap_or_default().to_string();
    println!("📍 Address:  '{}'", address.address);
    println!(
        "🏷️  Locality: '{}' (normalized '{}', alias '{}')",
        raw_locality,
        normalize(Some(&raw_locality)),
        canonical_key(&raw_locality)
    );

    let (zones, rates) = tokio::try_join!(billing.list_zones(), billing.list_rates())?;

    // Step 2: locality → zone
    println!("\n🔍 Looking for the zone...");
    let zone_map = LookupMap::from_pairs(
        zones
            .iter()
            .map(|z| (z.t3_locality.as_str(), z.t3_billing_zone.clone())),
    );
    let zone = match lookup_step(&zone_map, &raw_locality) {
        Some(zone) => {
            println!(
                "✅ Found zone '{}' (normalized '{}')",
                zone,
                normalize(Some(zone))
            );
            zone.clone()
        }
        None => {
            println!("❌ '{}' is not in t3_billing_zones.", raw_locality);
            println!("   ℹ️  First {} localities in the zone table:", SAMPLE_ROWS);
            for zone in zones.iter().take(SAMPLE_ROWS) {
                println!("      - '{}'", zone.t3_locality);
            }
            return Ok(());
        }
    };

    // Step 3: zone → km
    println!("\n🔍 Looking for the km rate...");
    let rate_map = LookupMap::from_pairs(
        rates
            .iter()
            .map(|r| (r.t3_billing_zone.as_str(), r.t3_billing_km)),
    );
    match lookup_step(&rate_map, &zone) {
        Some(km) => println!("✅ Found km {}", format_km(*km)),
        None => {
            println!("❌ Zone '{}' has no entry in t3_billing_km.", zone);
            println!("   ℹ️  First {} zones in the km table:", SAMPLE_ROWS);
            for rate in rates.iter().take(SAMPLE_ROWS) {
                println!("      - '{}'", rate.t3_billing_zone);
            }
        }
    }

    println!("\n🏁 Diagnosis complete");
    Ok(())
}

/// Exact text first, then the tolerant lookup
fn lookup_step<'a, V: Clone>(map: &'a LookupMap<V>, key: &str) -> Option<&'a V> {
    if let Some(value) = map.get_exact(key) {
        println!("   exact match on '{}'", key);
        return Some(value);
    }
    let value = map.get(key);
    if value.is_some() {
        println!("   matched '{}' after normalizing", key);
    }
    value
}
