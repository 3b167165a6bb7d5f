use chrono::{Month, Utc};
use sqlx::PgPool;

use crate::dto::dashboard_dto::{DashboardQuery, DashboardResponse, PeriodData};
use crate::models::mis_report::{parse_month, MAX_BILLING_YEAR, MIN_BILLING_YEAR};
use crate::services::workflow_tracker::{period_of, WorkflowTracker};
use crate::utils::errors::AppError;
use crate::utils::validation::non_blank;

pub struct DashboardController {
    tracker: WorkflowTracker,
}

impl DashboardController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            tracker: WorkflowTracker::new(pool),
        }
    }

    /// Progress of the requested month and the month before it
    pub async fn dashboard(&self, query: DashboardQuery) -> Result<DashboardResponse, AppError> {
        let (year, month) = resolve_period(query)?;
        let (current, previous) = self.tracker.current_and_previous(year, month).await?;

        Ok(DashboardResponse {
            current: PeriodData::from(current),
            previous: PeriodData::from(previous),
        })
    }
}

/// Year and month from the query, each defaulting to today
fn resolve_period(query: DashboardQuery) -> Result<(i32, Month), AppError> {
    let (this_year, this_month) = period_of(Utc::now().date_naive())?;

    let year = match non_blank(query.year) {
        Some(raw) => raw
            .parse::<i32>()
            .ok()
            .filter(|y| (MIN_BILLING_YEAR..=MAX_BILLING_YEAR).contains(y))
            .ok_or_else(|| AppError::BadRequest(format!("Invalid year '{}'", raw)))?,
        None => this_year,
    };
    let month = match non_blank(query.month) {
        Some(raw) => {
            parse_month(&raw).ok_or_else(|| AppError::BadRequest(format!("Invalid month '{}'", raw)))?
        }
        None => this_month,
    };

    Ok((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(year: Option<&str>, month: Option<&str>) -> DashboardQuery {
        DashboardQuery {
            year: year.map(str::to_string),
            month: month.map(str::to_string),
        }
    }

    #[test]
    fn test_resolve_period_explicit() {
        assert_eq!(
            resolve_period(query(Some("2025"), Some("1"))).unwrap(),
            (2025, Month::January)
        );
        assert_eq!(
            resolve_period(query(Some("2025"), Some("March"))).unwrap(),
            (2025, Month::March)
        );
    }

    #[test]
    fn test_resolve_period_defaults_to_today() {
        let today = period_of(Utc::now().date_naive()).unwrap();
        assert_eq!(resolve_period(query(None, Some(" "))).unwrap(), today);
    }

    #[test]
    fn test_resolve_period_rejects_bad_values() {
        assert!(matches!(
            resolve_period(query(Some("2025"), Some("13"))),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            resolve_period(query(Some("20x5"), None)),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            resolve_period(query(Some("1999"), None)),
            Err(AppError::BadRequest(_))
        ));
    }
}
