//! Billing workflow tracker
//!
//! Looks up the MIS report of a billing period and pairs it with the period
//! before it. A missing report is a valid "not started" state.

use chrono::{Datelike, Month, NaiveDate};
use sqlx::PgPool;
use tracing::debug;

use crate::models::mis_report::{previous_period, MisReport};
use crate::repositories::mis_report_repository::MisReportRepository;
use crate::utils::errors::{AppError, AppResult};

/// A billing period and its report, if one exists
#[derive(Debug, Clone)]
pub struct PeriodReport {
    pub year: i32,
    pub month: Month,
    pub report: Option<MisReport>,
}

impl PeriodReport {
    pub fn progress(&self) -> u32 {
        self.report.as_ref().map(MisReport::progress).unwrap_or(0)
    }
}

/// Billing period containing `date`
pub fn period_of(date: NaiveDate) -> AppResult<(i32, Month)> {
    let month = Month::try_from(date.month() as u8)
        .map_err(|_| AppError::Internal(format!("Invalid month in date {}", date)))?;
    Ok((date.year(), month))
}

pub struct WorkflowTracker {
    repository: MisReportRepository,
}

impl WorkflowTracker {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: MisReportRepository::new(pool),
        }
    }

    /// Report for one period
    pub async fn report_for(&self, year: i32, month: Month) -> AppResult<PeriodReport> {
        let report = self.repository.find_by_period(year, month.name()).await?;
        debug!(
            "📊 MIS report {} {}: {}",
            month.name(),
            year,
            if report.is_some() { "found" } else { "not started" }
        );
        Ok(PeriodReport {
            year,
            month,
            report,
        })
    }

    /// Requested period and the one before it, fetched independently
    pub async fn current_and_previous(
        &self,
        year: i32,
        month: Month,
    ) -> AppResult<(PeriodReport, PeriodReport)> {
        let (previous_year, previous_month) = previous_period(year, month);
        tokio::try_join!(
            self.report_for(year, month),
            self.report_for(previous_year, previous_month)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_of() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(period_of(date).unwrap(), (2025, Month::January));
    }

    #[test]
    fn test_missing_report_has_zero_progress() {
        let period = PeriodReport {
            year: 2024,
            month: Month::December,
            report: None,
        };
        assert_eq!(period.progress(), 0);
    }

    #[test]
    fn test_present_report_progress() {
        let period = PeriodReport {
            year: 2025,
            month: Month::February,
            report: Some(MisReport {
                stage1_locality_set: true,
                stage1_gps_check: true,
                ..Default::default()
            }),
        };
        assert_eq!(period.progress(), 25);
    }
}
