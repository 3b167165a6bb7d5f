use chrono::{DateTime, Month, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::models::mis_report::{MisReport, WorkflowStatus};
use crate::utils::validation::{validate_date_order, validate_not_empty};

// Query of the report listing
#[derive(Debug, Default, Deserialize)]
pub struct MisReportListQuery {
    pub year: Option<String>,
}

// Request to create or update the report of a period
#[derive(Debug, Deserialize, Validate)]
pub struct SaveMisReportRequest {
    #[validate(range(min = 2024, max = 2050))]
    pub billing_year: i32,
    #[validate(custom = "validate_not_empty")]
    pub billing_month: String,

    #[serde(default)]
    pub stage1_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub stage1_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub stage1_locality_set: bool,
    #[serde(default)]
    pub stage1_gps_check: bool,

    #[serde(default)]
    pub stage2_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub stage2_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub stage2_locality_set: bool,
    #[serde(default)]
    pub stage2_gps_check: bool,

    #[serde(default)]
    pub stage3_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub stage3_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub stage3_locality_set: bool,
    #[serde(default)]
    pub stage3_gps_check: bool,

    #[serde(default)]
    pub final_mis_status: bool,
    #[serde(default)]
    pub bill_approval_status: bool,
}

impl SaveMisReportRequest {
    /// Every stage must end on or after its start
    pub fn validate_stages(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let stages = [
            ("stage1_end_date", self.stage1_start_date, self.stage1_end_date),
            ("stage2_end_date", self.stage2_start_date, self.stage2_end_date),
            ("stage3_end_date", self.stage3_start_date, self.stage3_end_date),
        ];
        for (field, start, end) in stages {
            if let Err(error) = validate_date_order(start, end) {
                errors.add(field, error);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Row to store, with the month name in canonical form
    pub fn into_report(self, month: Month) -> MisReport {
        MisReport {
            id: 0,
            billing_year: self.billing_year,
            billing_month: month.name().to_string(),
            stage1_start_date: self.stage1_start_date,
            stage1_end_date: self.stage1_end_date,
            stage1_locality_set: self.stage1_locality_set,
            stage1_gps_check: self.stage1_gps_check,
            stage2_start_date: self.stage2_start_date,
            stage2_end_date: self.stage2_end_date,
            stage2_locality_set: self.stage2_locality_set,
            stage2_gps_check: self.stage2_gps_check,
            stage3_start_date: self.stage3_start_date,
            stage3_end_date: self.stage3_end_date,
            stage3_locality_set: self.stage3_locality_set,
            stage3_gps_check: self.stage3_gps_check,
            final_mis_status: self.final_mis_status,
            bill_approval_status: self.bill_approval_status,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MisReportSummary {
    pub id: i64,
    pub billing_year: i32,
    pub billing_month: String,
    pub progress: u32,
    pub status: WorkflowStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&MisReport> for MisReportSummary {
    fn from(report: &MisReport) -> Self {
        Self {
            id: report.id,
            billing_year: report.billing_year,
            billing_month: report.billing_month.clone(),
            progress: report.progress(),
            status: report.status(),
            created_at: report.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MisReportListResponse {
    pub results: Vec<MisReportSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(raw: &str) -> SaveMisReportRequest {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_year_out_of_range() {
        let req = request(r#"{"billing_year": 2023, "billing_month": "May"}"#);
        assert!(req.validate().is_err());

        let req = request(r#"{"billing_year": 2051, "billing_month": "May"}"#);
        assert!(req.validate().is_err());

        let req = request(r#"{"billing_year": 2024, "billing_month": "May"}"#);
        assert!(req.validate().is_ok());

        let req = request(r#"{"billing_year": 2024, "billing_month": " "}"#);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_stage_end_before_start() {
        let req = request(
            r#"{"billing_year": 2025, "billing_month": "May",
                "stage2_start_date": "2025-05-10", "stage2_end_date": "2025-05-01"}"#,
        );
        let errors = req.validate_stages().unwrap_err();
        assert!(errors.field_errors().contains_key("stage2_end_date"));
    }

    #[test]
    fn test_into_report_uses_canonical_month() {
        let req = request(
            r#"{"billing_year": 2025, "billing_month": "may", "final_mis_status": true}"#,
        );
        let report = req.into_report(Month::May);
        assert_eq!(report.billing_month, "May");
        assert!(report.final_mis_status);
        assert_eq!(report.completed_steps(), 1);
    }
}
