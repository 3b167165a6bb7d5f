use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::mis_report::{MisReport, WorkflowStatus};
use crate::services::workflow_tracker::PeriodReport;

// Query of the dashboard
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub year: Option<String>,
    pub month: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct StageData {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub locality: bool,
    pub gps: bool,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct FinalData {
    pub mis_status: bool,
    pub bill_approval: bool,
}

// Stage breakdown of an existing report
#[derive(Debug, Serialize)]
pub struct ReportDetail {
    pub stage1: StageData,
    pub stage2: StageData,
    pub stage3: StageData,
    #[serde(rename = "final")]
    pub final_checks: FinalData,
    pub status: WorkflowStatus,
}

impl From<&MisReport> for ReportDetail {
    fn from(report: &MisReport) -> Self {
        Self {
            stage1: StageData {
                start: report.stage1_start_date,
                end: report.stage1_end_date,
                locality: report.stage1_locality_set,
                gps: report.stage1_gps_check,
            },
            stage2: StageData {
                start: report.stage2_start_date,
                end: report.stage2_end_date,
                locality: report.stage2_locality_set,
                gps: report.stage2_gps_check,
            },
            stage3: StageData {
                start: report.stage3_start_date,
                end: report.stage3_end_date,
                locality: report.stage3_locality_set,
                gps: report.stage3_gps_check,
            },
            final_checks: FinalData {
                mis_status: report.final_mis_status,
                bill_approval: report.bill_approval_status,
            },
            status: report.status(),
        }
    }
}

// `{found:false, progress:0}` when the period has no report
#[derive(Debug, Serialize)]
pub struct ReportData {
    pub found: bool,
    pub progress: u32,
    #[serde(flatten)]
    pub detail: Option<ReportDetail>,
}

#[derive(Debug, Serialize)]
pub struct PeriodData {
    pub month: String,
    pub year: i32,
    pub data: ReportData,
}

impl From<PeriodReport> for PeriodData {
    fn from(period: PeriodReport) -> Self {
        let data = ReportData {
            found: period.report.is_some(),
            progress: period.progress(),
            detail: period.report.as_ref().map(ReportDetail::from),
        };
        Self {
            month: period.month.name().to_string(),
            year: period.year,
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub current: PeriodData,
    pub previous: PeriodData,
}
