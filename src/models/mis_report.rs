//! MIS report model
//!
//! One row per billing period. Progress is derived from eight checkpoints:
//! locality set and GPS check for each of the three stages, then the final
//! MIS status and the bill approval.

use chrono::{DateTime, Month, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use std::str::FromStr;

/// Number of checkpoints counted by the progress bar
pub const TOTAL_STEPS: u32 = 8;

/// Accepted billing years
pub const MIN_BILLING_YEAR: i32 = 2024;
pub const MAX_BILLING_YEAR: i32 = 2050;

/// Row of `mis_reports`
#[derive(Debug, Clone, Default, FromRow)]
pub struct MisReport {
    pub id: i64,
    pub billing_year: i32,
    pub billing_month: String,

    pub stage1_start_date: Option<NaiveDate>,
    pub stage1_end_date: Option<NaiveDate>,
    pub stage1_locality_set: bool,
    pub stage1_gps_check: bool,

    pub stage2_start_date: Option<NaiveDate>,
    pub stage2_end_date: Option<NaiveDate>,
    pub stage2_locality_set: bool,
    pub stage2_gps_check: bool,

    pub stage3_start_date: Option<NaiveDate>,
    pub stage3_end_date: Option<NaiveDate>,
    pub stage3_locality_set: bool,
    pub stage3_gps_check: bool,

    pub final_mis_status: bool,
    pub bill_approval_status: bool,

    pub created_at: DateTime<Utc>,
}

/// Overall state shown next to the progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkflowStatus {
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "In Progress")]
    InProgress,
}

impl MisReport {
    fn checkpoints(&self) -> [bool; TOTAL_STEPS as usize] {
        [
            self.stage1_locality_set,
            self.stage1_gps_check,
            self.stage2_locality_set,
            self.stage2_gps_check,
            self.stage3_locality_set,
            self.stage3_gps_check,
            self.final_mis_status,
            self.bill_approval_status,
        ]
    }

    /// Number of checkpoints ticked
    pub fn completed_steps(&self) -> u32 {
        self.checkpoints().iter().filter(|done| **done).count() as u32
    }

    /// Completion percentage, rounded down
    pub fn progress(&self) -> u32 {
        progress_percent(self.completed_steps())
    }

    /// Only both final checks close the workflow
    pub fn status(&self) -> WorkflowStatus {
        if self.final_mis_status && self.bill_approval_status {
            WorkflowStatus::Completed
        } else {
            WorkflowStatus::InProgress
        }
    }

    /// Month parsed back from the stored name
    pub fn month(&self) -> Option<Month> {
        Month::from_str(&self.billing_month).ok()
    }
}

/// floor(100 * completed / 8)
pub fn progress_percent(completed: u32) -> u32 {
    completed.min(TOTAL_STEPS) * 100 / TOTAL_STEPS
}

/// Month from a query value: a number (`"1"`, `"01"`) or a name (`"January"`, `"jan"`)
pub fn parse_month(raw: &str) -> Option<Month> {
    let raw = raw.trim();
    if let Ok(number) = raw.parse::<u8>() {
        return Month::try_from(number).ok();
    }
    Month::from_str(raw).ok()
}

/// The billing period before `(year, month)`; January rolls back a year
pub fn previous_period(year: i32, month: Month) -> (i32, Month) {
    let previous = month.pred();
    if month == Month::January {
        (year - 1, previous)
    } else {
        (year, previous)
    }
}
