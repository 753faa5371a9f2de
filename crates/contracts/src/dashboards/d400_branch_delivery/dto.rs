use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::shared::report_date::{resolve_report_date, DatePreset};

/// Total case count per branch, one row per distinct branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchTotalRow {
    pub branch: String,
    pub total_cases: i64,
}

/// Stage breakdown row for a single selected branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageBreakdownRow {
    /// Raw stage label as received, shown to the user as the stage identity
    pub stage: String,
    /// Canonical stage name (branch suffix stripped), the classification key
    pub stage_group: String,
    pub cases_count: i64,
    /// Display color class for the canonical stage ("gray" when unmapped)
    pub color_class: String,
}

/// Delivery success ratio for one branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessRateRow {
    pub branch: String,
    pub total_cases: i64,
    /// Cases in stages classified as successful delivery
    pub delivered_cases: i64,
    /// Percent in [0, 100], rounded to 2 decimals; 0.0 when total is 0
    pub success_rate: f64,
}

/// Response for the branch delivery dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchDeliveryResponse {
    /// Resolved report date (business calendar)
    pub date: NaiveDate,
    pub total_cases: i64,
    pub branch_totals: Vec<BranchTotalRow>,
    pub success_rates: Vec<SuccessRateRow>,
}

/// Query for the per-branch stage breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageBreakdownQuery {
    pub branch: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub preset: Option<DatePreset>,
}

impl StageBreakdownQuery {
    /// Resolve the effective report date against business-today
    pub fn resolve(&self, business_today: NaiveDate) -> NaiveDate {
        resolve_report_date(self.date, self.preset, business_today)
    }
}

/// Response for the per-branch stage breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageBreakdownResponse {
    pub date: NaiveDate,
    pub branch: String,
    pub rows: Vec<StageBreakdownRow>,
}
