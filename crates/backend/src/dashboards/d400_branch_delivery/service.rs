use std::collections::HashMap;

use contracts::dashboards::d400_branch_delivery::{
    BranchTotalRow, StageBreakdownRow, SuccessRateRow,
};
use contracts::projections::p900_manifest_facts::FactRow;

use crate::shared::stages::{canonical_stage_name, StageCatalog};

/// Total cases across the whole fact slice
pub fn total_cases(rows: &[FactRow]) -> i64 {
    rows.iter().map(|row| row.cases_count).sum()
}

/// Group by branch and sum case counts
///
/// Sorted descending by total, ties broken by branch name ascending so the
/// output is deterministic for equal inputs regardless of row order.
pub fn branch_totals(rows: &[FactRow]) -> Vec<BranchTotalRow> {
    let mut totals: HashMap<String, i64> = HashMap::new();
    for row in rows {
        *totals.entry(row.branch.clone()).or_insert(0) += row.cases_count;
    }

    let mut result: Vec<BranchTotalRow> = totals
        .into_iter()
        .map(|(branch, total_cases)| BranchTotalRow {
            branch,
            total_cases,
        })
        .collect();
    result.sort_by(|a, b| {
        b.total_cases
            .cmp(&a.total_cases)
            .then_with(|| a.branch.cmp(&b.branch))
    });
    result
}

/// Stage breakdown for a single branch
///
/// Groups by the raw stage label (the user-facing identity); the canonical
/// name and its color class ride along for classification and display.
pub fn stage_totals(
    rows: &[FactRow],
    branch: &str,
    catalog: &StageCatalog,
) -> Vec<StageBreakdownRow> {
    let mut totals: HashMap<String, i64> = HashMap::new();
    for row in rows.iter().filter(|row| row.branch == branch) {
        *totals.entry(row.stage.clone()).or_insert(0) += row.cases_count;
    }

    let mut result: Vec<StageBreakdownRow> = totals
        .into_iter()
        .map(|(stage, cases_count)| StageBreakdownRow {
            stage_group: canonical_stage_name(&stage),
            color_class: catalog.color_class(&stage),
            stage,
            cases_count,
        })
        .collect();
    result.sort_by(|a, b| {
        b.cases_count
            .cmp(&a.cases_count)
            .then_with(|| a.stage.cmp(&b.stage))
    });
    result
}

/// Delivery success ratio per branch
///
/// `delivered` counts rows whose canonicalized stage is in the catalog's
/// success set. Branches without any success rows stay in the output with
/// zero delivered; a branch with zero total gets rate 0.0, never a
/// division by zero.
pub fn success_rates(rows: &[FactRow], catalog: &StageCatalog) -> Vec<SuccessRateRow> {
    let mut totals: HashMap<String, i64> = HashMap::new();
    let mut delivered: HashMap<String, i64> = HashMap::new();
    for row in rows {
        *totals.entry(row.branch.clone()).or_insert(0) += row.cases_count;
        if catalog.is_success_stage(&row.stage) {
            *delivered.entry(row.branch.clone()).or_insert(0) += row.cases_count;
        }
    }

    let mut result: Vec<SuccessRateRow> = totals
        .into_iter()
        .map(|(branch, total_cases)| {
            let delivered_cases = delivered.get(&branch).copied().unwrap_or(0);
            let success_rate = if total_cases > 0 {
                round2(delivered_cases as f64 / total_cases as f64 * 100.0)
            } else {
                0.0
            };
            SuccessRateRow {
                branch,
                total_cases,
                delivered_cases,
                success_rate,
            }
        })
        .collect();
    result.sort_by(|a, b| {
        b.total_cases
            .cmp(&a.total_cases)
            .then_with(|| a.branch.cmp(&b.branch))
    });
    result
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
