use axum::{extract::Query, http::StatusCode, Json};

use contracts::dashboards::d400_branch_delivery::{
    BranchDeliveryResponse, StageBreakdownQuery, StageBreakdownResponse,
};
use contracts::shared::report_date::ReportDateQuery;

use crate::dashboards::d400_branch_delivery::service;
use crate::shared::clock;
use crate::shared::config::get_config;
use crate::usecases::u501_fetch_manifests::snapshot::manifest_store;

/// GET /api/d400/branch_delivery?date=YYYY-MM-DD | preset=today|yesterday
pub async fn get_branch_delivery(
    Query(query): Query<ReportDateQuery>,
) -> Result<Json<BranchDeliveryResponse>, StatusCode> {
    let date = query.resolve(clock::business_today());

    let rows = match manifest_store().facts_for_date(date) {
        Some(rows) => rows,
        None => {
            tracing::warn!("D400 Dashboard: requested before the first fetch");
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        }
    };

    let catalog = &get_config().stages;
    let response = BranchDeliveryResponse {
        date,
        total_cases: service::total_cases(&rows),
        branch_totals: service::branch_totals(&rows),
        success_rates: service::success_rates(&rows, catalog),
    };

    tracing::info!(
        "D400 Dashboard: {} branches, {} cases on {}",
        response.branch_totals.len(),
        response.total_cases,
        date
    );
    Ok(Json(response))
}

/// GET /api/d400/branch_delivery/stage_breakdown?branch=...&date=YYYY-MM-DD
pub async fn get_stage_breakdown(
    Query(query): Query<StageBreakdownQuery>,
) -> Result<Json<StageBreakdownResponse>, StatusCode> {
    let date = query.resolve(clock::business_today());

    let rows = match manifest_store().facts_for_date(date) {
        Some(rows) => rows,
        None => {
            tracing::warn!("D400 Dashboard: stage breakdown requested before the first fetch");
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        }
    };

    let breakdown = service::stage_totals(&rows, &query.branch, &get_config().stages);

    tracing::info!(
        "D400 Dashboard: {} stages for branch {} on {}",
        breakdown.len(),
        query.branch,
        date
    );
    Ok(Json(StageBreakdownResponse {
        date,
        branch: query.branch,
        rows: breakdown,
    }))
}
