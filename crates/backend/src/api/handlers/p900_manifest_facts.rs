use axum::{extract::Query, http::StatusCode, Json};

use contracts::projections::p900_manifest_facts::ManifestFactsResponse;
use contracts::shared::report_date::ReportDateQuery;

use crate::shared::clock;
use crate::usecases::u501_fetch_manifests::snapshot::manifest_store;

/// GET /api/p900/manifest-facts?date=YYYY-MM-DD | preset=today|yesterday
pub async fn list_facts(
    Query(query): Query<ReportDateQuery>,
) -> Result<Json<ManifestFactsResponse>, StatusCode> {
    let date = query.resolve(clock::business_today());

    match manifest_store().facts_for_date(date) {
        Some(rows) => Ok(Json(ManifestFactsResponse { date, rows })),
        None => {
            tracing::warn!("P900 manifest facts requested before the first fetch");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
