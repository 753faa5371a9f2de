use axum::Json;
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::usecases;
use crate::usecases::u501_fetch_manifests::snapshot::manifest_store;

// ============================================================================
// UseCase u501: Fetch manifests
// ============================================================================

static FETCH_EXECUTOR: Lazy<Arc<usecases::u501_fetch_manifests::FetchExecutor>> =
    Lazy::new(|| {
        let store = manifest_store().clone();
        Arc::new(usecases::u501_fetch_manifests::FetchExecutor::new(store))
    });

/// POST /api/u501/fetch/run
pub async fn u501_run_fetch(
    Json(request): Json<contracts::usecases::u501_fetch_manifests::FetchRequest>,
) -> Result<Json<contracts::usecases::u501_fetch_manifests::FetchResponse>, axum::http::StatusCode>
{
    match FETCH_EXECUTOR.run_fetch(request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("Failed to fetch manifests: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/u501/fetch/status
pub async fn u501_fetch_status() -> Json<contracts::usecases::u501_fetch_manifests::FetchStatus> {
    Json(manifest_store().status())
}

/// Стартовая загрузка с параметрами по умолчанию (вызывается из main)
pub async fn run_initial_fetch() {
    let request = contracts::usecases::u501_fetch_manifests::FetchRequest::default();
    match FETCH_EXECUTOR.run_fetch(request).await {
        Ok(response) => tracing::info!("Initial manifest fetch: {}", response.message),
        Err(e) => tracing::error!("Initial manifest fetch failed: {}", e),
    }
}
