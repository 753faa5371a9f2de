use anyhow::Result;
use std::sync::Arc;

use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_fetch_manifests::{
    FetchManifests, FetchRequest, FetchResponse, FetchRunStatus,
};

use super::liaison_api_client::{fetch_manifest_window, LiaisonApiClient};
use super::snapshot::{ManifestSnapshot, ManifestStore};
use crate::projections::p900_manifest_facts::extractor;
use crate::shared::clock;
use crate::shared::config::get_config;

/// Executor для UseCase загрузки манифестов
pub struct FetchExecutor {
    api_client: Arc<LiaisonApiClient>,
    store: ManifestStore,
}

impl FetchExecutor {
    pub fn new(store: ManifestStore) -> Self {
        Self {
            api_client: Arc::new(LiaisonApiClient::new(&get_config().liaison)),
            store,
        }
    }

    /// Выполнить загрузку окна манифестов и заменить снапшот
    ///
    /// Загрузка строго последовательная по (дата, страница). Ошибки
    /// отдельных дат не считаются ошибкой запуска: они возвращаются в
    /// ответе, а снапшот собирается из успешно загруженных дат.
    pub async fn run_fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        let liaison = &get_config().liaison;

        let end_date = request.end_date.unwrap_or_else(clock::business_today);
        let window_days = request.window_days.unwrap_or(liaison.window_days);
        let page_size = request.page_size.unwrap_or(liaison.page_size);

        if window_days == 0 {
            anyhow::bail!("window_days must be at least 1");
        }
        if page_size <= 0 {
            anyhow::bail!("page_size must be positive");
        }

        tracing::info!(
            "{}: fetching {} day(s) ending {} (pageSize {})",
            FetchManifests::full_name(),
            window_days,
            end_date,
            page_size
        );

        let window =
            fetch_manifest_window(self.api_client.as_ref(), end_date, window_days, page_size)
                .await;
        let outcome = extractor::extract_facts(&window.records);

        let snapshot = ManifestSnapshot {
            fetched_at: chrono::Utc::now(),
            window: (0..window_days)
                .map(|offset| end_date - chrono::Duration::days(offset as i64))
                .collect(),
            manifests_loaded: window.records.len(),
            dropped_records: outcome.dropped_records,
            facts: outcome.rows,
            errors: window.errors,
        };

        let status = if snapshot.errors.is_empty() {
            FetchRunStatus::Completed
        } else {
            FetchRunStatus::CompletedWithErrors
        };
        let response = FetchResponse {
            status,
            message: format!(
                "Загружено {} манифестов ({} строк фактов) за {} дн.",
                snapshot.manifests_loaded,
                snapshot.facts.len(),
                window_days
            ),
            window: snapshot.window.clone(),
            manifests_loaded: snapshot.manifests_loaded,
            fact_rows: snapshot.facts.len(),
            dropped_records: snapshot.dropped_records,
            errors: snapshot.errors.clone(),
        };

        tracing::info!(
            "{}: {} manifest(s), {} fact row(s), {} dropped, {} date error(s)",
            FetchManifests::full_name(),
            response.manifests_loaded,
            response.fact_rows,
            response.dropped_records,
            response.errors.len()
        );

        self.store.replace(snapshot);
        Ok(response)
    }
}
