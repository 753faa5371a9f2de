use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use std::sync::{Arc, RwLock};

use contracts::projections::p900_manifest_facts::FactRow;
use contracts::usecases::u501_fetch_manifests::{FetchError, FetchStatus};

/// Результат одного цикла загрузки; после создания не изменяется
#[derive(Debug, Clone)]
pub struct ManifestSnapshot {
    pub fetched_at: DateTime<Utc>,
    /// Даты окна, от новых к старым
    pub window: Vec<NaiveDate>,
    pub manifests_loaded: usize,
    pub facts: Vec<FactRow>,
    pub dropped_records: usize,
    pub errors: Vec<FetchError>,
}

/// Кэш снапшота манифестов (in-memory)
///
/// Снапшот заменяется целиком при явном запуске загрузки; отчетные
/// эндпоинты только читают его и сами загрузку никогда не запускают.
#[derive(Clone)]
pub struct ManifestStore {
    snapshot: Arc<RwLock<Option<ManifestSnapshot>>>,
}

static MANIFEST_STORE: Lazy<ManifestStore> = Lazy::new(ManifestStore::new);

/// Единственный на процесс стор снапшота
pub fn manifest_store() -> &'static ManifestStore {
    &MANIFEST_STORE
}

impl ManifestStore {
    pub fn new() -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(None)),
        }
    }

    /// Заменить снапшот целиком
    pub fn replace(&self, snapshot: ManifestSnapshot) {
        let mut guard = self.snapshot.write().unwrap();
        *guard = Some(snapshot);
    }

    /// Строки фактов за отчетную дату; None пока снапшот не загружен
    pub fn facts_for_date(&self, date: NaiveDate) -> Option<Vec<FactRow>> {
        let guard = self.snapshot.read().unwrap();
        guard.as_ref().map(|snapshot| {
            snapshot
                .facts
                .iter()
                .filter(|row| row.manifest_date == date)
                .cloned()
                .collect()
        })
    }

    /// Состояние кэша для мониторинга
    pub fn status(&self) -> FetchStatus {
        let guard = self.snapshot.read().unwrap();
        match guard.as_ref() {
            Some(snapshot) => FetchStatus {
                loaded: true,
                fetched_at: Some(snapshot.fetched_at),
                window: snapshot.window.clone(),
                manifests_loaded: snapshot.manifests_loaded,
                fact_rows: snapshot.facts.len(),
                dropped_records: snapshot.dropped_records,
                errors: snapshot.errors.clone(),
            },
            None => FetchStatus {
                loaded: false,
                fetched_at: None,
                window: vec![],
                manifests_loaded: 0,
                fact_rows: 0,
                dropped_records: 0,
                errors: vec![],
            },
        }
    }
}

impl Default for ManifestStore {
    fn default() -> Self {
        Self::new()
    }
}
