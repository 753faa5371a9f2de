use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Ошибка загрузки одной даты окна
///
/// Не-2xx статус, транспортная ошибка или нечитаемый ответ прерывают
/// пагинацию только этой даты; остальные даты загружаются дальше.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchError {
    pub manifest_date: NaiveDate,
    /// HTTP статус; None для транспортных ошибок и таймаутов
    pub status_code: Option<u16>,
    pub message: String,
}

/// Итоговый статус выполнения загрузки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchRunStatus {
    Completed,
    CompletedWithErrors,
}

/// Результат выполнения загрузки окна манифестов
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResponse {
    pub status: FetchRunStatus,
    pub message: String,
    /// Даты окна, от новых к старым
    pub window: Vec<NaiveDate>,
    pub manifests_loaded: usize,
    pub fact_rows: usize,
    /// Манифесты, отброшенные из-за нечитаемой даты
    pub dropped_records: usize,
    pub errors: Vec<FetchError>,
}

/// Состояние кэшированного снапшота для мониторинга
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchStatus {
    pub loaded: bool,
    pub fetched_at: Option<DateTime<Utc>>,
    pub window: Vec<NaiveDate>,
    pub manifests_loaded: usize,
    pub fact_rows: usize,
    pub dropped_records: usize,
    pub errors: Vec<FetchError>,
}
