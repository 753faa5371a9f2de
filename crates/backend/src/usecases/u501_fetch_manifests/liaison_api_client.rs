use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use contracts::usecases::u501_fetch_manifests::FetchError;

use crate::shared::config::LiaisonConfig;

/// Предохранитель от бесконечной пагинации при некорректном totalPages
const MAX_PAGES_PER_DATE: i64 = 200;

/// Ошибка загрузки одной страницы манифестов
#[derive(Debug, Error)]
pub enum LiaisonApiError {
    /// Сервис ответил не-2xx статусом
    #[error("liaison service returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// Транспортная ошибка или таймаут
    #[error("liaison request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Тело ответа не разобралось как страница манифестов
    #[error("failed to decode liaison response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl LiaisonApiError {
    /// HTTP статус, если он известен для этой ошибки
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            Self::Decode(_) => None,
        }
    }
}

/// Источник страниц манифестов
///
/// Единственная точка сетевого I/O загрузчика; в тестах подменяется
/// сценарным фейком.
#[async_trait]
pub trait ManifestPageSource {
    async fn fetch_manifest_page(
        &self,
        manifest_date: NaiveDate,
        page_number: i64,
        page_size: i64,
    ) -> Result<ManifestPageResponse, LiaisonApiError>;
}

/// HTTP-клиент для работы с liaison-сервисом манифестов
pub struct LiaisonApiClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl LiaisonApiClient {
    pub fn new(config: &LiaisonConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(config.timeout_secs))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }
}

#[async_trait]
impl ManifestPageSource for LiaisonApiClient {
    /// Получить одну страницу манифестов
    /// Endpoint: POST /api/liaison/manifest/getAllLiaisonManifest
    async fn fetch_manifest_page(
        &self,
        manifest_date: NaiveDate,
        page_number: i64,
        page_size: i64,
    ) -> Result<ManifestPageResponse, LiaisonApiError> {
        let url = format!("{}/api/liaison/manifest/getAllLiaisonManifest", self.base_url);

        #[derive(Debug, Serialize)]
        struct PageRequestBody {
            #[serde(rename = "manifestDate")]
            manifest_date: String,
            #[serde(rename = "pageNumber")]
            page_number: i64,
            #[serde(rename = "pageSize")]
            page_size: i64,
        }

        let request_body = PageRequestBody {
            manifest_date: manifest_date.format("%Y-%m-%d").to_string(),
            page_number,
            page_size,
        };

        tracing::debug!(
            "POST {} manifestDate={} page={} pageSize={}",
            url,
            request_body.manifest_date,
            page_number,
            page_size
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", &self.token))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                "Liaison manifest request for {} page {} failed with status {}: {}",
                manifest_date,
                page_number,
                status,
                body
            );
            return Err(LiaisonApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        match serde_json::from_str::<ManifestPageResponse>(&body) {
            Ok(page) => {
                tracing::debug!(
                    "Liaison page {} for {}: {} records, totalPages={}",
                    page_number,
                    manifest_date,
                    page.data.len(),
                    page.total_pages
                );
                Ok(page)
            }
            Err(e) => {
                tracing::error!("Failed to parse liaison manifest response: {}", e);
                Err(LiaisonApiError::Decode(e))
            }
        }
    }
}

/// Результат загрузки окна дат
#[derive(Debug, Default)]
pub struct ManifestWindow {
    pub records: Vec<RawManifestRecord>,
    pub errors: Vec<FetchError>,
}

/// Загрузить манифесты за `window_days` календарных дней, заканчивая
/// `end_date` (включительно), от новых дат к старым.
///
/// Ошибка одной даты не прерывает остальные: по дате записывается
/// FetchError, а уже полученные страницы этой даты остаются в результате.
pub async fn fetch_manifest_window<S: ManifestPageSource + Sync>(
    source: &S,
    end_date: NaiveDate,
    window_days: u32,
    page_size: i64,
) -> ManifestWindow {
    let mut window = ManifestWindow::default();

    for offset in 0..window_days {
        let date = end_date - chrono::Duration::days(offset as i64);
        match fetch_date_records(source, date, page_size, &mut window.records).await {
            Ok(fetched) => {
                tracing::info!("Fetched {} manifest(s) for {}", fetched, date);
            }
            Err(e) => {
                tracing::warn!("Manifest fetch for {} aborted: {}", date, e);
                window.errors.push(FetchError {
                    manifest_date: date,
                    status_code: e.status_code(),
                    message: e.to_string(),
                });
            }
        }
    }

    window
}

/// Постраничная загрузка одной даты; возвращает число полученных манифестов
async fn fetch_date_records<S: ManifestPageSource + Sync>(
    source: &S,
    date: NaiveDate,
    page_size: i64,
    records: &mut Vec<RawManifestRecord>,
) -> Result<usize, LiaisonApiError> {
    let mut page = 1;
    let mut fetched = 0usize;

    loop {
        let response = source.fetch_manifest_page(date, page, page_size).await?;

        let page_records = response.data.len();
        if page_records == 0 {
            break;
        }
        fetched += page_records;
        records.extend(response.data);

        // totalPages=0 (поле не пришло) означает единственную страницу
        if page >= response.total_pages {
            break;
        }

        page += 1;

        if page > MAX_PAGES_PER_DATE {
            tracing::warn!(
                "Reached maximum page limit ({}) for {}, stopping pagination",
                MAX_PAGES_PER_DATE,
                date
            );
            break;
        }
    }

    Ok(fetched)
}

// ============================================================================
// Wire structures liaison-сервиса
// ============================================================================

/// Страница манифестов, как ее возвращает liaison-сервис
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestPageResponse {
    #[serde(default)]
    pub data: Vec<RawManifestRecord>,
    #[serde(rename = "totalPages", default)]
    pub total_pages: i64,
}

/// Манифест: дневная партия кейсов одного филиала с разбивкой по этапам
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawManifestRecord {
    #[serde(rename = "lamToBranchName", default)]
    pub lam_to_branch_name: Option<String>,
    /// ISO-8601, обычно с суффиксом "Z"
    #[serde(rename = "manifestDate", default)]
    pub manifest_date: Option<String>,
    #[serde(rename = "stageStepAggregations", default)]
    pub stage_step_aggregations: Vec<StageAggregation>,
}

/// Счетчик кейсов на одном этапе внутри манифеста
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageAggregation {
    #[serde(rename = "stepArabicName", default)]
    pub step_arabic_name: Option<String>,
    #[serde(rename = "currentCasesCount", default)]
    pub current_cases_count: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    enum Scripted {
        Page(ManifestPageResponse),
        Fail(u16),
    }

    /// Сценарный источник страниц: (дата, номер страницы) -> ответ
    struct FakeSource {
        script: HashMap<(NaiveDate, i64), Scripted>,
        calls: Mutex<Vec<(NaiveDate, i64)>>,
    }

    impl FakeSource {
        fn new(script: HashMap<(NaiveDate, i64), Scripted>) -> Self {
            Self {
                script,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(NaiveDate, i64)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ManifestPageSource for FakeSource {
        async fn fetch_manifest_page(
            &self,
            manifest_date: NaiveDate,
            page_number: i64,
            _page_size: i64,
        ) -> Result<ManifestPageResponse, LiaisonApiError> {
            self.calls.lock().unwrap().push((manifest_date, page_number));
            match self.script.get(&(manifest_date, page_number)) {
                Some(Scripted::Page(page)) => Ok(page.clone()),
                Some(Scripted::Fail(status)) => Err(LiaisonApiError::Status {
                    status: *status,
                    body: "internal error".to_string(),
                }),
                None => Ok(ManifestPageResponse {
                    data: vec![],
                    total_pages: 0,
                }),
            }
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(branch: &str) -> RawManifestRecord {
        RawManifestRecord {
            lam_to_branch_name: Some(branch.to_string()),
            manifest_date: Some("2024-05-01T10:00:00Z".to_string()),
            stage_step_aggregations: vec![],
        }
    }

    fn page(records: usize, total_pages: i64) -> Scripted {
        Scripted::Page(ManifestPageResponse {
            data: (0..records).map(|i| record(&format!("branch {}", i))).collect(),
            total_pages,
        })
    }

    #[tokio::test]
    async fn test_pagination_stops_at_total_pages() {
        let date = day("2024-05-03");
        let mut script = HashMap::new();
        script.insert((date, 1), page(2, 3));
        script.insert((date, 2), page(2, 3));
        script.insert((date, 3), page(2, 3));
        let source = FakeSource::new(script);

        let window = fetch_manifest_window(&source, date, 1, 2).await;

        assert_eq!(window.records.len(), 6);
        assert!(window.errors.is_empty());
        // страница 4 не запрашивается
        assert_eq!(source.calls(), vec![(date, 1), (date, 2), (date, 3)]);
    }

    #[tokio::test]
    async fn test_single_page_when_total_pages_missing() {
        let date = day("2024-05-03");
        let mut script = HashMap::new();
        script.insert((date, 1), page(5, 0));
        let source = FakeSource::new(script);

        let window = fetch_manifest_window(&source, date, 1, 100).await;

        assert_eq!(window.records.len(), 5);
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_first_page_stops_without_error() {
        let date = day("2024-05-03");
        let mut script = HashMap::new();
        script.insert((date, 1), page(0, 5));
        let source = FakeSource::new(script);

        let window = fetch_manifest_window(&source, date, 1, 100).await;

        assert!(window.records.is_empty());
        assert!(window.errors.is_empty());
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_date_is_isolated() {
        let mut script = HashMap::new();
        script.insert((day("2024-05-03"), 1), page(1, 1));
        script.insert((day("2024-05-02"), 1), Scripted::Fail(500));
        script.insert((day("2024-05-01"), 1), page(2, 1));
        let source = FakeSource::new(script);

        let window = fetch_manifest_window(&source, day("2024-05-03"), 3, 100).await;

        assert_eq!(window.records.len(), 3);
        assert_eq!(window.errors.len(), 1);
        assert_eq!(window.errors[0].manifest_date, day("2024-05-02"));
        assert_eq!(window.errors[0].status_code, Some(500));
    }

    #[tokio::test]
    async fn test_error_keeps_already_fetched_pages() {
        let date = day("2024-05-03");
        let mut script = HashMap::new();
        script.insert((date, 1), page(2, 3));
        script.insert((date, 2), Scripted::Fail(502));
        let source = FakeSource::new(script);

        let window = fetch_manifest_window(&source, date, 1, 2).await;

        // страница 1 уже в результате, ошибка записана по дате
        assert_eq!(window.records.len(), 2);
        assert_eq!(window.errors.len(), 1);
        assert_eq!(window.errors[0].status_code, Some(502));
    }

    #[tokio::test]
    async fn test_window_enumerates_dates_newest_first() {
        let source = FakeSource::new(HashMap::new());

        let window = fetch_manifest_window(&source, day("2024-05-03"), 3, 100).await;

        assert!(window.records.is_empty());
        assert_eq!(
            source.calls(),
            vec![
                (day("2024-05-03"), 1),
                (day("2024-05-02"), 1),
                (day("2024-05-01"), 1),
            ]
        );
    }

    #[test]
    fn test_page_response_decodes_wire_shape() {
        let json = r#"{
            "data": [{
                "lamToBranchName": "الفرع أ",
                "manifestDate": "2024-05-01T10:00:00Z",
                "stageStepAggregations": [
                    {"stepArabicName": "قيد التوصيل", "currentCasesCount": 7}
                ]
            }],
            "totalPages": 2
        }"#;
        let page: ManifestPageResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.data.len(), 1);
        let record = &page.data[0];
        assert_eq!(record.lam_to_branch_name.as_deref(), Some("الفرع أ"));
        assert_eq!(record.stage_step_aggregations.len(), 1);
        assert_eq!(
            record.stage_step_aggregations[0].step_arabic_name.as_deref(),
            Some("قيد التوصيل")
        );
        assert_eq!(
            record.stage_step_aggregations[0].current_cases_count,
            Some(7)
        );
    }

    #[test]
    fn test_page_response_tolerates_missing_fields() {
        let page: ManifestPageResponse = serde_json::from_str(r#"{"data":[{}]}"#).unwrap();
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.data.len(), 1);
        assert!(page.data[0].lam_to_branch_name.is_none());
        assert!(page.data[0].manifest_date.is_none());
        assert!(page.data[0].stage_step_aggregations.is_empty());
    }
}
