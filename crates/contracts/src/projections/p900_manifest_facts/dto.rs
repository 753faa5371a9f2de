use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Строка таблицы фактов: одно наблюдение (филиал, дата, этап, количество)
///
/// `stage` хранит исходную метку этапа как она пришла от сервиса, вместе с
/// возможным суффиксом филиала. Каноническое имя вычисляется на стороне
/// классификации и здесь не хранится.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRow {
    pub branch: String,
    /// Дата манифеста по бизнес-часам (UTC+3), не календарная дата UTC
    pub manifest_date: NaiveDate,
    pub stage: String,
    /// Количество кейсов на этапе, всегда >= 0
    pub cases_count: i64,
}

/// Строки фактов за выбранную отчетную дату
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestFactsResponse {
    pub date: NaiveDate,
    pub rows: Vec<FactRow>,
}
