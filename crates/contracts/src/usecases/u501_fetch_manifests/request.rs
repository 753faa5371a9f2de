use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Запрос на загрузку окна манифестов
///
/// Все поля опциональны: отсутствующие значения берутся из конфигурации
/// (`window_days`, `page_size`) или из бизнес-календаря (`end_date`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Последняя дата окна (включительно); по умолчанию — бизнес-сегодня
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Сколько календарных дней загружать
    #[serde(default)]
    pub window_days: Option<u32>,
    /// Размер страницы liaison-сервиса
    #[serde(default)]
    pub page_size: Option<i64>,
}
