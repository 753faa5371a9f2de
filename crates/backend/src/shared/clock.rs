use chrono::{NaiveDate, NaiveDateTime, Utc};

/// Фиксированное смещение бизнес-времени относительно UTC.
///
/// Это бизнес-правило отчетности (все даты манифестов считаются по часам
/// компании), а не настоящая таймзонная конвертация.
pub const BUSINESS_UTC_OFFSET_HOURS: i64 = 3;

/// Текущая дата по бизнес-часам
pub fn business_today() -> NaiveDate {
    (Utc::now() + chrono::Duration::hours(BUSINESS_UTC_OFFSET_HOURS)).date_naive()
}

/// Бизнес-дата для момента UTC: сдвиг на смещение и усечение до даты
pub fn business_date(utc: NaiveDateTime) -> NaiveDate {
    (utc + chrono::Duration::hours(BUSINESS_UTC_OFFSET_HOURS)).date()
}
