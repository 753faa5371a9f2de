use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Относительный выбор отчетной даты (разрешается по бизнес-календарю)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePreset {
    Today,
    Yesterday,
}

/// Query-параметры выбора даты для отчетных эндпоинтов
///
/// Явная дата всегда имеет приоритет над пресетом. Без параметров
/// берется бизнес-сегодня.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportDateQuery {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub preset: Option<DatePreset>,
}

impl ReportDateQuery {
    /// Разрешить эффективную отчетную дату относительно бизнес-сегодня
    pub fn resolve(&self, business_today: NaiveDate) -> NaiveDate {
        resolve_report_date(self.date, self.preset, business_today)
    }
}

/// Общее правило разрешения даты для всех отчетных query
pub fn resolve_report_date(
    date: Option<NaiveDate>,
    preset: Option<DatePreset>,
    business_today: NaiveDate,
) -> NaiveDate {
    if let Some(date) = date {
        return date;
    }
    match preset {
        Some(DatePreset::Yesterday) => business_today - chrono::Duration::days(1),
        Some(DatePreset::Today) | None => business_today,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_explicit_date_wins_over_preset() {
        let query = ReportDateQuery {
            date: Some(day("2024-05-01")),
            preset: Some(DatePreset::Yesterday),
        };
        assert_eq!(query.resolve(day("2024-06-15")), day("2024-05-01"));
    }

    #[test]
    fn test_preset_yesterday() {
        let query = ReportDateQuery {
            date: None,
            preset: Some(DatePreset::Yesterday),
        };
        assert_eq!(query.resolve(day("2024-06-15")), day("2024-06-14"));
    }

    #[test]
    fn test_defaults_to_business_today() {
        let query = ReportDateQuery::default();
        assert_eq!(query.resolve(day("2024-06-15")), day("2024-06-15"));
    }

    #[test]
    fn test_preset_deserializes_from_snake_case() {
        let preset: DatePreset = serde_json::from_str("\"yesterday\"").unwrap();
        assert_eq!(preset, DatePreset::Yesterday);
    }
}
