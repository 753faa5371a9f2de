use chrono::{NaiveDate, NaiveDateTime};

use contracts::projections::p900_manifest_facts::FactRow;

use crate::shared::clock;
use crate::shared::stages::{UNKNOWN_BRANCH, UNKNOWN_STAGE};
use crate::usecases::u501_fetch_manifests::liaison_api_client::RawManifestRecord;

/// Результат разворачивания манифестов в строки фактов
#[derive(Debug, Default)]
pub struct ExtractOutcome {
    pub rows: Vec<FactRow>,
    /// Манифесты, отброшенные целиком из-за нечитаемой даты
    pub dropped_records: usize,
}

/// Развернуть вложенные агрегации этапов в плоские строки фактов
///
/// Манифест с нечитаемой датой отбрасывается целиком вместе со всеми его
/// этапами; отсутствующие поля подставляются по умолчанию, запись при этом
/// не отбрасывается. Чистая функция: порядок строк повторяет порядок входа.
pub fn extract_facts(records: &[RawManifestRecord]) -> ExtractOutcome {
    let mut outcome = ExtractOutcome::default();

    for record in records {
        let manifest_date = match record
            .manifest_date
            .as_deref()
            .and_then(parse_manifest_timestamp)
        {
            Some(timestamp) => clock::business_date(timestamp),
            None => {
                outcome.dropped_records += 1;
                tracing::warn!(
                    "Dropping manifest with unparsable date {:?} (branch {:?})",
                    record.manifest_date,
                    record.lam_to_branch_name
                );
                continue;
            }
        };

        let branch = normalize_label(record.lam_to_branch_name.as_deref(), UNKNOWN_BRANCH);

        for aggregation in &record.stage_step_aggregations {
            outcome.rows.push(FactRow {
                branch: branch.clone(),
                manifest_date,
                stage: normalize_label(aggregation.step_arabic_name.as_deref(), UNKNOWN_STAGE),
                // отрицательный счетчик кейсов не имеет смысла — прижимаем к нулю
                cases_count: aggregation.current_cases_count.unwrap_or(0).max(0),
            });
        }
    }

    outcome
}

/// Трим значения с подстановкой метки по умолчанию для пустых полей
fn normalize_label(value: Option<&str>, fallback: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

/// Разбор даты-времени манифеста
///
/// Сервис обычно присылает RFC 3339 с "Z", но встречаются значения без
/// смещения и голые даты. Значения со смещением нормализуются к UTC.
pub fn parse_manifest_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();

    if let Ok(timestamp) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.naive_utc());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(timestamp);
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(timestamp);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u501_fetch_manifests::liaison_api_client::StageAggregation;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(
        branch: Option<&str>,
        date: Option<&str>,
        stages: &[(Option<&str>, Option<i64>)],
    ) -> RawManifestRecord {
        RawManifestRecord {
            lam_to_branch_name: branch.map(String::from),
            manifest_date: date.map(String::from),
            stage_step_aggregations: stages
                .iter()
                .map(|(name, count)| StageAggregation {
                    step_arabic_name: name.map(String::from),
                    current_cases_count: *count,
                })
                .collect(),
        }
    }

    #[test]
    fn test_extracts_one_row_per_stage() {
        let records = vec![record(
            Some(" الفرع أ "),
            Some("2024-05-01T10:00:00Z"),
            &[
                (Some("قيد التوصيل"), Some(7)),
                (Some("شحنات سلمت بنجاح - الفرع أ"), Some(3)),
            ],
        )];

        let outcome = extract_facts(&records);

        assert_eq!(outcome.dropped_records, 0);
        assert_eq!(outcome.rows.len(), 2);
        // имя филиала тримится, метка этапа сохраняется сырой
        assert_eq!(outcome.rows[0].branch, "الفرع أ");
        assert_eq!(outcome.rows[0].manifest_date, day("2024-05-01"));
        assert_eq!(outcome.rows[1].stage, "شحنات سلمت بنجاح - الفرع أ");
        assert_eq!(outcome.rows[1].cases_count, 3);
    }

    #[test]
    fn test_business_date_shift_rolls_over_midnight() {
        // 22:30 UTC + 3 часа = следующий календарный день
        let records = vec![record(
            Some("الفرع أ"),
            Some("2024-05-01T22:30:00Z"),
            &[(Some("قيد التوصيل"), Some(1))],
        )];

        let outcome = extract_facts(&records);

        assert_eq!(outcome.rows[0].manifest_date, day("2024-05-02"));
    }

    #[test]
    fn test_unparsable_date_drops_whole_record() {
        let records = vec![
            record(
                Some("الفرع أ"),
                Some("not-a-date"),
                &[(Some("قيد التوصيل"), Some(7)), (Some("مؤجل"), Some(2))],
            ),
            record(
                Some("الفرع ب"),
                Some("2024-05-01T10:00:00Z"),
                &[(Some("قيد التوصيل"), Some(1))],
            ),
        ];

        let outcome = extract_facts(&records);

        // оба этапа первого манифеста отброшены, второй манифест цел
        assert_eq!(outcome.dropped_records, 1);
        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0].branch, "الفرع ب");
    }

    #[test]
    fn test_missing_date_drops_record() {
        let records = vec![record(Some("الفرع أ"), None, &[(Some("مؤجل"), Some(2))])];

        let outcome = extract_facts(&records);

        assert_eq!(outcome.dropped_records, 1);
        assert!(outcome.rows.is_empty());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let records = vec![record(
            None,
            Some("2024-05-01T10:00:00Z"),
            &[(None, None), (Some("   "), Some(4))],
        )];

        let outcome = extract_facts(&records);

        assert_eq!(outcome.rows.len(), 2);
        assert_eq!(outcome.rows[0].branch, "unknown");
        assert_eq!(outcome.rows[0].stage, "unknown stage");
        assert_eq!(outcome.rows[0].cases_count, 0);
        // пустая после трима метка этапа тоже заменяется
        assert_eq!(outcome.rows[1].stage, "unknown stage");
    }

    #[test]
    fn test_negative_count_clamped_to_zero() {
        let records = vec![record(
            Some("الفرع أ"),
            Some("2024-05-01T10:00:00Z"),
            &[(Some("مؤجل"), Some(-5))],
        )];

        let outcome = extract_facts(&records);

        assert_eq!(outcome.rows[0].cases_count, 0);
    }

    #[test]
    fn test_extraction_is_pure() {
        let records = vec![record(
            Some("الفرع أ"),
            Some("2024-05-01T10:00:00Z"),
            &[(Some("قيد التوصيل"), Some(7))],
        )];

        let first = extract_facts(&records);
        let second = extract_facts(&records);

        assert_eq!(first.rows, second.rows);
        assert_eq!(first.dropped_records, second.dropped_records);
    }

    #[test]
    fn test_parse_timestamp_variants() {
        // RFC 3339 с "Z"
        assert_eq!(
            parse_manifest_timestamp("2024-05-01T10:00:00Z"),
            Some(day("2024-05-01").and_hms_opt(10, 0, 0).unwrap())
        );
        // смещение нормализуется к UTC
        assert_eq!(
            parse_manifest_timestamp("2024-05-01T10:00:00+03:00"),
            Some(day("2024-05-01").and_hms_opt(7, 0, 0).unwrap())
        );
        // без смещения
        assert_eq!(
            parse_manifest_timestamp("2024-05-01T10:00:00.123"),
            Some(
                day("2024-05-01")
                    .and_hms_milli_opt(10, 0, 0, 123)
                    .unwrap()
            )
        );
        // голая дата
        assert_eq!(
            parse_manifest_timestamp("2024-05-01"),
            Some(day("2024-05-01").and_hms_opt(0, 0, 0).unwrap())
        );
        assert_eq!(parse_manifest_timestamp("not-a-date"), None);
        assert_eq!(parse_manifest_timestamp(""), None);
    }
}
