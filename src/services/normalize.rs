// src/services/normalize.rs

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::{
    common::error::AppError,
    models::lead::{to_column_name, FieldKind, LeadField, LeadValue, READ_ONLY_COLUMNS},
};

/// Converte o corpo do formulário em pares (coluna conhecida, valor tipado).
/// Chave desconhecida ou somente leitura derruba o insert inteiro.
pub fn normalize_fields(
    fields: &Map<String, Value>,
    offset: &FixedOffset,
) -> Result<Vec<(LeadField, LeadValue)>, AppError> {
    let mut out: Vec<(LeadField, LeadValue)> = Vec::with_capacity(fields.len());

    for (key, raw) in fields {
        let column = to_column_name(key);
        if READ_ONLY_COLUMNS.contains(&column.as_str()) {
            return Err(AppError::ReadOnlyField(key.clone()));
        }
        let field = LeadField::from_column(&column)
            .ok_or_else(|| AppError::UnknownField(key.clone()))?;

        let value = normalize_value(field, key, raw, offset)?;

        // `srNo` e `sr_no` apontam para a mesma coluna: vale o último.
        match out.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = value,
            None => out.push((field, value)),
        }
    }

    Ok(out)
}

fn normalize_value(
    field: LeadField,
    key: &str,
    raw: &Value,
    offset: &FixedOffset,
) -> Result<LeadValue, AppError> {
    let kind = field.kind();

    // "" e null viram NULL nos campos numéricos e de data.
    if kind.is_nullable_on_empty() && is_blank(raw) {
        return Ok(match kind {
            FieldKind::Integer => LeadValue::Integer(None),
            FieldKind::Decimal => LeadValue::Decimal(None),
            _ => LeadValue::Date(None),
        });
    }

    let invalid = |expected: &'static str| AppError::InvalidFieldValue {
        field: key.to_string(),
        expected,
    };

    match kind {
        FieldKind::Text | FieldKind::LongText => {
            let text = match raw {
                Value::Null => return Ok(LeadValue::Text(None)),
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return Err(invalid("text")),
            };
            // VARCHAR(255) conta caracteres, não bytes.
            if kind.max_chars().is_some_and(|max| text.chars().count() > max) {
                return Err(invalid("at most 255 characters"));
            }
            Ok(LeadValue::Text(Some(text)))
        }
        FieldKind::Integer => parse_integer(raw)
            .map(|v| LeadValue::Integer(Some(v)))
            .ok_or_else(|| invalid("an integer")),
        FieldKind::Decimal => parse_decimal(raw)
            .map(|v| LeadValue::Decimal(Some(v)))
            .ok_or_else(|| invalid("a number")),
        FieldKind::Date => parse_date(raw, offset)
            .map(|v| LeadValue::Date(Some(v)))
            .ok_or_else(|| invalid("a date")),
    }
}

fn is_blank(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn parse_integer(raw: &Value) -> Option<i32> {
    match raw {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
}

fn parse_decimal(raw: &Value) -> Option<Decimal> {
    let text = match raw {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Número (ou string só de dígitos) é timestamp em milissegundos.
/// Strings aceitas: `YYYY-MM-DD`, `DD-MM-YYYY`, `DD/MM/YYYY` e RFC 3339.
pub fn parse_date(raw: &Value, offset: &FixedOffset) -> Option<NaiveDate> {
    match raw {
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64))?;
            date_from_timestamp_millis(millis, offset)
        }
        Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
                return s
                    .parse::<i64>()
                    .ok()
                    .and_then(|millis| date_from_timestamp_millis(millis, offset));
            }
            parse_date_str(s, offset)
        }
        _ => None,
    }
}

fn parse_date_str(s: &str, offset: &FixedOffset) -> Option<NaiveDate> {
    for fmt in ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(offset).date_naive());
    }

    // "2025-01-15T10:30:00" sem fuso: fica com a parte da data.
    s.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Dia do calendário no fuso configurado; a hora é descartada.
pub fn date_from_timestamp_millis(millis: i64, offset: &FixedOffset) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.with_timezone(offset).date_naive())
}

/// Mantém só os ids inteiros; o resto (ex: "abc") é descartado em silêncio.
pub fn parse_ids(ids: &[Value]) -> Vec<i32> {
    ids.iter()
        .filter_map(|id| match id {
            Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
            Value::String(s) => s.trim().parse::<i32>().ok(),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, TimeZone, Utc};
    use serde_json::json;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap()
    }

    fn map(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    fn value_of(out: &[(LeadField, LeadValue)], field: LeadField) -> &LeadValue {
        &out.iter().find(|(f, _)| *f == field).unwrap().1
    }

    #[test]
    fn empty_numeric_and_date_fields_become_null() {
        let out = normalize_fields(
            &map(json!({
                "budget": "", "loanAmount": null, "totalFamilyMembers": "",
                "leadDate": "", "dob": null, "locations": "VIRAR"
            })),
            &utc(),
        )
        .unwrap();

        assert_eq!(value_of(&out, LeadField::Budget), &LeadValue::Decimal(None));
        assert_eq!(value_of(&out, LeadField::LoanAmount), &LeadValue::Decimal(None));
        assert_eq!(value_of(&out, LeadField::TotalFamilyMembers), &LeadValue::Integer(None));
        assert_eq!(value_of(&out, LeadField::LeadDate), &LeadValue::Date(None));
        assert_eq!(value_of(&out, LeadField::Dob), &LeadValue::Date(None));
    }

    #[test]
    fn empty_text_fields_are_kept_as_empty_strings() {
        let out = normalize_fields(&map(json!({ "remark": "", "name": "A. Sharma" })), &utc()).unwrap();
        assert_eq!(value_of(&out, LeadField::Remark), &LeadValue::Text(Some(String::new())));
        assert_eq!(
            value_of(&out, LeadField::Name),
            &LeadValue::Text(Some("A. Sharma".to_string()))
        );
    }

    #[test]
    fn numbers_parse_from_json_numbers_and_strings() {
        let out = normalize_fields(
            &map(json!({ "budget": 4500000.5, "loanAmount": "2500000", "totalFamilyMembers": "4" })),
            &utc(),
        )
        .unwrap();

        assert_eq!(
            value_of(&out, LeadField::Budget),
            &LeadValue::Decimal(Some(Decimal::from_str("4500000.5").unwrap()))
        );
        assert_eq!(
            value_of(&out, LeadField::LoanAmount),
            &LeadValue::Decimal(Some(Decimal::from(2_500_000)))
        );
        assert_eq!(value_of(&out, LeadField::TotalFamilyMembers), &LeadValue::Integer(Some(4)));
    }

    #[test]
    fn text_fields_accept_numbers() {
        let out = normalize_fields(&map(json!({ "contact1": 9999999999u64 })), &utc()).unwrap();
        assert_eq!(
            value_of(&out, LeadField::Contact1),
            &LeadValue::Text(Some("9999999999".to_string()))
        );
    }

    #[test]
    fn unparseable_values_are_rejected() {
        let err = normalize_fields(&map(json!({ "budget": "lots" })), &utc()).unwrap_err();
        assert!(matches!(err, AppError::InvalidFieldValue { ref field, .. } if field == "budget"));

        let err = normalize_fields(&map(json!({ "totalFamilyMembers": 2.5 })), &utc()).unwrap_err();
        assert!(matches!(err, AppError::InvalidFieldValue { .. }));

        let err = normalize_fields(&map(json!({ "visitDate": "next week" })), &utc()).unwrap_err();
        assert!(matches!(err, AppError::InvalidFieldValue { .. }));

        let err = normalize_fields(&map(json!({ "name": ["a"] })), &utc()).unwrap_err();
        assert!(matches!(err, AppError::InvalidFieldValue { .. }));
    }

    #[test]
    fn text_longer_than_the_column_is_rejected() {
        let at_limit = "é".repeat(255);
        let out = normalize_fields(&map(json!({ "name": at_limit })), &utc()).unwrap();
        assert_eq!(value_of(&out, LeadField::Name), &LeadValue::Text(Some("é".repeat(255))));

        let err = normalize_fields(&map(json!({ "name": "x".repeat(300) })), &utc()).unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidFieldValue { ref field, expected } if field == "name" && expected == "at most 255 characters"
        ));

        // TEXT não tem limite.
        let out = normalize_fields(&map(json!({ "remark": "x".repeat(300) })), &utc()).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn unknown_and_read_only_keys_are_rejected() {
        let err = normalize_fields(&map(json!({ "name": "x", "isAdmin": true })), &utc()).unwrap_err();
        assert!(matches!(err, AppError::UnknownField(ref k) if k == "isAdmin"));

        let err = normalize_fields(&map(json!({ "id": 7 })), &utc()).unwrap_err();
        assert!(matches!(err, AppError::ReadOnlyField(ref k) if k == "id"));

        let err = normalize_fields(&map(json!({ "createdAt": "2025-01-01" })), &utc()).unwrap_err();
        assert!(matches!(err, AppError::ReadOnlyField(_)));
    }

    #[test]
    fn aliases_of_the_same_column_collapse() {
        let out = normalize_fields(&map(json!({ "srNo": "1", "sr_no": "2" })), &utc()).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn timestamps_keep_the_calendar_day_regardless_of_time() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        for (h, m) in [(0, 0), (9, 30), (23, 59)] {
            let ts = Utc
                .from_utc_datetime(&NaiveDateTime::new(day, chrono::NaiveTime::from_hms_opt(h, m, 0).unwrap()))
                .timestamp_millis();
            assert_eq!(parse_date(&json!(ts), &utc()), Some(day));
            assert_eq!(parse_date(&json!(ts.to_string()), &utc()), Some(day));
        }
    }

    #[test]
    fn timestamps_follow_the_configured_offset() {
        // 2025-03-13T20:00:00Z é 14/03 01:30 em IST.
        let ts = Utc.with_ymd_and_hms(2025, 3, 13, 20, 0, 0).unwrap().timestamp_millis();
        assert_eq!(parse_date(&json!(ts), &utc()), NaiveDate::from_ymd_opt(2025, 3, 13));
        assert_eq!(parse_date(&json!(ts), &ist()), NaiveDate::from_ymd_opt(2025, 3, 14));
    }

    #[test]
    fn date_strings_in_all_supported_forms() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 15);
        for s in ["2025-01-15", "15-01-2025", "15/01/2025", "2025-01-15T10:00:00Z", "2025-01-15T10:00:00"] {
            assert_eq!(parse_date(&json!(s), &utc()), expected, "{s}");
        }
    }

    #[test]
    fn ids_are_filtered_to_integers() {
        assert_eq!(parse_ids(&[json!("abc"), json!("1")]), vec![1]);
        assert!(parse_ids(&[json!("1abc"), json!(2.5)]).is_empty());
        assert_eq!(parse_ids(&[json!(3), json!(" 4 "), json!(null), json!(1.5)]), vec![3, 4]);
        assert!(parse_ids(&[json!("x"), json!({})]).is_empty());
    }
}
