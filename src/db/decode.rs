//! Row-to-text decoding.
//!
//! Result cells are rendered with a direct textual conversion: numbers and
//! booleans as their canonical literals, temporal types via their Display
//! impls, bytea as UTF-8 when valid and base64 otherwise, SQL NULL as the
//! empty string. Decoding is driven by the column's reported type so it works
//! for both the text-format (simple query) and binary-format (prepared) paths.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::postgres::{PgRow, PgTypeInfo, PgValueRef};
use sqlx::{Column, Decode, Row, Type, TypeInfo, ValueRef};

/// Logical category for column types, used to pick a decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeCategory {
    Integer,
    Float,
    Decimal,
    Boolean,
    Binary,
    Json,
    Uuid,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Text,
}

/// Classify a type name reported by the driver into a decoder category.
fn categorize_type(type_name: &str) -> TypeCategory {
    let lower = type_name.to_lowercase();

    if lower.contains("numeric") || lower.contains("decimal") {
        return TypeCategory::Decimal;
    }
    // "interval" would otherwise match the "int" substring below
    if lower != "interval" && (lower.contains("int") || lower.contains("serial")) {
        return TypeCategory::Integer;
    }
    if lower == "bool" || lower == "boolean" {
        return TypeCategory::Boolean;
    }
    if lower.contains("float") || lower == "real" || lower.contains("double") {
        return TypeCategory::Float;
    }
    if lower == "json" || lower == "jsonb" {
        return TypeCategory::Json;
    }
    if lower == "uuid" {
        return TypeCategory::Uuid;
    }
    if lower == "bytea" {
        return TypeCategory::Binary;
    }
    if lower == "timestamptz" {
        return TypeCategory::TimestampTz;
    }
    if lower == "timestamp" {
        return TypeCategory::Timestamp;
    }
    if lower == "date" {
        return TypeCategory::Date;
    }
    if lower == "time" || lower == "timetz" {
        return TypeCategory::Time;
    }

    // varchar, text, char, name and everything else that renders as text
    TypeCategory::Text
}

/// Wrapper decoding NUMERIC columns as their exact textual representation.
/// The text wire format is what the simple-query protocol delivers; keeping
/// it as a string avoids lossy float round-trips.
#[derive(Debug)]
struct RawDecimal(String);

impl Type<sqlx::Postgres> for RawDecimal {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        let name = ty.name().to_lowercase();
        name.contains("numeric") || name.contains("decimal")
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for RawDecimal {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<sqlx::Postgres>>::decode(value)?;
        Ok(RawDecimal(s.to_string()))
    }
}

/// Column names in result order.
pub fn column_names(row: &PgRow) -> Vec<String> {
    row.columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect()
}

/// Render every cell of a row as text, in column order.
pub fn row_to_text(row: &PgRow) -> Vec<String> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| decode_cell(row, idx, col.type_info().name()))
        .collect()
}

fn decode_cell(row: &PgRow, idx: usize, type_name: &str) -> String {
    // NULL renders as the empty string regardless of type.
    match row.try_get_raw(idx) {
        Ok(value) if value.is_null() => return String::new(),
        Ok(_) => {}
        Err(e) => {
            tracing::error!(column = idx, error = %e, "Failed to read column");
            return String::new();
        }
    }

    match categorize_type(type_name) {
        TypeCategory::Decimal => decode_as::<RawDecimal>(row, idx).map(|v| v.0),
        TypeCategory::Integer => decode_integer(row, idx),
        TypeCategory::Boolean => decode_as::<bool>(row, idx).map(|v| v.to_string()),
        TypeCategory::Float => decode_float(row, idx),
        TypeCategory::Binary => decode_as::<Vec<u8>>(row, idx).map(|v| binary_to_text(&v)),
        TypeCategory::Json => {
            decode_as::<serde_json::Value>(row, idx).map(|v| v.to_string())
        }
        TypeCategory::Uuid => decode_as::<sqlx::types::Uuid>(row, idx).map(|v| v.to_string()),
        TypeCategory::Date => decode_as::<NaiveDate>(row, idx).map(|v| v.to_string()),
        TypeCategory::Time => decode_as::<NaiveTime>(row, idx).map(|v| v.to_string()),
        TypeCategory::Timestamp => decode_as::<NaiveDateTime>(row, idx).map(|v| v.to_string()),
        TypeCategory::TimestampTz => {
            decode_as::<DateTime<Utc>>(row, idx).map(|v| v.to_string())
        }
        TypeCategory::Text => decode_as::<String>(row, idx),
    }
    .unwrap_or_else(|| {
        tracing::error!(column = idx, type_name, "Failed to decode column value");
        String::new()
    })
}

fn decode_as<'r, T>(row: &'r PgRow, idx: usize) -> Option<T>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + Type<sqlx::Postgres>,
{
    row.try_get::<Option<T>, _>(idx).ok().flatten()
}

fn decode_integer(row: &PgRow, idx: usize) -> Option<String> {
    if let Some(v) = decode_as::<i16>(row, idx) {
        return Some(v.to_string());
    }
    if let Some(v) = decode_as::<i32>(row, idx) {
        return Some(v.to_string());
    }
    decode_as::<i64>(row, idx).map(|v| v.to_string())
}

fn decode_float(row: &PgRow, idx: usize) -> Option<String> {
    if let Some(v) = decode_as::<f32>(row, idx) {
        return Some(v.to_string());
    }
    decode_as::<f64>(row, idx).map(|v| v.to_string())
}

fn binary_to_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => STANDARD.encode(bytes),
    }
}
