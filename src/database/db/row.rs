//! Column codecs. Money is stored as TEXT so decimals survive exactly,
//! ids as hyphenated UUID text, timestamps as RFC 3339 UTC with microseconds
//! (lexicographic order equals chronological order), dates as `YYYY-MM-DD`.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

fn decode_err(col: &str, what: &str, e: impl std::fmt::Display) -> sqlx::Error {
    sqlx::Error::Decode(format!("Invalid {what} format for {col}: {e}").into())
}

pub fn decimal(row: &SqliteRow, col: &str) -> Result<Decimal, sqlx::Error> {
    let text: String = row.try_get(col)?;
    Decimal::from_str(&text).map_err(|e| decode_err(col, "Decimal", e))
}

pub fn uuid(row: &SqliteRow, col: &str) -> Result<Uuid, sqlx::Error> {
    let text: String = row.try_get(col)?;
    Uuid::parse_str(&text).map_err(|e| decode_err(col, "UUID", e))
}

pub fn timestamp(row: &SqliteRow, col: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    let text: String = row.try_get(col)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| decode_err(col, "timestamp", e))
}

pub fn date(row: &SqliteRow, col: &str) -> Result<NaiveDate, sqlx::Error> {
    let text: String = row.try_get(col)?;
    NaiveDate::parse_from_str(&text, "%Y-%m-%d").map_err(|e| decode_err(col, "date", e))
}

pub fn opt_date(row: &SqliteRow, col: &str) -> Result<Option<NaiveDate>, sqlx::Error> {
    let text: Option<String> = row.try_get(col)?;
    text.map(|t| NaiveDate::parse_from_str(&t, "%Y-%m-%d").map_err(|e| decode_err(col, "date", e)))
        .transpose()
}

pub fn parsed<T>(row: &SqliteRow, col: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = String>,
{
    let text: String = row.try_get(col)?;
    text.parse().map_err(|e: String| sqlx::Error::Decode(e.into()))
}

pub fn ts(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn day(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}
