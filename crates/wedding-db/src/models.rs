//! Database row types, mapped directly from SQLite rows. Timestamps stay as
//! stored text until converted into the API models.

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::Row;

use wedding_types::models::{Confirmation, Wish};

use crate::{Result, StoreError};

pub struct WishRow {
    pub id: i64,
    pub name: String,
    pub wish_text: String,
    pub created_at: String,
}

pub struct ConfirmationRow {
    pub id: i64,
    pub name: String,
    pub attending: bool,
    pub guests_count: i64,
    pub message: Option<String>,
    pub created_at: String,
}

impl WishRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            wish_text: row.get(2)?,
            created_at: row.get(3)?,
        })
    }

    pub fn into_wish(self) -> Result<Wish> {
        let created_at = parse_timestamp(self.id, &self.created_at)?;
        Ok(Wish {
            id: self.id,
            name: self.name,
            wish_text: self.wish_text,
            created_at,
        })
    }
}

impl ConfirmationRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            attending: row.get(2)?,
            guests_count: row.get(3)?,
            message: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    pub fn into_confirmation(self) -> Result<Confirmation> {
        let created_at = parse_timestamp(self.id, &self.created_at)?;
        Ok(Confirmation {
            id: self.id,
            name: self.name,
            attending: self.attending,
            guests_count: self.guests_count,
            message: self.message,
            created_at,
        })
    }
}

/// Rows written by this crate carry RFC 3339 text. Rows inserted by hand
/// with SQLite's `datetime('now')` use "YYYY-MM-DD HH:MM:SS" without a zone
/// and are read as UTC.
fn parse_timestamp(id: i64, raw: &str) -> Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc()))
        .map_err(|_| StoreError::CorruptRow {
            column: "created_at",
            id,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_rfc3339_and_sqlite_datetime() {
        let ts = parse_timestamp(1, "2026-06-20T15:30:00.125Z").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2026, 6, 20));
        assert_eq!(ts.timestamp_subsec_millis(), 125);

        let ts = parse_timestamp(2, "2026-06-20 15:30:00").unwrap();
        assert_eq!((ts.hour(), ts.minute()), (15, 30));
    }

    #[test]
    fn garbage_timestamp_is_corrupt_row() {
        let err = parse_timestamp(7, "yesterday").unwrap_err();
        assert!(matches!(err, StoreError::CorruptRow { id: 7, .. }));
    }
}
