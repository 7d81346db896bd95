use rusqlite::{Connection, OptionalExtension};

use wedding_types::models::{Confirmation, Wish};

use crate::models::{ConfirmationRow, WishRow};
use crate::{Database, Result};

/// Normalizes list paging. `None` means the page is empty and the store
/// need not be asked at all (SQLite would read a negative LIMIT as
/// "no limit").
fn page(skip: i64, limit: i64) -> Option<(i64, i64)> {
    if limit <= 0 {
        return None;
    }
    Some((skip.max(0), limit))
}

impl Database {
    // -- Wishes --

    /// Inserts a wish in its own transaction and returns the stored row.
    pub fn create_wish(&self, name: &str, wish_text: &str) -> Result<Wish> {
        let row = self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let row = tx.query_row(
                "INSERT INTO wishes (name, wish_text) VALUES (?1, ?2)
                 RETURNING id, name, wish_text, created_at",
                (name, wish_text),
                WishRow::from_row,
            )?;
            tx.commit()?;
            Ok(row)
        })?;
        row.into_wish()
    }

    /// Newest first.
    pub fn list_wishes(&self, skip: i64, limit: i64) -> Result<Vec<Wish>> {
        let Some((skip, limit)) = page(skip, limit) else {
            return Ok(vec![]);
        };
        self.with_conn(|conn| query_wishes(conn, skip, limit))?
            .into_iter()
            .map(WishRow::into_wish)
            .collect()
    }

    pub fn get_wish(&self, id: i64) -> Result<Option<Wish>> {
        let row = self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, name, wish_text, created_at FROM wishes WHERE id = ?1",
                    [id],
                    WishRow::from_row,
                )
                .optional()?;
            Ok(row)
        })?;
        row.map(WishRow::into_wish).transpose()
    }

    // -- Confirmations --

    pub fn create_confirmation(
        &self,
        name: &str,
        attending: bool,
        guests_count: i64,
        message: Option<&str>,
    ) -> Result<Confirmation> {
        let row = self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let row = tx.query_row(
                "INSERT INTO confirmations (name, attending, guests_count, message)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, name, attending, guests_count, message, created_at",
                rusqlite::params![name, attending, guests_count, message],
                ConfirmationRow::from_row,
            )?;
            tx.commit()?;
            Ok(row)
        })?;
        row.into_confirmation()
    }

    pub fn list_confirmations(&self, skip: i64, limit: i64) -> Result<Vec<Confirmation>> {
        let Some((skip, limit)) = page(skip, limit) else {
            return Ok(vec![]);
        };
        self.with_conn(|conn| query_confirmations(conn, skip, limit))?
            .into_iter()
            .map(ConfirmationRow::into_confirmation)
            .collect()
    }

    pub fn get_confirmation(&self, id: i64) -> Result<Option<Confirmation>> {
        let row = self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, name, attending, guests_count, message, created_at
                     FROM confirmations WHERE id = ?1",
                    [id],
                    ConfirmationRow::from_row,
                )
                .optional()?;
            Ok(row)
        })?;
        row.map(ConfirmationRow::into_confirmation).transpose()
    }
}

fn query_wishes(conn: &Connection, skip: i64, limit: i64) -> Result<Vec<WishRow>> {
    // julianday() compares the RFC 3339 rows written here and hand-inserted
    // "YYYY-MM-DD HH:MM:SS" rows by instant; id breaks same-millisecond ties
    let mut stmt = conn.prepare(
        "SELECT id, name, wish_text, created_at
         FROM wishes
         ORDER BY julianday(created_at) DESC, id DESC
         LIMIT ?1 OFFSET ?2",
    )?;

    let rows = stmt
        .query_map([limit, skip], WishRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_confirmations(conn: &Connection, skip: i64, limit: i64) -> Result<Vec<ConfirmationRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, attending, guests_count, message, created_at
         FROM confirmations
         ORDER BY julianday(created_at) DESC, id DESC
         LIMIT ?1 OFFSET ?2",
    )?;

    let rows = stmt
        .query_map([limit, skip], ConfirmationRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn wish_ids_increase() {
        let db = db();
        let a = db.create_wish("Alice", "Congrats!").unwrap();
        let b = db.create_wish("Bob", "Best wishes").unwrap();
        let c = db.create_wish("Carol", "Cheers").unwrap();

        assert!(a.id >= 1);
        assert!(a.id < b.id && b.id < c.id);
        assert_eq!(a.name, "Alice");
        assert_eq!(a.wish_text, "Congrats!");
    }

    #[test]
    fn list_wishes_newest_first() {
        let db = db();
        db.create_wish("Alice", "first").unwrap();
        db.create_wish("Bob", "second").unwrap();
        let newest = db.create_wish("Carol", "third").unwrap();

        let wishes = db.list_wishes(0, 100).unwrap();
        let names: Vec<_> = wishes.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["Carol", "Bob", "Alice"]);
        assert_eq!(wishes[0], newest);
    }

    #[test]
    fn list_wishes_pages() {
        let db = db();
        for i in 0..5 {
            db.create_wish(&format!("guest{i}"), "hello").unwrap();
        }

        let first = db.list_wishes(0, 1).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].name, "guest4");

        let page = db.list_wishes(1, 2).unwrap();
        let names: Vec<_> = page.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["guest3", "guest2"]);

        assert!(db.list_wishes(5, 10).unwrap().is_empty());
    }

    #[test]
    fn non_positive_limit_is_empty() {
        let db = db();
        db.create_wish("Alice", "Congrats!").unwrap();

        assert!(db.list_wishes(0, 0).unwrap().is_empty());
        assert!(db.list_wishes(0, -1).unwrap().is_empty());
        assert!(db.list_confirmations(0, -5).unwrap().is_empty());
    }

    #[test]
    fn negative_skip_reads_from_start() {
        let db = db();
        db.create_wish("Alice", "Congrats!").unwrap();
        assert_eq!(db.list_wishes(-3, 10).unwrap().len(), 1);
    }

    #[test]
    fn constraint_violation_persists_nothing() {
        let db = db();
        let err = db.create_wish("", "Congrats!").unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));

        let err = db.create_wish(&"x".repeat(101), "Congrats!").unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));

        assert!(db.list_wishes(0, 100).unwrap().is_empty());
    }

    #[test]
    fn confirmation_roundtrip_without_message() {
        let db = db();
        let created = db.create_confirmation("Bob", true, 1, None).unwrap();
        assert_eq!(created.guests_count, 1);
        assert_eq!(created.message, None);

        let listed = db.list_confirmations(0, 100).unwrap();
        assert_eq!(listed, vec![created.clone()]);
        assert_eq!(db.get_confirmation(created.id).unwrap(), Some(created));
    }

    #[test]
    fn confirmation_keeps_declines_and_messages() {
        let db = db();
        let no = db
            .create_confirmation("Dana", false, 0, Some("Sorry, traveling"))
            .unwrap();
        assert!(!no.attending);
        assert_eq!(no.message.as_deref(), Some("Sorry, traveling"));

        let yes = db.create_confirmation("Eve", true, 3, None).unwrap();
        let listed = db.list_confirmations(0, 100).unwrap();
        assert_eq!(listed[0].id, yes.id);
        assert_eq!(listed[1].id, no.id);
    }

    #[test]
    fn attending_has_no_store_default() {
        let db = db();
        let err = db
            .with_conn_mut(|conn| {
                conn.execute("INSERT INTO confirmations (name) VALUES ('Frank')", [])?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
    }

    #[test]
    fn get_missing_is_none() {
        let db = db();
        assert_eq!(db.get_wish(42).unwrap(), None);
        assert_eq!(db.get_confirmation(42).unwrap(), None);
    }

    #[test]
    fn reads_hand_inserted_timestamps() {
        let db = db();
        db.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO wishes (name, wish_text, created_at)
                 VALUES ('Grandma', 'Be happy', datetime('now', '-1 day'))",
                [],
            )?;
            Ok(())
        })
        .unwrap();
        let fresh = db.create_wish("Alice", "Congrats!").unwrap();

        let wishes = db.list_wishes(0, 10).unwrap();
        assert_eq!(wishes.len(), 2);
        assert_eq!(wishes[0].id, fresh.id);
        assert_eq!(wishes[1].name, "Grandma");
    }

    #[test]
    fn hand_inserted_rows_order_by_instant() {
        let db = db();
        let fresh = db.create_wish("Alice", "Congrats!").unwrap();
        // Same calendar date in most runs, but an hour newer than Alice's row.
        db.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO wishes (name, wish_text, created_at)
                 VALUES ('Grandpa', 'Welcome to the family', datetime('now', '+1 hour'))",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let wishes = db.list_wishes(0, 10).unwrap();
        assert_eq!(wishes[0].name, "Grandpa");
        assert_eq!(wishes[1].id, fresh.id);
    }

    #[test]
    fn file_store_lists_committed_rows() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("wedding.db").display());
        let db = Database::open(&url).unwrap();

        db.create_wish("Alice", "first").unwrap();
        let bob = db.create_wish("Bob", "second").unwrap();
        let yes = db.create_confirmation("Carol", true, 2, None).unwrap();

        let wishes = db.list_wishes(0, 1).unwrap();
        assert_eq!(wishes, vec![bob.clone()]);
        assert_eq!(db.get_wish(bob.id).unwrap(), Some(bob));
        assert_eq!(db.list_confirmations(0, 10).unwrap(), vec![yes]);
    }
}
