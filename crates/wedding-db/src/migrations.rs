use rusqlite::Connection;
use tracing::info;

use crate::Result;

/// Creates any missing tables. There is no version history: the statements
/// are idempotent and run on every start.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS wishes (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL CHECK (length(name) BETWEEN 1 AND 100),
            wish_text   TEXT NOT NULL CHECK (length(wish_text) > 0),
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_wishes_created
            ON wishes(created_at);

        -- attending deliberately has no default; a missing answer is an error
        CREATE TABLE IF NOT EXISTS confirmations (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            name            TEXT NOT NULL CHECK (length(name) BETWEEN 1 AND 100),
            attending       INTEGER NOT NULL CHECK (attending IN (0, 1)),
            guests_count    INTEGER NOT NULL DEFAULT 1,
            message         TEXT,
            created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_confirmations_created
            ON confirmations(created_at);
        ",
    )?;

    info!("Database schema ready");
    Ok(())
}
