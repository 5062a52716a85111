use rusqlite::Connection;
use tracing::info;

use crate::StoreError;

pub fn run(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            username    TEXT NOT NULL UNIQUE,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- sender carries the opaque platform id as-is: a caller does not
        -- have to register a username before sending.
        CREATE TABLE IF NOT EXISTS messages (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            sender      TEXT NOT NULL,
            recipient   TEXT NOT NULL REFERENCES users(id),
            payload     TEXT NOT NULL,
            sent_at     TEXT NOT NULL,
            read_at     TEXT DEFAULT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_messages_recipient
            ON messages(recipient, id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
