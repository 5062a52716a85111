use chrono::Utc;
use rusqlite::Connection;

use crate::models::{MessageRecord, MessageSummary};
use crate::{Database, MailboxStore, StoreError};

impl MailboxStore for Database {
    fn find_recipient(&self, username: &str) -> Result<String, StoreError> {
        self.with_conn(|conn| {
            let id = conn.query_row(
                "SELECT id FROM users WHERE username = ?1",
                [username],
                |row| row.get(0),
            )?;
            Ok(id)
        })
    }

    fn list_messages(&self, user_id: &str) -> Result<Vec<MessageSummary>, StoreError> {
        self.with_conn(|conn| query_summaries(conn, user_id))
    }

    fn get_message(&self, id: i64) -> Result<MessageRecord, StoreError> {
        self.with_conn(|conn| {
            let msg = conn.query_row(
                "SELECT m.id, COALESCE(u.username, m.sender), m.payload, m.sent_at
                 FROM messages m
                 LEFT JOIN users u ON m.sender = u.id
                 WHERE m.id = ?1",
                [id],
                |row| {
                    Ok(MessageRecord {
                        id: row.get(0)?,
                        sender: row.get(1)?,
                        payload: row.get(2)?,
                        sent_at: row.get(3)?,
                    })
                },
            )?;
            Ok(msg)
        })
    }

    fn save_message(
        &self,
        recipient_id: &str,
        sender_id: &str,
        payload: &str,
    ) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (sender, recipient, payload, sent_at)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![sender_id, recipient_id, payload, Utc::now().to_rfc3339()],
            )
            .map_err(|err| {
                // FK on recipient: the referenced user is gone
                if is_constraint_violation(&err) {
                    StoreError::NotFound
                } else {
                    err.into()
                }
            })?;
            Ok(())
        })
    }

    fn register_user(&self, user_id: &str, username: &str) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username) VALUES (?1, ?2)",
                rusqlite::params![user_id, username],
            )
            .map_err(|err| {
                if is_constraint_violation(&err) {
                    StoreError::Conflict
                } else {
                    err.into()
                }
            })?;
            Ok(())
        })
    }
}

fn query_summaries(conn: &Connection, user_id: &str) -> Result<Vec<MessageSummary>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT m.id, COALESCE(u.username, m.sender), m.sent_at
         FROM messages m
         LEFT JOIN users u ON m.sender = u.id
         WHERE m.recipient = ?1
         ORDER BY m.id ASC",
    )?;

    let rows = stmt
        .query_map([user_id], |row| {
            Ok(MessageSummary {
                id: row.get(0)?,
                sender: row.get(1)?,
                sent_at: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(e, _)
        if e.code == rusqlite::ErrorCode::ConstraintViolation)
}
