use crate::models::{BindingRow, InsertOutcome};
use crate::Database;
use anyhow::{Result, anyhow};
use rusqlite::{Connection, ErrorCode, OptionalExtension};

const BINDING_COLUMNS: &str = "id, chat_id, game_id, created_at";

impl Database {
    pub fn get_binding_by_chat(&self, chat_id: &str) -> Result<Option<BindingRow>> {
        self.with_conn(|conn| query_binding(conn, "chat_id = ?1", [chat_id]))
    }

    pub fn get_binding_by_game(&self, game_id: &str) -> Result<Option<BindingRow>> {
        self.with_conn(|conn| query_binding(conn, "game_id = ?1", [game_id]))
    }

    /// Insert a binding unless either identity is already bound. The lookup
    /// and the insert happen under one connection lock.
    pub fn insert_binding(&self, chat_id: &str, game_id: &str) -> Result<InsertOutcome> {
        self.with_conn(|conn| {
            if let Some(existing) =
                query_binding(conn, "chat_id = ?1 OR game_id = ?2", [chat_id, game_id])?
            {
                return Ok(InsertOutcome::Taken(existing));
            }

            let inserted = conn.execute(
                "INSERT INTO bindings (chat_id, game_id) VALUES (?1, ?2)",
                (chat_id, game_id),
            );

            match inserted {
                Ok(_) => {}
                // Another writer on the same file got there first.
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == ErrorCode::ConstraintViolation =>
                {
                    let existing =
                        query_binding(conn, "chat_id = ?1 OR game_id = ?2", [chat_id, game_id])?
                            .ok_or_else(|| anyhow!("constraint violation without a conflicting row"))?;
                    return Ok(InsertOutcome::Taken(existing));
                }
                Err(e) => return Err(e.into()),
            }

            let id = conn.last_insert_rowid();
            let row = query_binding(conn, "id = ?1", [id])?
                .ok_or_else(|| anyhow!("Inserted binding {} vanished", id))?;
            Ok(InsertOutcome::Inserted(row))
        })
    }

    /// Returns whether a row was removed.
    pub fn delete_binding_by_chat(&self, chat_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM bindings WHERE chat_id = ?1", [chat_id])?;
            Ok(n > 0)
        })
    }

    pub fn delete_binding_by_game(&self, game_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM bindings WHERE game_id = ?1", [game_id])?;
            Ok(n > 0)
        })
    }

    pub fn count_bindings(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM bindings", [], |r| r.get(0))?;
            Ok(n as u64)
        })
    }
}

fn query_binding<P: rusqlite::Params>(
    conn: &Connection,
    predicate: &str,
    params: P,
) -> Result<Option<BindingRow>> {
    let sql = format!("SELECT {} FROM bindings WHERE {} LIMIT 1", BINDING_COLUMNS, predicate);
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row(params, |row| {
            Ok(BindingRow {
                id: row.get(0)?,
                chat_id: row.get(1)?,
                game_id: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}
