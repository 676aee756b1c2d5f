use rusqlite::{Connection, OptionalExtension, Transaction, params};
use time::OffsetDateTime;
use tracing::info;

use super::store::format_timestamp;
use crate::dao::contest_store::SettingKey;

/// Create the tables if they are missing and upgrade databases written by older releases.
pub(super) fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS contests (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            opened_at      TEXT NOT NULL,
            fob_system     TEXT,
            winner_user_id INTEGER,
            winner_system  TEXT
        );

        CREATE TABLE IF NOT EXISTS contest_entries (
            contest_id  INTEGER NOT NULL REFERENCES contests(id),
            user_id     INTEGER NOT NULL,
            system_name TEXT NOT NULL,
            entered_at  TEXT NOT NULL,
            PRIMARY KEY (contest_id, user_id),
            UNIQUE (contest_id, system_name)
        );

        CREATE TABLE IF NOT EXISTS settings (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )?;

    // Early databases tracked the FOB system only in settings.
    if !table_has_column(conn, "contests", "fob_system")? {
        conn.execute("ALTER TABLE contests ADD COLUMN fob_system TEXT", [])?;
        info!("added contests.fob_system column to legacy database");
    }

    Ok(())
}

/// Make sure a current contest exists, creating contest #1 on a fresh database.
pub(super) fn bootstrap_current_contest(
    tx: &Transaction<'_>,
    now: OffsetDateTime,
) -> rusqlite::Result<()> {
    let current: Option<String> = tx
        .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![SettingKey::CurrentContestId.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    if current.is_some() {
        return Ok(());
    }

    tx.execute(
        "INSERT INTO contests(opened_at) VALUES (?1)",
        params![format_timestamp(now)?],
    )?;
    let contest_id = tx.last_insert_rowid();

    upsert_setting(tx, SettingKey::CurrentContestId, &contest_id.to_string())?;
    upsert_setting(tx, SettingKey::ContestOpen, "1")?;
    upsert_setting(tx, SettingKey::WinnerPicked, "0")?;
    info!(contest_id, "bootstrapped initial contest");
    Ok(())
}

pub(super) fn upsert_setting(conn: &Connection, key: SettingKey, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES (?1, ?2) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key.as_str(), value],
    )?;
    Ok(())
}

pub(super) fn delete_setting(conn: &Connection, key: SettingKey) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM settings WHERE key = ?1", params![key.as_str()])?;
    Ok(())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}
