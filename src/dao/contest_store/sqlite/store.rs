use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use futures::future::BoxFuture;
use rusqlite::{Connection, OptionalExtension, Row, params, types::Type};
use time::{
    Date, OffsetDateTime, Time, format_description::well_known::Rfc3339,
    macros::format_description,
};
use tracing::{debug, error, info};

use super::{
    config::SqliteConfig,
    error::{SqliteDaoError, SqliteResult},
    schema::{bootstrap_current_contest, delete_setting, ensure_schema, upsert_setting},
};
use crate::dao::{
    contest_store::{ContestStore, SettingKey, SettingsMap},
    models::{ContestEntity, ContestId, EntryEntity, UserId},
    storage::{StorageError, StorageResult},
};

const CONTEST_COLUMNS: &str = "id, opened_at, fob_system, winner_user_id, winner_system";
const ENTRY_COLUMNS: &str = "contest_id, user_id, system_name, entered_at";

/// SQLite-backed [`ContestStore`]. Each call opens its own connection on a blocking thread.
#[derive(Clone)]
pub struct SqliteContestStore {
    path: Arc<Path>,
    busy_timeout: Duration,
}

impl SqliteContestStore {
    /// Open (creating if needed) the database, apply the schema and bootstrap the first contest.
    pub fn open(config: SqliteConfig) -> SqliteResult<Self> {
        if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SqliteDaoError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let store = Self {
            path: Arc::from(config.path.as_path()),
            busy_timeout: config.busy_timeout,
        };

        with_connection(&store.path, store.busy_timeout, "bootstrap", |conn| {
            ensure_schema(conn)?;
            let tx = conn.transaction()?;
            bootstrap_current_contest(&tx, OffsetDateTime::now_utc())?;
            tx.commit()
        })?;

        info!(path = %store.path.display(), "opened contest database");
        Ok(store)
    }

    /// Location of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn run<T, F>(&self, operation: &'static str, op: F) -> BoxFuture<'static, StorageResult<T>>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let path = self.path.clone();
        let busy_timeout = self.busy_timeout;
        Box::pin(async move {
            let outcome = tokio::task::spawn_blocking(move || {
                with_connection(&path, busy_timeout, operation, op)
            })
            .await
            .map_err(|source| SqliteDaoError::Worker { operation, source })
            .and_then(|result| result);

            outcome.map_err(|err| {
                match err.constraint_violation() {
                    Some(violation) => debug!(operation, ?violation, "constraint rejected write"),
                    None => error!(operation, error = ?err, "sqlite operation failed"),
                }
                StorageError::from(err)
            })
        })
    }
}

fn with_connection<T, F>(
    path: &Path,
    busy_timeout: Duration,
    operation: &'static str,
    op: F,
) -> SqliteResult<T>
where
    F: FnOnce(&mut Connection) -> rusqlite::Result<T>,
{
    let open_err = |source: rusqlite::Error| SqliteDaoError::Open {
        path: path.to_path_buf(),
        source,
    };
    let mut conn = Connection::open(path).map_err(open_err)?;
    conn.busy_timeout(busy_timeout).map_err(open_err)?;
    conn.pragma_update(None, "foreign_keys", true)
        .map_err(open_err)?;

    op(&mut conn).map_err(|source| SqliteDaoError::Query { operation, source })
}

impl ContestStore for SqliteContestStore {
    fn load_settings(&self) -> BoxFuture<'static, StorageResult<SettingsMap>> {
        self.run("load_settings", |conn| {
            let mut stmt = conn.prepare("SELECT key, value FROM settings")?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            rows.collect()
        })
    }

    fn put_setting(&self, key: SettingKey, value: String) -> BoxFuture<'static, StorageResult<()>> {
        self.run("put_setting", move |conn| upsert_setting(conn, key, &value))
    }

    fn clear_setting(&self, key: SettingKey) -> BoxFuture<'static, StorageResult<()>> {
        self.run("clear_setting", move |conn| delete_setting(conn, key))
    }

    fn find_contest(
        &self,
        id: ContestId,
    ) -> BoxFuture<'static, StorageResult<Option<ContestEntity>>> {
        self.run("find_contest", move |conn| {
            conn.query_row(
                &format!("SELECT {CONTEST_COLUMNS} FROM contests WHERE id = ?1"),
                params![id.0],
                contest_from_row,
            )
            .optional()
        })
    }

    fn list_contests(
        &self,
        winners_only: bool,
    ) -> BoxFuture<'static, StorageResult<Vec<ContestEntity>>> {
        self.run("list_contests", move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CONTEST_COLUMNS} FROM contests \
                 WHERE ?1 = 0 OR winner_user_id IS NOT NULL \
                 ORDER BY id DESC"
            ))?;
            let rows = stmt.query_map(params![winners_only], contest_from_row)?;
            rows.collect()
        })
    }

    fn begin_contest(
        &self,
        opened_at: OffsetDateTime,
    ) -> BoxFuture<'static, StorageResult<ContestEntity>> {
        self.run("begin_contest", move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO contests(opened_at) VALUES (?1)",
                params![format_timestamp(opened_at)?],
            )?;
            let id = ContestId(tx.last_insert_rowid());

            upsert_setting(&tx, SettingKey::CurrentContestId, &id.to_string())?;
            upsert_setting(&tx, SettingKey::ContestOpen, "1")?;
            upsert_setting(&tx, SettingKey::WinnerPicked, "0")?;
            for key in [
                SettingKey::FobSystem,
                SettingKey::EntryDeadline,
                SettingKey::CountdownMessageId,
                SettingKey::CountdownChannelId,
            ] {
                delete_setting(&tx, key)?;
            }
            tx.commit()?;

            Ok(ContestEntity {
                id,
                opened_at,
                fob_system: None,
                winner_user_id: None,
                winner_system: None,
            })
        })
    }

    fn conclude_contest(
        &self,
        contest_id: ContestId,
        fob_system: String,
        winner: Option<UserId>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.run("conclude_contest", move |conn| {
            let tx = conn.transaction()?;
            upsert_setting(&tx, SettingKey::ContestOpen, "0")?;
            upsert_setting(&tx, SettingKey::FobSystem, &fob_system)?;
            tx.execute(
                "UPDATE contests SET fob_system = ?2 WHERE id = ?1",
                params![contest_id.0, fob_system],
            )?;

            if let Some(user_id) = winner {
                // Winner fields are written once; a recorded winner is history.
                tx.execute(
                    "UPDATE contests SET winner_user_id = ?2, winner_system = ?3 \
                     WHERE id = ?1 AND winner_user_id IS NULL",
                    params![contest_id.0, user_id.0 as i64, fob_system],
                )?;
            }
            upsert_setting(
                &tx,
                SettingKey::WinnerPicked,
                if winner.is_some() { "1" } else { "0" },
            )?;
            tx.commit()
        })
    }

    fn find_entry(
        &self,
        contest_id: ContestId,
        user_id: UserId,
    ) -> BoxFuture<'static, StorageResult<Option<EntryEntity>>> {
        self.run("find_entry", move |conn| {
            conn.query_row(
                &format!(
                    "SELECT {ENTRY_COLUMNS} FROM contest_entries \
                     WHERE contest_id = ?1 AND user_id = ?2"
                ),
                params![contest_id.0, user_id.0 as i64],
                entry_from_row,
            )
            .optional()
        })
    }

    fn find_entry_by_system(
        &self,
        contest_id: ContestId,
        system_name: String,
    ) -> BoxFuture<'static, StorageResult<Option<EntryEntity>>> {
        self.run("find_entry_by_system", move |conn| {
            conn.query_row(
                &format!(
                    "SELECT {ENTRY_COLUMNS} FROM contest_entries \
                     WHERE contest_id = ?1 AND system_name = ?2"
                ),
                params![contest_id.0, system_name],
                entry_from_row,
            )
            .optional()
        })
    }

    fn list_entries(
        &self,
        contest_id: ContestId,
    ) -> BoxFuture<'static, StorageResult<Vec<EntryEntity>>> {
        self.run("list_entries", move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM contest_entries \
                 WHERE contest_id = ?1 ORDER BY user_id"
            ))?;
            let rows = stmt.query_map(params![contest_id.0], entry_from_row)?;
            rows.collect()
        })
    }

    fn count_entries(&self, contest_id: ContestId) -> BoxFuture<'static, StorageResult<u64>> {
        self.run("count_entries", move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM contest_entries WHERE contest_id = ?1",
                params![contest_id.0],
                |row| row.get::<_, i64>(0),
            )
            .map(|count| count as u64)
        })
    }

    fn insert_entry(&self, entry: EntryEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.run("insert_entry", move |conn| {
            conn.execute(
                "INSERT INTO contest_entries(contest_id, user_id, system_name, entered_at) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    entry.contest_id.0,
                    entry.user_id.0 as i64,
                    entry.system_name,
                    format_timestamp(entry.entered_at)?,
                ],
            )?;
            Ok(())
        })
    }

    fn backup(&self, taken_at: OffsetDateTime) -> BoxFuture<'static, StorageResult<PathBuf>> {
        let base = backup_path(&self.path, taken_at);
        self.run("backup", move |conn| {
            let target = unused_path(base);
            conn.execute("VACUUM INTO ?1", params![target.to_string_lossy().into_owned()])?;
            Ok(target)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        self.run("health_check", |conn| {
            conn.query_row("SELECT 1", [], |_| Ok(()))
        })
    }
}

/// `contest-YYYYMMDD-HHMMSS.db` next to the live database.
fn backup_path(db_path: &Path, taken_at: OffsetDateTime) -> PathBuf {
    let stamp = taken_at
        .to_offset(time::UtcOffset::UTC)
        .format(format_description!(
            "[year][month][day]-[hour][minute][second]"
        ))
        .unwrap_or_else(|_| taken_at.unix_timestamp().to_string());
    db_path.with_file_name(format!("contest-{stamp}.db"))
}

/// `base` itself, or the first `<stem>-N.db` sibling that does not exist yet.
fn unused_path(base: PathBuf) -> PathBuf {
    if !base.exists() {
        return base;
    }
    let stem = base
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    (2u32..)
        .map(|n| base.with_file_name(format!("{stem}-{n}.db")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(base)
}

pub(super) fn format_timestamp(value: OffsetDateTime) -> rusqlite::Result<String> {
    value
        .format(&Rfc3339)
        .map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))
}

/// Parse a stored timestamp. Rows written by the first releases only carry a date.
fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(raw, &Rfc3339).or_else(|err| {
        Date::parse(raw, format_description!("[year]-[month]-[day]"))
            .map(|date| date.with_time(Time::MIDNIGHT).assume_utc())
            .map_err(|_| err)
    })
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<OffsetDateTime> {
    let raw: String = row.get(idx)?;
    parse_timestamp(&raw)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

fn contest_from_row(row: &Row<'_>) -> rusqlite::Result<ContestEntity> {
    Ok(ContestEntity {
        id: ContestId(row.get(0)?),
        opened_at: timestamp_column(row, 1)?,
        fob_system: row.get(2)?,
        winner_user_id: row.get::<_, Option<i64>>(3)?.map(|id| UserId(id as u64)),
        winner_system: row.get(4)?,
    })
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<EntryEntity> {
    Ok(EntryEntity {
        contest_id: ContestId(row.get(0)?),
        user_id: UserId(row.get::<_, i64>(1)? as u64),
        system_name: row.get(2)?,
        entered_at: timestamp_column(row, 3)?,
    })
}
