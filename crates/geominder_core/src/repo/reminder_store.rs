//! Reminder store contracts with SQLite and in-memory implementations.
//!
//! # Responsibility
//! - Provide keyed CRUD-lite storage over the `reminders` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `save` is an upsert by id and keeps the row's original position.
//! - `get_all` returns records in insertion order.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::reminder::ReminderRecord;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const REMINDER_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    location,
    latitude,
    longitude
FROM reminders";

const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "title",
    "description",
    "location",
    "latitude",
    "longitude",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-level error for reminder persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// The store worker thread could not be started or has exited.
    WorkerUnavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted reminder data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
            Self::WorkerUnavailable(details) => write!(f, "reminder store worker unavailable: {details}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable keyed storage of reminder records.
///
/// Implementations are owned by a single repository worker, so writes take
/// `&mut self` and no internal locking is required.
pub trait ReminderStore {
    /// Returns every stored record; an empty store yields an empty vec.
    fn get_all(&self) -> RepoResult<Vec<ReminderRecord>>;
    /// Point lookup; `None` is a valid outcome.
    fn get_by_id(&self, id: &str) -> RepoResult<Option<ReminderRecord>>;
    /// Inserts or fully replaces the record with the same id.
    fn save(&mut self, record: &ReminderRecord) -> RepoResult<()>;
    /// Removes every record.
    fn delete_all(&mut self) -> RepoResult<()>;
}

/// SQLite-backed reminder store owning its connection.
pub struct SqliteReminderStore {
    conn: Connection,
}

impl SqliteReminderStore {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not current.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema was
    ///   tampered with.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    /// Gives access to the underlying connection (tests, diagnostics).
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl ReminderStore for SqliteReminderStore {
    fn get_all(&self) -> RepoResult<Vec<ReminderRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{REMINDER_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_reminder_row(row)?);
        }

        Ok(records)
    }

    fn get_by_id(&self, id: &str) -> RepoResult<Option<ReminderRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{REMINDER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_reminder_row(row)?));
        }

        Ok(None)
    }

    fn save(&mut self, record: &ReminderRecord) -> RepoResult<()> {
        if record.id.is_empty() {
            return Err(RepoError::InvalidData(
                "reminder id must not be empty".to_string(),
            ));
        }

        self.conn.execute(
            "INSERT INTO reminders (
                id,
                title,
                description,
                location,
                latitude,
                longitude
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                location = excluded.location,
                latitude = excluded.latitude,
                longitude = excluded.longitude;",
            params![
                record.id.as_str(),
                record.title.as_deref(),
                record.description.as_deref(),
                record.location.as_deref(),
                record.latitude,
                record.longitude,
            ],
        )?;

        Ok(())
    }

    fn delete_all(&mut self) -> RepoResult<()> {
        self.conn.execute("DELETE FROM reminders;", [])?;
        Ok(())
    }
}

/// Insertion-ordered in-memory store used by tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct InMemoryReminderStore {
    records: Vec<ReminderRecord>,
}

impl InMemoryReminderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `records` (later ids win).
    pub fn with_records(records: impl IntoIterator<Item = ReminderRecord>) -> Self {
        let mut store = Self::new();
        for record in records {
            store.upsert(record);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn upsert(&mut self, record: ReminderRecord) {
        match self.records.iter_mut().find(|stored| stored.id == record.id) {
            Some(stored) => *stored = record,
            None => self.records.push(record),
        }
    }
}

impl ReminderStore for InMemoryReminderStore {
    fn get_all(&self) -> RepoResult<Vec<ReminderRecord>> {
        Ok(self.records.clone())
    }

    fn get_by_id(&self, id: &str) -> RepoResult<Option<ReminderRecord>> {
        Ok(self.records.iter().find(|record| record.id == id).cloned())
    }

    fn save(&mut self, record: &ReminderRecord) -> RepoResult<()> {
        if record.id.is_empty() {
            return Err(RepoError::InvalidData(
                "reminder id must not be empty".to_string(),
            ));
        }
        self.upsert(record.clone());
        Ok(())
    }

    fn delete_all(&mut self) -> RepoResult<()> {
        self.records.clear();
        Ok(())
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'reminders';",
            [],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if !table_exists {
        return Err(RepoError::MissingRequiredTable("reminders"));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('reminders');")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    for &column in REQUIRED_COLUMNS {
        if !columns.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: "reminders",
                column,
            });
        }
    }

    Ok(())
}

fn parse_reminder_row(row: &Row<'_>) -> RepoResult<ReminderRecord> {
    let id: String = row.get("id")?;
    if id.is_empty() {
        return Err(RepoError::InvalidData(
            "empty id value in reminders.id".to_string(),
        ));
    }

    Ok(ReminderRecord {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        location: row.get("location")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
    })
}
