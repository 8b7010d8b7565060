//! Snapshot repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Store the serialized snapshot under one key, the way browser local
//!   storage would.
//! - Decode loaded payloads leniently through `Snapshot::from_json_lenient`.
//!
//! # Invariants
//! - `save` replaces the stored payload wholesale.
//! - `load` only fails on storage errors, never on payload content.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::snapshot::{Snapshot, SnapshotLoad};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key of the application snapshot.
pub const SNAPSHOT_KEY: &str = "pawlog_data";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error surfaced by snapshot adapters.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Snapshot could not be serialized.
    Encode(serde_json::Error),
    /// Adapter-specific failure without a richer error type.
    Backend(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
            Self::Backend(message) => write!(f, "snapshot storage failed: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Backend(_) => None,
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

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Whole-object snapshot storage.
pub trait SnapshotRepository {
    /// Returns the stored payload, or `None` when nothing was saved yet.
    fn load_raw(&self) -> RepoResult<Option<String>>;
    /// Replaces the stored payload.
    fn save_raw(&self, payload: &str) -> RepoResult<()>;

    /// Loads and leniently decodes the stored snapshot.
    fn load(&self) -> RepoResult<SnapshotLoad> {
        let payload = self.load_raw()?;
        Ok(Snapshot::from_json_lenient(payload.as_deref()))
    }

    /// Encodes and stores `snapshot`.
    fn save(&self, snapshot: &Snapshot) -> RepoResult<()> {
        let payload = snapshot.to_json()?;
        self.save_raw(&payload)
    }
}

/// SQLite-backed snapshot repository keyed by `SNAPSHOT_KEY`.
pub struct SqliteSnapshotRepository<'conn> {
    conn: &'conn Connection,
    key: String,
}

impl<'conn> SqliteSnapshotRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    ///
    /// # Errors
    /// - `DbError::SchemaNotReady` when migrations were not applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Self::with_key(conn, SNAPSHOT_KEY)
    }

    /// Same as `try_new` but stores under a custom key.
    pub fn with_key(conn: &'conn Connection, key: impl Into<String>) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self {
            conn,
            key: key.into(),
        })
    }
}

impl SnapshotRepository for SqliteSnapshotRepository<'_> {
    fn load_raw(&self) -> RepoResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM snapshots WHERE key = ?1;",
                params![self.key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn save_raw(&self, payload: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO snapshots (key, payload, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![self.key, payload],
        )?;
        Ok(())
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let db_version = current_user_version(conn)?;
    let expected = latest_version();
    if db_version != expected {
        return Err(DbError::SchemaNotReady {
            db_version,
            expected,
        }
        .into());
    }
    Ok(())
}
