//! Overlay document repository contract and SQLite key-value implementation.
//!
//! # Responsibility
//! - Load the persisted overlay document once at startup.
//! - Replace the stored document wholesale on every edit.
//!
//! # Invariants
//! - The document is stored as one JSON value under [`OVERLAY_STORAGE_KEY`].
//! - Read paths reject undecodable documents instead of masking them.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::overlay::CustomOverlayStore;
use crate::now_epoch_ms;
use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Key under which the overlay document is stored.
pub const OVERLAY_STORAGE_KEY: &str = "custom_trait_overlay";

const KV_TABLE: &str = "kv_entries";

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from overlay persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Document could not be encoded for storage.
    Encode(serde_json::Error),
    /// Stored document cannot be decoded.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode overlay document: {err}"),
            Self::InvalidData(message) => write!(f, "invalid stored overlay: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "overlay repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "overlay repository requires table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
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

/// Repository interface for the overlay document.
pub trait OverlayRepository {
    /// Loads the stored document; `None` when nothing was saved yet.
    fn load_overlay(&self) -> RepoResult<Option<CustomOverlayStore>>;
    /// Replaces the stored document wholesale.
    fn save_overlay(&self, overlay: &CustomOverlayStore) -> RepoResult<()>;
}

/// SQLite-backed overlay repository over the `kv_entries` table.
pub struct SqliteOverlayRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOverlayRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl OverlayRepository for SqliteOverlayRepository<'_> {
    fn load_overlay(&self) -> RepoResult<Option<CustomOverlayStore>> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [OVERLAY_STORAGE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let Some(json) = stored else {
            return Ok(None);
        };
        let overlay = serde_json::from_str::<CustomOverlayStore>(&json).map_err(|err| {
            RepoError::InvalidData(format!("`{OVERLAY_STORAGE_KEY}` is not a valid document: {err}"))
        })?;
        Ok(Some(overlay))
    }

    fn save_overlay(&self, overlay: &CustomOverlayStore) -> RepoResult<()> {
        let json = serde_json::to_string(overlay).map_err(RepoError::Encode)?;
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![OVERLAY_STORAGE_KEY, json, now_epoch_ms()],
        )?;
        info!(
            "event=overlay_saved module=repo status=ok bytes={}",
            json.len()
        );
        Ok(())
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [KV_TABLE],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(RepoError::MissingRequiredTable(KV_TABLE));
    }
    Ok(())
}
