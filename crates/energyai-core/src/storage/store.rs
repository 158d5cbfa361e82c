//! SQLite-backed local store.
//!
//! Provides persistent storage for:
//! - Key-value application state (progress, streak date, language, user id)
//! - Curriculum and badge state between sessions
//! - A log of every point award

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use super::data_dir;
use crate::error::StorageError;
use crate::events::Event;
use crate::model::{CurriculumState, ProgressionModel};
use crate::progress::UserProgress;

/// Key names in the `kv` table. The first three are shared with the web
/// and mobile front ends.
pub mod keys {
    pub const LAST_LOGIN_DATE: &str = "lastLoginDate";
    pub const USER_PROGRESS: &str = "userProgress";
    pub const PREFERRED_LANGUAGE: &str = "preferredLanguage";
    pub const CURRICULUM: &str = "curriculum";
    pub const USER_ID: &str = "userId";
}

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointAward {
    pub id: i64,
    pub amount: u64,
    pub reason: String,
    pub awarded_at: DateTime<Utc>,
}

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the store at `<data_dir>/energyai.db`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        Self::open_at(&data_dir()?.join("energyai.db"))
    }

    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS point_awards (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                amount     INTEGER NOT NULL,
                reason     TEXT NOT NULL,
                awarded_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_point_awards_awarded_at ON point_awards(awarded_at);",
        )
    }

    // ── kv ───────────────────────────────────────────────────────────

    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        match stmt.query_row(params![key], |row| row.get::<_, String>(0)) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<bool, StorageError> {
        let n = self
            .conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(n > 0)
    }

    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        self.kv_get(key)?
            .map(|raw| {
                serde_json::from_str(&raw).map_err(|source| StorageError::Malformed {
                    key: key.to_string(),
                    source,
                })
            })
            .transpose()
    }

    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Malformed {
            key: key.to_string(),
            source,
        })?;
        self.kv_set(key, &raw)
    }

    // ── Typed accessors ──────────────────────────────────────────────

    /// Persistent anonymous user id, created on first use.
    pub fn user_id(&self) -> Result<String, StorageError> {
        if let Some(id) = self.kv_get(keys::USER_ID)? {
            return Ok(id);
        }
        let id = uuid::Uuid::new_v4().to_string();
        self.kv_set(keys::USER_ID, &id)?;
        debug!(user_id = %id, "created user id");
        Ok(id)
    }

    pub fn preferred_language(&self) -> Result<Option<String>, StorageError> {
        self.kv_get(keys::PREFERRED_LANGUAGE)
    }

    pub fn set_preferred_language(&self, lang: &str) -> Result<(), StorageError> {
        self.kv_set(keys::PREFERRED_LANGUAGE, lang)
    }

    /// Last login date. An unreadable value is treated as "never".
    pub fn last_login_date(&self) -> Result<Option<NaiveDate>, StorageError> {
        let Some(raw) = self.kv_get(keys::LAST_LOGIN_DATE)? else {
            return Ok(None);
        };
        match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
            Ok(date) => Ok(Some(date)),
            Err(e) => {
                warn!(value = %raw, error = %e, "ignoring malformed lastLoginDate");
                Ok(None)
            }
        }
    }

    pub fn set_last_login_date(&self, date: NaiveDate) -> Result<(), StorageError> {
        self.kv_set(keys::LAST_LOGIN_DATE, &date.format(DATE_FORMAT).to_string())
    }

    // ── Point log ────────────────────────────────────────────────────

    /// Append every `PointsAwarded` event; other events are ignored.
    /// Returns how many rows were written.
    pub fn record_awards(&self, events: &[Event]) -> Result<usize, StorageError> {
        let mut written = 0;
        for event in events {
            if let Event::PointsAwarded { amount, reason, at } = event {
                self.conn.execute(
                    "INSERT INTO point_awards (amount, reason, awarded_at) VALUES (?1, ?2, ?3)",
                    params![amount, reason, at.to_rfc3339()],
                )?;
                written += 1;
            }
        }
        Ok(written)
    }

    /// Most recent awards first.
    pub fn point_history(&self, limit: usize) -> Result<Vec<PointAward>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, amount, reason, awarded_at
             FROM point_awards
             ORDER BY id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut awards = Vec::new();
        for row in rows {
            let (id, amount, reason, awarded_at) = row?;
            let awarded_at = DateTime::parse_from_rfc3339(&awarded_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|e| {
                    warn!(id, error = %e, "malformed award timestamp");
                    DateTime::<Utc>::default()
                });
            awards.push(PointAward {
                id,
                amount,
                reason,
                awarded_at,
            });
        }
        Ok(awards)
    }

    // ── Model persistence ────────────────────────────────────────────

    /// Apply saved state to a freshly seeded model. Malformed or stale
    /// entries are skipped with a warning so the seed stays usable.
    pub fn load_into(&self, model: &mut ProgressionModel) -> Result<(), StorageError> {
        match self.get_json::<CurriculumState>(keys::CURRICULUM) {
            Ok(Some(state)) => match model.restore_curriculum(state) {
                Ok(true) => {}
                Ok(false) => warn!("saved curriculum belongs to another course version; starting fresh"),
                Err(e) => warn!(error = %e, "saved curriculum is inconsistent; starting fresh"),
            },
            Ok(None) => {}
            Err(StorageError::Malformed { key, source }) => {
                warn!(key = %key, error = %source, "ignoring malformed saved state");
            }
            Err(e) => return Err(e),
        }

        match self.get_json::<UserProgress>(keys::USER_PROGRESS) {
            Ok(Some(progress)) => model.restore_progress(progress),
            Ok(None) => {}
            Err(StorageError::Malformed { key, source }) => {
                warn!(key = %key, error = %source, "ignoring malformed saved state");
            }
            Err(e) => return Err(e),
        }

        model.restore_last_login(self.last_login_date()?);
        Ok(())
    }

    /// Persist the model's mutable state in one transaction.
    pub fn save_model(&self, model: &ProgressionModel) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        self.write_model(model)?;
        tx.commit()?;
        Ok(())
    }

    /// Log the session's point awards and save the model in one
    /// transaction; on failure neither is written.
    pub fn commit_session(
        &self,
        model: &ProgressionModel,
        events: &[Event],
    ) -> Result<usize, StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        let written = self.record_awards(events)?;
        self.write_model(model)?;
        tx.commit()?;
        Ok(written)
    }

    fn write_model(&self, model: &ProgressionModel) -> Result<(), StorageError> {
        self.set_json(keys::CURRICULUM, &model.curriculum_state())?;
        self.set_json(keys::USER_PROGRESS, model.progress())?;
        if let Some(date) = model.last_login() {
            self.set_last_login_date(date)?;
        }
        Ok(())
    }

    /// Forget all learning progress. The user id and language survive.
    pub fn reset_progress(&self) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        for key in [keys::CURRICULUM, keys::USER_PROGRESS, keys::LAST_LOGIN_DATE] {
            self.kv_delete(key)?;
        }
        self.conn.execute("DELETE FROM point_awards", [])?;
        tx.commit()?;
        Ok(())
    }
}
