use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqliteSynchronous};
use sqlx::{ConnectOptions, Row};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::models::{ReviewLogEntry, ReviewState};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("persistence failure: {0}")]
    Backend(#[from] sqlx::Error),
}

/// Persistence seam for per-(user, card) scheduling state.
///
/// Writes are upserts with last-writer-wins semantics; a failed write
/// surfaces as `StoreError` so the caller can retry the whole submission.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn get(&self, user_id: &str, card_id: &str) -> Result<Option<ReviewState>, StoreError>;

    async fn put(&self, user_id: &str, card_id: &str, state: ReviewState)
        -> Result<(), StoreError>;

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ReviewState>, StoreError>;

    async fn log_review(&self, entry: &ReviewLogEntry) -> Result<(), StoreError>;

    async fn due_count(&self, user_id: &str, now: DateTime<Utc>) -> Result<i64, StoreError>;
}

/// In-memory reference implementation. Backs tests and ephemeral setups.
#[derive(Default)]
pub struct MemoryStore {
    states: Mutex<HashMap<(String, String), ReviewState>>,
    log: Mutex<Vec<ReviewLogEntry>>,
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn get(&self, user_id: &str, card_id: &str) -> Result<Option<ReviewState>, StoreError> {
        let states = self.states.lock().await;
        Ok(states
            .get(&(user_id.to_string(), card_id.to_string()))
            .cloned())
    }

    async fn put(
        &self,
        user_id: &str,
        card_id: &str,
        state: ReviewState,
    ) -> Result<(), StoreError> {
        let mut states = self.states.lock().await;
        states.insert((user_id.to_string(), card_id.to_string()), state);
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ReviewState>, StoreError> {
        let states = self.states.lock().await;
        Ok(states
            .iter()
            .filter(|((user, _), _)| user == user_id)
            .map(|(_, state)| state.clone())
            .collect())
    }

    async fn log_review(&self, entry: &ReviewLogEntry) -> Result<(), StoreError> {
        let mut log = self.log.lock().await;
        log.push(entry.clone());
        Ok(())
    }

    async fn due_count(&self, user_id: &str, now: DateTime<Utc>) -> Result<i64, StoreError> {
        let states = self.states.lock().await;
        Ok(states
            .iter()
            .filter(|((user, _), state)| user == user_id && state.is_due(now))
            .count() as i64)
    }
}

impl<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> for ReviewState {
    fn from_row(row: &'r sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(ReviewState {
            card_id: row.try_get("card_id")?,
            interval_days: row.try_get("interval_days")?,
            ease_factor: row.try_get("ease_factor")?,
            due_at: row.try_get("due_at")?,
            repetitions: row.try_get::<i64, _>("repetitions")? as u32,
            lapses: row.try_get::<i64, _>("lapses")? as u32,
        })
    }
}

/// SQLite-backed store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .log_statements(log::LevelFilter::Trace);

        let pool = SqlitePool::connect_with(options).await?;

        let store = SqliteStore { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Private in-memory database. Single connection: every pool
    /// connection to `sqlite::memory:` would otherwise get its own
    /// empty database.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = SqliteStore { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS review_state (
                user_id TEXT NOT NULL,
                card_id TEXT NOT NULL,
                interval_days REAL NOT NULL,
                ease_factor REAL NOT NULL,
                due_at DATETIME NOT NULL,
                repetitions INTEGER NOT NULL DEFAULT 0,
                lapses INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (user_id, card_id)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS review_log (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                card_id TEXT NOT NULL,
                grade INTEGER NOT NULL,
                reviewed_at DATETIME NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_review_state_user_due \
             ON review_state (user_id, due_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ReviewStore for SqliteStore {
    async fn get(&self, user_id: &str, card_id: &str) -> Result<Option<ReviewState>, StoreError> {
        let state = sqlx::query_as::<_, ReviewState>(
            "SELECT * FROM review_state WHERE user_id = ? AND card_id = ?",
        )
        .bind(user_id)
        .bind(card_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(state)
    }

    async fn put(
        &self,
        user_id: &str,
        card_id: &str,
        state: ReviewState,
    ) -> Result<(), StoreError> {
        // Optimistic overwrite: concurrent submissions for the same card
        // resolve to last-writer-wins.
        sqlx::query(
            r#"
            INSERT INTO review_state
                (user_id, card_id, interval_days, ease_factor, due_at, repetitions, lapses)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id, card_id) DO UPDATE SET
                interval_days = excluded.interval_days,
                ease_factor = excluded.ease_factor,
                due_at = excluded.due_at,
                repetitions = excluded.repetitions,
                lapses = excluded.lapses
            "#,
        )
        .bind(user_id)
        .bind(card_id)
        .bind(state.interval_days)
        .bind(state.ease_factor)
        .bind(state.due_at)
        .bind(state.repetitions as i64)
        .bind(state.lapses as i64)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ReviewState>, StoreError> {
        let states = sqlx::query_as::<_, ReviewState>(
            "SELECT * FROM review_state WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(states)
    }

    async fn log_review(&self, entry: &ReviewLogEntry) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO review_log (id, user_id, card_id, grade, reviewed_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(entry.id.to_string())
        .bind(&entry.user_id)
        .bind(&entry.card_id)
        .bind(entry.grade.ordinal() as i64)
        .bind(entry.reviewed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn due_count(&self, user_id: &str, now: DateTime<Utc>) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT count(*) FROM review_state WHERE user_id = ? AND due_at <= ?",
        )
        .bind(user_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
