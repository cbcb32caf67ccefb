/**
 * SQLite Message Store
 *
 * This module persists messages to SQLite through sqlx. It is used instead
 * of the in-memory store when `DATABASE_URL` is configured, so history
 * survives restarts (within the retention window).
 *
 * Every operation runs inside one transaction that first deletes the
 * conversation if it is stale, which keeps eviction atomic with the access
 * that triggered it. `AUTOINCREMENT` guarantees ids are never reused, even
 * after the rows of an evicted conversation are deleted.
 *
 * # Locking
 *
 * File databases run in WAL mode so readers never block each other or the
 * writer. A read transaction only looks at the newest timestamp first; the
 * write lock is taken only when that message really is past retention, so
 * long-poll rechecks stay plain readers.
 */

use crate::backend::chat::clock::Clock;
use crate::backend::chat::store::{ConversationId, MessageStore, NewMessage, StoreError};
use crate::shared::{Cursor, Message, MessageId};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, SqliteConnection, Transaction};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        conversation TEXT NOT NULL,
        username TEXT NOT NULL,
        body TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_messages_conversation_id
    ON messages (conversation, id)
    "#,
];

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("[Store] Database error: {:?}", err);
        StoreError::unavailable(err.to_string())
    }
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: i64,
    username: String,
    body: String,
    created_at: i64,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Message::new(
            MessageId(u64::try_from(row.id).unwrap_or_default()),
            row.username,
            row.body,
            row.created_at,
        )
    }
}

fn cursor_param(cursor: Cursor) -> i64 {
    i64::try_from(cursor.value()).unwrap_or(i64::MAX)
}

async fn newest_created_at(
    conn: &mut SqliteConnection,
    conversation: &ConversationId,
) -> Result<Option<i64>, StoreError> {
    let newest: Option<i64> =
        sqlx::query_scalar("SELECT MAX(created_at) FROM messages WHERE conversation = ?1")
            .bind(conversation.as_str())
            .fetch_one(&mut *conn)
            .await?;
    Ok(newest)
}

/// SQLite-backed [`MessageStore`]
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    retention_secs: i64,
    clock: Arc<dyn Clock>,
}

impl SqliteStore {
    /// Connect to `database_url` and create the schema if needed
    ///
    /// # Arguments
    /// * `database_url` - e.g. `sqlite://chat.db` or `sqlite::memory:`
    /// * `retention` - Eviction window
    /// * `clock` - Time source for stamping and eviction
    pub async fn connect(
        database_url: &str,
        retention: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StoreError> {
        let in_memory = database_url.contains(":memory:");
        let mut options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        // Each in-memory connection is its own database, so keep exactly one.
        let max_connections = if in_memory { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        for statement in SCHEMA {
            sqlx::query(*statement).execute(&pool).await?;
        }

        tracing::info!("[Store] SQLite store ready at {}", database_url);

        Ok(Self::with_pool(pool, retention, clock))
    }

    /// Wrap an existing pool whose schema is already in place
    pub fn with_pool(pool: SqlitePool, retention: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            retention_secs: i64::try_from(retention.as_secs()).unwrap_or(i64::MAX),
            clock,
        }
    }

    /// The underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn cutoff(&self, now: i64) -> i64 {
        now.saturating_sub(self.retention_secs)
    }

    /// Open a transaction for reading `conversation`, evicting it first if stale
    ///
    /// The staleness check is a plain `SELECT`, so a fresh conversation is
    /// read without ever asking for the write lock. A stale one is evicted in
    /// a new transaction rather than by upgrading this read snapshot, which
    /// WAL refuses once another writer has committed.
    async fn begin_read(
        &self,
        conversation: &ConversationId,
    ) -> Result<Transaction<'static, Sqlite>, StoreError> {
        let now = self.clock.now();
        let mut tx = self.pool.begin().await?;
        if !self.is_stale(&mut *tx, conversation, now).await? {
            return Ok(tx);
        }

        tx.rollback().await?;
        let mut tx = self.pool.begin().await?;
        self.evict_stale(&mut *tx, conversation, now).await?;
        Ok(tx)
    }

    /// Whether the conversation's newest message is past retention
    async fn is_stale(
        &self,
        conn: &mut SqliteConnection,
        conversation: &ConversationId,
        now: i64,
    ) -> Result<bool, StoreError> {
        let newest = newest_created_at(conn, conversation).await?;
        Ok(newest.is_some_and(|last| last < self.cutoff(now)))
    }

    /// Delete the conversation if its newest message is past retention
    ///
    /// Takes the write lock; callers that only read check [`Self::is_stale`]
    /// first.
    async fn evict_stale(
        &self,
        conn: &mut SqliteConnection,
        conversation: &ConversationId,
        now: i64,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM messages
            WHERE conversation = ?1
              AND (SELECT MAX(created_at) FROM messages WHERE conversation = ?1) < ?2
            "#,
        )
        .bind(conversation.as_str())
        .bind(self.cutoff(now))
        .execute(&mut *conn)
        .await?;

        let evicted = result.rows_affected() > 0;
        if evicted {
            tracing::info!(
                "[Store] Evicted stale conversation {} ({} messages)",
                conversation,
                result.rows_affected()
            );
        }
        Ok(evicted)
    }
}

#[async_trait]
impl MessageStore for SqliteStore {
    async fn append(
        &self,
        conversation: &ConversationId,
        message: NewMessage,
    ) -> Result<Message, StoreError> {
        let now = self.clock.now();
        let mut tx = self.pool.begin().await?;
        self.evict_stale(&mut *tx, conversation, now).await?;

        let newest = newest_created_at(&mut *tx, conversation).await?;
        let created_at = newest.map_or(now, |last| last.max(now));

        let result = sqlx::query(
            r#"
            INSERT INTO messages (conversation, username, body, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(conversation.as_str())
        .bind(message.username())
        .bind(message.body())
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let id = MessageId(u64::try_from(result.last_insert_rowid()).unwrap_or_default());
        Ok(message.into_message(id, created_at))
    }

    async fn list_since(
        &self,
        conversation: &ConversationId,
        cursor: Cursor,
    ) -> Result<Vec<Message>, StoreError> {
        let mut tx = self.begin_read(conversation).await?;

        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, username, body, created_at
            FROM messages
            WHERE conversation = ?1 AND id > ?2
            ORDER BY id ASC
            "#,
        )
        .bind(conversation.as_str())
        .bind(cursor_param(cursor))
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(rows.into_iter().map(Message::from).collect())
    }

    async fn count_since(
        &self,
        conversation: &ConversationId,
        cursor: Cursor,
    ) -> Result<usize, StoreError> {
        let mut tx = self.begin_read(conversation).await?;

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE conversation = ?1 AND id > ?2")
                .bind(conversation.as_str())
                .bind(cursor_param(cursor))
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn newest(&self, conversation: &ConversationId) -> Result<Option<Message>, StoreError> {
        let mut tx = self.begin_read(conversation).await?;

        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, username, body, created_at
            FROM messages
            WHERE conversation = ?1
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(conversation.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.map(Message::from))
    }

    async fn evict_if_stale(&self, conversation: &ConversationId) -> Result<bool, StoreError> {
        let now = self.clock.now();
        let mut conn = self.pool.acquire().await?;
        if !self.is_stale(&mut *conn, conversation, now).await? {
            return Ok(false);
        }
        self.evict_stale(&mut *conn, conversation, now).await
    }

    async fn clear(&self, conversation: &ConversationId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM messages WHERE conversation = ?1")
            .bind(conversation.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
