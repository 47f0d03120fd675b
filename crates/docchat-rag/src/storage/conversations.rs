//! SQLite-backed conversation store
//!
//! Append-only message log keyed by owner and session, with per-tenant
//! summary aggregation for conversation listings.

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{ConversationSummary, Message, Role, SessionId};

/// SQLite-based conversation store
pub struct ConversationStore {
    conn: Arc<Mutex<Connection>>,
}

impl ConversationStore {
    /// Create or open the database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| Error::storage(format!("Failed to open database: {}", e)))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        store.migrate()?;
        Ok(store)
    }

    /// Create an in-memory database (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::storage(format!("Failed to open in-memory database: {}", e)))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        store.migrate()?;
        Ok(store)
    }

    /// Run database migrations
    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
        "#,
        )
        .map_err(|e| Error::storage(format!("Failed to set pragmas: {}", e)))?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id TEXT NOT NULL,
                session_id TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                timestamp TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_messages_owner_session
                ON messages(owner_id, session_id, timestamp);
        "#,
        )
        .map_err(|e| Error::storage(format!("Failed to run migrations: {}", e)))?;

        tracing::info!("Conversation store migrations complete");
        Ok(())
    }

    /// Append one message. Pure append: no update or delete path exists.
    pub fn append(
        &self,
        owner_id: &str,
        session_id: &SessionId,
        role: Role,
        content: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<i64> {
        let conn = self.conn.lock();

        conn.execute(
            r#"
            INSERT INTO messages (owner_id, session_id, role, content, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                owner_id,
                session_id.as_uuid().to_string(),
                role.as_str(),
                content,
                format_timestamp(timestamp),
            ],
        )
        .map_err(|e| Error::storage(format!("Failed to append message: {}", e)))?;

        Ok(conn.last_insert_rowid())
    }

    /// Fetch one session's messages in ascending timestamp order.
    ///
    /// A session with no messages yields an empty list, not an error.
    pub fn list_session(&self, owner_id: &str, session_id: &SessionId) -> Result<Vec<Message>> {
        let conn = self.conn.lock();

        let mut stmt = conn
            .prepare(
                r#"
                SELECT id, owner_id, session_id, role, content, timestamp
                FROM messages
                WHERE owner_id = ?1 AND session_id = ?2
                ORDER BY timestamp ASC, id ASC
                "#,
            )
            .map_err(|e| Error::storage(format!("Failed to prepare query: {}", e)))?;

        let messages = stmt
            .query_map(
                params![owner_id, session_id.as_uuid().to_string()],
                row_to_message,
            )
            .map_err(|e| Error::storage(format!("Failed to list messages: {}", e)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(messages)
    }

    /// One summary row per distinct session owned by `owner_id`: the
    /// earliest message's role and timestamp plus a snippet of its content,
    /// ordered by that timestamp ascending.
    ///
    /// Single aggregated pass over the table, never one query per session.
    pub fn list_summaries(&self, owner_id: &str) -> Result<Vec<ConversationSummary>> {
        let conn = self.conn.lock();

        let mut stmt = conn
            .prepare(
                r#"
                SELECT session_id, role, content, timestamp
                FROM (
                    SELECT session_id, role, content, timestamp,
                           ROW_NUMBER() OVER (
                               PARTITION BY session_id
                               ORDER BY timestamp ASC, id ASC
                           ) AS turn
                    FROM messages
                    WHERE owner_id = ?1
                )
                WHERE turn = 1
                ORDER BY timestamp ASC
                "#,
            )
            .map_err(|e| Error::storage(format!("Failed to prepare query: {}", e)))?;

        let summaries = stmt
            .query_map(params![owner_id], row_to_summary)
            .map_err(|e| Error::storage(format!("Failed to list summaries: {}", e)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(summaries)
    }
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    // Fixed-width RFC 3339 so lexicographic order is chronological order
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn row_to_message(row: &rusqlite::Row) -> rusqlite::Result<Message> {
    let id: i64 = row.get(0)?;
    let owner_id: String = row.get(1)?;
    let session_id_str: String = row.get(2)?;
    let role_str: String = row.get(3)?;
    let content: String = row.get(4)?;
    let timestamp_str: String = row.get(5)?;

    let role = Role::from_str(&role_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Message {
        id,
        owner_id,
        session_id: Uuid::parse_str(&session_id_str).unwrap_or_else(|_| Uuid::nil()),
        role,
        content,
        timestamp: parse_timestamp(&timestamp_str),
    })
}

fn row_to_summary(row: &rusqlite::Row) -> rusqlite::Result<ConversationSummary> {
    let session_id_str: String = row.get(0)?;
    let role_str: String = row.get(1)?;
    let content: String = row.get(2)?;
    let timestamp_str: String = row.get(3)?;

    let role = Role::from_str(&role_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(ConversationSummary {
        session_id: Uuid::parse_str(&session_id_str).unwrap_or_else(|_| Uuid::nil()),
        role,
        content: ConversationSummary::snippet(&content),
        timestamp: parse_timestamp(&timestamp_str),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ts(base: DateTime<Utc>, offset_secs: i64) -> DateTime<Utc> {
        base + Duration::seconds(offset_secs)
    }

    #[test]
    fn append_and_list_in_timestamp_order() {
        let store = ConversationStore::in_memory().unwrap();
        let session = SessionId::random();
        let base = Utc::now();

        // Insert out of chronological order
        store
            .append("alice", &session, Role::Assistant, "second", ts(base, 10))
            .unwrap();
        store
            .append("alice", &session, Role::User, "first", ts(base, 0))
            .unwrap();

        let messages = store.list_session("alice", &session).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "first");
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1].content, "second");
        assert!(messages[0].timestamp <= messages[1].timestamp);
    }

    #[test]
    fn unknown_session_yields_empty_list() {
        let store = ConversationStore::in_memory().unwrap();
        let messages = store
            .list_session("alice", &SessionId::random())
            .unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn sessions_are_isolated_per_owner() {
        let store = ConversationStore::in_memory().unwrap();
        let session = SessionId::random();
        let now = Utc::now();

        store
            .append("alice", &session, Role::User, "alice's question", now)
            .unwrap();
        store
            .append("bob", &session, Role::User, "bob's question", now)
            .unwrap();

        let messages = store.list_session("alice", &session).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].owner_id, "alice");
    }

    #[test]
    fn summaries_take_earliest_message_per_session() {
        let store = ConversationStore::in_memory().unwrap();
        let older = SessionId::random();
        let newer = SessionId::random();
        let base = Utc::now();

        store
            .append("alice", &newer, Role::User, "newer session opener", ts(base, 100))
            .unwrap();
        store
            .append("alice", &newer, Role::Assistant, "newer reply", ts(base, 110))
            .unwrap();
        store
            .append("alice", &older, Role::User, "older session opener", ts(base, 0))
            .unwrap();
        store
            .append("alice", &older, Role::Assistant, "older reply", ts(base, 10))
            .unwrap();

        let summaries = store.list_summaries("alice").unwrap();
        assert_eq!(summaries.len(), 2);

        // Oldest session first, each summarized by its earliest message
        assert_eq!(summaries[0].session_id, older.as_uuid());
        assert_eq!(summaries[0].content, "older session opener");
        assert_eq!(summaries[0].role, Role::User);
        assert_eq!(summaries[1].session_id, newer.as_uuid());
        assert!(summaries[0].timestamp <= summaries[1].timestamp);
    }

    #[test]
    fn summary_snippet_is_truncated_to_thirty_chars() {
        let store = ConversationStore::in_memory().unwrap();
        let session = SessionId::random();
        let long_question = "what does the quarterly report say about revenue?";
        assert!(long_question.chars().count() > 30);

        store
            .append("alice", &session, Role::User, long_question, Utc::now())
            .unwrap();

        let summaries = store.list_summaries("alice").unwrap();
        assert_eq!(summaries[0].content.chars().count(), 30);
        assert!(long_question.starts_with(&summaries[0].content));
    }

    #[test]
    fn summaries_do_not_cross_tenants() {
        let store = ConversationStore::in_memory().unwrap();
        store
            .append("bob", &SessionId::random(), Role::User, "bob's chat", Utc::now())
            .unwrap();

        assert!(store.list_summaries("alice").unwrap().is_empty());
    }
}
