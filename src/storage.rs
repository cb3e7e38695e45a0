//! SQLite storage layer for confab.
//!
//! The durable side of the coordinator: users, conversations (direct and
//! group), per-participant unread counters, and messages. Handles schema
//! creation and CRUD for all entity types. Access is serialized behind a
//! [`SharedStorage`] mutex because rusqlite connections are not `Sync`;
//! counter updates are additionally expressed as single SQL statements so a
//! read-modify-write race on an unread counter cannot occur.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::OsRng;
use rand::RngCore;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum StorageError {
    Sqlite(rusqlite::Error),
    Io(std::io::Error),
    NotFound(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Sqlite(e) => write!(f, "sqlite error: {e}"),
            StorageError::Io(e) => write!(f, "io error: {e}"),
            StorageError::NotFound(msg) => write!(f, "not found: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Sqlite(e)
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Current time as seconds since UNIX epoch.
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Generate a random 128-bit hex identifier.
pub fn generate_id() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Canonical lookup key for a direct conversation: the sorted participant
/// pair joined with `|`. A UNIQUE index on this key is what prevents two
/// concurrent first-contact sends from creating duplicate conversations.
pub fn direct_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}|{b}")
    } else {
        format!("{b}|{a}")
    }
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// User row stored in the database. `is_online`/`last_seen` are advisory:
/// the in-memory presence registry is authoritative for liveness, these
/// columns feed the initial status snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRow {
    pub user_id: String,
    pub username: String,
    pub is_online: bool,
    pub last_seen: Option<u64>,
    pub created_at: u64,
}

/// Conversation row with its participant list materialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRow {
    pub conversation_id: String,
    pub is_group: bool,
    pub group_name: Option<String>,
    pub group_admin: Option<String>,
    pub participants: Vec<String>,
    pub last_message_id: Option<String>,
    pub last_message_time: Option<u64>,
    pub created_at: u64,
}

impl ConversationRow {
    pub fn is_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }

    /// The counterpart in a direct conversation, if any.
    pub fn other_participant(&self, user_id: &str) -> Option<&str> {
        if self.is_group {
            return None;
        }
        self.participants
            .iter()
            .find(|p| p.as_str() != user_id)
            .map(|p| p.as_str())
    }
}

/// Message row stored in the database. Immutable once created; a message
/// may carry text, an image reference, or both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRow {
    pub message_id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub body: String,
    pub image_url: Option<String>,
    pub created_at: u64,
}

// ---------------------------------------------------------------------------
// Storage handle
// ---------------------------------------------------------------------------

/// Main storage handle wrapping a SQLite connection.
pub struct Storage {
    conn: Connection,
}

/// Shared handle used by the coordinator components.
pub type SharedStorage = Arc<tokio::sync::Mutex<Storage>>;

impl Storage {
    /// Open or create a database at the given path. Creates schema if needed.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        let storage = Self { conn };
        storage.create_schema()?;
        Ok(storage)
    }

    /// Create an in-memory database, for tests.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let storage = Self { conn };
        storage.create_schema()?;
        Ok(storage)
    }

    fn create_schema(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS users (
                user_id     TEXT PRIMARY KEY,
                username    TEXT NOT NULL,
                is_online   INTEGER NOT NULL DEFAULT 0,
                last_seen   INTEGER,
                created_at  INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS conversations (
                conversation_id     TEXT PRIMARY KEY,
                is_group            INTEGER NOT NULL DEFAULT 0,
                group_name          TEXT,
                group_admin         TEXT,
                last_message_id     TEXT,
                last_message_time   INTEGER,
                direct_key          TEXT UNIQUE,
                created_at          INTEGER NOT NULL,
                updated_at          INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_conversations_group
                ON conversations(is_group, group_name);

            CREATE TABLE IF NOT EXISTS participants (
                conversation_id TEXT NOT NULL REFERENCES conversations(conversation_id),
                user_id         TEXT NOT NULL,
                unread          INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (conversation_id, user_id)
            );

            CREATE INDEX IF NOT EXISTS idx_participants_user
                ON participants(user_id);

            CREATE TABLE IF NOT EXISTS messages (
                message_id      TEXT PRIMARY KEY,
                conversation_id TEXT NOT NULL,
                sender_id       TEXT NOT NULL,
                body            TEXT NOT NULL DEFAULT '',
                image_url       TEXT,
                created_at      INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_messages_conversation
                ON messages(conversation_id, created_at);
            ",
        )?;
        Ok(())
    }

    // -- Users --

    pub fn insert_user(&self, user: &UserRow) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO users (user_id, username, is_online, last_seen, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.user_id,
                user.username,
                user.is_online,
                user.last_seen,
                user.created_at
            ],
        )?;
        Ok(())
    }

    pub fn get_user(&self, user_id: &str) -> Result<Option<UserRow>, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT user_id, username, is_online, last_seen, created_at
                 FROM users WHERE user_id = ?1",
                params![user_id],
                |r| {
                    Ok(UserRow {
                        user_id: r.get(0)?,
                        username: r.get(1)?,
                        is_online: r.get(2)?,
                        last_seen: r.get(3)?,
                        created_at: r.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    pub fn list_users(&self) -> Result<Vec<UserRow>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, username, is_online, last_seen, created_at
             FROM users ORDER BY username",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok(UserRow {
                user_id: r.get(0)?,
                username: r.get(1)?,
                is_online: r.get(2)?,
                last_seen: r.get(3)?,
                created_at: r.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Update a user's persisted presence columns. Returns false if the user
    /// row does not exist.
    pub fn set_user_presence(
        &self,
        user_id: &str,
        is_online: bool,
        last_seen: u64,
    ) -> Result<bool, StorageError> {
        let changed = self.conn.execute(
            "UPDATE users SET is_online = ?2, last_seen = ?3 WHERE user_id = ?1",
            params![user_id, is_online, last_seen],
        )?;
        Ok(changed > 0)
    }

    // -- Conversations --

    fn participants_of(&self, conversation_id: &str) -> Result<Vec<String>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id FROM participants WHERE conversation_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![conversation_id], |r| r.get(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn conversation_from_row(&self, r: &rusqlite::Row<'_>) -> rusqlite::Result<ConversationRow> {
        Ok(ConversationRow {
            conversation_id: r.get(0)?,
            is_group: r.get(1)?,
            group_name: r.get(2)?,
            group_admin: r.get(3)?,
            participants: Vec::new(),
            last_message_id: r.get(4)?,
            last_message_time: r.get(5)?,
            created_at: r.get(6)?,
        })
    }

    const CONVERSATION_COLS: &'static str = "conversation_id, is_group, group_name, group_admin,
         last_message_id, last_message_time, created_at";

    pub fn get_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ConversationRow>, StorageError> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM conversations WHERE conversation_id = ?1",
                    Self::CONVERSATION_COLS
                ),
                params![conversation_id],
                |r| self.conversation_from_row(r),
            )
            .optional()?;
        match row {
            Some(mut c) => {
                c.participants = self.participants_of(&c.conversation_id)?;
                Ok(Some(c))
            }
            None => Ok(None),
        }
    }

    pub fn find_direct_conversation(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<Option<ConversationRow>, StorageError> {
        let key = direct_key(user_a, user_b);
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM conversations WHERE direct_key = ?1",
                    Self::CONVERSATION_COLS
                ),
                params![key],
                |r| self.conversation_from_row(r),
            )
            .optional()?;
        match row {
            Some(mut c) => {
                c.participants = self.participants_of(&c.conversation_id)?;
                Ok(Some(c))
            }
            None => Ok(None),
        }
    }

    /// Create a direct conversation between two users with zeroed unread
    /// counters. If another writer created one for the same pair first, the
    /// UNIQUE constraint on `direct_key` fires and the existing conversation
    /// is returned instead.
    pub fn create_direct_conversation(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<ConversationRow, StorageError> {
        let id = generate_id();
        let now = now_secs();
        let key = direct_key(user_a, user_b);

        let inserted = self.conn.execute(
            "INSERT INTO conversations
                 (conversation_id, is_group, direct_key, created_at, updated_at)
             VALUES (?1, 0, ?2, ?3, ?3)",
            params![id, key, now],
        );
        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                // Lost the race: the pair's conversation already exists.
                return self
                    .find_direct_conversation(user_a, user_b)?
                    .ok_or_else(|| StorageError::NotFound(format!("conversation for {key}")));
            }
            Err(e) => return Err(e.into()),
        }

        for user in [user_a, user_b] {
            self.conn.execute(
                "INSERT INTO participants (conversation_id, user_id, unread) VALUES (?1, ?2, 0)",
                params![id, user],
            )?;
        }

        self.get_conversation(&id)?
            .ok_or_else(|| StorageError::NotFound(format!("conversation {id}")))
    }

    /// Find a group with the given name and the identical participant set.
    pub fn find_group_conversation(
        &self,
        group_name: &str,
        participants: &[String],
    ) -> Result<Option<ConversationRow>, StorageError> {
        let wanted: HashSet<&str> = participants.iter().map(|p| p.as_str()).collect();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM conversations WHERE is_group = 1 AND group_name = ?1",
            Self::CONVERSATION_COLS
        ))?;
        let candidates = stmt
            .query_map(params![group_name], |r| self.conversation_from_row(r))?
            .collect::<Result<Vec<_>, _>>()?;

        for mut candidate in candidates {
            candidate.participants = self.participants_of(&candidate.conversation_id)?;
            let have: HashSet<&str> = candidate.participants.iter().map(|p| p.as_str()).collect();
            if have == wanted {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    /// Create a group conversation. The caller is responsible for validation
    /// and duplicate detection.
    pub fn create_group_conversation(
        &self,
        group_name: &str,
        group_admin: &str,
        participants: &[String],
    ) -> Result<ConversationRow, StorageError> {
        let id = generate_id();
        let now = now_secs();
        self.conn.execute(
            "INSERT INTO conversations
                 (conversation_id, is_group, group_name, group_admin, created_at, updated_at)
             VALUES (?1, 1, ?2, ?3, ?4, ?4)",
            params![id, group_name, group_admin, now],
        )?;
        for user in participants {
            self.conn.execute(
                "INSERT INTO participants (conversation_id, user_id, unread) VALUES (?1, ?2, 0)",
                params![id, user],
            )?;
        }
        self.get_conversation(&id)?
            .ok_or_else(|| StorageError::NotFound(format!("conversation {id}")))
    }

    pub fn set_last_message(
        &self,
        conversation_id: &str,
        message_id: &str,
        time: u64,
    ) -> Result<(), StorageError> {
        self.conn.execute(
            "UPDATE conversations
             SET last_message_id = ?2, last_message_time = ?3, updated_at = ?3
             WHERE conversation_id = ?1",
            params![conversation_id, message_id, time],
        )?;
        Ok(())
    }

    // -- Unread counters --

    /// Increment the unread counter of every participant except `sender` by
    /// one. A single UPDATE, so concurrent sends to the same conversation
    /// cannot lose increments.
    pub fn increment_unread_except(
        &self,
        conversation_id: &str,
        sender: &str,
    ) -> Result<(), StorageError> {
        self.conn.execute(
            "UPDATE participants SET unread = unread + 1
             WHERE conversation_id = ?1 AND user_id != ?2",
            params![conversation_id, sender],
        )?;
        Ok(())
    }

    /// Reset a participant's unread counter to zero. Returns false when the
    /// counter was already zero (or the participant row does not exist),
    /// which makes `mark_seen` idempotent.
    pub fn reset_unread(&self, conversation_id: &str, user_id: &str) -> Result<bool, StorageError> {
        let changed = self.conn.execute(
            "UPDATE participants SET unread = 0
             WHERE conversation_id = ?1 AND user_id = ?2 AND unread > 0",
            params![conversation_id, user_id],
        )?;
        Ok(changed > 0)
    }

    pub fn unread_for(&self, conversation_id: &str, user_id: &str) -> Result<u32, StorageError> {
        let unread = self
            .conn
            .query_row(
                "SELECT unread FROM participants WHERE conversation_id = ?1 AND user_id = ?2",
                params![conversation_id, user_id],
                |r| r.get(0),
            )
            .optional()?;
        Ok(unread.unwrap_or(0))
    }

    // -- Messages --

    pub fn insert_message(&self, message: &MessageRow) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO messages
                 (message_id, conversation_id, sender_id, body, image_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                message.message_id,
                message.conversation_id,
                message.sender_id,
                message.body,
                message.image_url,
                message.created_at
            ],
        )?;
        Ok(())
    }

    pub fn count_messages(&self, conversation_id: &str) -> Result<u64, StorageError> {
        let count: u64 = self.conn.query_row(
            "SELECT COUNT(*) FROM messages WHERE conversation_id = ?1",
            params![conversation_id],
            |r| r.get(0),
        )?;
        Ok(count)
    }

    /// Fetch one page of a conversation's history. Pages are counted from
    /// the newest message backwards (page 1 = latest `limit` messages); the
    /// returned page is ordered oldest-first for direct rendering.
    pub fn list_conversation_messages(
        &self,
        conversation_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<MessageRow>, StorageError> {
        let page = page.max(1);
        let offset = (page - 1) as u64 * limit as u64;
        let mut stmt = self.conn.prepare(
            "SELECT message_id, conversation_id, sender_id, body, image_url, created_at
             FROM messages WHERE conversation_id = ?1
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?2 OFFSET ?3",
        )?;
        let rows = stmt.query_map(params![conversation_id, limit, offset], |r| {
            Ok(MessageRow {
                message_id: r.get(0)?,
                conversation_id: r.get(1)?,
                sender_id: r.get(2)?,
                body: r.get(3)?,
                image_url: r.get(4)?,
                created_at: r.get(5)?,
            })
        })?;
        let mut messages = rows.collect::<Result<Vec<_>, _>>()?;
        messages.reverse();
        Ok(messages)
    }

    /// All conversations a user participates in, newest activity first,
    /// paired with that user's own unread count.
    pub fn list_user_conversations(
        &self,
        user_id: &str,
    ) -> Result<Vec<(ConversationRow, u32)>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT c.conversation_id, c.is_group, c.group_name, c.group_admin,
                    c.last_message_id, c.last_message_time, c.created_at, p.unread
             FROM conversations c
             JOIN participants p ON p.conversation_id = c.conversation_id
             WHERE p.user_id = ?1
             ORDER BY c.updated_at DESC",
        )?;
        let rows = stmt
            .query_map(params![user_id], |r| {
                let conversation = self.conversation_from_row(r)?;
                let unread: u32 = r.get(7)?;
                Ok((conversation, unread))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut out = Vec::with_capacity(rows.len());
        for (mut conversation, unread) in rows {
            conversation.participants = self.participants_of(&conversation.conversation_id)?;
            out.push((conversation, unread));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_storage() -> Storage {
        Storage::open_in_memory().unwrap()
    }

    fn add_user(storage: &Storage, id: &str, name: &str) {
        storage
            .insert_user(&UserRow {
                user_id: id.to_string(),
                username: name.to_string(),
                is_online: false,
                last_seen: None,
                created_at: now_secs(),
            })
            .unwrap();
    }

    #[test]
    fn test_user_crud_and_presence() {
        let storage = test_storage();
        add_user(&storage, "alice", "Alice");

        let loaded = storage.get_user("alice").unwrap().unwrap();
        assert_eq!(loaded.username, "Alice");
        assert!(!loaded.is_online);

        assert!(storage.set_user_presence("alice", true, 1234).unwrap());
        let loaded = storage.get_user("alice").unwrap().unwrap();
        assert!(loaded.is_online);
        assert_eq!(loaded.last_seen, Some(1234));

        // Unknown user: no row changed
        assert!(!storage.set_user_presence("nobody", true, 1).unwrap());

        assert_eq!(storage.list_users().unwrap().len(), 1);
    }

    #[test]
    fn test_direct_key_is_order_independent() {
        assert_eq!(direct_key("a", "b"), direct_key("b", "a"));
        assert_ne!(direct_key("a", "b"), direct_key("a", "c"));
    }

    #[test]
    fn test_direct_conversation_created_once_per_pair() {
        let storage = test_storage();

        let first = storage.create_direct_conversation("alice", "bob").unwrap();
        assert!(!first.is_group);
        assert_eq!(first.participants.len(), 2);
        assert_eq!(
            storage.unread_for(&first.conversation_id, "alice").unwrap(),
            0
        );

        // Second create for the reversed pair resolves to the same row.
        let second = storage.create_direct_conversation("bob", "alice").unwrap();
        assert_eq!(second.conversation_id, first.conversation_id);

        let found = storage
            .find_direct_conversation("bob", "alice")
            .unwrap()
            .unwrap();
        assert_eq!(found.conversation_id, first.conversation_id);
    }

    #[test]
    fn test_unread_increment_and_reset() {
        let storage = test_storage();
        let conv = storage.create_direct_conversation("alice", "bob").unwrap();

        storage
            .increment_unread_except(&conv.conversation_id, "alice")
            .unwrap();
        storage
            .increment_unread_except(&conv.conversation_id, "alice")
            .unwrap();

        assert_eq!(storage.unread_for(&conv.conversation_id, "bob").unwrap(), 2);
        assert_eq!(
            storage.unread_for(&conv.conversation_id, "alice").unwrap(),
            0
        );

        // Reset is effective once, then idempotent.
        assert!(storage.reset_unread(&conv.conversation_id, "bob").unwrap());
        assert!(!storage.reset_unread(&conv.conversation_id, "bob").unwrap());
        assert_eq!(storage.unread_for(&conv.conversation_id, "bob").unwrap(), 0);
    }

    #[test]
    fn test_group_duplicate_detection() {
        let storage = test_storage();
        let members = vec![
            "alice".to_string(),
            "bob".to_string(),
            "carol".to_string(),
        ];
        storage
            .create_group_conversation("book club", "alice", &members)
            .unwrap();

        assert!(storage
            .find_group_conversation("book club", &members)
            .unwrap()
            .is_some());

        // Same name, different member set: no match.
        let others = vec!["alice".to_string(), "bob".to_string(), "dave".to_string()];
        assert!(storage
            .find_group_conversation("book club", &others)
            .unwrap()
            .is_none());

        // Different name, same member set: no match.
        assert!(storage
            .find_group_conversation("film club", &members)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_message_pagination_newest_first_pages() {
        let storage = test_storage();
        let conv = storage.create_direct_conversation("alice", "bob").unwrap();

        for i in 0..5 {
            storage
                .insert_message(&MessageRow {
                    message_id: format!("m{i}"),
                    conversation_id: conv.conversation_id.clone(),
                    sender_id: "alice".to_string(),
                    body: format!("msg {i}"),
                    image_url: None,
                    created_at: 100 + i,
                })
                .unwrap();
        }

        assert_eq!(storage.count_messages(&conv.conversation_id).unwrap(), 5);

        // Page 1 holds the two newest, oldest-first within the page.
        let page1 = storage
            .list_conversation_messages(&conv.conversation_id, 1, 2)
            .unwrap();
        assert_eq!(
            page1.iter().map(|m| m.message_id.as_str()).collect::<Vec<_>>(),
            vec!["m3", "m4"]
        );

        let page3 = storage
            .list_conversation_messages(&conv.conversation_id, 3, 2)
            .unwrap();
        assert_eq!(
            page3.iter().map(|m| m.message_id.as_str()).collect::<Vec<_>>(),
            vec!["m0"]
        );
    }

    #[test]
    fn test_list_user_conversations_with_unread() {
        let storage = test_storage();
        let direct = storage.create_direct_conversation("alice", "bob").unwrap();
        let members = vec![
            "alice".to_string(),
            "bob".to_string(),
            "carol".to_string(),
        ];
        storage
            .create_group_conversation("trio", "alice", &members)
            .unwrap();

        storage
            .increment_unread_except(&direct.conversation_id, "bob")
            .unwrap();

        let convs = storage.list_user_conversations("alice").unwrap();
        assert_eq!(convs.len(), 2);
        let (_, direct_unread) = convs
            .iter()
            .find(|(c, _)| c.conversation_id == direct.conversation_id)
            .unwrap();
        assert_eq!(*direct_unread, 1);

        assert_eq!(storage.list_user_conversations("carol").unwrap().len(), 1);
    }
}
