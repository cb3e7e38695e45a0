//! Conversation resolver: find-or-create semantics for direct chats,
//! authorized lookup by id, and validated group creation.

use crate::clog;
use crate::error::ChatError;
use crate::logging;
use crate::storage::{ConversationRow, SharedStorage};

#[derive(Clone)]
pub struct ConversationResolver {
    storage: SharedStorage,
}

impl ConversationResolver {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    /// Return the one-on-one conversation between two users, creating it
    /// with zeroed unread counters on first contact. Creation is guarded by
    /// a uniqueness constraint on the sorted pair, so two concurrent first
    /// messages from either side converge on a single conversation.
    pub async fn resolve_direct(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<ConversationRow, ChatError> {
        if user_a == user_b {
            return Err(ChatError::Validation(
                "cannot open a conversation with yourself".to_string(),
            ));
        }

        let storage = self.storage.lock().await;
        if let Some(existing) = storage.find_direct_conversation(user_a, user_b)? {
            return Ok(existing);
        }
        let created = storage.create_direct_conversation(user_a, user_b)?;
        clog!(
            "resolver: created direct conversation {} for {} <-> {}",
            logging::conv_id(&created.conversation_id),
            logging::user_id(user_a),
            logging::user_id(user_b)
        );
        Ok(created)
    }

    /// Fetch a conversation by id, rejecting requesters who are not
    /// participants. This is the guard against spoofed group message
    /// injection, since group sends address the conversation directly.
    pub async fn resolve_by_id(
        &self,
        conversation_id: &str,
        requester: &str,
    ) -> Result<ConversationRow, ChatError> {
        let storage = self.storage.lock().await;
        let conversation = storage
            .get_conversation(conversation_id)?
            .ok_or_else(|| ChatError::NotFound(format!("conversation {conversation_id}")))?;
        if !conversation.is_participant(requester) {
            return Err(ChatError::NotAParticipant(requester.to_string()));
        }
        Ok(conversation)
    }

    /// Create a group conversation with the creator as admin.
    ///
    /// Requires a non-empty trimmed name and at least two other members, all
    /// of which must resolve to real users. Two groups may not share the
    /// same name and the identical participant set.
    pub async fn create_group(
        &self,
        creator: &str,
        group_name: &str,
        member_ids: &[String],
    ) -> Result<ConversationRow, ChatError> {
        let name = group_name.trim();
        if name.is_empty() {
            return Err(ChatError::Validation("group name is required".to_string()));
        }

        let mut members: Vec<String> = Vec::new();
        for member in member_ids {
            if member != creator && !members.contains(member) {
                members.push(member.clone());
            }
        }
        if members.len() < 2 {
            return Err(ChatError::Validation(
                "at least two other members are required to create a group".to_string(),
            ));
        }

        let storage = self.storage.lock().await;
        for member in &members {
            if storage.get_user(member)?.is_none() {
                return Err(ChatError::Validation(
                    "one or more member ids are invalid".to_string(),
                ));
            }
        }

        let mut participants = Vec::with_capacity(members.len() + 1);
        participants.push(creator.to_string());
        participants.extend(members);

        if storage.find_group_conversation(name, &participants)?.is_some() {
            return Err(ChatError::DuplicateGroup);
        }

        let created = storage.create_group_conversation(name, creator, &participants)?;
        clog!(
            "resolver: created group {} ({:?}, {} participants, admin {})",
            logging::conv_id(&created.conversation_id),
            name,
            created.participants.len(),
            logging::user_id(creator)
        );
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::Mutex;

    use super::*;
    use crate::storage::{now_secs, Storage, UserRow};

    fn test_resolver() -> ConversationResolver {
        let storage = Storage::open_in_memory().unwrap();
        for (id, name) in [
            ("alice", "Alice"),
            ("bob", "Bob"),
            ("carol", "Carol"),
            ("dave", "Dave"),
        ] {
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
        ConversationResolver::new(Arc::new(Mutex::new(storage)))
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_resolve_direct_is_find_or_create() {
        let resolver = test_resolver();
        let first = resolver.resolve_direct("alice", "bob").await.unwrap();
        let second = resolver.resolve_direct("bob", "alice").await.unwrap();
        assert_eq!(first.conversation_id, second.conversation_id);
        assert!(!first.is_group);

        assert!(matches!(
            resolver.resolve_direct("alice", "alice").await,
            Err(ChatError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_by_id_authorization() {
        let resolver = test_resolver();
        let conv = resolver.resolve_direct("alice", "bob").await.unwrap();

        let ok = resolver
            .resolve_by_id(&conv.conversation_id, "alice")
            .await
            .unwrap();
        assert_eq!(ok.conversation_id, conv.conversation_id);

        assert!(matches!(
            resolver.resolve_by_id(&conv.conversation_id, "carol").await,
            Err(ChatError::NotAParticipant(_))
        ));
        assert!(matches!(
            resolver.resolve_by_id("missing", "alice").await,
            Err(ChatError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_group_validation() {
        let resolver = test_resolver();

        assert!(matches!(
            resolver.create_group("alice", "   ", &ids(&["bob", "carol"])).await,
            Err(ChatError::Validation(_))
        ));
        assert!(matches!(
            resolver.create_group("alice", "duo", &ids(&["bob"])).await,
            Err(ChatError::Validation(_))
        ));
        // Creator and duplicates don't count towards the two-other-members rule
        assert!(matches!(
            resolver
                .create_group("alice", "padded", &ids(&["alice", "bob", "bob"]))
                .await,
            Err(ChatError::Validation(_))
        ));
        assert!(matches!(
            resolver
                .create_group("alice", "ghosts", &ids(&["bob", "nobody"]))
                .await,
            Err(ChatError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_create_group_and_duplicate_rejection() {
        let resolver = test_resolver();
        let group = resolver
            .create_group("alice", " book club ", &ids(&["bob", "carol"]))
            .await
            .unwrap();
        assert!(group.is_group);
        assert_eq!(group.group_name.as_deref(), Some("book club"));
        assert_eq!(group.group_admin.as_deref(), Some("alice"));
        assert_eq!(group.participants.len(), 3);

        assert!(matches!(
            resolver
                .create_group("alice", "book club", &ids(&["carol", "bob"]))
                .await,
            Err(ChatError::DuplicateGroup)
        ));

        // Same name with a different member set is a different group.
        let other = resolver
            .create_group("alice", "book club", &ids(&["bob", "dave"]))
            .await
            .unwrap();
        assert_ne!(other.conversation_id, group.conversation_id);
    }
}
