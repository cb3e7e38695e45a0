//! Error taxonomy shared by the coordinator components.

use crate::storage::StorageError;

/// Errors surfaced by the conversation resolver and message dispatcher.
///
/// Structural errors (`NotFound`, `NotAParticipant`, `DuplicateGroup`,
/// `Validation`) are returned to the originating caller with a message
/// suitable for direct display. `SendFailed` marks a persistence failure
/// during a message write. Delivery-path failures are never represented
/// here; they are logged and swallowed at the call site.
#[derive(Debug)]
pub enum ChatError {
    NotFound(String),
    NotAParticipant(String),
    DuplicateGroup,
    Validation(String),
    SendFailed(String),
    Storage(StorageError),
}

impl std::fmt::Display for ChatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatError::NotFound(what) => write!(f, "not found: {what}"),
            ChatError::NotAParticipant(user) => {
                write!(f, "user {user} is not a participant of this conversation")
            }
            ChatError::DuplicateGroup => {
                write!(f, "a group with this name and participants already exists")
            }
            ChatError::Validation(msg) => write!(f, "{msg}"),
            ChatError::SendFailed(msg) => write!(f, "failed to send message: {msg}"),
            ChatError::Storage(e) => write!(f, "storage error: {e}"),
        }
    }
}

impl std::error::Error for ChatError {}

impl From<StorageError> for ChatError {
    fn from(e: StorageError) -> Self {
        ChatError::Storage(e)
    }
}
