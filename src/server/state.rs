//! Shared application state: the coordinator services bundled for axum.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::delivery::DeliveryTransport;
use crate::dispatch::MessageDispatcher;
use crate::presence::PresenceRegistry;
use crate::receipts::ReadReceiptCoordinator;
use crate::resolver::ConversationResolver;
use crate::storage::{SharedStorage, Storage};

/// Cheaply cloneable bundle of every service a handler can reach. Each
/// service serializes its own state internally; there is no lock spanning
/// all connections.
#[derive(Clone)]
pub struct ChatState {
    pub storage: SharedStorage,
    pub transport: DeliveryTransport,
    pub presence: PresenceRegistry,
    pub resolver: ConversationResolver,
    pub dispatcher: MessageDispatcher,
    pub receipts: ReadReceiptCoordinator,
    pub upload_dir: PathBuf,
}

impl ChatState {
    /// Wire up the coordinator around a storage handle. `grace` is the
    /// disconnect debounce window; tests inject a short one.
    pub fn new(storage: Storage, grace: Duration, upload_dir: PathBuf) -> Self {
        let storage: SharedStorage = Arc::new(Mutex::new(storage));
        let transport = DeliveryTransport::new();
        let presence = PresenceRegistry::new(storage.clone(), transport.clone(), grace);
        let resolver = ConversationResolver::new(storage.clone());
        let dispatcher =
            MessageDispatcher::new(storage.clone(), presence.clone(), transport.clone());
        let receipts =
            ReadReceiptCoordinator::new(storage.clone(), presence.clone(), transport.clone());
        Self {
            storage,
            transport,
            presence,
            resolver,
            dispatcher,
            receipts,
            upload_dir,
        }
    }
}
