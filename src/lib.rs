pub mod delivery;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod logging;
pub mod presence;
pub mod receipts;
pub mod resolver;
pub mod server;
pub mod storage;
