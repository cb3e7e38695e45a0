pub mod conversations;
pub mod groups;
pub mod health;
pub mod uploads;
pub mod users;
pub mod websocket;
