//! confab server module: presence and message-delivery coordinator behind
//! an axum HTTP/WebSocket surface, persisting state in SQLite.

pub mod config;
pub mod handlers;
pub mod router;
pub mod state;
pub mod utils;

use clap::Parser;

use crate::clog;
use crate::storage::Storage;

use config::{Cli, Config, DISCONNECT_GRACE};
use state::ChatState;

/// Entry point: parse CLI, open storage, start server.
pub async fn run() {
    let cli = Cli::parse();
    let config = Config::from_cli_and_env(cli);

    crate::logging::init();

    clog!("confab starting");
    clog!("  data directory: {}", config.data_dir.display());

    std::fs::create_dir_all(&config.data_dir).expect("failed to create data directory");
    let db_path = config.data_dir.join("confab.db");
    let storage = Storage::open(&db_path).expect("failed to open database");
    clog!("  database: {}", db_path.display());

    let upload_dir = config.data_dir.join("uploads");
    std::fs::create_dir_all(&upload_dir).expect("failed to create upload directory");

    let state = ChatState::new(storage, DISCONNECT_GRACE, upload_dir);
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("failed to bind");
    clog!("confab listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await.expect("server error");
}
