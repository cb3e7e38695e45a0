//! Configuration types and constants for the confab server.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// How long a disconnect may go unconfirmed before the user is treated as
/// offline. A page refresh drops and re-opens the socket well inside this
/// window, so presence does not flicker.
pub(crate) const DISCONNECT_GRACE: Duration = Duration::from_secs(5);

pub(crate) const MAX_WS_CONNECTIONS: usize = 1024;

/// Maximum accepted image upload size.
pub(crate) const MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024; // 10 MiB

pub(crate) const DEFAULT_PAGE_SIZE: u32 = 20;
pub(crate) const MAX_PAGE_SIZE: u32 = 100;

/// Chat backend: presence tracking and message delivery over WebSocket,
/// with a REST API for users, conversations, and history.
///
/// Configuration can be set via CLI arguments or environment variables.
/// CLI arguments take precedence over environment variables.
#[derive(Parser, Debug)]
#[command(name = "confab", version, about)]
pub struct Cli {
    /// HTTP server bind address [env: CONFAB_BIND] [default: 127.0.0.1:3001]
    #[arg(long, short = 'b')]
    pub bind: Option<String>,

    /// Data directory for the database and uploads [env: CONFAB_HOME] [default: ~/.confab]
    #[arg(long, short = 'd')]
    pub data_dir: Option<PathBuf>,
}

pub struct Config {
    pub bind_addr: String,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_cli_and_env(cli: Cli) -> Self {
        let data_dir = cli
            .data_dir
            .or_else(|| std::env::var("CONFAB_HOME").ok().map(PathBuf::from))
            .unwrap_or_else(|| {
                std::env::var("HOME")
                    .map(|h| PathBuf::from(h).join(".confab"))
                    .unwrap_or_else(|_| PathBuf::from(".confab"))
            });

        let bind_addr = cli
            .bind
            .or_else(|| std::env::var("CONFAB_BIND").ok())
            .unwrap_or_else(|| "127.0.0.1:3001".to_string());

        Self {
            bind_addr,
            data_dir,
        }
    }
}
