use thiserror::Error;

mod auth;
mod database;
mod feed;
mod logging;
mod server;

pub use auth::Auth;
pub use database::{Database, DbPoolConfig};
pub use feed::{Comments, Leaderboard, Posts};
pub use logging::{Logging, LoggingStyle};
pub use server::{Http, Server};

#[derive(Debug, Error)]
#[error("Failed to load configuration")]
pub struct ParseError;
